//! Node, workload and snapshot type definitions

use crate::quantity::{deserialize_cpu, deserialize_memory};
use crate::{TopsisError, TopsisResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// CPU (millicores) and memory (bytes) amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceVector {
    /// CPU in millicores
    #[serde(deserialize_with = "deserialize_cpu", default)]
    pub cpu_millis: u64,
    /// Memory in bytes
    #[serde(deserialize_with = "deserialize_memory", default)]
    pub memory_bytes: u64,
}

impl ResourceVector {
    pub fn new(cpu_millis: u64, memory_bytes: u64) -> Self {
        Self {
            cpu_millis,
            memory_bytes,
        }
    }

    pub fn saturating_add(self, other: ResourceVector) -> Self {
        Self {
            cpu_millis: self.cpu_millis.saturating_add(other.cpu_millis),
            memory_bytes: self.memory_bytes.saturating_add(other.memory_bytes),
        }
    }
}

/// A candidate node as seen by one scheduling attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Stable node identity
    pub name: String,
    /// Allocatable capacity
    pub allocatable: ResourceVector,
    /// Sum of requests of workloads already on the node
    #[serde(default)]
    pub requested: ResourceVector,
    /// Number of workloads currently assigned to the node
    #[serde(default)]
    pub pods: u32,
}

impl NodeInfo {
    /// Create an empty node with the given capacity
    pub fn new(name: impl Into<String>, allocatable: ResourceVector) -> Self {
        Self {
            name: name.into(),
            allocatable,
            requested: ResourceVector::default(),
            pods: 0,
        }
    }

    /// Account for a workload bound to this node
    pub fn bind(&mut self, request: ResourceVector) {
        self.requested = self.requested.saturating_add(request);
        self.pods = self.pods.saturating_add(1);
    }
}

/// Resource request of a single container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerRequest {
    /// CPU in millicores
    #[serde(deserialize_with = "deserialize_cpu", default)]
    pub cpu: u64,
    /// Memory in bytes
    #[serde(deserialize_with = "deserialize_memory", default)]
    pub memory: u64,
}

/// The workload being placed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkloadRequest {
    /// Workload name
    pub name: String,
    /// Per-container requests
    #[serde(default)]
    pub containers: Vec<ContainerRequest>,
}

impl WorkloadRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            containers: Vec::new(),
        }
    }

    /// Add a container request
    pub fn with_container(mut self, cpu: u64, memory: u64) -> Self {
        self.containers.push(ContainerRequest { cpu, memory });
        self
    }

    /// Aggregate request summed across all containers
    pub fn aggregate(&self) -> ResourceVector {
        self.containers
            .iter()
            .fold(ResourceVector::default(), |acc, c| {
                acc.saturating_add(ResourceVector::new(c.cpu, c.memory))
            })
    }
}

/// Cluster snapshot file format (TOML or JSON)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    /// Candidate nodes
    #[serde(default)]
    pub nodes: Vec<NodeInfo>,
    /// Workload for a single scoring attempt
    #[serde(default)]
    pub workload: Option<WorkloadRequest>,
    /// Workloads for a sequential placement run
    #[serde(default)]
    pub pending: Vec<WorkloadRequest>,
}

impl ClusterSnapshot {
    /// Load a snapshot, choosing the decoder from the file extension
    pub fn from_file(path: &Path) -> TopsisResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("toml") | None => toml::from_str(&content)
                .map_err(|e| TopsisError::Snapshot(format!("Failed to parse snapshot: {}", e))),
            Some(other) => Err(TopsisError::Snapshot(format!(
                "Unsupported snapshot format: .{}",
                other
            ))),
        }
    }
}
