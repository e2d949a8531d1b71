//! Raw criteria extraction from node state

use powertopsis_core::{MetricVector, NodeInfo, PlacementMode, ResourceVector};
use serde::Serialize;

use crate::power::PowerModel;

/// One row of the decision matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMetrics {
    /// Node name
    pub node: String,
    /// Criteria values for this node
    pub values: MetricVector,
}

/// Builds the raw decision matrix for one attempt
#[derive(Debug, Clone, Copy)]
pub struct CriteriaExtractor {
    mode: PlacementMode,
    power: PowerModel,
}

impl CriteriaExtractor {
    pub fn new(mode: PlacementMode, power: PowerModel) -> Self {
        Self { mode, power }
    }

    /// Produce one metric vector per candidate node, in input order
    pub fn extract(&self, request: ResourceVector, nodes: &[NodeInfo]) -> Vec<NodeMetrics> {
        nodes
            .iter()
            .map(|node| NodeMetrics {
                node: node.name.clone(),
                values: self.metrics_for(request, node),
            })
            .collect()
    }

    fn metrics_for(&self, request: ResourceVector, node: &NodeInfo) -> MetricVector {
        let (pods, requested) = match self.mode {
            PlacementMode::Current => (node.pods, node.requested),
            PlacementMode::Projected => (
                node.pods.saturating_add(1),
                node.requested.saturating_add(request),
            ),
        };

        let cpu = utilization(requested.cpu_millis, node.allocatable.cpu_millis);
        let memory = utilization(requested.memory_bytes, node.allocatable.memory_bytes);

        MetricVector::new(pods as f64, cpu, memory, self.power.estimate(cpu))
    }
}

/// `requested / allocatable`, or 0 when nothing is allocatable
fn utilization(requested: u64, allocatable: u64) -> f64 {
    if allocatable == 0 {
        return 0.0;
    }
    requested as f64 / allocatable as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const GI: u64 = 1024 * 1024 * 1024;

    fn node(name: &str, cpu: (u64, u64), mem: (u64, u64), pods: u32) -> NodeInfo {
        NodeInfo {
            name: name.to_string(),
            allocatable: ResourceVector::new(cpu.1, mem.1),
            requested: ResourceVector::new(cpu.0, mem.0),
            pods,
        }
    }

    #[test]
    fn test_extract_current_state() {
        let extractor = CriteriaExtractor::new(PlacementMode::Current, PowerModel::default());
        let nodes = vec![node("a", (1000, 4000), (4 * GI, 16 * GI), 3)];

        let rows = extractor.extract(ResourceVector::new(500, GI), &nodes);
        assert_eq!(rows.len(), 1);

        let v = rows[0].values;
        assert_eq!(rows[0].node, "a");
        assert_eq!(v.pods, 3.0);
        assert_eq!(v.cpu, 0.25);
        assert_eq!(v.memory, 0.25);
        assert_eq!(v.power, PowerModel::default().estimate(0.25));
    }

    #[test]
    fn test_extract_projected_state() {
        let extractor = CriteriaExtractor::new(PlacementMode::Projected, PowerModel::default());
        let nodes = vec![node("a", (1000, 4000), (4 * GI, 16 * GI), 3)];

        let rows = extractor.extract(ResourceVector::new(1000, 4 * GI), &nodes);
        let v = rows[0].values;
        assert_eq!(v.pods, 4.0);
        assert_eq!(v.cpu, 0.5);
        assert_eq!(v.memory, 0.5);
        assert_eq!(v.power, PowerModel::default().estimate(0.5));
    }

    #[test]
    fn test_zero_allocatable_is_zero_utilization() {
        let extractor = CriteriaExtractor::new(PlacementMode::Current, PowerModel::default());
        let nodes = vec![node("broken", (500, 0), (GI, 0), 1)];

        let v = extractor.extract(ResourceVector::default(), &nodes)[0].values;
        assert_eq!(v.cpu, 0.0);
        assert_eq!(v.memory, 0.0);
        assert_eq!(v.power, 150.0);
    }

    #[test]
    fn test_overcommitted_node_exceeds_one() {
        let extractor = CriteriaExtractor::new(PlacementMode::Current, PowerModel::default());
        let nodes = vec![node("hot", (3000, 2000), (0, GI), 0)];

        let v = extractor.extract(ResourceVector::default(), &nodes)[0].values;
        assert_eq!(v.cpu, 1.5);
    }

    #[test]
    fn test_extract_empty() {
        let extractor = CriteriaExtractor::new(PlacementMode::Current, PowerModel::default());
        assert!(extractor.extract(ResourceVector::default(), &[]).is_empty());
    }
}
