//! CLI commands implementation

use anyhow::{Context, Result};
use powertopsis_core::{ClusterSnapshot, MetricVector, NodeInfo, ScoringConfig, WorkloadRequest};
use powertopsis_scheduler::{place_all, PlacementDecision, PowerAware, Ranking};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// One node line of a score report
#[derive(Debug, Serialize)]
pub struct NodeReport {
    pub node: String,
    pub metrics: MetricVector,
    pub closeness: f64,
    pub score: i64,
}

/// Result of a single scoring attempt
#[derive(Debug, Serialize)]
pub struct ScoreReport {
    pub workload: String,
    pub attempt_id: Option<Uuid>,
    pub nodes: Vec<NodeReport>,
}

impl ScoreReport {
    fn new(workload: &WorkloadRequest, ranking: Option<Ranking>) -> Self {
        let Some(ranking) = ranking else {
            return Self {
                workload: workload.name.clone(),
                attempt_id: None,
                nodes: Vec::new(),
            };
        };

        let mut nodes: Vec<NodeReport> = ranking
            .raw
            .iter()
            .zip(&ranking.scores)
            .map(|(raw, scored)| NodeReport {
                node: raw.node.clone(),
                metrics: raw.values,
                closeness: scored.closeness,
                score: scored.score,
            })
            .collect();
        nodes.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.node.cmp(&b.node)));

        Self {
            workload: workload.name.clone(),
            attempt_id: Some(ranking.table.attempt_id()),
            nodes,
        }
    }
}

/// Result of a sequential placement run
#[derive(Debug, Serialize)]
pub struct PlaceReport {
    pub decisions: Vec<PlacementDecision>,
    pub nodes: Vec<NodeInfo>,
}

fn load_snapshot(path: &Path) -> Result<ClusterSnapshot> {
    ClusterSnapshot::from_file(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))
}

/// Score every node of a snapshot for its workload
pub fn score(
    out: &mut impl Write,
    config: Option<&Path>,
    snapshot: &Path,
    json: bool,
) -> Result<()> {
    let snapshot = load_snapshot(snapshot)?;
    let plugin = PowerAware::from_config_path(config);
    let workload = snapshot
        .workload
        .unwrap_or_else(|| WorkloadRequest::new("workload"));

    let ranking = plugin.rank(&workload, &snapshot.nodes);
    let report = ScoreReport::new(&workload, ranking);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    if report.nodes.is_empty() {
        writeln!(out, "No candidate nodes in snapshot")?;
        return Ok(());
    }

    writeln!(out, "Workload: {}", report.workload)?;
    writeln!(
        out,
        "{:<24} {:>6} {:>8} {:>8} {:>10} {:>10} {:>6}",
        "NODE", "PODS", "CPU", "MEMORY", "POWER", "CLOSENESS", "SCORE"
    )?;
    writeln!(out, "{}", "-".repeat(78))?;
    for n in &report.nodes {
        writeln!(
            out,
            "{:<24} {:>6} {:>8.3} {:>8.3} {:>10.2} {:>10.4} {:>6}",
            n.node,
            n.metrics.pods,
            n.metrics.cpu,
            n.metrics.memory,
            n.metrics.power,
            n.closeness,
            n.score
        )?;
    }

    Ok(())
}

/// Place the snapshot's pending workloads one by one
pub fn place(
    out: &mut impl Write,
    config: Option<&Path>,
    snapshot: &Path,
    json: bool,
) -> Result<()> {
    let snapshot = load_snapshot(snapshot)?;
    let plugin = PowerAware::from_config_path(config);

    let mut nodes = snapshot.nodes;
    let decisions = place_all(&plugin, &mut nodes, &snapshot.pending);

    if json {
        let report = PlaceReport { decisions, nodes };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    if decisions.is_empty() {
        writeln!(out, "No pending workloads in snapshot")?;
        return Ok(());
    }

    writeln!(out, "{:<24} {:<24} {:>6}", "WORKLOAD", "NODE", "SCORE")?;
    writeln!(out, "{}", "-".repeat(56))?;
    for d in &decisions {
        writeln!(
            out,
            "{:<24} {:<24} {:>6}",
            d.workload,
            d.node.as_deref().unwrap_or("<unplaced>"),
            d.score.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Nodes:")?;
    for n in &nodes {
        writeln!(
            out,
            "  {} - {} pods, {}m CPU, {} MiB",
            n.name,
            n.pods,
            n.requested.cpu_millis,
            n.requested.memory_bytes / (1024 * 1024)
        )?;
    }

    Ok(())
}

/// Print the effective scoring configuration
pub fn show_config(out: &mut impl Write, config: Option<&Path>) -> Result<()> {
    let resolved = ScoringConfig::resolve(config);
    write!(out, "{}", resolved.to_toml_string()?)?;
    Ok(())
}
