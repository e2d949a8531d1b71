//! Sequential placement driven by a score plugin

use powertopsis_core::{NodeInfo, WorkloadRequest};
use serde::Serialize;
use tracing::{info, warn};

use crate::plugin::ScorePlugin;

/// Placement decision for one workload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementDecision {
    /// Workload name
    pub workload: String,
    /// Chosen node, if any candidate existed
    pub node: Option<String>,
    /// Score of the chosen node
    pub score: Option<i64>,
}

/// Place workloads one at a time, binding each to its best-scoring node
///
/// Every workload is its own attempt: prepare once, query every node, bind
/// to the highest score (ties go to the smallest node name), then update
/// that node's requested resources and pod count.
pub fn place_all<P>(
    plugin: &P,
    nodes: &mut [NodeInfo],
    workloads: &[WorkloadRequest],
) -> Vec<PlacementDecision>
where
    P: ScorePlugin + ?Sized,
{
    workloads
        .iter()
        .map(|workload| place_one(plugin, nodes, workload))
        .collect()
}

fn place_one<P>(plugin: &P, nodes: &mut [NodeInfo], workload: &WorkloadRequest) -> PlacementDecision
where
    P: ScorePlugin + ?Sized,
{
    let table = plugin.prepare(workload, nodes);

    let best = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (i, plugin.score(table.as_ref(), &n.name)))
        .fold(None, |best: Option<(usize, i64)>, (i, score)| match best {
            Some((j, top)) if top > score || (top == score && nodes[j].name <= nodes[i].name) => {
                best
            }
            _ => Some((i, score)),
        });

    let Some((index, score)) = best else {
        warn!(workload = %workload.name, "No candidate nodes, workload left unplaced");
        return PlacementDecision {
            workload: workload.name.clone(),
            node: None,
            score: None,
        };
    };

    let node = &mut nodes[index];
    node.bind(workload.aggregate());

    info!(
        workload = %workload.name,
        node = %node.name,
        score = score,
        "Workload placed"
    );

    PlacementDecision {
        workload: workload.name.clone(),
        node: Some(node.name.clone()),
        score: Some(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PowerAware;
    use crate::scorer::ScoreTable;
    use powertopsis_core::ResourceVector;

    const GI: u64 = 1024 * 1024 * 1024;

    fn workloads(count: usize) -> Vec<WorkloadRequest> {
        (0..count)
            .map(|i| WorkloadRequest::new(format!("pod-{}", i)).with_container(500, GI))
            .collect()
    }

    #[test]
    fn test_default_policy_spreads_load() {
        let plugin = PowerAware::default();
        let mut nodes = vec![
            NodeInfo::new("node-b", ResourceVector::new(4000, 16 * GI)),
            NodeInfo::new("node-a", ResourceVector::new(4000, 16 * GI)),
        ];

        let decisions = place_all(&plugin, &mut nodes, &workloads(2));

        assert_eq!(decisions[0].node.as_deref(), Some("node-a"));
        assert_eq!(decisions[0].score, Some(50));
        assert_eq!(decisions[1].node.as_deref(), Some("node-b"));
        assert_eq!(decisions[1].score, Some(100));
        assert!(nodes.iter().all(|n| n.pods == 1));
        assert!(nodes.iter().all(|n| n.requested == ResourceVector::new(500, GI)));
    }

    #[test]
    fn test_no_nodes_leaves_workloads_unplaced() {
        let plugin = PowerAware::default();
        let decisions = place_all(&plugin, &mut [], &workloads(2));

        assert_eq!(decisions.len(), 2);
        assert!(decisions.iter().all(|d| d.node.is_none() && d.score.is_none()));
    }

    #[test]
    fn test_uses_trait_object() {
        struct Fixed;

        impl ScorePlugin for Fixed {
            fn name(&self) -> &'static str {
                "Fixed"
            }

            fn prepare(&self, _: &WorkloadRequest, nodes: &[NodeInfo]) -> Option<ScoreTable> {
                PowerAware::default().prepare(&WorkloadRequest::default(), nodes)
            }
        }

        let plugin: Box<dyn ScorePlugin> = Box::new(Fixed);
        let mut nodes = vec![NodeInfo::new("solo", ResourceVector::new(1000, GI))];
        let decisions = place_all(plugin.as_ref(), &mut nodes, &workloads(3));

        assert!(decisions.iter().all(|d| d.node.as_deref() == Some("solo")));
        assert_eq!(nodes[0].pods, 3);
    }
}
