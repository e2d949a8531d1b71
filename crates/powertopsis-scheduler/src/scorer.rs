//! Closeness scoring and the per-attempt score table

use powertopsis_core::{Criterion, MetricVector};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::ideal::ReferencePoints;
use crate::normalize::{WeightedMatrix, EPSILON};

/// Highest score a node can receive
pub const MAX_NODE_SCORE: i64 = 100;

/// Score returned for nodes absent from the table
pub const FALLBACK_SCORE: i64 = 0;

/// Closeness used when the reference points coincide
pub const NEUTRAL_CLOSENESS: f64 = 0.5;

/// Euclidean distance over all four criteria
pub fn euclidean_distance(a: &MetricVector, b: &MetricVector) -> f64 {
    Criterion::ALL
        .iter()
        .map(|&c| (a[c] - b[c]).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Closeness of `values` to the ideal point, in `[0, 1]`
pub fn closeness(values: &MetricVector, points: &ReferencePoints) -> f64 {
    let d_plus = euclidean_distance(values, &points.ideal);
    let d_minus = euclidean_distance(values, &points.anti_ideal);

    let total = d_plus + d_minus;
    if total < EPSILON {
        return NEUTRAL_CLOSENESS;
    }
    d_minus / total
}

/// Map a closeness coefficient onto `[0, MAX_NODE_SCORE]`
pub fn to_node_score(closeness: f64) -> i64 {
    (closeness * MAX_NODE_SCORE as f64)
        .round()
        .clamp(0.0, MAX_NODE_SCORE as f64) as i64
}

/// Closeness and integer score of one node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeScore {
    pub node: String,
    pub closeness: f64,
    pub score: i64,
}

/// Scores every row of a weighted matrix against its reference points
pub fn score_matrix(matrix: &WeightedMatrix, points: &ReferencePoints) -> Vec<NodeScore> {
    matrix
        .rows()
        .iter()
        .map(|row| {
            let c = closeness(&row.values, points);
            NodeScore {
                node: row.node.clone(),
                closeness: c,
                score: to_node_score(c),
            }
        })
        .collect()
}

/// Scores produced by one prepare pass, read back by per-node queries
///
/// A table belongs to exactly one attempt and is never shared between
/// attempts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTable {
    attempt_id: Uuid,
    scores: BTreeMap<String, i64>,
}

impl ScoreTable {
    /// Build a table from per-node scores
    ///
    /// A name that appears more than once keeps its highest score, so the
    /// table does not depend on candidate order.
    pub fn new(attempt_id: Uuid, scores: impl IntoIterator<Item = NodeScore>) -> Self {
        let mut table = BTreeMap::new();
        for s in scores {
            table
                .entry(s.node)
                .and_modify(|held: &mut i64| *held = (*held).max(s.score))
                .or_insert(s.score);
        }

        Self {
            attempt_id,
            scores: table,
        }
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    /// Score for `node`, or [`FALLBACK_SCORE`] if it was not ranked
    pub fn score(&self, node: &str) -> i64 {
        self.get(node).unwrap_or(FALLBACK_SCORE)
    }

    pub fn get(&self, node: &str) -> Option<i64> {
        self.scores.get(node).copied()
    }

    /// Highest-scoring node, ties going to the lexicographically smallest name
    pub fn best(&self) -> Option<(&str, i64)> {
        self.scores
            .iter()
            .fold(None, |best: Option<(&str, i64)>, (node, &score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((node.as_str(), score)),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.scores.iter().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(ideal: [f64; 4], anti: [f64; 4]) -> ReferencePoints {
        ReferencePoints {
            ideal: MetricVector::new(ideal[0], ideal[1], ideal[2], ideal[3]),
            anti_ideal: MetricVector::new(anti[0], anti[1], anti[2], anti[3]),
        }
    }

    fn table(entries: &[(&str, i64)]) -> ScoreTable {
        ScoreTable::new(
            Uuid::new_v4(),
            entries.iter().map(|(n, s)| NodeScore {
                node: n.to_string(),
                closeness: *s as f64 / 100.0,
                score: *s,
            }),
        )
    }

    #[test]
    fn test_euclidean_distance() {
        let a = MetricVector::new(0.0, 3.0, 0.0, 0.0);
        let b = MetricVector::new(0.0, 0.0, 4.0, 0.0);
        assert_eq!(euclidean_distance(&a, &b), 5.0);
        assert_eq!(euclidean_distance(&a, &a), 0.0);
    }

    #[test]
    fn test_closeness_endpoints() {
        let p = points([0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 0.0, 0.0]);

        assert_eq!(closeness(&p.ideal, &p), 1.0);
        assert_eq!(closeness(&p.anti_ideal, &p), 0.0);
        let mid = MetricVector::new(0.0, 0.5, 0.0, 0.0);
        assert_eq!(closeness(&mid, &p), 0.5);
    }

    #[test]
    fn test_degenerate_closeness_is_neutral() {
        let p = points([0.1, 0.2, 0.3, 0.4], [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(closeness(&p.ideal, &p), NEUTRAL_CLOSENESS);
    }

    #[test]
    fn test_to_node_score() {
        assert_eq!(to_node_score(0.0), 0);
        assert_eq!(to_node_score(0.5), 50);
        assert_eq!(to_node_score(0.734), 73);
        assert_eq!(to_node_score(0.736), 74);
        assert_eq!(to_node_score(1.0), 100);
    }

    #[test]
    fn test_table_fallback_for_unknown_node() {
        let t = table(&[("a", 40)]);
        assert_eq!(t.score("a"), 40);
        assert_eq!(t.score("ghost"), FALLBACK_SCORE);
        assert_eq!(t.get("ghost"), None);
    }

    #[test]
    fn test_table_keeps_highest_score_for_repeated_name() {
        let forward = table(&[("x", 0), ("x", 100), ("y", 50)]);
        let swapped = table(&[("x", 100), ("x", 0), ("y", 50)]);

        assert_eq!(forward.score("x"), 100);
        assert_eq!(swapped.score("x"), 100);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn test_table_best_breaks_ties_by_name() {
        let t = table(&[("node-c", 80), ("node-b", 80), ("node-a", 10)]);
        assert_eq!(t.best(), Some(("node-b", 80)));
        assert_eq!(table(&[]).best(), None);
    }
}
