//! Vector normalization and weighting of the decision matrix

use powertopsis_core::{Criterion, MetricVector, PerCriterion};
use serde::Serialize;
use tracing::trace;

use crate::criteria::NodeMetrics;

/// Denominators below this are treated as zero
pub const EPSILON: f64 = 1e-9;

/// Normalized and weighted decision matrix for one attempt
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct WeightedMatrix {
    rows: Vec<NodeMetrics>,
}

impl WeightedMatrix {
    pub fn rows(&self) -> &[NodeMetrics] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Applies per-criterion Euclidean normalization followed by weights
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    weights: PerCriterion<f64>,
}

impl Normalizer {
    pub fn new(weights: PerCriterion<f64>) -> Self {
        Self { weights }
    }

    pub fn apply(&self, raw: &[NodeMetrics]) -> WeightedMatrix {
        let rows = normalize_columns(raw)
            .into_iter()
            .map(|row| NodeMetrics {
                values: row.values.map(|c, v| v * self.weights[c]),
                ..row
            })
            .collect();

        WeightedMatrix { rows }
    }
}

/// Euclidean norm of each criterion column
///
/// Values are scaled by the column's largest magnitude before squaring, so
/// large finite columns do not overflow. Squares are summed in ascending
/// order so the result does not depend on the order candidates were
/// supplied in.
pub fn column_norms(raw: &[NodeMetrics]) -> MetricVector {
    MetricVector::from_fn(|criterion| column_norm(raw, criterion))
}

fn column_norm(raw: &[NodeMetrics], criterion: Criterion) -> f64 {
    let scale = raw
        .iter()
        .map(|row| row.values[criterion].abs())
        .fold(0.0, f64::max);
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }

    let mut squares: Vec<f64> = raw
        .iter()
        .map(|row| (row.values[criterion] / scale).powi(2))
        .collect();
    squares.sort_by(f64::total_cmp);
    scale * squares.iter().sum::<f64>().sqrt()
}

/// Divide every value by its column norm, before weighting
pub fn normalize_columns(raw: &[NodeMetrics]) -> Vec<NodeMetrics> {
    let norms = column_norms(raw);
    trace!(?norms, "Column norms");

    raw.iter()
        .map(|row| NodeMetrics {
            node: row.node.clone(),
            values: row.values.map(|c, v| safe_div(*v, norms[c])),
        })
        .collect()
}

/// `numerator / denominator`, or 0 when the denominator is near zero or the
/// quotient is not finite
fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator < EPSILON {
        return 0.0;
    }
    let quotient = numerator / denominator;
    if !quotient.is_finite() {
        return 0.0;
    }
    quotient
}
