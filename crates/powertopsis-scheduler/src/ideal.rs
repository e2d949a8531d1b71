//! Ideal and anti-ideal reference points

use powertopsis_core::{Criterion, MetricVector, PerCriterion, Polarity};
use serde::Serialize;

use crate::normalize::WeightedMatrix;

/// Best and worst weighted values observed across the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferencePoints {
    /// Best value per criterion
    pub ideal: MetricVector,
    /// Worst value per criterion
    pub anti_ideal: MetricVector,
}

/// Folds a weighted matrix into its reference points
#[derive(Debug, Clone, Copy)]
pub struct IdealSolver {
    polarities: PerCriterion<Polarity>,
}

impl IdealSolver {
    pub fn new(polarities: PerCriterion<Polarity>) -> Self {
        Self { polarities }
    }

    /// Returns `None` for an empty matrix
    ///
    /// Extremes only move on strict improvement, so ties keep the value
    /// already held.
    pub fn solve(&self, matrix: &WeightedMatrix) -> Option<ReferencePoints> {
        let (first, rest) = matrix.rows().split_first()?;

        let mut points = ReferencePoints {
            ideal: first.values,
            anti_ideal: first.values,
        };

        for row in rest {
            for criterion in Criterion::ALL {
                let polarity = self.polarities[criterion];
                let value = row.values[criterion];

                if polarity.prefers(value, points.ideal[criterion]) {
                    points.ideal[criterion] = value;
                }
                if polarity.prefers(points.anti_ideal[criterion], value) {
                    points.anti_ideal[criterion] = value;
                }
            }
        }

        Some(points)
    }
}
