//! powertopsis-scheduler: power-aware TOPSIS node ranking
//!
//! This crate turns a workload and its candidate nodes into per-node scores:
//! - Criteria extraction (pod count, CPU, memory, estimated power)
//! - Euclidean normalization and weighting
//! - Ideal / anti-ideal reference points
//! - Closeness scoring into an attempt-scoped score table
//! - Sequential placement driven by any score plugin

pub mod criteria;
pub mod ideal;
pub mod normalize;
pub mod placement;
pub mod plugin;
pub mod power;
pub mod scorer;

pub use criteria::{CriteriaExtractor, NodeMetrics};
pub use ideal::{IdealSolver, ReferencePoints};
pub use normalize::{Normalizer, WeightedMatrix};
pub use placement::{place_all, PlacementDecision};
pub use plugin::{PowerAware, Ranking, ScorePlugin};
pub use power::PowerModel;
pub use scorer::{NodeScore, ScoreTable, FALLBACK_SCORE, MAX_NODE_SCORE};
