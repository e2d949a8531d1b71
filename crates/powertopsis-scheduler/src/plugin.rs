//! The PowerAware score plugin
//!
//! A host scheduler calls [`ScorePlugin::prepare`] once per attempt with the
//! workload and every candidate that survived filtering, then
//! [`ScorePlugin::score`] once per candidate with the table it got back.

use powertopsis_core::{
    Criterion, NodeInfo, Polarity, PowerFormula, ScoringConfig, WorkloadRequest,
};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use crate::criteria::{CriteriaExtractor, NodeMetrics};
use crate::ideal::{IdealSolver, ReferencePoints};
use crate::normalize::{Normalizer, WeightedMatrix};
use crate::power::PowerModel;
use crate::scorer::{score_matrix, NodeScore, ScoreTable, FALLBACK_SCORE};

/// Prepare/query contract offered to a host scheduler
pub trait ScorePlugin: Send + Sync {
    /// Plugin name as registered with the host
    fn name(&self) -> &'static str;

    /// Rank all candidates for one attempt
    ///
    /// Returns `None` when there are no candidates.
    fn prepare(&self, workload: &WorkloadRequest, nodes: &[NodeInfo]) -> Option<ScoreTable>;

    /// Read one node's score from the table produced by `prepare`
    fn score(&self, table: Option<&ScoreTable>, node_name: &str) -> i64 {
        table.map_or(FALLBACK_SCORE, |t| t.score(node_name))
    }
}

/// Every intermediate of one ranking pass
#[derive(Debug, Clone, Serialize)]
pub struct Ranking {
    /// Raw decision matrix
    pub raw: Vec<NodeMetrics>,
    /// Normalized and weighted matrix
    pub weighted: WeightedMatrix,
    /// Ideal and anti-ideal points
    pub reference: ReferencePoints,
    /// Closeness and score per node, in candidate order
    pub scores: Vec<NodeScore>,
    /// Table handed back to the host
    pub table: ScoreTable,
}

/// TOPSIS ranking over pod count, CPU, memory and estimated power
#[derive(Debug, Clone)]
pub struct PowerAware {
    config: ScoringConfig,
    extractor: CriteriaExtractor,
    normalizer: Normalizer,
    solver: IdealSolver,
}

impl PowerAware {
    pub const NAME: &'static str = "PowerAware";

    /// Create a plugin from an already resolved configuration
    pub fn new(config: ScoringConfig) -> Self {
        let config = config.sanitized();
        let power = PowerModel::new(config.power_model);

        info!(
            pods = ?config.pod_load_balancing,
            cpu = ?config.cpu,
            memory = ?config.memory,
            power = ?config.power,
            k0 = config.power_model.k0,
            k1 = config.power_model.k1,
            k2 = config.power_model.k2,
            formula = %config.power_model.formula,
            mode = %config.placement.mode,
            "PowerAware plugin initialized"
        );

        if config.power_model.formula == PowerFormula::Decaying
            && config.power.polarity == Polarity::Cost
            && config.power.weight > 0.0
        {
            warn!(
                "Decaying power model with a Cost power criterion favours busier nodes as lower power"
            );
        }

        Self {
            config,
            extractor: CriteriaExtractor::new(config.placement.mode, power),
            normalizer: Normalizer::new(config.weights()),
            solver: IdealSolver::new(config.polarities()),
        }
    }

    /// Create a plugin from an optional configuration file, falling back to
    /// built-in defaults when it is absent or unreadable
    pub fn from_config_path(path: Option<&Path>) -> Self {
        Self::new(ScoringConfig::resolve(path))
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Run the full pipeline and keep every intermediate
    pub fn rank(&self, workload: &WorkloadRequest, nodes: &[NodeInfo]) -> Option<Ranking> {
        let attempt_id = Uuid::new_v4();
        let span = info_span!(
            "prepare",
            attempt_id = %attempt_id,
            workload = %workload.name,
            candidates = nodes.len()
        );
        let _enter = span.enter();

        if nodes.is_empty() {
            debug!("No candidate nodes, skipping ranking");
            return None;
        }

        let raw = self.extractor.extract(workload.aggregate(), nodes);
        let weighted = self.normalizer.apply(&raw);
        let reference = self.solver.solve(&weighted)?;
        debug!(
            ideal = ?reference.ideal,
            anti_ideal = ?reference.anti_ideal,
            "Reference points"
        );

        let scores = score_matrix(&weighted, &reference);
        for s in &scores {
            debug!(node = %s.node, closeness = s.closeness, score = s.score, "Node scored");
        }

        let table = ScoreTable::new(attempt_id, scores.iter().cloned());
        if table.len() < scores.len() {
            warn!(
                candidates = scores.len(),
                distinct = table.len(),
                "Duplicate node names, keeping the highest score per name"
            );
        }

        Some(Ranking {
            raw,
            weighted,
            reference,
            scores,
            table,
        })
    }

    /// Weight of one criterion, after sanitizing
    pub fn weight(&self, criterion: Criterion) -> f64 {
        self.config.criterion(criterion).weight
    }
}

impl Default for PowerAware {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl ScorePlugin for PowerAware {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&self, workload: &WorkloadRequest, nodes: &[NodeInfo]) -> Option<ScoreTable> {
        self.rank(workload, nodes).map(|ranking| ranking.table)
    }
}
