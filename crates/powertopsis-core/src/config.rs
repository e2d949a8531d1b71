//! Scoring configuration for powertopsis

use crate::criterion::{Criterion, PerCriterion, Polarity};
use crate::{TopsisError, TopsisResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Weight and polarity of one criterion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionConfig {
    /// Non-negative weight applied after normalization
    pub weight: f64,
    /// `Benefit` or `Cost`
    #[serde(rename = "type")]
    pub polarity: Polarity,
}

impl CriterionConfig {
    pub const fn new(weight: f64, polarity: Polarity) -> Self {
        Self { weight, polarity }
    }
}

/// Shape of the utilization-to-power curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerFormula {
    /// `k0 + k1 * (1 - e^(-k2 * u))`, rising with utilization
    #[default]
    Saturating,
    /// `k0 + k1 * e^(-k2 * u)`, falling with utilization
    Decaying,
}

impl std::fmt::Display for PowerFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PowerFormula::Saturating => write!(f, "saturating"),
            PowerFormula::Decaying => write!(f, "decaying"),
        }
    }
}

/// Power model constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerModelConfig {
    /// Baseline draw
    pub k0: f64,
    /// Scale
    pub k1: f64,
    /// Growth or decay rate
    pub k2: f64,
    /// Curve shape
    pub formula: PowerFormula,
}

impl PowerModelConfig {
    /// Whether the constants describe a finite, non-negative power curve
    pub fn is_valid(&self) -> bool {
        [self.k0, self.k1, self.k2]
            .iter()
            .all(|k| k.is_finite() && *k >= 0.0)
            && (self.k0 + self.k1).is_finite()
    }
}

impl Default for PowerModelConfig {
    fn default() -> Self {
        Self {
            k0: 150.0,
            k1: 100.0,
            k2: 3.0,
            formula: PowerFormula::Saturating,
        }
    }
}

/// Which node state the criteria are computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Score the node exactly as it is now
    #[default]
    Current,
    /// Score the node as it would be after binding the workload
    Projected,
}

impl std::fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementMode::Current => write!(f, "current"),
            PlacementMode::Projected => write!(f, "projected"),
        }
    }
}

/// Placement simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlacementConfig {
    #[serde(default)]
    pub mode: PlacementMode,
}

/// Complete scoring configuration
///
/// Decoding is lenient per field: anything omitted keeps its built-in
/// default, and out-of-range values are replaced by [`ScoringConfig::sanitized`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawScoringConfig")]
pub struct ScoringConfig {
    /// Pod-count load balancing criterion
    pub pod_load_balancing: CriterionConfig,
    /// CPU utilization criterion
    pub cpu: CriterionConfig,
    /// Memory utilization criterion
    pub memory: CriterionConfig,
    /// Estimated power criterion
    pub power: CriterionConfig,
    /// Power model
    pub power_model: PowerModelConfig,
    /// Placement simulation
    pub placement: PlacementConfig,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pod_load_balancing: CriterionConfig::new(0.2, Polarity::Cost),
            cpu: CriterionConfig::new(0.2, Polarity::Cost),
            memory: CriterionConfig::new(0.2, Polarity::Cost),
            power: CriterionConfig::new(0.4, Polarity::Cost),
            power_model: PowerModelConfig::default(),
            placement: PlacementConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> TopsisResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TopsisError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> TopsisResult<Self> {
        toml::from_str(content)
            .map_err(|e| TopsisError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Resolve the effective configuration, never failing
    ///
    /// A missing path or any read/decode error yields the built-in defaults.
    pub fn resolve(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No scoring configuration supplied, using built-in defaults");
            return Self::default();
        };

        match Self::from_file(path) {
            Ok(config) => {
                info!(path = %path.display(), "Loaded scoring configuration");
                config
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Falling back to built-in scoring defaults"
                );
                Self::default()
            }
        }
    }

    /// Settings for one criterion
    pub fn criterion(&self, criterion: Criterion) -> CriterionConfig {
        match criterion {
            Criterion::Pods => self.pod_load_balancing,
            Criterion::Cpu => self.cpu,
            Criterion::Memory => self.memory,
            Criterion::Power => self.power,
        }
    }

    fn criterion_mut(&mut self, criterion: Criterion) -> &mut CriterionConfig {
        match criterion {
            Criterion::Pods => &mut self.pod_load_balancing,
            Criterion::Cpu => &mut self.cpu,
            Criterion::Memory => &mut self.memory,
            Criterion::Power => &mut self.power,
        }
    }

    pub fn weights(&self) -> PerCriterion<f64> {
        PerCriterion::from_fn(|c| self.criterion(c).weight)
    }

    pub fn polarities(&self) -> PerCriterion<Polarity> {
        PerCriterion::from_fn(|c| self.criterion(c).polarity)
    }

    /// Replace negative or non-finite weights and unusable power constants
    /// with their defaults
    ///
    /// Power constants must be finite and non-negative, and the peak draw
    /// `k0 + k1` must itself be finite.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        for criterion in Criterion::ALL {
            let weight = self.criterion(criterion).weight;
            if !weight.is_finite() || weight < 0.0 {
                let fallback = defaults.criterion(criterion).weight;
                warn!(
                    criterion = %criterion,
                    weight = weight,
                    fallback = fallback,
                    "Invalid criterion weight, using default"
                );
                self.criterion_mut(criterion).weight = fallback;
            }
        }

        let pm = self.power_model;
        if !pm.is_valid() {
            warn!(
                k0 = pm.k0,
                k1 = pm.k1,
                k2 = pm.k2,
                "Invalid power model constants, using defaults"
            );
            self.power_model = PowerModelConfig {
                formula: pm.formula,
                ..defaults.power_model
            };
        }

        self
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> TopsisResult<String> {
        toml::to_string_pretty(self).map_err(|e| TopsisError::Serialization(e.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCriterion {
    weight: Option<f64>,
    #[serde(rename = "type")]
    polarity: Option<Polarity>,
}

impl RawCriterion {
    fn merge(self, default: CriterionConfig) -> CriterionConfig {
        CriterionConfig {
            weight: self.weight.unwrap_or(default.weight),
            polarity: self.polarity.unwrap_or(default.polarity),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPowerModel {
    k0: Option<f64>,
    k1: Option<f64>,
    k2: Option<f64>,
    formula: Option<PowerFormula>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawScoringConfig {
    #[serde(alias = "podLoadBalancingCriteria", alias = "pods")]
    pod_load_balancing: RawCriterion,
    #[serde(alias = "cpuCriteria")]
    cpu: RawCriterion,
    #[serde(alias = "memCriteria", alias = "mem")]
    memory: RawCriterion,
    #[serde(alias = "powerCriteria")]
    power: RawCriterion,
    #[serde(alias = "powerModel")]
    power_model: RawPowerModel,
    placement: PlacementConfig,
}

impl From<RawScoringConfig> for ScoringConfig {
    fn from(raw: RawScoringConfig) -> Self {
        let defaults = ScoringConfig::default();
        let pm = defaults.power_model;

        ScoringConfig {
            pod_load_balancing: raw.pod_load_balancing.merge(defaults.pod_load_balancing),
            cpu: raw.cpu.merge(defaults.cpu),
            memory: raw.memory.merge(defaults.memory),
            power: raw.power.merge(defaults.power),
            power_model: PowerModelConfig {
                k0: raw.power_model.k0.unwrap_or(pm.k0),
                k1: raw.power_model.k1.unwrap_or(pm.k1),
                k2: raw.power_model.k2.unwrap_or(pm.k2),
                formula: raw.power_model.formula.unwrap_or(pm.formula),
            },
            placement: raw.placement,
        }
        .sanitized()
    }
}
