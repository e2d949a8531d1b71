//! Utilization-to-power estimation

use powertopsis_core::{PowerFormula, PowerModelConfig};

/// Estimates power draw from a utilization fraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerModel {
    k0: f64,
    k1: f64,
    k2: f64,
    formula: PowerFormula,
}

impl PowerModel {
    pub fn new(config: PowerModelConfig) -> Self {
        Self {
            k0: config.k0,
            k1: config.k1,
            k2: config.k2,
            formula: config.formula,
        }
    }

    pub fn formula(&self) -> PowerFormula {
        self.formula
    }

    /// Estimated draw at `utilization`
    pub fn estimate(&self, utilization: f64) -> f64 {
        let decay = (-self.k2 * utilization).exp();
        match self.formula {
            PowerFormula::Saturating => self.k0 + self.k1 * (1.0 - decay),
            PowerFormula::Decaying => self.k0 + self.k1 * decay,
        }
    }
}

impl Default for PowerModel {
    fn default() -> Self {
        Self::new(PowerModelConfig::default())
    }
}
