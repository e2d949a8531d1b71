//! Criterion identifiers and the fixed-size per-criterion record

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use tracing::warn;

/// The four ranking criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    /// Number of workloads already assigned to the node (load-balancing proxy)
    Pods,
    /// CPU utilization ratio
    Cpu,
    /// Memory utilization ratio
    Memory,
    /// Estimated power draw
    Power,
}

impl Criterion {
    /// All criteria in evaluation order
    pub const ALL: [Criterion; 4] = [
        Criterion::Pods,
        Criterion::Cpu,
        Criterion::Memory,
        Criterion::Power,
    ];
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Criterion::Pods => write!(f, "pods"),
            Criterion::Cpu => write!(f, "cpu"),
            Criterion::Memory => write!(f, "memory"),
            Criterion::Power => write!(f, "power"),
        }
    }
}

/// Whether a criterion is maximized or minimized
///
/// Decoded case-insensitively. Anything other than `benefit` resolves to
/// [`Polarity::Cost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Polarity {
    /// Higher values are preferred
    Benefit,
    /// Lower values are preferred
    #[default]
    Cost,
}

impl Polarity {
    /// Parse a polarity string, falling back to `Cost` for unknown input
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("benefit") {
            Polarity::Benefit
        } else if trimmed.eq_ignore_ascii_case("cost") {
            Polarity::Cost
        } else {
            warn!(value = %s, "Unrecognized criterion type, treating as Cost");
            Polarity::Cost
        }
    }

    /// True if `candidate` is strictly better than `current` under this polarity
    pub fn prefers(self, candidate: f64, current: f64) -> bool {
        match self {
            Polarity::Benefit => candidate > current,
            Polarity::Cost => candidate < current,
        }
    }
}

impl From<String> for Polarity {
    fn from(s: String) -> Self {
        Polarity::parse(&s)
    }
}

impl From<Polarity> for String {
    fn from(p: Polarity) -> Self {
        p.to_string()
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarity::Benefit => write!(f, "Benefit"),
            Polarity::Cost => write!(f, "Cost"),
        }
    }
}

/// One value per criterion, indexable by [`Criterion`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerCriterion<T> {
    pub pods: T,
    pub cpu: T,
    pub memory: T,
    pub power: T,
}

impl<T> PerCriterion<T> {
    pub fn new(pods: T, cpu: T, memory: T, power: T) -> Self {
        Self {
            pods,
            cpu,
            memory,
            power,
        }
    }

    /// Build a record by evaluating `f` for every criterion
    pub fn from_fn(mut f: impl FnMut(Criterion) -> T) -> Self {
        Self {
            pods: f(Criterion::Pods),
            cpu: f(Criterion::Cpu),
            memory: f(Criterion::Memory),
            power: f(Criterion::Power),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Criterion, &T) -> U) -> PerCriterion<U> {
        PerCriterion::from_fn(|c| f(c, &self[c]))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, &T)> {
        Criterion::ALL.into_iter().map(move |c| (c, &self[c]))
    }
}

impl<T> Index<Criterion> for PerCriterion<T> {
    type Output = T;

    fn index(&self, criterion: Criterion) -> &T {
        match criterion {
            Criterion::Pods => &self.pods,
            Criterion::Cpu => &self.cpu,
            Criterion::Memory => &self.memory,
            Criterion::Power => &self.power,
        }
    }
}

impl<T> IndexMut<Criterion> for PerCriterion<T> {
    fn index_mut(&mut self, criterion: Criterion) -> &mut T {
        match criterion {
            Criterion::Pods => &mut self.pods,
            Criterion::Cpu => &mut self.cpu,
            Criterion::Memory => &mut self.memory,
            Criterion::Power => &mut self.power,
        }
    }
}

/// A per-node metric vector `{pods, cpu, mem, power}`
pub type MetricVector = PerCriterion<f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_parse_case_insensitive() {
        assert_eq!(Polarity::parse("Benefit"), Polarity::Benefit);
        assert_eq!(Polarity::parse("BENEFIT"), Polarity::Benefit);
        assert_eq!(Polarity::parse("cost"), Polarity::Cost);
        assert_eq!(Polarity::parse(" Cost "), Polarity::Cost);
    }

    #[test]
    fn test_polarity_unknown_is_cost() {
        assert_eq!(Polarity::parse("maximize"), Polarity::Cost);
        assert_eq!(Polarity::parse(""), Polarity::Cost);
    }

    #[test]
    fn test_polarity_prefers() {
        assert!(Polarity::Benefit.prefers(2.0, 1.0));
        assert!(!Polarity::Benefit.prefers(1.0, 1.0));
        assert!(Polarity::Cost.prefers(1.0, 2.0));
        assert!(!Polarity::Cost.prefers(1.0, 1.0));
    }

    #[test]
    fn test_per_criterion_index() {
        let mut v = MetricVector::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(v[Criterion::Memory], 3.0);

        v[Criterion::Power] = 9.0;
        assert_eq!(v.power, 9.0);

        let order: Vec<Criterion> = v.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Criterion::ALL.to_vec());
    }

    #[test]
    fn test_per_criterion_map() {
        let v = MetricVector::new(1.0, 2.0, 3.0, 4.0);
        let doubled = v.map(|_, x| x * 2.0);
        assert_eq!(doubled, MetricVector::new(2.0, 4.0, 6.0, 8.0));
    }
}
