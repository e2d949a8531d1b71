//! powertopsis-core: Core types for the powertopsis scoring engine
//!
//! This crate provides the fundamental types shared by the engine and the CLI:
//! - Criterion identifiers and fixed-size per-criterion records
//! - Node, workload and cluster snapshot descriptors
//! - Kubernetes-style resource quantities
//! - Scoring configuration and its fallback resolver
//! - Error handling

pub mod config;
pub mod criterion;
pub mod error;
pub mod model;
pub mod quantity;

pub use config::*;
pub use criterion::*;
pub use error::*;
pub use model::*;
pub use quantity::{parse_cpu_millis, parse_memory_bytes};
