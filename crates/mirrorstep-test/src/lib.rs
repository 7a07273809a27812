//! MirrorStep Test Harness
//!
//! This crate provides:
//! - Deterministic pose fixtures
//! - A seeded performer simulator (detector jitter, dropouts, occlusion, lag)
//! - Replay runs for end-to-end testing
//! - Criterion benchmarks (see `benches/`)

pub mod fixtures;
pub mod integration;
pub mod simulator;

pub use fixtures::*;
pub use integration::*;
pub use simulator::*;
