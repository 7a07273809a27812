//! MirrorStep Metrics
//!
//! Turns a matched pair of landmark frames (reference, live) into a
//! similarity score.
//!
//! # Pipeline
//!
//! 1. Body scale: shoulder width per frame, averaged across the pair
//! 2. Position: scale-normalized 3D distance over mutually visible joints
//! 3. Angles: per-definition angle difference over the registry
//! 4. Combine: `position_weight * exp(-decay * d²) + angle_weight * mean(1 - Δ/180)`
//! 5. Smooth: running mean over a short window of raw scores

pub mod angle;
pub mod config;
pub mod normalize;
pub mod scorer;
pub mod smoother;

pub use angle::*;
pub use config::*;
pub use normalize::*;
pub use scorer::*;
pub use smoother::*;
