//! MirrorStep Runtime - Comparison sessions
//!
//! One session per performer. Each call to [`ComparisonSession::step`] runs
//! the per-frame pipeline:
//! 1. Score the live frame against the reference frame
//! 2. Update the similarity history (or apply the miss policy)
//! 3. Generate feedback messages
//! 4. Color the skeleton
//!
//! The session is single-threaded and synchronous. The driver owns the
//! frame streams; [`ReplayDriver`] is a ready-made driver that loops a
//! recorded reference sequence against a live stream.

pub mod config;
pub mod reference;
pub mod session;
pub mod telemetry;

pub use config::*;
pub use reference::*;
pub use session::*;
pub use telemetry::*;
