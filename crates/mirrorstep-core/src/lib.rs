//! MirrorStep Core - Fundamental types for pose comparison
//!
//! This crate defines the types shared by every stage of the engine:
//! - Landmarks and landmark frames (33-point pose topology)
//! - Joint indices and skeletal connections
//! - The angle definition registry and the bone → angle lookup
//! - Error types

pub mod error;
pub mod landmark;
pub mod registry;
pub mod topology;

pub use error::*;
pub use landmark::*;
pub use registry::*;
pub use topology::*;
