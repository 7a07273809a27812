//! Error types for MirrorStep
//!
//! Only boundary and setup operations are fallible. Per-frame scoring
//! degrades to zero results instead of returning errors.

use thiserror::Error;

/// Core MirrorStep errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MirrorError {
    // Frame construction errors
    #[error("Invalid landmark count: expected {expected}, got {actual}")]
    InvalidLandmarkCount { expected: usize, actual: usize },

    #[error("Invalid flat landmark buffer: expected {expected} values, got {actual}")]
    InvalidFlatLength { expected: usize, actual: usize },

    #[error("Non-finite value in landmark {joint}")]
    NonFiniteLandmark { joint: usize },

    // Session setup errors
    #[error("Reference frame {frame} has {actual} joints, expected {expected}")]
    JointCountMismatch {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Non-finite value in reference frame {frame}, landmark {joint}")]
    NonFiniteReferenceLandmark { frame: usize, joint: usize },

    #[error("Reference sequence is empty")]
    EmptyReferenceSequence,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Ambient
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type for MirrorStep operations
pub type MirrorResult<T> = Result<T, MirrorError>;
