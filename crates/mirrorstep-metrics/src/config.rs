//! Scoring and smoothing configuration

use serde::{Deserialize, Serialize};

use mirrorstep_core::{MirrorError, MirrorResult};

/// Smallest smoothing window accepted by validation
pub const MIN_SMOOTHING_CAPACITY: usize = 3;
/// Largest smoothing window accepted by validation
pub const MAX_SMOOTHING_CAPACITY: usize = 5;

/// Similarity scorer configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Joints at or below this confidence are excluded from metrics
    pub visibility_threshold: f32,
    /// Weight of the position sub-score in the final score
    pub position_weight: f32,
    /// Weight of the angle sub-score in the final score
    pub angle_weight: f32,
    /// Decay rate `k` in `exp(-k * d²)` for normalized position distance
    pub position_decay: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            visibility_threshold: 0.5,
            position_weight: 0.2,
            angle_weight: 0.8,
            position_decay: 5.0,
        }
    }
}

impl ScoringConfig {
    /// Gentler position falloff, for reference videos shot from a
    /// different camera placement than the live feed
    pub fn lenient() -> Self {
        ScoringConfig {
            position_decay: 3.0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> MirrorResult<()> {
        if !(0.0..1.0).contains(&self.visibility_threshold) {
            return Err(MirrorError::InvalidConfig(format!(
                "visibility_threshold must be in [0, 1), got {}",
                self.visibility_threshold
            )));
        }
        if self.position_weight < 0.0 || self.angle_weight < 0.0 {
            return Err(MirrorError::InvalidConfig(
                "score weights must be non-negative".to_string(),
            ));
        }
        if (self.position_weight + self.angle_weight - 1.0).abs() > 1e-3 {
            return Err(MirrorError::InvalidConfig(format!(
                "score weights must sum to 1, got {}",
                self.position_weight + self.angle_weight
            )));
        }
        if !(self.position_decay > 0.0 && self.position_decay.is_finite()) {
            return Err(MirrorError::InvalidConfig(format!(
                "position_decay must be positive, got {}",
                self.position_decay
            )));
        }
        Ok(())
    }
}

/// What the smoother does on a step with no comparable pose
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissPolicy {
    /// Leave the history untouched; the average reflects observed steps only
    #[default]
    Skip,
    /// Clear the history; smoothing restarts from the next observed step
    Reset,
}

/// Temporal smoother configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Number of raw scores averaged
    pub capacity: usize,
    /// Behavior on a missed detection
    pub miss_policy: MissPolicy,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingConfig {
            capacity: 3,
            miss_policy: MissPolicy::Skip,
        }
    }
}

impl SmoothingConfig {
    pub fn validate(&self) -> MirrorResult<()> {
        if !(MIN_SMOOTHING_CAPACITY..=MAX_SMOOTHING_CAPACITY).contains(&self.capacity) {
            return Err(MirrorError::InvalidConfig(format!(
                "smoothing capacity must be in {}..={}, got {}",
                MIN_SMOOTHING_CAPACITY, MAX_SMOOTHING_CAPACITY, self.capacity
            )));
        }
        Ok(())
    }
}
