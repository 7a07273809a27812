//! Session configuration

use serde::{Deserialize, Serialize};

use mirrorstep_core::{MirrorError, MirrorResult};
use mirrorstep_feedback::{ColorThresholds, FeedbackConfig};
use mirrorstep_metrics::{ScoringConfig, SmoothingConfig};

/// Comparison session configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Scoring weights and visibility threshold
    pub scoring: ScoringConfig,
    /// Smoothing window and miss policy
    pub smoothing: SmoothingConfig,
    /// Feedback thresholds
    pub feedback: FeedbackConfig,
    /// Skeleton color bands
    pub colors: ColorThresholds,
}

impl SessionConfig {
    /// Preset for reference videos recorded from a different camera angle
    pub fn lenient() -> Self {
        SessionConfig {
            scoring: ScoringConfig::lenient(),
            ..Self::default()
        }
    }

    /// Parse from JSON; missing sections take their defaults
    pub fn from_json_str(json: &str) -> MirrorResult<Self> {
        let config: SessionConfig =
            serde_json::from_str(json).map_err(|e| MirrorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> MirrorResult<()> {
        self.scoring.validate()?;
        self.smoothing.validate()?;
        self.feedback.validate()?;
        self.colors.validate()
    }
}
