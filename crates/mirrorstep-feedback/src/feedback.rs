//! Corrective feedback generation

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use mirrorstep_core::{JointCategory, MirrorError, MirrorResult, Side, ANGLE_REGISTRY};
use mirrorstep_metrics::{AngleDelta, ComparisonResult, ScoreStatus};

pub const ALL_GOOD_MESSAGE: &str = "Great form! Keep it up!";
pub const POSITION_MESSAGE: &str = "Adjust your body position to match the reference";
pub const NO_POSE_MESSAGE: &str = "No pose detected, step into the frame";
pub const LOW_VISIBILITY_MESSAGE: &str = "Not enough of you is visible, step back so your whole body is in view";

/// Feedback thresholds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Angle differences above this many degrees produce a correction
    pub angle_threshold_deg: f32,
    /// Position similarity below this produces the position message
    pub position_threshold: f32,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        FeedbackConfig {
            angle_threshold_deg: 25.0,
            position_threshold: 0.5,
        }
    }
}

impl FeedbackConfig {
    pub fn validate(&self) -> MirrorResult<()> {
        if !(self.angle_threshold_deg > 0.0 && self.angle_threshold_deg <= 180.0) {
            return Err(MirrorError::InvalidConfig(format!(
                "angle_threshold_deg must be in (0, 180], got {}",
                self.angle_threshold_deg
            )));
        }
        if !(0.0..=1.0).contains(&self.position_threshold) {
            return Err(MirrorError::InvalidConfig(format!(
                "position_threshold must be in [0, 1], got {}",
                self.position_threshold
            )));
        }
        Ok(())
    }
}

/// What a feedback message is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedbackKind {
    /// A joint angle is off; names the registry angle
    Correction {
        angle: &'static str,
        category: JointCategory,
    },
    /// Overall placement is off
    Position,
    /// Nothing to correct
    AllGood,
    /// The live stream has no pose this step
    NoPose,
    /// Too few joints were visible to score this step
    LowVisibility,
}

/// One line of feedback for the performer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackMessage {
    pub kind: FeedbackKind,
    pub text: String,
}

impl FeedbackMessage {
    fn new(kind: FeedbackKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is_correction(&self) -> bool {
        matches!(self.kind, FeedbackKind::Correction { .. })
    }
}

impl fmt::Display for FeedbackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Which way the live angle has to move to match the reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    /// Live angle is smaller than the reference
    Open,
    /// Live angle is larger than the reference
    Close,
}

/// Correction wording, keyed by joint category
fn correction_text(category: JointCategory, side: Side, adjustment: Adjustment) -> String {
    let side = side.label();
    match (category, adjustment) {
        (JointCategory::Elbow, Adjustment::Close) => format!("Bend your {} elbow more", side),
        (JointCategory::Elbow, Adjustment::Open) => format!("Straighten your {} elbow", side),
        (JointCategory::Shoulder, Adjustment::Close) => format!("Lower your {} arm", side),
        (JointCategory::Shoulder, Adjustment::Open) => format!("Raise your {} arm", side),
        (JointCategory::Hip, Adjustment::Close) => format!("Hinge more at your {} hip", side),
        (JointCategory::Hip, Adjustment::Open) => format!("Stand taller through your {} hip", side),
        (JointCategory::Knee, Adjustment::Close) => format!("Bend your {} knee more", side),
        (JointCategory::Knee, Adjustment::Open) => format!("Straighten your {} knee", side),
    }
}

/// Feedback generator
#[derive(Debug, Clone, Default)]
pub struct FeedbackGenerator {
    config: FeedbackConfig,
}

impl FeedbackGenerator {
    pub fn new() -> Self {
        Self::with_config(FeedbackConfig::default())
    }

    pub fn with_config(config: FeedbackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FeedbackConfig {
        &self.config
    }

    /// Feedback for a full comparison result
    ///
    /// A missing live pose gets a single "no pose" message, a missing
    /// reference pose gets nothing. An unscored step makes no corrective
    /// claims, only a neutral visibility message. Scored steps go through
    /// [`FeedbackGenerator::generate`].
    pub fn for_result(&self, result: &ComparisonResult) -> Vec<FeedbackMessage> {
        match result.status {
            ScoreStatus::MissingLive => {
                vec![FeedbackMessage::new(FeedbackKind::NoPose, NO_POSE_MESSAGE)]
            }
            ScoreStatus::MissingReference => Vec::new(),
            ScoreStatus::InsufficientVisibility => vec![FeedbackMessage::new(
                FeedbackKind::LowVisibility,
                LOW_VISIBILITY_MESSAGE,
            )],
            ScoreStatus::Scored => {
                self.generate(&result.angle_deltas, result.position_similarity)
            }
        }
    }

    /// Feedback from an angle-difference map and the position sub-score
    ///
    /// Corrections come out in registry order, followed by the position
    /// message when placement is off. With nothing to correct the list is
    /// exactly one affirmative message.
    pub fn generate(
        &self,
        angle_deltas: &BTreeMap<&'static str, AngleDelta>,
        position_similarity: f32,
    ) -> Vec<FeedbackMessage> {
        let mut messages = Vec::new();

        for def in ANGLE_REGISTRY.iter() {
            let Some(delta) = angle_deltas.get(def.name) else {
                continue;
            };
            if delta.diff <= self.config.angle_threshold_deg {
                continue;
            }
            let adjustment = if delta.live < delta.reference {
                Adjustment::Open
            } else {
                Adjustment::Close
            };
            trace!(angle = def.name, diff = delta.diff, "angle correction");
            let text = format!(
                "{} ({:.0}° off)",
                correction_text(def.category, def.side, adjustment),
                delta.diff
            );
            messages.push(FeedbackMessage::new(
                FeedbackKind::Correction {
                    angle: def.name,
                    category: def.category,
                },
                text,
            ));
        }

        if position_similarity < self.config.position_threshold {
            messages.push(FeedbackMessage::new(FeedbackKind::Position, POSITION_MESSAGE));
        }

        if messages.is_empty() {
            messages.push(FeedbackMessage::new(FeedbackKind::AllGood, ALL_GOOD_MESSAGE));
        }

        messages
    }
}
