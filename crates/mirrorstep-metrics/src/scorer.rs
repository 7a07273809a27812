//! Similarity scorer - compares a live pose against a reference pose
//!
//! Angles carry most of the weight because they are scale and
//! translation invariant by construction. Raw positions are not, so they
//! are normalized by body scale first and only contribute a minority share.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use mirrorstep_core::{LandmarkFrame, ANGLE_REGISTRY, POSE_LANDMARK_COUNT};

use crate::{definition_angle, pair_scale, ScoringConfig};

/// Reference and live angle for one registry definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AngleDelta {
    /// Angle in the reference pose, degrees
    pub reference: f32,
    /// Angle in the live pose, degrees
    pub live: f32,
    /// Absolute difference, degrees
    pub diff: f32,
}

impl AngleDelta {
    pub fn new(reference: f32, live: f32) -> Self {
        Self {
            reference,
            live,
            diff: (reference - live).abs(),
        }
    }

    /// Similarity of the two angles, 1 when equal, 0 when opposite
    #[inline]
    pub fn similarity(&self) -> f32 {
        1.0 - self.diff / 180.0
    }
}

/// Why a comparison produced the score it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreStatus {
    /// Both poses had enough visible joints
    Scored,
    /// The reference frame had no pose
    MissingReference,
    /// The live frame had no pose
    MissingLive,
    /// Both poses present, but too few joints visible in both
    InsufficientVisibility,
}

/// Outcome of comparing one reference frame with one live frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Final similarity, 0-1
    pub similarity: f32,
    /// Position sub-score, 0-1
    pub position_similarity: f32,
    /// Mean angle sub-score, 0-1
    pub angle_similarity: f32,
    /// Per-definition angles, keyed by registry name
    pub angle_deltas: BTreeMap<&'static str, AngleDelta>,
    pub status: ScoreStatus,
}

impl ComparisonResult {
    /// Zero score with no angle data
    pub fn zero(status: ScoreStatus) -> Self {
        Self {
            similarity: 0.0,
            position_similarity: 0.0,
            angle_similarity: 0.0,
            angle_deltas: BTreeMap::new(),
            status,
        }
    }

    #[inline]
    pub fn is_scored(&self) -> bool {
        self.status == ScoreStatus::Scored
    }

    /// Either side reported no detection
    #[inline]
    pub fn is_missing_pose(&self) -> bool {
        matches!(
            self.status,
            ScoreStatus::MissingReference | ScoreStatus::MissingLive
        )
    }

    pub fn angle_delta(&self, name: &str) -> Option<&AngleDelta> {
        self.angle_deltas.get(name)
    }
}

/// Pose similarity scorer
///
/// Holds configuration only; comparing the same two frames twice always
/// yields the same result.
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    config: ScoringConfig,
}

impl SimilarityScorer {
    /// Create a scorer with the default weights and thresholds
    pub fn new() -> Self {
        Self::with_config(ScoringConfig::default())
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Compare a live frame against a reference frame
    pub fn compare(&self, reference: &LandmarkFrame, live: &LandmarkFrame) -> ComparisonResult {
        let (ref_joints, live_joints) = match (reference.landmarks(), live.landmarks()) {
            (None, _) => return ComparisonResult::zero(ScoreStatus::MissingReference),
            (_, None) => return ComparisonResult::zero(ScoreStatus::MissingLive),
            (Some(r), Some(l)) => (r, l),
        };
        let threshold = self.config.visibility_threshold;
        let scale = pair_scale(reference, live, threshold);

        // Stage 1: scale-normalized distances over mutually visible joints
        let distances: Vec<f32> = (0..POSE_LANDMARK_COUNT)
            .filter(|&i| ref_joints[i].is_visible(threshold) && live_joints[i].is_visible(threshold))
            .map(|i| ref_joints[i].distance(&live_joints[i]) / scale)
            .collect();

        // Stage 2: angles where the whole triplet is visible in both poses
        let mut angle_deltas = BTreeMap::new();
        for def in ANGLE_REGISTRY.iter() {
            let visible = def.joints().iter().all(|&j| {
                ref_joints[j].is_visible(threshold) && live_joints[j].is_visible(threshold)
            });
            if !visible {
                continue;
            }
            let delta = AngleDelta::new(
                definition_angle(ref_joints, def),
                definition_angle(live_joints, def),
            );
            angle_deltas.insert(def.name, delta);
        }

        if distances.is_empty() || angle_deltas.is_empty() {
            trace!(
                visible_joints = distances.len(),
                scored_angles = angle_deltas.len(),
                "not enough visible joints to score"
            );
            return ComparisonResult::zero(ScoreStatus::InsufficientVisibility);
        }

        // Stage 3: nonlinear position similarity
        let avg_position_diff = distances.iter().sum::<f32>() / distances.len() as f32;
        let position_similarity =
            (-self.config.position_decay * avg_position_diff * avg_position_diff).exp();

        // Stage 4: mean angle similarity
        let angle_similarity = angle_deltas.values().map(AngleDelta::similarity).sum::<f32>()
            / angle_deltas.len() as f32;

        // Stage 5: weighted combination
        let similarity = unit_score(
            self.config.position_weight * position_similarity
                + self.config.angle_weight * angle_similarity,
        );

        ComparisonResult {
            similarity,
            position_similarity,
            angle_similarity,
            angle_deltas,
            status: ScoreStatus::Scored,
        }
    }
}

/// Clamp to [0, 1]; non-finite values score zero
pub fn unit_score(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
