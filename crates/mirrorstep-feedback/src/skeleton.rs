//! Skeleton color classification
//!
//! Each bone is colored by how far its tracked joint angle is from the
//! reference. Shoulders get a wider band than elbows because shoulder
//! rotation varies more for the same perceived correctness.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mirrorstep_core::{
    angle_for_bone, Connection, JointCategory, MirrorError, MirrorResult, POSE_CONNECTIONS,
};
use mirrorstep_metrics::{AngleDelta, ComparisonResult};

/// Display colors for renderers (RGBA, 0-1)
mod colors {
    pub const GREEN: [f32; 4] = [0.2, 0.85, 0.3, 1.0];
    pub const AMBER: [f32; 4] = [1.0, 0.75, 0.1, 1.0];
    pub const RED: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
    pub const GREY: [f32; 4] = [0.7, 0.7, 0.7, 0.6];
}

/// Color category of a bone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkeletonColor {
    TrackedGood,
    TrackedWarn,
    TrackedBad,
    Untracked,
}

impl SkeletonColor {
    pub fn rgba(self) -> [f32; 4] {
        match self {
            SkeletonColor::TrackedGood => colors::GREEN,
            SkeletonColor::TrackedWarn => colors::AMBER,
            SkeletonColor::TrackedBad => colors::RED,
            SkeletonColor::Untracked => colors::GREY,
        }
    }

    pub fn is_tracked(self) -> bool {
        self != SkeletonColor::Untracked
    }
}

/// Difference band for one joint category, in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorBand {
    /// Differences at or above this are a warning
    pub warn_at: f32,
    /// Differences at or above this are bad
    pub bad_at: f32,
}

impl ColorBand {
    pub const fn new(warn_at: f32, bad_at: f32) -> Self {
        Self { warn_at, bad_at }
    }

    pub fn classify(&self, diff: f32) -> SkeletonColor {
        if diff < self.warn_at {
            SkeletonColor::TrackedGood
        } else if diff < self.bad_at {
            SkeletonColor::TrackedWarn
        } else {
            SkeletonColor::TrackedBad
        }
    }
}

/// Per-category color bands
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorThresholds {
    pub shoulder: ColorBand,
    pub elbow: ColorBand,
    pub hip: ColorBand,
    pub knee: ColorBand,
}

impl Default for ColorThresholds {
    fn default() -> Self {
        ColorThresholds {
            shoulder: ColorBand::new(50.0, 80.0),
            elbow: ColorBand::new(35.0, 45.0),
            hip: ColorBand::new(50.0, 80.0),
            knee: ColorBand::new(35.0, 45.0),
        }
    }
}

impl ColorThresholds {
    pub fn for_category(&self, category: JointCategory) -> &ColorBand {
        match category {
            JointCategory::Shoulder => &self.shoulder,
            JointCategory::Elbow => &self.elbow,
            JointCategory::Hip => &self.hip,
            JointCategory::Knee => &self.knee,
        }
    }

    pub fn validate(&self) -> MirrorResult<()> {
        for &category in JointCategory::all() {
            let band = self.for_category(category);
            if !(band.warn_at > 0.0 && band.warn_at <= band.bad_at && band.bad_at <= 180.0) {
                return Err(MirrorError::InvalidConfig(format!(
                    "{:?} color band must satisfy 0 < warn_at <= bad_at <= 180, got {}/{}",
                    category, band.warn_at, band.bad_at
                )));
            }
        }
        Ok(())
    }
}

/// Color of one skeleton connection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoneColor {
    pub connection: Connection,
    pub color: SkeletonColor,
}

/// Skeleton color classifier
#[derive(Debug, Clone, Default)]
pub struct SkeletonClassifier {
    thresholds: ColorThresholds,
}

impl SkeletonClassifier {
    pub fn new() -> Self {
        Self::with_thresholds(ColorThresholds::default())
    }

    pub fn with_thresholds(thresholds: ColorThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ColorThresholds {
        &self.thresholds
    }

    /// Color of a single bone
    ///
    /// Untracked when the bone maps to no angle, or when that angle was
    /// not scored this step.
    pub fn classify(
        &self,
        connection: Connection,
        angle_deltas: &BTreeMap<&'static str, AngleDelta>,
    ) -> SkeletonColor {
        let Some(def) = angle_for_bone(connection) else {
            return SkeletonColor::Untracked;
        };
        let Some(delta) = angle_deltas.get(def.name) else {
            return SkeletonColor::Untracked;
        };
        self.thresholds.for_category(def.category).classify(delta.diff)
    }

    /// Colors for every bone of the standard skeleton
    pub fn classify_skeleton(&self, result: &ComparisonResult) -> Vec<BoneColor> {
        POSE_CONNECTIONS
            .iter()
            .map(|&connection| BoneColor {
                connection,
                color: self.classify(connection, &result.angle_deltas),
            })
            .collect()
    }
}
