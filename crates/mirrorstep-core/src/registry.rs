//! Angle definition registry
//!
//! A fixed set of named joint triplets used for scoring, feedback and
//! skeleton coloring. Every stage reads the same static registry, so the
//! angles a score is built from are exactly the angles feedback talks about.

use serde::{Deserialize, Serialize};

use crate::topology::*;

/// Anatomical category of a scored joint
///
/// Feedback wording and color thresholds are keyed by category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JointCategory {
    /// Upper arm relative to torso (elbow, shoulder, hip)
    Shoulder,
    /// Arm flexion (shoulder, elbow, wrist)
    Elbow,
    /// Torso relative to thigh (shoulder, hip, knee)
    Hip,
    /// Leg flexion (hip, knee, ankle)
    Knee,
}

impl JointCategory {
    pub fn all() -> &'static [JointCategory] {
        &[
            JointCategory::Shoulder,
            JointCategory::Elbow,
            JointCategory::Hip,
            JointCategory::Knee,
        ]
    }
}

/// Body side of a scored joint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Lowercase label for messages
    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// A named joint triplet; the angle is measured at `vertex`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AngleDefinition {
    pub name: &'static str,
    pub a: usize,
    pub vertex: usize,
    pub c: usize,
    pub category: JointCategory,
    pub side: Side,
}

impl AngleDefinition {
    /// The three landmark indices in `(a, vertex, c)` order
    #[inline]
    pub fn joints(&self) -> [usize; 3] {
        [self.a, self.vertex, self.c]
    }
}

pub const LEFT_ELBOW_ANGLE: &str = "Left Elbow";
pub const RIGHT_ELBOW_ANGLE: &str = "Right Elbow";
pub const LEFT_SHOULDER_ANGLE: &str = "Left Shoulder";
pub const RIGHT_SHOULDER_ANGLE: &str = "Right Shoulder";
pub const LEFT_HIP_ANGLE: &str = "Left Hip";
pub const RIGHT_HIP_ANGLE: &str = "Right Hip";
pub const LEFT_KNEE_ANGLE: &str = "Left Knee";
pub const RIGHT_KNEE_ANGLE: &str = "Right Knee";

/// All scored angles, in feedback order
pub const ANGLE_REGISTRY: [AngleDefinition; 8] = [
    AngleDefinition {
        name: LEFT_ELBOW_ANGLE,
        a: LEFT_SHOULDER,
        vertex: LEFT_ELBOW,
        c: LEFT_WRIST,
        category: JointCategory::Elbow,
        side: Side::Left,
    },
    AngleDefinition {
        name: RIGHT_ELBOW_ANGLE,
        a: RIGHT_SHOULDER,
        vertex: RIGHT_ELBOW,
        c: RIGHT_WRIST,
        category: JointCategory::Elbow,
        side: Side::Right,
    },
    AngleDefinition {
        name: LEFT_SHOULDER_ANGLE,
        a: LEFT_ELBOW,
        vertex: LEFT_SHOULDER,
        c: LEFT_HIP,
        category: JointCategory::Shoulder,
        side: Side::Left,
    },
    AngleDefinition {
        name: RIGHT_SHOULDER_ANGLE,
        a: RIGHT_ELBOW,
        vertex: RIGHT_SHOULDER,
        c: RIGHT_HIP,
        category: JointCategory::Shoulder,
        side: Side::Right,
    },
    AngleDefinition {
        name: LEFT_HIP_ANGLE,
        a: LEFT_SHOULDER,
        vertex: LEFT_HIP,
        c: LEFT_KNEE,
        category: JointCategory::Hip,
        side: Side::Left,
    },
    AngleDefinition {
        name: RIGHT_HIP_ANGLE,
        a: RIGHT_SHOULDER,
        vertex: RIGHT_HIP,
        c: RIGHT_KNEE,
        category: JointCategory::Hip,
        side: Side::Right,
    },
    AngleDefinition {
        name: LEFT_KNEE_ANGLE,
        a: LEFT_HIP,
        vertex: LEFT_KNEE,
        c: LEFT_ANKLE,
        category: JointCategory::Knee,
        side: Side::Left,
    },
    AngleDefinition {
        name: RIGHT_KNEE_ANGLE,
        a: RIGHT_HIP,
        vertex: RIGHT_KNEE,
        c: RIGHT_ANKLE,
        category: JointCategory::Knee,
        side: Side::Right,
    },
];

/// Bones whose color follows a scored angle
///
/// The forearm reports the elbow, the upper arm the shoulder, the thigh
/// the hip and the shin the knee.
pub const TRACKED_BONES: [(Connection, &str); 8] = [
    ((LEFT_ELBOW, LEFT_WRIST), LEFT_ELBOW_ANGLE),
    ((RIGHT_ELBOW, RIGHT_WRIST), RIGHT_ELBOW_ANGLE),
    ((LEFT_SHOULDER, LEFT_ELBOW), LEFT_SHOULDER_ANGLE),
    ((RIGHT_SHOULDER, RIGHT_ELBOW), RIGHT_SHOULDER_ANGLE),
    ((LEFT_HIP, LEFT_KNEE), LEFT_HIP_ANGLE),
    ((RIGHT_HIP, RIGHT_KNEE), RIGHT_HIP_ANGLE),
    ((LEFT_KNEE, LEFT_ANKLE), LEFT_KNEE_ANGLE),
    ((RIGHT_KNEE, RIGHT_ANKLE), RIGHT_KNEE_ANGLE),
];

/// Look up an angle definition by name
pub fn find_angle(name: &str) -> Option<&'static AngleDefinition> {
    ANGLE_REGISTRY.iter().find(|def| def.name == name)
}

/// Angle definition tracked by a bone, in either direction
pub fn angle_for_bone(connection: Connection) -> Option<&'static AngleDefinition> {
    TRACKED_BONES
        .iter()
        .find(|(bone, _)| same_bone(*bone, connection))
        .and_then(|(_, name)| find_angle(name))
}
