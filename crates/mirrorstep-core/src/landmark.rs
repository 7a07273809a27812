//! Landmarks and landmark frames
//!
//! A frame is either a full 33-joint pose or the explicit "absent"
//! marker the detector reports when it finds no body. A present frame
//! always holds exactly [`POSE_LANDMARK_COUNT`] joints; the count is
//! checked once when the frame is built from detector output.

use serde::{Deserialize, Serialize};

use crate::{MirrorError, MirrorResult, POSE_LANDMARK_COUNT};

/// Values per landmark in a flat buffer: x, y, z, visibility
pub const FLAT_STRIDE: usize = 4;

/// Length of a flat buffer holding one full pose
pub const FLAT_FRAME_LEN: usize = POSE_LANDMARK_COUNT * FLAT_STRIDE;

/// A single tracked body point in normalized image space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, typically 0-1
    pub x: f32,
    /// Vertical position, typically 0-1
    pub y: f32,
    /// Approximate depth relative to the hips
    pub z: f32,
    /// Detector confidence, 0-1
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self { x, y, z, visibility }
    }

    /// Position in the image plane
    #[inline]
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Usable for metrics when confidence is strictly above the threshold
    #[inline]
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility > threshold
    }

    /// 3D Euclidean distance to another landmark
    pub fn distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Distance in the image plane, ignoring depth
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.visibility.is_finite()
    }
}

/// A validated 33-joint pose with every value finite
///
/// Only the checked [`LandmarkFrame`] constructors can build one:
///
/// ```compile_fail
/// use mirrorstep_core::{Landmark, LandmarkFrame, Pose};
/// let joints = Box::new([Landmark::default(); 33]);
/// let _ = LandmarkFrame::Present(Pose(joints));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Pose(Box<[Landmark; POSE_LANDMARK_COUNT]>);

impl Pose {
    pub fn joints(&self) -> &[Landmark; POSE_LANDMARK_COUNT] {
        &self.0
    }
}

/// One observation of the body for a single time step
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LandmarkFrame {
    /// The detector found no pose in this frame
    #[default]
    Absent,
    /// A full pose
    Present(Pose),
}

impl LandmarkFrame {
    /// No body detected
    pub fn absent() -> Self {
        LandmarkFrame::Absent
    }

    /// Build a frame from detector output, validating joint count and values
    pub fn from_landmarks(landmarks: Vec<Landmark>) -> MirrorResult<Self> {
        if let Some(joint) = landmarks.iter().position(|lm| !lm.is_finite()) {
            return Err(MirrorError::NonFiniteLandmark { joint });
        }

        let actual = landmarks.len();
        let joints: Box<[Landmark; POSE_LANDMARK_COUNT]> = landmarks
            .into_boxed_slice()
            .try_into()
            .map_err(|_| MirrorError::InvalidLandmarkCount {
                expected: POSE_LANDMARK_COUNT,
                actual,
            })?;

        Ok(LandmarkFrame::Present(Pose(joints)))
    }

    /// Build a frame from a flat `[x, y, z, visibility] * 33` buffer
    pub fn from_flat(data: &[f32]) -> MirrorResult<Self> {
        if data.len() != FLAT_FRAME_LEN {
            return Err(MirrorError::InvalidFlatLength {
                expected: FLAT_FRAME_LEN,
                actual: data.len(),
            });
        }

        let landmarks = data
            .chunks_exact(FLAT_STRIDE)
            .map(|c| Landmark::new(c[0], c[1], c[2], c[3]))
            .collect();

        Self::from_landmarks(landmarks)
    }

    /// Is a body present?
    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self, LandmarkFrame::Present(_))
    }

    /// All joints, if present
    pub fn landmarks(&self) -> Option<&[Landmark; POSE_LANDMARK_COUNT]> {
        match self {
            LandmarkFrame::Present(pose) => Some(pose.joints()),
            LandmarkFrame::Absent => None,
        }
    }

    /// A single joint, if present and in range
    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks().and_then(|joints| joints.get(index))
    }

    /// Joint is present and its confidence exceeds the threshold
    pub fn is_visible(&self, index: usize, threshold: f32) -> bool {
        self.landmark(index)
            .map(|lm| lm.is_visible(threshold))
            .unwrap_or(false)
    }
}
