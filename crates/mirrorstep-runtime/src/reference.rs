//! Recorded reference sequence
//!
//! The reference dance is finite; the live stream is not. Playback wraps
//! the reference index modulo its length so a session can run for as long
//! as the performer keeps dancing.

use tracing::info;

use mirrorstep_core::{Landmark, LandmarkFrame, MirrorError, MirrorResult, POSE_LANDMARK_COUNT};

/// A recorded sequence of reference frames, validated at load time
#[derive(Debug, Clone)]
pub struct ReferenceSequence {
    frames: Vec<LandmarkFrame>,
}

impl ReferenceSequence {
    /// Wrap already-built frames. Fails on an empty sequence.
    pub fn new(frames: Vec<LandmarkFrame>) -> MirrorResult<Self> {
        if frames.is_empty() {
            return Err(MirrorError::EmptyReferenceSequence);
        }
        let sequence = Self { frames };
        info!(
            frames = sequence.len(),
            detected = sequence.detected_count(),
            "reference sequence loaded"
        );
        Ok(sequence)
    }

    /// Build from raw detector output, one entry per source frame
    ///
    /// `None` marks a frame with no detection. Any detected frame with the
    /// wrong joint count or a non-finite value fails the whole load, naming
    /// the frame.
    pub fn from_detections(detections: Vec<Option<Vec<Landmark>>>) -> MirrorResult<Self> {
        let frames = detections
            .into_iter()
            .enumerate()
            .map(|(index, detection)| match detection {
                None => Ok(LandmarkFrame::absent()),
                Some(joints) if joints.len() != POSE_LANDMARK_COUNT => {
                    Err(MirrorError::JointCountMismatch {
                        frame: index,
                        expected: POSE_LANDMARK_COUNT,
                        actual: joints.len(),
                    })
                }
                Some(joints) => LandmarkFrame::from_landmarks(joints).map_err(|e| match e {
                    MirrorError::NonFiniteLandmark { joint } => {
                        MirrorError::NonFiniteReferenceLandmark { frame: index, joint }
                    }
                    other => other,
                }),
            })
            .collect::<MirrorResult<Vec<_>>>()?;

        Self::new(frames)
    }

    /// Number of recorded frames (never zero)
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; construction rejects empty sequences
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames with a detected pose
    pub fn detected_count(&self) -> usize {
        self.frames.iter().filter(|f| f.is_present()).count()
    }

    /// Reference frame for a step, wrapping around the end of the recording
    pub fn frame_at(&self, step: u64) -> &LandmarkFrame {
        let index = (step % self.frames.len() as u64) as usize;
        &self.frames[index]
    }

    pub fn frames(&self) -> &[LandmarkFrame] {
        &self.frames
    }
}
