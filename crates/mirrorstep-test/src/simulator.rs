//! Performer simulator
//!
//! Generates a clean reference routine and a live stream that imitates it
//! through a noisy detector:
//! - Positional jitter
//! - Dropped detections
//! - Occluded limbs (low visibility)
//! - Timing lag behind the reference

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mirrorstep_core::{
    Landmark, LandmarkFrame, MirrorResult, LEFT_ANKLE, LEFT_ELBOW, LEFT_KNEE, LEFT_WRIST,
    RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_KNEE, RIGHT_WRIST,
};
use mirrorstep_runtime::ReferenceSequence;

use crate::fixtures::{build_pose, set_visibility, PoseParams};

/// Visibility given to occluded joints
pub const OCCLUDED_VISIBILITY: f32 = 0.1;

/// Limb groups an occlusion can hide
const LIMBS: [[usize; 2]; 4] = [
    [LEFT_ELBOW, LEFT_WRIST],
    [RIGHT_ELBOW, RIGHT_WRIST],
    [LEFT_KNEE, LEFT_ANKLE],
    [RIGHT_KNEE, RIGHT_ANKLE],
];

/// How the simulated performer and detector deviate from the reference
#[derive(Clone, Debug, PartialEq)]
pub struct PerformerProfile {
    /// Frames the performer trails the reference by
    pub lag_frames: u64,
    /// Max positional jitter per coordinate, normalized units
    pub jitter: f32,
    /// Probability that a live frame has no detection (0.0 - 1.0)
    pub dropout_rate: f64,
    /// Probability that one limb is occluded in a live frame (0.0 - 1.0)
    pub occlusion_rate: f64,
}

impl PerformerProfile {
    /// Exact copy of the reference
    pub fn mirror() -> Self {
        Self {
            lag_frames: 0,
            jitter: 0.0,
            dropout_rate: 0.0,
            occlusion_rate: 0.0,
        }
    }

    /// A decent performer on a decent camera
    pub fn typical() -> Self {
        Self {
            lag_frames: 2,
            jitter: 0.004,
            dropout_rate: 0.02,
            occlusion_rate: 0.05,
        }
    }

    /// Late, jittery and frequently lost
    pub fn sloppy() -> Self {
        Self {
            lag_frames: 8,
            jitter: 0.02,
            dropout_rate: 0.25,
            occlusion_rate: 0.2,
        }
    }
}

/// Simulator counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimulatorStats {
    pub frames: u64,
    pub dropped: u64,
    pub occluded: u64,
}

/// Seeded source of reference and live frames
pub struct DanceSimulator {
    profile: PerformerProfile,
    rng: StdRng,
    /// Frames per loop of the routine
    period: u64,
    stats: SimulatorStats,
}

impl DanceSimulator {
    pub fn new(profile: PerformerProfile, seed: u64) -> Self {
        Self::with_period(profile, seed, 60)
    }

    pub fn with_period(profile: PerformerProfile, seed: u64, period: u64) -> Self {
        DanceSimulator {
            profile,
            rng: StdRng::seed_from_u64(seed),
            period: period.max(1),
            stats: SimulatorStats::default(),
        }
    }

    fn phase(&self, step: u64) -> f32 {
        (step % self.period) as f32 / self.period as f32 * TAU
    }

    /// Clean routine pose for a step
    pub fn routine_pose(&self, step: u64) -> Vec<Landmark> {
        build_pose(PoseParams::dance(self.phase(step)))
    }

    /// One loop of the routine as raw detections, with every `gap_every`-th
    /// frame undetected (0 disables gaps)
    pub fn reference_detections(&self, gap_every: u64) -> Vec<Option<Vec<Landmark>>> {
        (0..self.period)
            .map(|step| {
                if gap_every > 0 && step % gap_every == gap_every - 1 {
                    None
                } else {
                    Some(self.routine_pose(step))
                }
            })
            .collect()
    }

    pub fn reference(&self) -> MirrorResult<ReferenceSequence> {
        ReferenceSequence::from_detections(self.reference_detections(0))
    }

    /// Live detection for a step, as the detector would report it
    pub fn live_frame(&mut self, step: u64) -> MirrorResult<LandmarkFrame> {
        self.stats.frames += 1;

        if self.rng.gen::<f64>() < self.profile.dropout_rate {
            self.stats.dropped += 1;
            return Ok(LandmarkFrame::absent());
        }

        let mut joints = self.routine_pose(step.saturating_sub(self.profile.lag_frames));

        let jitter = self.profile.jitter;
        if jitter > 0.0 {
            for joint in joints.iter_mut() {
                joint.x += self.rng.gen_range(-jitter..=jitter);
                joint.y += self.rng.gen_range(-jitter..=jitter);
            }
        }

        if self.rng.gen::<f64>() < self.profile.occlusion_rate {
            let limb = LIMBS[self.rng.gen_range(0..LIMBS.len())];
            set_visibility(&mut joints, &limb, OCCLUDED_VISIBILITY);
            self.stats.occluded += 1;
        }

        LandmarkFrame::from_landmarks(joints)
    }

    pub fn stats(&self) -> &SimulatorStats {
        &self.stats
    }

    pub fn profile(&self) -> &PerformerProfile {
        &self.profile
    }

    pub fn period(&self) -> u64 {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_matches_reference() {
        let mut sim = DanceSimulator::new(PerformerProfile::mirror(), 7);
        let reference = sim.reference().unwrap();
        for step in 0..120 {
            let live = sim.live_frame(step).unwrap();
            assert_eq!(&live, reference.frame_at(step));
        }
        assert_eq!(sim.stats().dropped, 0);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = DanceSimulator::new(PerformerProfile::sloppy(), 99);
        let mut b = DanceSimulator::new(PerformerProfile::sloppy(), 99);
        for step in 0..50 {
            assert_eq!(a.live_frame(step).unwrap(), b.live_frame(step).unwrap());
        }
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_dropout_rate_roughly_respected() {
        let mut sim = DanceSimulator::new(PerformerProfile::sloppy(), 1);
        for step in 0..2000 {
            sim.live_frame(step).unwrap();
        }
        let rate = sim.stats().dropped as f64 / sim.stats().frames as f64;
        assert!((rate - 0.25).abs() < 0.05, "dropout rate {}", rate);
    }

    #[test]
    fn test_reference_gaps() {
        let sim = DanceSimulator::with_period(PerformerProfile::mirror(), 0, 10);
        let detections = sim.reference_detections(5);
        assert_eq!(detections.len(), 10);
        assert!(detections[4].is_none());
        assert!(detections[9].is_none());
        assert_eq!(detections.iter().filter(|d| d.is_some()).count(), 8);
    }
}
