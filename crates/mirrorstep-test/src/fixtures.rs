//! Pose fixtures
//!
//! Poses are built in normalized image coordinates (y grows downward).
//! Joints that a fixture does not place sit at the head with full
//! visibility, so they match between any two fixtures.

use std::f32::consts::PI;

use mirrorstep_core::{
    Landmark, LandmarkFrame, MirrorResult, FLAT_STRIDE, LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP,
    LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST, POSE_LANDMARK_COUNT, RIGHT_ANKLE, RIGHT_ELBOW,
    RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

const UPPER_ARM: f32 = 0.14;
const FOREARM: f32 = 0.14;
const THIGH: f32 = 0.15;
const SHIN: f32 = 0.15;

/// Joint angles that fully describe a fixture pose, in degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseParams {
    /// Upper arm raise away from hanging straight down
    pub arm_raise: f32,
    /// Interior elbow angle, 180 is straight
    pub elbow: f32,
    /// Interior knee angle, 180 is straight
    pub knee: f32,
}

impl PoseParams {
    pub fn standing() -> Self {
        Self {
            arm_raise: 45.0,
            elbow: 180.0,
            knee: 180.0,
        }
    }

    /// Pose at a point of a looping routine, `phase` in radians
    pub fn dance(phase: f32) -> Self {
        Self {
            arm_raise: 45.0 + 40.0 * phase.sin(),
            elbow: 135.0 + 40.0 * phase.cos(),
            knee: 165.0 + 10.0 * phase.sin(),
        }
    }
}

/// Unit vector `degrees` away from straight down, toward `+x` when `sign` is 1
fn direction(degrees: f32, sign: f32) -> (f32, f32) {
    let r = degrees * PI / 180.0;
    (sign * r.sin(), r.cos())
}

fn offset(from: &Landmark, dir: (f32, f32), length: f32) -> Landmark {
    Landmark::new(from.x + dir.0 * length, from.y + dir.1 * length, 0.0, 1.0)
}

/// 33 joints for the given pose parameters, symmetric left/right
pub fn build_pose(params: PoseParams) -> Vec<Landmark> {
    let mut joints = vec![Landmark::new(0.5, 0.15, 0.0, 1.0); POSE_LANDMARK_COUNT];

    // (sign, shoulder, elbow, wrist, hip, knee, ankle); left limbs sit at +x
    let sides = [
        (1.0, LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
        (-1.0, RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
    ];
    for (sign, shoulder, elbow, wrist, hip, knee, ankle) in sides {
        joints[shoulder] = Landmark::new(0.5 + sign * 0.1, 0.30, 0.0, 1.0);
        joints[hip] = Landmark::new(0.5 + sign * 0.07, 0.60, 0.0, 1.0);

        joints[elbow] = offset(
            &joints[shoulder],
            direction(params.arm_raise, sign),
            UPPER_ARM,
        );
        joints[wrist] = offset(
            &joints[elbow],
            direction(params.arm_raise + 180.0 - params.elbow, sign),
            FOREARM,
        );

        joints[knee] = offset(&joints[hip], direction(0.0, sign), THIGH);
        joints[ankle] = offset(&joints[knee], direction(params.knee - 180.0, sign), SHIN);
    }
    joints
}

pub fn standing_pose() -> Vec<Landmark> {
    build_pose(PoseParams::standing())
}

pub fn frame(joints: Vec<Landmark>) -> MirrorResult<LandmarkFrame> {
    LandmarkFrame::from_landmarks(joints)
}

/// Rotate `joint` about `pivot` in the image plane
pub fn rotate_about(joints: &mut [Landmark], pivot: usize, joint: usize, degrees: f32) {
    let r = degrees * PI / 180.0;
    let (cx, cy) = joints[pivot].xy();
    let (dx, dy) = (joints[joint].x - cx, joints[joint].y - cy);
    joints[joint].x = cx + dx * r.cos() - dy * r.sin();
    joints[joint].y = cy + dx * r.sin() + dy * r.cos();
}

pub fn translate(joints: &mut [Landmark], dx: f32, dy: f32) {
    for joint in joints.iter_mut() {
        joint.x += dx;
        joint.y += dy;
    }
}

/// Scale about the image center
pub fn scale(joints: &mut [Landmark], factor: f32) {
    for joint in joints.iter_mut() {
        joint.x = 0.5 + (joint.x - 0.5) * factor;
        joint.y = 0.5 + (joint.y - 0.5) * factor;
        joint.z *= factor;
    }
}

pub fn set_visibility(joints: &mut [Landmark], indices: &[usize], visibility: f32) {
    for &i in indices {
        joints[i].visibility = visibility;
    }
}

/// Detector wire layout: `[x, y, z, visibility]` per joint
pub fn flatten(joints: &[Landmark]) -> Vec<f32> {
    let mut flat = Vec::with_capacity(joints.len() * FLAT_STRIDE);
    for joint in joints {
        flat.extend_from_slice(&[joint.x, joint.y, joint.z, joint.visibility]);
    }
    flat
}
