//! Joint angle calculation using the dot product
//!
//! The angle at a vertex `b` is the angle between the vectors b→a and b→c,
//! measured in the image plane.

use mirrorstep_core::{AngleDefinition, Landmark, POSE_LANDMARK_COUNT};

/// Angle at `b` in degrees, in [0, 180]
///
/// Uses cos(θ) = (v1 · v2) / (|v1| × |v2|), with the cosine clamped to
/// [-1, 1] before `acos`. Coincident points give 0.
///
/// - 0° = a and c on the same ray from b (fully folded)
/// - 180° = a, b, c collinear with b between them (fully straight)
pub fn joint_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    // Also catches a product that underflows for tiny vectors
    let denom = mag1 * mag2;
    if denom == 0.0 {
        return 0.0;
    }

    let cos_angle = (dot / denom).clamp(-1.0, 1.0);

    cos_angle.acos().to_degrees()
}

/// Angle of a registry definition over a full pose
pub fn definition_angle(
    landmarks: &[Landmark; POSE_LANDMARK_COUNT],
    def: &AngleDefinition,
) -> f32 {
    joint_angle(
        landmarks[def.a].xy(),
        landmarks[def.vertex].xy(),
        landmarks[def.c].xy(),
    )
}
