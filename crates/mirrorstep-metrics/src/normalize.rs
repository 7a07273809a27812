//! Body-scale normalization
//!
//! Shoulder width is used as a proxy for how large the subject appears,
//! so position distances stay comparable when the performer stands
//! closer to or further from the camera than the reference dancer.

use mirrorstep_core::{LandmarkFrame, LEFT_SHOULDER, RIGHT_SHOULDER};

/// Scale used when the shoulders cannot be measured
pub const IDENTITY_SCALE: f32 = 1.0;

/// Normalization factor for a frame
///
/// Planar distance between the shoulders when both are visible above
/// `visibility_threshold`, otherwise [`IDENTITY_SCALE`]. Never zero.
pub fn body_scale(frame: &LandmarkFrame, visibility_threshold: f32) -> f32 {
    let (Some(left), Some(right)) = (
        frame.landmark(LEFT_SHOULDER),
        frame.landmark(RIGHT_SHOULDER),
    ) else {
        return IDENTITY_SCALE;
    };

    if !left.is_visible(visibility_threshold) || !right.is_visible(visibility_threshold) {
        return IDENTITY_SCALE;
    }

    let width = left.planar_distance(right);
    if width > 0.0 && width.is_finite() {
        width
    } else {
        IDENTITY_SCALE
    }
}

/// Average body scale of a reference/live pair
pub fn pair_scale(reference: &LandmarkFrame, live: &LandmarkFrame, visibility_threshold: f32) -> f32 {
    (body_scale(reference, visibility_threshold) + body_scale(live, visibility_threshold)) / 2.0
}
