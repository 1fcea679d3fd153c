use crate::error::{MetaError, MetaResult};

use super::model::{Point2D, Rectangle};

/// Round half up, `floor(v + 0.5)`. Not banker's rounding: `2.5 → 3`,
/// `-2.5 → -2`.
pub fn round_half_up(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Derive a square bounding rectangle from a landmark set.
///
/// The square is centered on the landmark centroid; its half side is the
/// distance from the centroid to the farthest landmark times `scale`.
///
/// `scale` must be positive. This is not checked: a non-positive scale
/// yields an empty or negative-side rectangle.
pub fn rect_from_landmarks(landmarks: &[Point2D], scale: f32) -> MetaResult<Rectangle> {
    if landmarks.is_empty() {
        return Err(MetaError::InvalidInput(
            "cannot derive a rectangle from an empty landmark set".into(),
        ));
    }

    let center = landmarks
        .iter()
        .fold(Point2D::default(), |acc, &p| acc + p)
        * (1.0 / landmarks.len() as f32);

    let max_dist = landmarks
        .iter()
        .map(|p| p.dist(&center))
        .fold(0.0f32, f32::max);

    let half_side = max_dist * scale;
    let side = round_half_up(2.0 * half_side);

    Ok(Rectangle::new(
        round_half_up(center.x - half_side),
        round_half_up(center.y - half_side),
        side,
        side,
    ))
}
