use egui::Pos2;

use crate::element::normalize_degrees;

/// Rotation for a pointer dragged around `center`.
///
/// Straight up from the center is 0 degrees, increasing clockwise. With
/// `snap` set to a positive increment the angle is rounded to it.
pub fn rotation_from_pointer(center: Pos2, pointer: Pos2, snap: Option<f32>) -> f32 {
    let d = pointer - center;
    let degrees = d.y.atan2(d.x).to_degrees() + 90.0;
    let degrees = match snap {
        Some(step) if step > 0.0 => (degrees / step).round() * step,
        _ => degrees,
    };
    normalize_degrees(degrees)
}
