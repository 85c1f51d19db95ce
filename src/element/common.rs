use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Default lower bound for element width and height
pub const MIN_ELEMENT_SIZE: f32 = 5.0;

/// Position, size and rotation of an element in slide-space units.
///
/// `x`/`y` is the top-left corner of the un-rotated box. Rotation is in
/// degrees about the box center and may be stored unbounded; anything that
/// draws uses [`Geometry::normalized_rotation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

impl Geometry {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(Pos2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }

    pub fn center(&self) -> Pos2 {
        Pos2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn normalized_rotation(&self) -> f32 {
        normalize_degrees(self.rotation)
    }

    /// Strict axis-aligned overlap with `rect`. Touching edges do not count.
    pub fn overlaps(&self, rect: Rect) -> bool {
        self.x < rect.max.x
            && self.x + self.width > rect.min.x
            && self.y < rect.max.y
            && self.y + self.height > rect.min.y
    }

    /// Maps a slide-space point into the element's un-rotated frame, so that
    /// it can be tested against [`Geometry::rect`].
    pub fn to_local(&self, point: Pos2) -> Pos2 {
        rotate_about(point, self.center(), -self.normalized_rotation())
    }

    /// Maps a point given in the element's un-rotated frame to slide space.
    pub fn to_slide(&self, local: Pos2) -> Pos2 {
        rotate_about(local, self.center(), self.normalized_rotation())
    }

    pub fn contains(&self, point: Pos2) -> bool {
        self.rect().contains(self.to_local(point))
    }
}

/// Brings an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if d >= 360.0 { 0.0 } else { d }
}

/// Rotates `point` around `center` by `degrees` (clockwise on screen, y down).
pub fn rotate_about(point: Pos2, center: Pos2, degrees: f32) -> Pos2 {
    if degrees == 0.0 {
        return point;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - center;
    Pos2::new(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}

/// Distance from a point to a line segment (used for path hit testing)
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}
