//! Canvas guides for move gestures.
//!
//! A moving element snaps to the slide's edges and center lines. Each axis
//! is handled on its own, and the candidates are checked in a fixed order:
//! start edge, end edge, center. The first one within the threshold wins, so
//! at most one guide per axis is active for a given element.

use egui::{Pos2, Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuideOrientation {
    /// A vertical line at some x
    Vertical,
    /// A horizontal line at some y
    Horizontal,
}

/// An active alignment line, in slide space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Guide {
    pub orientation: GuideOrientation,
    pub position: f32,
}

impl Guide {
    pub fn vertical(x: f32) -> Self {
        Self {
            orientation: GuideOrientation::Vertical,
            position: x,
        }
    }

    pub fn horizontal(y: f32) -> Self {
        Self {
            orientation: GuideOrientation::Horizontal,
            position: y,
        }
    }

    /// End points of the guide drawn across a slide of `slide_size`
    pub fn segment(&self, slide_size: Vec2) -> [Pos2; 2] {
        match self.orientation {
            GuideOrientation::Vertical => [
                Pos2::new(self.position, 0.0),
                Pos2::new(self.position, slide_size.y),
            ],
            GuideOrientation::Horizontal => [
                Pos2::new(0.0, self.position),
                Pos2::new(slide_size.x, self.position),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// Top-left corner after snapping
    pub position: Pos2,
    pub guides: Vec<Guide>,
}

/// Snaps one axis. Returns the new start coordinate and the guide position.
fn snap_axis(start: f32, size: f32, extent: f32, threshold: f32) -> Option<(f32, f32)> {
    let candidates = [
        // (guide, edge being compared, start that aligns the edge)
        (0.0, start, 0.0),
        (extent, start + size, extent - size),
        (extent / 2.0, start + size / 2.0, (extent - size) / 2.0),
    ];
    candidates
        .into_iter()
        .find(|(guide, edge, _)| (edge - guide).abs() < threshold)
        .map(|(guide, _, aligned)| (aligned, guide))
}

/// Snaps a candidate box against the slide guides.
pub fn snap_position(candidate: Rect, slide_size: Vec2, threshold: f32) -> SnapResult {
    let mut position = candidate.min;
    let mut guides = Vec::new();

    if let Some((x, guide)) = snap_axis(candidate.min.x, candidate.width(), slide_size.x, threshold) {
        position.x = x;
        guides.push(Guide::vertical(guide));
    }
    if let Some((y, guide)) = snap_axis(candidate.min.y, candidate.height(), slide_size.y, threshold) {
        position.y = y;
        guides.push(Guide::horizontal(guide));
    }

    SnapResult { position, guides }
}

/// Adds `more` to `guides`, skipping duplicates.
pub fn union_guides(guides: &mut Vec<Guide>, more: impl IntoIterator<Item = Guide>) {
    for guide in more {
        if !guides.contains(&guide) {
            guides.push(guide);
        }
    }
}
