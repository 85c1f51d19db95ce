use egui::{CursorIcon, Pos2, Vec2};

use crate::element::Geometry;

/// A resize handle named by the box sides it drags, e.g. `"se"` or `"w"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeHandle {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
}

impl ResizeHandle {
    pub const N: Self = Self::new(true, false, false, false);
    pub const S: Self = Self::new(false, true, false, false);
    pub const E: Self = Self::new(false, false, true, false);
    pub const W: Self = Self::new(false, false, false, true);
    pub const NE: Self = Self::new(true, false, true, false);
    pub const NW: Self = Self::new(true, false, false, true);
    pub const SE: Self = Self::new(false, true, true, false);
    pub const SW: Self = Self::new(false, true, false, true);

    /// The eight handles in drawing order
    pub const ALL: [Self; 8] = [
        Self::NW,
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
    ];

    const fn new(north: bool, south: bool, east: bool, west: bool) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Parses a handle name made of the letters `n`, `s`, `e`, `w`.
    ///
    /// Returns `None` for empty names, unknown letters and contradictory
    /// combinations such as `"ns"`.
    pub fn parse(name: &str) -> Option<Self> {
        let mut handle = Self::new(false, false, false, false);
        for c in name.chars() {
            match c.to_ascii_lowercase() {
                'n' => handle.north = true,
                's' => handle.south = true,
                'e' => handle.east = true,
                'w' => handle.west = true,
                _ => return None,
            }
        }
        let vertical_ok = !(handle.north && handle.south);
        let horizontal_ok = !(handle.east && handle.west);
        let any = handle.north || handle.south || handle.east || handle.west;
        (vertical_ok && horizontal_ok && any).then_some(handle)
    }

    pub fn name(&self) -> &'static str {
        match (self.north, self.south, self.east, self.west) {
            (true, _, true, _) => "ne",
            (true, _, _, true) => "nw",
            (_, true, true, _) => "se",
            (_, true, _, true) => "sw",
            (true, ..) => "n",
            (_, true, ..) => "s",
            (_, _, true, _) => "e",
            _ => "w",
        }
    }

    /// Handle position on the un-rotated box, as fractions of width and height
    pub fn anchor(&self) -> Vec2 {
        let x = if self.west {
            0.0
        } else if self.east {
            1.0
        } else {
            0.5
        };
        let y = if self.north {
            0.0
        } else if self.south {
            1.0
        } else {
            0.5
        };
        Vec2::new(x, y)
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match (self.north, self.south, self.east, self.west) {
            (true, _, true, _) | (_, true, _, true) => CursorIcon::ResizeNeSw,
            (true, _, _, true) | (_, true, true, _) => CursorIcon::ResizeNwSe,
            (true, ..) | (_, true, ..) => CursorIcon::ResizeVertical,
            _ => CursorIcon::ResizeHorizontal,
        }
    }

    /// Resizes `start` by a pointer `delta`.
    ///
    /// Sizes are clamped to `min_size`. West and north handles move the
    /// origin so that the opposite edge stays where it was, also when the
    /// size hits the clamp.
    pub fn apply(&self, start: &Geometry, delta: Vec2, min_size: f32) -> Geometry {
        let mut g = *start;
        if self.east {
            g.width = (start.width + delta.x).max(min_size);
        }
        if self.west {
            g.width = (start.width - delta.x).max(min_size);
            g.x = start.x + start.width - g.width;
        }
        if self.south {
            g.height = (start.height + delta.y).max(min_size);
        }
        if self.north {
            g.height = (start.height - delta.y).max(min_size);
            g.y = start.y + start.height - g.height;
        }
        g
    }
}

impl std::fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Any handle of the selection chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Resize(ResizeHandle),
    Rotate,
}

impl HandleKind {
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            HandleKind::Resize(handle) => handle.cursor_icon(),
            HandleKind::Rotate => CursorIcon::Alias,
        }
    }
}

/// Slide-space handle positions for an element.
///
/// Positions are laid out on the un-rotated box and then rotated with the
/// element about its center. Paths only get the rotate handle.
pub fn handle_positions(geometry: &Geometry, rotate_offset: f32, resizable: bool) -> Vec<(HandleKind, Pos2)> {
    let rect = geometry.rect();
    let mut handles = Vec::with_capacity(9);
    if resizable {
        for handle in ResizeHandle::ALL {
            let local = rect.min + rect.size() * handle.anchor();
            handles.push((HandleKind::Resize(handle), geometry.to_slide(local)));
        }
    }
    let rotate = Pos2::new(rect.center().x, rect.min.y - rotate_offset);
    handles.push((HandleKind::Rotate, geometry.to_slide(rotate)));
    handles
}
