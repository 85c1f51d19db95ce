//! The gesture state machine behind direct manipulation on the canvas.
//!
//! A gesture is one pointer-down, any number of pointer moves, and a
//! pointer-up. The state is a plain value that only changes through the
//! transition functions below, so it can be driven without any UI:
//!
//! ```text
//!            start_move ┌──────────┐
//!          ┌───────────►│  Moving  ├──────────┐
//!          │            └──────────┘          │
//!          │ start_resize┌──────────┐         │
//! ┌──────┐ ├───────────►│ Resizing ├─────────┤ finish / cancel ┌──────┐
//! │ None ├─┤            └──────────┘         ├────────────────►│ None │
//! └──────┘ │ start_rotate┌──────────┐         │                 └──────┘
//!          ├───────────►│ Rotating ├─────────┤
//!          │            └──────────┘          │
//!          │ start_marquee┌──────────────────┐│
//!          └────────────►│ MarqueeSelecting ├┘
//!                        └──────────────────┘
//! ```
//!
//! Every frame is computed from the snapshot captured at gesture start plus
//! the total pointer delta. Intermediate moves never feed into the next one,
//! so the result after any sequence of moves depends only on the snapshot
//! and the latest pointer position.

use egui::{Pos2, Rect, Vec2};

use crate::config::CanvasConfig;
use crate::element::{Element, ElementUpdate, Geometry};
use crate::id_generator::ElementId;
use crate::selection::{elements_in_rect, marquee_rect};
use crate::snap::{snap_position, union_guides, Guide};

mod handle;
mod rotate;

pub use handle::{handle_positions, HandleKind, ResizeHandle};
pub use rotate::rotation_from_pointer;

/// Geometry of one element captured at gesture start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotEntry {
    pub id: ElementId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

impl SnapshotEntry {
    pub fn of(element: &Element) -> Self {
        let g = &element.geometry;
        Self {
            id: element.id,
            x: g.x,
            y: g.y,
            width: g.width,
            height: g.height,
            rotation: g.rotation,
        }
    }

    pub fn geometry(&self) -> Geometry {
        Geometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation,
        }
    }
}

/// Snapshots the listed elements in slide order, skipping locked ones.
pub fn snapshot_of(elements: &[Element], ids: &[ElementId]) -> Vec<SnapshotEntry> {
    elements
        .iter()
        .filter(|e| ids.contains(&e.id) && !e.locked)
        .map(SnapshotEntry::of)
        .collect()
}

/// Settings a gesture needs for each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureParams {
    pub slide_size: Vec2,
    pub min_size: f32,
    pub snap_enabled: bool,
    pub snap_threshold: f32,
    pub rotation_snap: Option<f32>,
}

impl GestureParams {
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            slide_size: config.slide_size(),
            min_size: config.min_element_size,
            snap_enabled: config.snap_enabled,
            snap_threshold: config.snap_threshold,
            rotation_snap: config.rotation_snap_degrees,
        }
    }
}

impl Default for GestureParams {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

/// Output of one pointer move
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureFrame {
    pub updates: Vec<(ElementId, ElementUpdate)>,
    /// Active guides, unioned over every moved element
    pub guides: Vec<Guide>,
    pub marquee: Option<Rect>,
}

/// What the owner should do once a gesture is over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEnd {
    Nothing,
    Select(Vec<ElementId>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum GestureState {
    #[default]
    None,
    Moving {
        origin: Pos2,
        snapshot: Vec<SnapshotEntry>,
    },
    Resizing {
        origin: Pos2,
        handle: ResizeHandle,
        entry: SnapshotEntry,
    },
    Rotating {
        origin: Pos2,
        entry: SnapshotEntry,
    },
    MarqueeSelecting {
        origin: Pos2,
        current: Pos2,
    },
}

impl GestureState {
    /// Starts moving the snapshotted elements. An empty snapshot (for
    /// instance when everything pressed is locked) starts nothing.
    pub fn start_move(origin: Pos2, snapshot: Vec<SnapshotEntry>) -> Self {
        if snapshot.is_empty() {
            return GestureState::None;
        }
        GestureState::Moving { origin, snapshot }
    }

    pub fn start_resize(origin: Pos2, handle: ResizeHandle, entry: SnapshotEntry) -> Self {
        GestureState::Resizing {
            origin,
            handle,
            entry,
        }
    }

    pub fn start_rotate(origin: Pos2, entry: SnapshotEntry) -> Self {
        GestureState::Rotating { origin, entry }
    }

    pub fn start_marquee(origin: Pos2) -> Self {
        GestureState::MarqueeSelecting {
            origin,
            current: origin,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, GestureState::None)
    }

    /// True while elements are being moved, resized or rotated
    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            GestureState::Moving { .. } | GestureState::Resizing { .. } | GestureState::Rotating { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::None => "none",
            GestureState::Moving { .. } => "moving",
            GestureState::Resizing { .. } => "resizing",
            GestureState::Rotating { .. } => "rotating",
            GestureState::MarqueeSelecting { .. } => "marquee-selecting",
        }
    }

    /// Rubber-band rectangle while marquee-selecting
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            GestureState::MarqueeSelecting { origin, current } => Some(marquee_rect(*origin, *current)),
            _ => None,
        }
    }

    /// IDs whose geometry this gesture changes
    pub fn affected_ids(&self) -> Vec<ElementId> {
        match self {
            GestureState::Moving { snapshot, .. } => snapshot.iter().map(|e| e.id).collect(),
            GestureState::Resizing { entry, .. } | GestureState::Rotating { entry, .. } => vec![entry.id],
            _ => Vec::new(),
        }
    }

    /// Computes the frame for a pointer position, in slide space.
    pub fn apply_pointer(self, pointer: Pos2, params: &GestureParams) -> (Self, GestureFrame) {
        let mut frame = GestureFrame::default();
        match &self {
            GestureState::None => {}
            GestureState::Moving { origin, snapshot } => {
                let delta = pointer - *origin;
                for entry in snapshot {
                    let candidate = Rect::from_min_size(
                        Pos2::new(entry.x, entry.y) + delta,
                        Vec2::new(entry.width, entry.height),
                    );
                    let position = if params.snap_enabled {
                        let snapped = snap_position(candidate, params.slide_size, params.snap_threshold);
                        union_guides(&mut frame.guides, snapped.guides);
                        snapped.position
                    } else {
                        candidate.min
                    };
                    frame.updates.push((entry.id, ElementUpdate::position(position)));
                }
            }
            GestureState::Resizing {
                origin,
                handle,
                entry,
            } => {
                let resized = handle.apply(&entry.geometry(), pointer - *origin, params.min_size);
                frame.updates.push((
                    entry.id,
                    ElementUpdate {
                        x: Some(resized.x),
                        y: Some(resized.y),
                        width: Some(resized.width),
                        height: Some(resized.height),
                        ..Default::default()
                    },
                ));
            }
            GestureState::Rotating { entry, .. } => {
                let center = entry.geometry().center();
                let rotation = rotation_from_pointer(center, pointer, params.rotation_snap);
                frame.updates.push((entry.id, ElementUpdate::rotation(rotation)));
            }
            GestureState::MarqueeSelecting { origin, .. } => {
                let next = GestureState::MarqueeSelecting {
                    origin: *origin,
                    current: pointer,
                };
                frame.marquee = next.marquee();
                return (next, frame);
            }
        }
        (self, frame)
    }

    /// Ends the gesture. A marquee selects every element whose box overlaps it.
    pub fn finish(self, elements: &[Element]) -> GestureEnd {
        match self.marquee() {
            Some(rect) => GestureEnd::Select(elements_in_rect(elements, rect)),
            None => GestureEnd::Nothing,
        }
    }

    /// Aborts the gesture, returning the updates that restore the snapshot.
    pub fn cancel(self) -> Vec<(ElementId, ElementUpdate)> {
        match self {
            GestureState::Moving { snapshot, .. } => snapshot
                .iter()
                .map(|e| (e.id, ElementUpdate::position(Pos2::new(e.x, e.y))))
                .collect(),
            GestureState::Resizing { entry, .. } | GestureState::Rotating { entry, .. } => {
                vec![(entry.id, ElementUpdate::geometry(&entry.geometry()))]
            }
            GestureState::None | GestureState::MarqueeSelecting { .. } => Vec::new(),
        }
    }
}
