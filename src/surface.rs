//! Slide-space coordinates and hit testing.

use egui::{Pos2, Vec2};

use crate::config::CanvasConfig;
use crate::element::Element;
use crate::gesture::{handle_positions, HandleKind};
use crate::id_generator::ElementId;
use crate::selection::Selection;

/// Maps viewport pixels to slide-space units.
///
/// The owner supplies this every frame: `origin` is where the slide's
/// top-left corner was measured on screen, or `None` before the surface has
/// been laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub origin: Option<Pos2>,
    pub zoom: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            origin: None,
            zoom: 1.0,
        }
    }
}

impl ViewportTransform {
    pub fn new(origin: Pos2, zoom: f32) -> Self {
        Self {
            origin: Some(origin),
            zoom,
        }
    }

    fn valid(&self) -> Option<(Pos2, f32)> {
        let origin = self.origin?;
        (self.zoom.is_finite() && self.zoom > 0.0).then_some((origin, self.zoom))
    }

    /// Viewport point to slide space. An unmeasured surface or a broken zoom
    /// yields the slide origin.
    pub fn to_slide_space(&self, client: Pos2) -> Pos2 {
        match self.valid() {
            Some((origin, zoom)) => Pos2::ZERO + (client - origin) / zoom,
            None => Pos2::ZERO,
        }
    }

    /// Slide-space point to viewport pixels
    pub fn to_screen(&self, slide: Pos2) -> Pos2 {
        match self.valid() {
            Some((origin, zoom)) => origin + slide.to_vec2() * zoom,
            None => slide,
        }
    }

    pub fn scale(&self) -> f32 {
        self.valid().map_or(1.0, |(_, zoom)| zoom)
    }

    /// Slide-space length to pixels
    pub fn to_screen_vec(&self, v: Vec2) -> Vec2 {
        v * self.scale()
    }
}

/// Raw pointer position as delivered by the platform
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSource {
    Mouse(Pos2),
    /// Active touch points. Only the first one is used.
    Touch(Vec<Pos2>),
}

impl PointerSource {
    /// Slide-space position of the pointer. A touch event without points
    /// falls back to the slide origin.
    pub fn to_slide_space(&self, transform: &ViewportTransform) -> Pos2 {
        match self {
            PointerSource::Mouse(pos) => transform.to_slide_space(*pos),
            PointerSource::Touch(points) => points
                .first()
                .map_or(Pos2::ZERO, |p| transform.to_slide_space(*p)),
        }
    }
}

/// What lies under a pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Handle { id: ElementId, handle: HandleKind },
    Element(ElementId),
    Background,
}

/// Finds what a slide-space point hits.
///
/// Handles of a single selected, unlocked element win over everything;
/// elements are then tested from the top of the z-order down.
pub fn hit_test(point: Pos2, elements: &[Element], selection: &Selection, config: &CanvasConfig) -> HitTarget {
    if let Some(selected) = selection
        .single()
        .and_then(|id| elements.iter().find(|e| e.id == id))
        .filter(|e| !e.locked)
    {
        let handles = handle_positions(
            &selected.geometry,
            config.rotate_handle_offset,
            !selected.kind.is_path(),
        );
        if let Some((handle, _)) = handles
            .into_iter()
            .find(|(_, pos)| pos.distance(point) <= config.handle_radius)
        {
            return HitTarget::Handle {
                id: selected.id,
                handle,
            };
        }
    }

    elements
        .iter()
        .rev()
        .find(|e| e.hit_test(point, config.handle_radius))
        .map_or(HitTarget::Background, |e| HitTarget::Element(e.id))
}
