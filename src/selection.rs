use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::id_generator::ElementId;

/// What a select callback asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectRequest {
    None,
    One(ElementId),
    Many(Vec<ElementId>),
}

/// Set of selected element IDs, kept in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// The selected element when exactly one is selected
    pub fn single(&self) -> Option<ElementId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Applies a select request.
    ///
    /// `None` clears and `Many` replaces the selection. `One` replaces it too,
    /// unless the multi modifier is held, in which case the ID is toggled.
    pub fn apply(&mut self, request: &SelectRequest, multi: bool) {
        match request {
            SelectRequest::None => self.ids.clear(),
            SelectRequest::Many(ids) => {
                self.ids.clear();
                for id in ids {
                    if !self.ids.contains(id) {
                        self.ids.push(*id);
                    }
                }
            }
            SelectRequest::One(id) if multi => {
                if let Some(pos) = self.ids.iter().position(|s| s == id) {
                    self.ids.remove(pos);
                } else {
                    self.ids.push(*id);
                }
            }
            SelectRequest::One(id) => {
                self.ids.clear();
                self.ids.push(*id);
            }
        }
    }

    /// Drops IDs that no longer refer to an element in `elements`.
    /// Returns `true` if anything was removed.
    pub fn prune(&mut self, elements: &[Element]) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| elements.iter().any(|e| e.id == *id));
        self.ids.len() != before
    }
}

/// Rubber-band rectangle spanned by the gesture start and the pointer
pub fn marquee_rect(origin: Pos2, current: Pos2) -> Rect {
    Rect::from_two_pos(origin, current)
}

/// Elements whose un-rotated box strictly overlaps `rect`, in list order
pub fn elements_in_rect(elements: &[Element], rect: Rect) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|e| e.geometry.overlaps(rect))
        .map(|e| e.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Geometry, ShapeKind};
    use egui::Vec2;

    #[test]
    fn one_with_multi_toggles() {
        let a = ElementId::new();
        let b = ElementId::new();
        let mut sel = Selection::new();
        sel.apply(&SelectRequest::One(a), false);
        sel.apply(&SelectRequest::One(b), true);
        assert_eq!(sel.ids(), &[a, b]);
        sel.apply(&SelectRequest::One(a), true);
        assert_eq!(sel.ids(), &[b]);
        sel.apply(&SelectRequest::One(a), false);
        assert_eq!(sel.single(), Some(a));
        sel.apply(&SelectRequest::None, true);
        assert!(sel.is_empty());
    }

    #[test]
    fn many_replaces_and_dedupes() {
        let a = ElementId::new();
        let b = ElementId::new();
        let mut sel = Selection::new();
        sel.apply(&SelectRequest::One(ElementId::new()), false);
        sel.apply(&SelectRequest::Many(vec![a, b, a]), false);
        assert_eq!(sel.ids(), &[a, b]);
    }

    #[test]
    fn prune_removes_stale_ids() {
        let el = Element::shape(ShapeKind::Circle, Pos2::ZERO);
        let mut sel = Selection::new();
        sel.apply(&SelectRequest::Many(vec![el.id, ElementId::new()]), false);
        assert!(sel.prune(std::slice::from_ref(&el)));
        assert_eq!(sel.ids(), &[el.id]);
        assert!(!sel.prune(std::slice::from_ref(&el)));
    }

    #[test]
    fn marquee_normalizes_corners() {
        let r = marquee_rect(Pos2::new(50.0, 10.0), Pos2::new(10.0, 40.0));
        assert_eq!(r.min, Pos2::new(10.0, 10.0));
        assert_eq!(r.max, Pos2::new(50.0, 40.0));
    }

    #[test]
    fn marquee_hits_by_overlap() {
        let el = Element::shape(ShapeKind::Rectangle, Pos2::ZERO)
            .with_geometry(Geometry::new(10.0, 10.0, 20.0, 20.0));
        let els = vec![el];
        let partial = Rect::from_min_size(Pos2::ZERO, Vec2::splat(15.0));
        let away = Rect::from_min_size(Pos2::new(50.0, 50.0), Vec2::splat(10.0));
        assert_eq!(elements_in_rect(&els, partial), vec![els[0].id]);
        assert!(elements_in_rect(&els, away).is_empty());
    }
}
