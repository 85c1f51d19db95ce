use egui::{Color32, Pos2, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementUpdate};
use crate::id_generator::{ElementId, SlideId};

/// Slide background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Background {
    Solid(Color32),
    LinearGradient { from: Color32, to: Color32, angle: f32 },
    RadialGradient { inner: Color32, outer: Color32 },
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color32::WHITE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Top,
    Middle,
    Bottom,
}

/// One slide: an ordered element list where later elements paint on top.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub background: Background,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Slide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index_of(id).is_some()
    }

    fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| e.id == id)
    }

    /// Top-most element under a slide-space point
    pub fn element_at(&self, point: Pos2, tolerance: f32) -> Option<&Element> {
        self.elements.iter().rev().find(|e| e.hit_test(point, tolerance))
    }

    /// Appends an element on top of the z-order and returns its ID.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Removes every listed element. Returns how many were removed.
    pub fn remove_elements(&mut self, ids: &[ElementId]) -> usize {
        let before = self.elements.len();
        self.elements.retain(|e| !ids.contains(&e.id));
        before - self.elements.len()
    }

    /// Appends offset copies of the listed elements, in z-order, and returns
    /// the new IDs.
    pub fn duplicate_elements(&mut self, ids: &[ElementId], offset: Vec2) -> Vec<ElementId> {
        let copies: Vec<Element> = self
            .elements
            .iter()
            .filter(|e| ids.contains(&e.id))
            .map(|e| e.duplicate(offset))
            .collect();
        let new_ids = copies.iter().map(|e| e.id).collect();
        self.elements.extend(copies);
        new_ids
    }

    /// Applies a partial update. Updates for unknown IDs are dropped and
    /// reported by returning `false`.
    pub fn apply_update(&mut self, id: ElementId, update: &ElementUpdate, min_size: f32) -> bool {
        match self.get_mut(id) {
            Some(element) => {
                element.apply_update(update, min_size);
                true
            }
            None => {
                debug!("Dropping update for missing element {}", id);
                false
            }
        }
    }

    fn move_to(&mut self, id: ElementId, target: impl FnOnce(usize, usize) -> usize) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let last = self.elements.len() - 1;
        let new_index = target(index, last);
        if new_index == index {
            return false;
        }
        let element = self.elements.remove(index);
        self.elements.insert(new_index, element);
        true
    }

    pub fn bring_to_front(&mut self, id: ElementId) -> bool {
        self.move_to(id, |_, last| last)
    }

    pub fn send_to_back(&mut self, id: ElementId) -> bool {
        self.move_to(id, |_, _| 0)
    }

    pub fn bring_forward(&mut self, id: ElementId) -> bool {
        self.move_to(id, |i, last| (i + 1).min(last))
    }

    pub fn send_backward(&mut self, id: ElementId) -> bool {
        self.move_to(id, |i, _| i.saturating_sub(1))
    }

    /// Aligns unlocked elements against the slide edges or center.
    pub fn align(&mut self, ids: &[ElementId], alignment: Alignment, slide_size: Vec2) {
        for element in self.elements.iter_mut().filter(|e| ids.contains(&e.id) && !e.locked) {
            let g = &mut element.geometry;
            match alignment {
                Alignment::Left => g.x = 0.0,
                Alignment::Center => g.x = (slide_size.x - g.width) / 2.0,
                Alignment::Right => g.x = slide_size.x - g.width,
                Alignment::Top => g.y = 0.0,
                Alignment::Middle => g.y = (slide_size.y - g.height) / 2.0,
                Alignment::Bottom => g.y = slide_size.y - g.height,
            }
        }
    }

    /// Moves unlocked elements by `delta`.
    pub fn nudge(&mut self, ids: &[ElementId], delta: Vec2) {
        for element in self.elements.iter_mut().filter(|e| ids.contains(&e.id) && !e.locked) {
            element.geometry.x += delta.x;
            element.geometry.y += delta.y;
        }
    }

    /// Highest reveal step used by any element on this slide
    pub fn max_step(&self) -> u32 {
        self.elements
            .iter()
            .filter_map(Element::reveal_step)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ShapeKind, MIN_ELEMENT_SIZE};

    fn slide_with(n: usize) -> (Slide, Vec<ElementId>) {
        let mut slide = Slide::new();
        let ids = (0..n)
            .map(|i| slide.add_element(Element::shape(ShapeKind::Rectangle, Pos2::new(i as f32 * 10.0, 0.0))))
            .collect();
        (slide, ids)
    }

    fn order(slide: &Slide) -> Vec<ElementId> {
        slide.elements.iter().map(|e| e.id).collect()
    }

    #[test]
    fn z_order_moves() {
        let (mut slide, ids) = slide_with(3);
        assert!(slide.bring_to_front(ids[0]));
        assert_eq!(order(&slide), vec![ids[1], ids[2], ids[0]]);
        assert!(slide.send_backward(ids[0]));
        assert_eq!(order(&slide), vec![ids[1], ids[0], ids[2]]);
        assert!(slide.send_to_back(ids[0]));
        assert_eq!(order(&slide), vec![ids[0], ids[1], ids[2]]);
        assert!(!slide.send_to_back(ids[0]));
        assert!(slide.bring_forward(ids[0]));
        assert_eq!(order(&slide), vec![ids[1], ids[0], ids[2]]);
    }

    #[test]
    fn duplicate_appends_copies_on_top() {
        let (mut slide, ids) = slide_with(2);
        let copies = slide.duplicate_elements(&ids, Vec2::splat(20.0));
        assert_eq!(copies.len(), 2);
        assert_eq!(slide.elements.len(), 4);
        assert_eq!(slide.elements[2].id, copies[0]);
        assert_eq!(slide.elements[2].geometry.x, 20.0);
        assert_eq!(slide.elements[3].geometry.y, 20.0);
    }

    #[test]
    fn update_for_missing_element_is_dropped() {
        let (mut slide, _) = slide_with(1);
        let before = slide.clone();
        assert!(!slide.apply_update(ElementId::new(), &ElementUpdate::rotation(45.0), MIN_ELEMENT_SIZE));
        assert_eq!(slide, before);
    }

    #[test]
    fn align_skips_locked() {
        let (mut slide, ids) = slide_with(2);
        slide.get_mut(ids[1]).unwrap().locked = true;
        slide.align(&ids, Alignment::Right, Vec2::new(960.0, 540.0));
        assert_eq!(slide.get(ids[0]).unwrap().geometry.x, 760.0);
        assert_eq!(slide.get(ids[1]).unwrap().geometry.x, 10.0);
        slide.align(&ids, Alignment::Middle, Vec2::new(960.0, 540.0));
        assert_eq!(slide.get(ids[0]).unwrap().geometry.y, 170.0);
    }

    #[test]
    fn element_at_prefers_top_most() {
        let (slide, ids) = slide_with(2);
        let hit = slide.element_at(Pos2::new(50.0, 50.0), 0.0).unwrap();
        assert_eq!(hit.id, ids[1]);
        assert!(slide.element_at(Pos2::new(500.0, 500.0), 0.0).is_none());
    }

    #[test]
    fn remove_reports_count() {
        let (mut slide, ids) = slide_with(3);
        assert_eq!(slide.remove_elements(&[ids[0], ids[2], ElementId::new()]), 2);
        assert_eq!(order(&slide), vec![ids[1]]);
    }
}
