//! The canvas controller: routes pointer input through the gesture state
//! machine and reports results to the owner of the slide.
//!
//! The controller never touches the element list itself. Geometry changes,
//! selection changes and context-menu requests all go through
//! [`CanvasHost`], which the owner implements.

use egui::{Modifiers, PointerButton, Pos2, Rect};
use log::{debug, info};

use crate::config::CanvasConfig;
use crate::element::{EditTarget, Element, ElementKind, ElementUpdate};
use crate::gesture::{snapshot_of, GestureEnd, GestureParams, GestureState, HandleKind, SnapshotEntry};
use crate::id_generator::ElementId;
use crate::selection::{SelectRequest, Selection};
use crate::slide::Slide;
use crate::snap::Guide;
use crate::surface::{hit_test, HitTarget, PointerSource, ViewportTransform};

/// What a context menu was requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextTarget {
    Element { id: ElementId, kind: &'static str },
    Slide,
    Canvas,
}

/// Callbacks into whoever owns the slide
pub trait CanvasHost {
    /// Merge a partial update into an element. Unknown IDs must be ignored.
    fn update_element(&mut self, id: ElementId, update: ElementUpdate);

    fn select(&mut self, request: SelectRequest, multi: bool);

    /// `at` is in slide space
    fn request_context_menu(&mut self, at: Pos2, target: ContextTarget);
}

/// Shift, ctrl and cmd all extend the selection
pub fn is_multi_modifier(modifiers: &Modifiers) -> bool {
    modifiers.shift || modifiers.ctrl || modifiers.command || modifiers.mac_cmd
}

#[derive(Debug, Clone)]
pub struct CanvasController {
    state: GestureState,
    transform: ViewportTransform,
    read_only: bool,
    config: CanvasConfig,
    guides: Vec<Guide>,
    editing: Option<EditTarget>,
}

impl CanvasController {
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            state: GestureState::None,
            transform: ViewportTransform::default(),
            read_only: false,
            config,
            guides: Vec::new(),
            editing: None,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CanvasConfig) {
        self.config = config;
    }

    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    /// Called by the owner every frame with the measured surface position
    pub fn set_viewport(&mut self, transform: ViewportTransform) {
        self.transform = transform;
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Entering read-only mode drops any gesture and text editing in progress.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        if read_only {
            self.state = GestureState::None;
            self.guides.clear();
            self.editing = None;
        }
    }

    /// Guides active during the current move
    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn marquee(&self) -> Option<Rect> {
        self.state.marquee()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    /// Text element or table cell currently edited in place
    pub fn editing(&self) -> Option<EditTarget> {
        self.editing
    }

    pub fn stop_editing(&mut self) {
        self.editing = None;
    }

    fn params(&self) -> GestureParams {
        GestureParams::from_config(&self.config)
    }

    /// Handles a pointer press and possibly starts a gesture.
    pub fn pointer_down(
        &mut self,
        host: &mut impl CanvasHost,
        source: &PointerSource,
        button: PointerButton,
        modifiers: &Modifiers,
        elements: &[Element],
        selection: &Selection,
    ) {
        if self.read_only || !self.state.is_none() {
            return;
        }
        let point = source.to_slide_space(&self.transform);
        let target = hit_test(point, elements, selection, &self.config);

        if button == PointerButton::Secondary {
            self.request_context_menu(host, point, target, elements);
            return;
        }
        if button != PointerButton::Primary {
            return;
        }

        match target {
            HitTarget::Handle { id, handle } => {
                let Some(element) = elements.iter().find(|e| e.id == id) else {
                    return;
                };
                let entry = SnapshotEntry::of(element);
                self.state = match handle {
                    HandleKind::Resize(h) => GestureState::start_resize(point, h, entry),
                    HandleKind::Rotate => GestureState::start_rotate(point, entry),
                };
                debug!("Started {} on {} via handle {:?}", self.state.name(), id, handle);
            }
            HitTarget::Element(id) => self.press_element(host, point, id, modifiers, elements, selection),
            HitTarget::Background => {
                if self.editing.take().is_some() {
                    debug!("Stopped text editing");
                }
                host.select(SelectRequest::None, false);
                if self.config.marquee_enabled {
                    self.state = GestureState::start_marquee(point);
                }
            }
        }
    }

    fn press_element(
        &mut self,
        host: &mut impl CanvasHost,
        point: Pos2,
        id: ElementId,
        modifiers: &Modifiers,
        elements: &[Element],
        selection: &Selection,
    ) {
        let Some(element) = elements.iter().find(|e| e.id == id) else {
            return;
        };
        if self.editing.is_some_and(|editing| editing.id != id) {
            self.editing = None;
        }
        if element.locked {
            // Locked elements can still be picked so they can be unlocked,
            // but they never start a drag.
            if !selection.contains(id) {
                host.select(SelectRequest::One(id), false);
            }
            debug!("Refused drag on locked element {}", id);
            return;
        }

        let multi = is_multi_modifier(modifiers);
        let already_selected = selection.contains(id);
        if !already_selected {
            host.select(SelectRequest::One(id), multi);
        }

        let drag_ids: Vec<ElementId> = if already_selected {
            selection.ids().to_vec()
        } else if multi {
            let mut ids = selection.ids().to_vec();
            ids.push(id);
            ids
        } else {
            vec![id]
        };
        self.state = GestureState::start_move(point, snapshot_of(elements, &drag_ids));
        debug!("Started {} with {} element(s)", self.state.name(), self.state.affected_ids().len());
    }

    fn request_context_menu(
        &mut self,
        host: &mut impl CanvasHost,
        point: Pos2,
        target: HitTarget,
        elements: &[Element],
    ) {
        let id = match target {
            HitTarget::Handle { id, .. } | HitTarget::Element(id) => id,
            HitTarget::Background => {
                host.request_context_menu(point, ContextTarget::Slide);
                return;
            }
        };
        if let Some(element) = elements.iter().find(|e| e.id == id) {
            host.select(SelectRequest::One(id), false);
            host.request_context_menu(
                point,
                ContextTarget::Element {
                    id,
                    kind: element.kind_name(),
                },
            );
        }
    }

    /// Context menu for the area around the slide
    pub fn canvas_context_menu(&mut self, host: &mut impl CanvasHost, source: &PointerSource) {
        if self.read_only || !self.state.is_none() {
            return;
        }
        let point = source.to_slide_space(&self.transform);
        host.request_context_menu(point, ContextTarget::Canvas);
    }

    /// A touch held in place opens the context menu, like a secondary click.
    /// The move that the initial press started is dropped.
    pub fn long_press(
        &mut self,
        host: &mut impl CanvasHost,
        source: &PointerSource,
        elements: &[Element],
        selection: &Selection,
    ) {
        if self.read_only {
            return;
        }
        if !self.state.is_none() {
            self.cancel(host);
        }
        let point = source.to_slide_space(&self.transform);
        let target = hit_test(point, elements, selection, &self.config);
        debug!("Long press at {:?} on {:?}", point, target);
        self.request_context_menu(host, point, target, elements);
    }

    /// Feeds a pointer move, wherever the pointer is.
    pub fn pointer_move(&mut self, host: &mut impl CanvasHost, source: &PointerSource) {
        if self.state.is_none() {
            return;
        }
        let point = source.to_slide_space(&self.transform);
        let state = std::mem::take(&mut self.state);
        let (state, frame) = state.apply_pointer(point, &self.params());
        self.state = state;
        self.guides = frame.guides;
        for (id, update) in frame.updates {
            host.update_element(id, update);
        }
    }

    /// Ends the gesture. Returns `true` if one was active, so the owner can
    /// record an undo snapshot.
    pub fn pointer_up(
        &mut self,
        host: &mut impl CanvasHost,
        source: Option<&PointerSource>,
        elements: &[Element],
    ) -> bool {
        if self.state.is_none() {
            return false;
        }
        // The release position still counts for a marquee
        let marquee = matches!(self.state, GestureState::MarqueeSelecting { .. });
        if let Some(source) = source.filter(|_| marquee) {
            let point = source.to_slide_space(&self.transform);
            let state = std::mem::take(&mut self.state);
            self.state = state.apply_pointer(point, &self.params()).0;
        }
        let state = std::mem::take(&mut self.state);
        let was_dragging = state.is_dragging();
        self.guides.clear();
        if let GestureEnd::Select(ids) = state.finish(elements) {
            info!("Marquee selected {} element(s)", ids.len());
            host.select(SelectRequest::Many(ids), false);
        }
        was_dragging
    }

    /// Aborts the gesture and restores the geometry captured at its start.
    pub fn cancel(&mut self, host: &mut impl CanvasHost) {
        let state = std::mem::take(&mut self.state);
        self.guides.clear();
        for (id, update) in state.cancel() {
            host.update_element(id, update);
        }
    }

    /// Double-clicking a text element, or a table cell, starts in-place
    /// editing.
    pub fn double_click(&mut self, source: &PointerSource, slide: &Slide) -> Option<EditTarget> {
        if self.read_only {
            return None;
        }
        let point = source.to_slide_space(&self.transform);
        let element = slide.element_at(point, self.config.handle_radius)?;
        if element.locked {
            return None;
        }
        let target = match &element.kind {
            ElementKind::Text { .. } => EditTarget::text(element.id),
            ElementKind::Table { data, .. } => {
                let local = element.geometry.to_local(point);
                let (row, col) = data.cell_at(element.rect(), local)?;
                EditTarget::cell(element.id, row, col)
            }
            _ => return None,
        };
        debug!("Editing {:?}", target);
        self.editing = Some(target);
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Geometry, ShapeKind};

    #[derive(Default)]
    struct RecordingHost {
        updates: Vec<(ElementId, ElementUpdate)>,
        selects: Vec<(SelectRequest, bool)>,
        menus: Vec<(Pos2, ContextTarget)>,
    }

    impl CanvasHost for RecordingHost {
        fn update_element(&mut self, id: ElementId, update: ElementUpdate) {
            self.updates.push((id, update));
        }

        fn select(&mut self, request: SelectRequest, multi: bool) {
            self.selects.push((request, multi));
        }

        fn request_context_menu(&mut self, at: Pos2, target: ContextTarget) {
            self.menus.push((at, target));
        }
    }

    fn controller() -> CanvasController {
        let mut c = CanvasController::new(CanvasConfig::default());
        c.set_viewport(ViewportTransform::new(Pos2::ZERO, 1.0));
        c
    }

    fn rect_at(x: f32, y: f32) -> Element {
        Element::shape(ShapeKind::Rectangle, Pos2::ZERO).with_geometry(Geometry::new(x, y, 50.0, 50.0))
    }

    fn mouse(x: f32, y: f32) -> PointerSource {
        PointerSource::Mouse(Pos2::new(x, y))
    }

    #[test]
    fn press_selects_and_moves() {
        let elements = vec![rect_at(100.0, 100.0)];
        let id = elements[0].id;
        let mut host = RecordingHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &mouse(120.0, 120.0), PointerButton::Primary, &Modifiers::NONE, &elements, &Selection::new());
        assert_eq!(host.selects, vec![(SelectRequest::One(id), false)]);
        assert!(c.is_dragging());

        c.pointer_move(&mut host, &mouse(150.0, 130.0));
        assert_eq!(host.updates, vec![(id, ElementUpdate::position(Pos2::new(130.0, 110.0)))]);
        assert!(c.pointer_up(&mut host, None, &elements));
        assert!(c.state().is_none());
    }

    #[test]
    fn read_only_ignores_presses() {
        let elements = vec![rect_at(100.0, 100.0)];
        let mut host = RecordingHost::default();
        let mut c = controller();
        c.set_read_only(true);
        c.pointer_down(&mut host, &mouse(120.0, 120.0), PointerButton::Primary, &Modifiers::NONE, &elements, &Selection::new());
        c.pointer_down(&mut host, &mouse(120.0, 120.0), PointerButton::Secondary, &Modifiers::NONE, &elements, &Selection::new());
        assert!(c.state().is_none());
        assert!(host.selects.is_empty());
        assert!(host.menus.is_empty());
    }

    #[test]
    fn background_press_clears_and_marquee_selects() {
        let elements = vec![rect_at(10.0, 10.0), rect_at(300.0, 300.0)];
        let mut host = RecordingHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &mouse(0.0, 0.0), PointerButton::Primary, &Modifiers::NONE, &elements, &Selection::new());
        assert_eq!(host.selects, vec![(SelectRequest::None, false)]);
        c.pointer_move(&mut host, &mouse(20.0, 20.0));
        assert!(c.marquee().is_some());
        assert!(!c.pointer_up(&mut host, Some(&mouse(30.0, 30.0)), &elements));
        assert_eq!(host.selects[1], (SelectRequest::Many(vec![elements[0].id]), false));
    }

    #[test]
    fn secondary_click_requests_menu_without_drag() {
        let elements = vec![rect_at(100.0, 100.0).with_locked(true)];
        let id = elements[0].id;
        let mut host = RecordingHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &mouse(110.0, 110.0), PointerButton::Secondary, &Modifiers::NONE, &elements, &Selection::new());
        assert!(c.state().is_none());
        assert_eq!(host.menus, vec![(Pos2::new(110.0, 110.0), ContextTarget::Element { id, kind: "rectangle" })]);

        c.pointer_down(&mut host, &mouse(600.0, 400.0), PointerButton::Secondary, &Modifiers::NONE, &elements, &Selection::new());
        assert_eq!(host.menus[1].1, ContextTarget::Slide);
    }

    #[test]
    fn multi_press_drags_whole_selection() {
        let elements = vec![rect_at(0.0, 200.0), rect_at(200.0, 200.0)];
        let mut selection = Selection::new();
        selection.apply(&SelectRequest::One(elements[0].id), false);
        let mut host = RecordingHost::default();
        let mut c = controller();
        let shift = Modifiers { shift: true, ..Modifiers::NONE };
        c.pointer_down(&mut host, &mouse(210.0, 210.0), PointerButton::Primary, &shift, &elements, &selection);
        assert_eq!(host.selects, vec![(SelectRequest::One(elements[1].id), true)]);
        assert_eq!(c.state().affected_ids(), vec![elements[0].id, elements[1].id]);
    }

    #[test]
    fn escape_cancel_restores_start() {
        let elements = vec![rect_at(100.0, 100.0)];
        let id = elements[0].id;
        let mut host = RecordingHost::default();
        let mut c = controller();
        c.pointer_down(&mut host, &mouse(120.0, 120.0), PointerButton::Primary, &Modifiers::NONE, &elements, &Selection::new());
        c.pointer_move(&mut host, &mouse(300.0, 300.0));
        c.cancel(&mut host);
        assert_eq!(host.updates.last(), Some(&(id, ElementUpdate::position(Pos2::new(100.0, 100.0)))));
        assert!(c.state().is_none());
        assert!(c.guides().is_empty());
    }

    #[test]
    fn double_click_edits_text_and_table_cells() {
        let mut slide = Slide::new();
        let text = slide.add_element(Element::text("hi", Pos2::new(0.0, 0.0)));
        slide.add_element(rect_at(500.0, 300.0));
        let mut table = Element::table(2, 4, Pos2::ZERO).with_geometry(Geometry::new(0.0, 200.0, 400.0, 100.0));
        table.geometry.rotation = 90.0;
        let table = slide.add_element(table);
        let mut c = controller();
        assert_eq!(c.double_click(&mouse(10.0, 10.0), &slide), Some(EditTarget::text(text)));
        assert_eq!(c.editing(), Some(EditTarget::text(text)));
        assert_eq!(c.double_click(&mouse(510.0, 310.0), &slide), None);

        // Rotated a quarter turn about (200, 250): slide (210, 100) is local (50, 240)
        assert_eq!(c.double_click(&mouse(210.0, 100.0), &slide), Some(EditTarget::cell(table, 0, 0)));
        // The top-most element wins where the table covers the text
        assert_eq!(c.double_click(&mouse(190.0, 60.0), &slide), Some(EditTarget::cell(table, 1, 0)));
    }

    #[test]
    fn locked_elements_are_not_edited() {
        let mut slide = Slide::new();
        slide.add_element(Element::text("hi", Pos2::ZERO).with_locked(true));
        let mut c = controller();
        assert_eq!(c.double_click(&mouse(10.0, 10.0), &slide), None);
        assert_eq!(c.editing(), None);
    }

    #[test]
    fn long_press_opens_menu_and_drops_the_move() {
        let elements = vec![rect_at(100.0, 100.0)];
        let id = elements[0].id;
        let mut host = RecordingHost::default();
        let mut c = controller();
        let touch = PointerSource::Touch(vec![Pos2::new(120.0, 120.0)]);
        c.pointer_down(&mut host, &touch, PointerButton::Primary, &Modifiers::NONE, &elements, &Selection::new());
        assert!(c.is_dragging());

        c.long_press(&mut host, &touch, &elements, &Selection::new());
        assert!(c.state().is_none());
        assert_eq!(host.menus, vec![(Pos2::new(120.0, 120.0), ContextTarget::Element { id, kind: "rectangle" })]);
        // The cancelled move restored the start geometry
        assert_eq!(host.updates, vec![(id, ElementUpdate::position(Pos2::new(100.0, 100.0)))]);
        // Lifting the finger afterwards ends nothing
        assert!(!c.pointer_up(&mut host, Some(&touch), &elements));

        c.long_press(&mut host, &PointerSource::Touch(vec![Pos2::new(700.0, 500.0)]), &elements, &Selection::new());
        assert_eq!(host.menus[1].1, ContextTarget::Slide);
    }

    #[test]
    fn long_press_is_ignored_when_read_only() {
        let elements = vec![rect_at(100.0, 100.0)];
        let mut host = RecordingHost::default();
        let mut c = controller();
        c.set_read_only(true);
        c.long_press(&mut host, &mouse(120.0, 120.0), &elements, &Selection::new());
        assert!(host.menus.is_empty());
    }
}
