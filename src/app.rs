use egui::{Color32, FontId, Key, PointerButton, Pos2, Rect, Vec2};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasController, CanvasHost, ContextTarget};
use crate::clipboard;
use crate::config::CanvasConfig;
use crate::document::Document;
use crate::element::{
    EditTarget, Element, ElementKind, ElementUpdate, ImageSource, ShapeKind, DEFAULT_POSITION,
};
use crate::file_handler::FileHandler;
use crate::history::SnapshotHistory;
use crate::id_generator::ElementId;
use crate::input::{shortcut_action, EditorAction, InputEvent, InputHandler, LONG_PRESS_SECONDS};
use crate::inspector::{style_controls, StyleEdit};
use crate::presentation::Presentation;
use crate::render::{
    paint_background, paint_guides, paint_marquee, paint_node, scene, SceneState, TextureCache,
};
use crate::selection::{SelectRequest, Selection};
use crate::slide::{Alignment, Slide};
use crate::surface::{PointerSource, ViewportTransform};

const SAMPLE_PATH: &str = "M0 100 C50 0 150 200 200 100";

const SHAPES: [ShapeKind; 8] = [
    ShapeKind::Rectangle,
    ShapeKind::Circle,
    ShapeKind::Triangle,
    ShapeKind::Star,
    ShapeKind::Diamond,
    ShapeKind::Hexagon,
    ShapeKind::Arrow,
    ShapeKind::Bubble,
];

/// What survives a restart
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct SavedState {
    config: CanvasConfig,
    document: Document,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ContextMenu {
    /// Slide space
    at: Pos2,
    target: ContextTarget,
}

/// Controller callbacks, applied after the controller call returns so the
/// slide is not borrowed twice.
#[derive(Debug, Default)]
struct CanvasEffects {
    updates: Vec<(ElementId, ElementUpdate)>,
    selects: Vec<(SelectRequest, bool)>,
    menu: Option<ContextMenu>,
}

impl CanvasHost for CanvasEffects {
    fn update_element(&mut self, id: ElementId, update: ElementUpdate) {
        self.updates.push((id, update));
    }

    fn select(&mut self, request: SelectRequest, multi: bool) {
        self.selects.push((request, multi));
    }

    fn request_context_menu(&mut self, at: Pos2, target: ContextTarget) {
        self.menu = Some(ContextMenu { at, target });
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MenuCommand {
    Duplicate,
    Delete,
    ToggleLock,
    BringToFront,
    SendToBack,
    AddText(Pos2),
    SelectAll,
    AddSlide,
}

/// The slide editor shell: toolbar, slide list, inspector and the canvas.
pub struct SlideEditorApp {
    config: CanvasConfig,
    document: Document,
    selection: Selection,
    history: SnapshotHistory<Vec<Slide>>,
    controller: CanvasController,
    textures: TextureCache,
    input: InputHandler,
    files: FileHandler,
    zoom: f32,
    presentation: Option<Presentation>,
    context_menu: Option<ContextMenu>,
    edit_buffer: String,
    edit_needs_focus: bool,
    /// Inspector edits not yet recorded in history
    inspector_dirty: bool,
}

impl Default for SlideEditorApp {
    fn default() -> Self {
        Self::with_state(CanvasConfig::default(), Document::default())
    }
}

impl SlideEditorApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let saved: SavedState = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        info!(
            "Loaded document with {} slide(s)",
            saved.document.slides().len()
        );
        Self::with_state(saved.config, saved.document)
    }

    /// The document's slide size wins over the configured one.
    pub fn with_state(mut config: CanvasConfig, document: Document) -> Self {
        config.slide_width = document.width;
        config.slide_height = document.height;
        Self {
            selection: Selection::new(),
            history: SnapshotHistory::new(document.slides().to_vec(), config.history_limit),
            controller: CanvasController::new(config.clone()),
            textures: TextureCache::new(config.texture_cache_frames),
            input: InputHandler::default(),
            files: FileHandler::new(),
            zoom: config.initial_zoom,
            presentation: None,
            context_menu: None,
            edit_buffer: String::new(),
            edit_needs_focus: false,
            inspector_dirty: false,
            config,
            document,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &SnapshotHistory<Vec<Slide>> {
        &self.history
    }

    pub fn controller(&self) -> &CanvasController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CanvasController {
        &mut self.controller
    }

    fn slide(&self) -> &Slide {
        self.document.current_slide()
    }

    /// Records the slides as an undo step if anything changed, and drops
    /// selected IDs that no longer exist.
    fn commit(&mut self) {
        self.inspector_dirty = false;
        if self.history.current().as_slice() != self.document.slides() {
            self.history.push(self.document.slides().to_vec());
            debug!("History now holds {} snapshot(s)", self.history.len());
        }
        if self.selection.prune(&self.document.current_slide().elements) {
            debug!("Pruned stale IDs from the selection");
        }
    }

    fn apply_effects(&mut self, effects: CanvasEffects) {
        let min_size = self.config.min_element_size;
        let slide = self.document.current_slide_mut();
        for (id, update) in &effects.updates {
            slide.apply_update(*id, update, min_size);
        }
        for (request, multi) in &effects.selects {
            self.selection.apply(request, *multi);
        }
        if let Some(menu) = effects.menu {
            self.context_menu = Some(menu);
        }
    }

    /// Adds an element on top of the current slide and selects it.
    pub fn add_element(&mut self, element: Element) -> ElementId {
        let kind = element.kind_name();
        let id = self.document.current_slide_mut().add_element(element);
        self.selection.apply(&SelectRequest::One(id), false);
        self.commit();
        info!("Added {} element {}", kind, id);
        id
    }

    fn unlocked_selection(&self) -> Vec<ElementId> {
        let slide = self.slide();
        self.selection
            .ids()
            .iter()
            .copied()
            .filter(|id| slide.get(*id).is_some_and(|e| !e.locked))
            .collect()
    }

    /// Deletes the selected elements. Locked elements stay.
    pub fn delete_selection(&mut self) -> usize {
        let ids = self.unlocked_selection();
        let removed = self.document.current_slide_mut().remove_elements(&ids);
        for id in &ids {
            self.textures.invalidate_element(*id);
        }
        if self.controller.editing().is_some_and(|target| ids.contains(&target.id)) {
            self.controller.stop_editing();
        }
        self.commit();
        removed
    }

    /// Duplicates the selection and selects the copies.
    pub fn duplicate_selection(&mut self) -> Vec<ElementId> {
        let ids = self.selection.ids().to_vec();
        let offset = self.config.duplicate_offset;
        let copies = self.document.current_slide_mut().duplicate_elements(&ids, offset);
        if !copies.is_empty() {
            self.selection.apply(&SelectRequest::Many(copies.clone()), false);
            self.commit();
        }
        copies
    }

    pub fn undo(&mut self) {
        let slides = match self.history.undo() {
            Ok(slides) => slides.clone(),
            Err(err) => {
                debug!("{}", err);
                return;
            }
        };
        self.restore(slides);
    }

    pub fn redo(&mut self) {
        let slides = match self.history.redo() {
            Ok(slides) => slides.clone(),
            Err(err) => {
                debug!("{}", err);
                return;
            }
        };
        self.restore(slides);
    }

    fn restore(&mut self, slides: Vec<Slide>) {
        let mut effects = CanvasEffects::default();
        self.controller.cancel(&mut effects);
        self.controller.stop_editing();
        self.document.replace_slides(slides);
        self.selection.prune(&self.document.current_slide().elements);
    }

    /// Serializes the selection, if any
    pub fn copy_selection(&self) -> Option<String> {
        let slide = self.slide();
        let elements: Vec<Element> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| slide.get(*id).cloned())
            .collect();
        match clipboard::copy(&elements) {
            Ok(text) => Some(text),
            Err(err) => {
                debug!("Copy skipped: {}", err);
                None
            }
        }
    }

    /// Pastes clipboard text as new elements and selects them.
    pub fn paste_text(&mut self, text: &str) -> Vec<ElementId> {
        let elements = match clipboard::paste(text, self.config.duplicate_offset) {
            Ok(elements) => elements,
            Err(err) => {
                warn!("Paste failed: {}", err);
                return Vec::new();
            }
        };
        let slide = self.document.current_slide_mut();
        let ids: Vec<ElementId> = elements.into_iter().map(|e| slide.add_element(e)).collect();
        self.selection.apply(&SelectRequest::Many(ids.clone()), false);
        self.commit();
        info!("Pasted {} element(s)", ids.len());
        ids
    }

    fn nudge_selection(&mut self, dx: f32, dy: f32, large: bool) {
        let step = if large {
            self.config.nudge_step_large
        } else {
            self.config.nudge_step
        };
        let ids = self.selection.ids().to_vec();
        self.document
            .current_slide_mut()
            .nudge(&ids, Vec2::new(dx, dy) * step);
        self.commit();
    }

    fn reorder(&mut self, op: fn(&mut Slide, ElementId) -> bool) {
        let Some(id) = self.selection.single() else {
            return;
        };
        if op(self.document.current_slide_mut(), id) {
            self.commit();
        }
    }

    fn align_selection(&mut self, alignment: Alignment) {
        let ids = self.selection.ids().to_vec();
        let size = self.document.size();
        self.document.current_slide_mut().align(&ids, alignment, size);
        self.commit();
    }

    /// Applies style edits to every unlocked selected element the edit's
    /// section covers. Returns how many elements changed.
    fn restyle_selection(&mut self, edits: &[StyleEdit]) -> usize {
        if edits.is_empty() {
            return 0;
        }
        let ids = self.unlocked_selection();
        let min_size = self.config.min_element_size;
        let slide = self.document.current_slide_mut();
        let mut restyled = 0;
        for id in ids {
            let Some(element) = slide.get(id) else {
                continue;
            };
            let update = edits
                .iter()
                .filter(|(section, _)| section.covers(element))
                .fold(ElementUpdate::default(), |update, (_, change)| update.with_style(change.clone()));
            if !update.is_empty() {
                slide.apply_update(id, &update, min_size);
                restyled += 1;
            }
        }
        debug!("Restyled {} element(s)", restyled);
        restyled
    }

    fn set_locked(&mut self, locked: bool) {
        let min_size = self.config.min_element_size;
        let ids = self.selection.ids().to_vec();
        let slide = self.document.current_slide_mut();
        for id in ids {
            slide.apply_update(id, &ElementUpdate::locked(locked), min_size);
        }
        self.commit();
    }

    fn toggle_lock(&mut self) {
        let min_size = self.config.min_element_size;
        let ids = self.selection.ids().to_vec();
        let slide = self.document.current_slide_mut();
        for id in ids {
            if let Some(locked) = slide.get(id).map(|e| e.locked) {
                slide.apply_update(id, &ElementUpdate::locked(!locked), min_size);
            }
        }
        self.commit();
    }

    fn select_all(&mut self) {
        let ids = self.slide().elements.iter().map(|e| e.id).collect();
        self.selection.apply(&SelectRequest::Many(ids), false);
    }

    fn switch_slide(&mut self, index: usize) {
        if let Err(err) = self.document.select_slide(index) {
            warn!("{}", err);
            return;
        }
        let mut effects = CanvasEffects::default();
        self.controller.cancel(&mut effects);
        self.controller.stop_editing();
        self.selection.clear();
        self.context_menu = None;
    }

    pub fn add_slide(&mut self) -> usize {
        let index = self.document.add_slide();
        self.switch_slide(index);
        self.commit();
        index
    }

    pub fn delete_current_slide(&mut self) {
        let index = self.document.current_index();
        match self.document.delete_slide(index) {
            Ok(slide) => {
                for element in &slide.elements {
                    self.textures.invalidate_element(element.id);
                }
                self.selection.clear();
                self.controller.stop_editing();
                self.commit();
            }
            Err(err) => warn!("{}", err),
        }
    }

    fn run_action(&mut self, action: EditorAction) {
        match action {
            EditorAction::Delete => {
                self.delete_selection();
            }
            EditorAction::Duplicate => {
                self.duplicate_selection();
            }
            EditorAction::Undo => self.undo(),
            EditorAction::Redo => self.redo(),
            EditorAction::SelectAll => self.select_all(),
            EditorAction::Nudge { dx, dy, large } => self.nudge_selection(dx, dy, large),
            EditorAction::Cancel => {
                let mut effects = CanvasEffects::default();
                self.controller.cancel(&mut effects);
                self.apply_effects(effects);
                self.context_menu = None;
            }
        }
    }

    fn run_menu_command(&mut self, command: MenuCommand) {
        match command {
            MenuCommand::Duplicate => {
                self.duplicate_selection();
            }
            MenuCommand::Delete => {
                self.delete_selection();
            }
            MenuCommand::ToggleLock => self.toggle_lock(),
            MenuCommand::BringToFront => self.reorder(Slide::bring_to_front),
            MenuCommand::SendToBack => self.reorder(Slide::send_to_back),
            MenuCommand::AddText(at) => {
                self.add_element(Element::text("Double-click to edit", at));
            }
            MenuCommand::SelectAll => self.select_all(),
            MenuCommand::AddSlide => {
                self.add_slide();
            }
        }
    }

    /// Routes one frame of input. `canvas_hovered` is false while the
    /// pointer is over something drawn on top of the canvas.
    pub fn handle_events(&mut self, ctx: &egui::Context, events: Vec<InputEvent>, canvas_hovered: bool) {
        let keyboard_busy = ctx.wants_keyboard_input();
        let editing_before = self.controller.editing();
        let slide_rect = Rect::from_min_size(Pos2::ZERO, self.document.size());

        for event in events {
            let mut effects = CanvasEffects::default();
            let mut gesture_ended = false;
            match event {
                InputEvent::PointerDown { .. } | InputEvent::LongPress { .. }
                    if !event.is_in_canvas() || !canvas_hovered => {}
                InputEvent::PointerDown {
                    source,
                    button,
                    modifiers,
                    ..
                } => {
                    self.context_menu = None;
                    let point = source.to_slide_space(self.controller.transform());
                    if button == PointerButton::Secondary && !slide_rect.contains(point) {
                        self.controller.canvas_context_menu(&mut effects, &source);
                    } else {
                        self.controller.pointer_down(
                            &mut effects,
                            &source,
                            button,
                            &modifiers,
                            &self.document.current_slide().elements,
                            &self.selection,
                        );
                    }
                }
                InputEvent::LongPress { source, .. } => {
                    self.controller.long_press(
                        &mut effects,
                        &source,
                        &self.document.current_slide().elements,
                        &self.selection,
                    );
                }
                InputEvent::PointerMove { source, .. } => {
                    self.controller.pointer_move(&mut effects, &source);
                }
                InputEvent::PointerUp { source, .. } => {
                    gesture_ended = self.controller.pointer_up(
                        &mut effects,
                        Some(&source),
                        &self.document.current_slide().elements,
                    );
                }
                InputEvent::PointerLeave => {
                    gesture_ended = self.controller.pointer_up(
                        &mut effects,
                        None,
                        &self.document.current_slide().elements,
                    );
                }
                InputEvent::KeyDown { .. } | InputEvent::Copy | InputEvent::Cut | InputEvent::Paste(_)
                    if keyboard_busy => {}
                InputEvent::KeyDown { key, modifiers } => {
                    if let Some(action) = shortcut_action(key, &modifiers) {
                        self.run_action(action);
                    }
                }
                InputEvent::Copy => {
                    if let Some(text) = self.copy_selection() {
                        ctx.copy_text(text);
                    }
                }
                InputEvent::Cut => {
                    if let Some(text) = self.copy_selection() {
                        ctx.copy_text(text);
                        self.delete_selection();
                    }
                }
                InputEvent::Paste(text) => {
                    self.paste_text(&text);
                }
            }
            self.apply_effects(effects);
            if gesture_ended {
                self.commit();
            }
        }

        if editing_before.is_some() && self.controller.editing() != editing_before {
            self.commit();
        }
    }

    fn begin_text_edit(&mut self, target: EditTarget) {
        let Some(text) = self.slide().get(target.id).and_then(|e| e.editable_text(target.cell)) else {
            return;
        };
        self.edit_buffer = text.to_owned();
        self.edit_needs_focus = true;
        debug!("Editing text of {:?}", target);
    }

    /// Starts in-place editing of whatever text is under a double-click
    fn edit_at(&mut self, source: &PointerSource) -> Option<EditTarget> {
        let target = self.controller.double_click(source, self.document.current_slide())?;
        self.begin_text_edit(target);
        Some(target)
    }

    /// Writes the edit buffer back to the element or cell being edited
    fn apply_edit_buffer(&mut self) {
        let Some(target) = self.controller.editing() else {
            return;
        };
        let update = ElementUpdate::content(target.content_change(&self.edit_buffer));
        let min_size = self.config.min_element_size;
        self.document.current_slide_mut().apply_update(target.id, &update, min_size);
    }

    fn finish_text_edit(&mut self) {
        self.controller.stop_editing();
        self.commit();
    }

    fn start_presentation(&mut self) {
        self.controller.set_read_only(true);
        self.context_menu = None;
        self.presentation = Some(Presentation::for_slide(self.slide()));
        info!("Presenting from slide {}", self.document.current_index() + 1);
    }

    fn stop_presentation(&mut self) {
        self.controller.set_read_only(false);
        self.presentation = None;
    }

    /// Steps through reveals, moving to the neighbouring slide at either end.
    fn step_presentation(&mut self, forward: bool) {
        let Some(presentation) = self.presentation.as_mut() else {
            return;
        };
        let moved = if forward {
            presentation.advance()
        } else {
            presentation.retreat()
        };
        if moved {
            return;
        }
        let index = self.document.current_index();
        let target = if forward {
            index + 1
        } else {
            let Some(previous) = index.checked_sub(1) else {
                return;
            };
            previous
        };
        if self.document.select_slide(target).is_ok() {
            let mut next = Presentation::for_slide(self.slide());
            if !forward {
                next.current_step = next.max_step;
            }
            self.presentation = Some(next);
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Insert", |ui| {
                    if ui.button("Text").clicked() {
                        self.add_element(Element::text("Double-click to edit", DEFAULT_POSITION));
                        ui.close_menu();
                    }
                    ui.separator();
                    for shape in SHAPES {
                        if ui.button(shape.name()).clicked() {
                            self.add_element(Element::shape(shape, DEFAULT_POSITION));
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    if ui.button("Image").clicked() {
                        self.add_element(Element::image(ImageSource::Placeholder, DEFAULT_POSITION));
                        ui.close_menu();
                    }
                    if ui.button("Table").clicked() {
                        self.add_element(Element::table(3, 3, DEFAULT_POSITION));
                        ui.close_menu();
                    }
                    if ui.button("Path").clicked() {
                        self.add_element(Element::path(SAMPLE_PATH, DEFAULT_POSITION));
                        ui.close_menu();
                    }
                });

                ui.separator();
                if ui.add_enabled(self.history.can_undo(), egui::Button::new("Undo")).clicked() {
                    self.undo();
                }
                if ui.add_enabled(self.history.can_redo(), egui::Button::new("Redo")).clicked() {
                    self.redo();
                }

                ui.separator();
                let has_selection = !self.selection.is_empty();
                if ui.add_enabled(has_selection, egui::Button::new("Duplicate")).clicked() {
                    self.duplicate_selection();
                }
                if ui.add_enabled(has_selection, egui::Button::new("Delete")).clicked() {
                    self.delete_selection();
                }
                ui.add_enabled_ui(has_selection, |ui| {
                    ui.menu_button("Arrange", |ui| {
                        let reorders: [(&str, fn(&mut Slide, ElementId) -> bool); 4] = [
                            ("Bring to front", Slide::bring_to_front),
                            ("Bring forward", Slide::bring_forward),
                            ("Send backward", Slide::send_backward),
                            ("Send to back", Slide::send_to_back),
                        ];
                        for (label, op) in reorders {
                            if ui.button(label).clicked() {
                                self.reorder(op);
                                ui.close_menu();
                            }
                        }
                        ui.separator();
                        for (label, alignment) in [
                            ("Align left", Alignment::Left),
                            ("Align center", Alignment::Center),
                            ("Align right", Alignment::Right),
                            ("Align top", Alignment::Top),
                            ("Align middle", Alignment::Middle),
                            ("Align bottom", Alignment::Bottom),
                        ] {
                            if ui.button(label).clicked() {
                                self.align_selection(alignment);
                                ui.close_menu();
                            }
                        }
                    });
                });

                ui.separator();
                if ui.checkbox(&mut self.config.snap_enabled, "Snap").changed() {
                    self.controller.set_config(self.config.clone());
                }
                ui.add(egui::Slider::new(&mut self.zoom, 0.25..=2.0).text("Zoom"));
                ui.separator();
                if ui.button("Present").clicked() {
                    self.start_presentation();
                }
            });
        });
    }

    fn slide_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("slides")
            .resizable(false)
            .default_width(150.0)
            .show(ctx, |ui| {
                ui.heading("Slides");
                let mut clicked = None;
                for (i, slide) in self.document.slides().iter().enumerate() {
                    let label = format!("{}. {} element(s)", i + 1, slide.elements.len());
                    if ui
                        .selectable_label(i == self.document.current_index(), label)
                        .clicked()
                    {
                        clicked = Some(i);
                    }
                }
                if let Some(index) = clicked {
                    self.switch_slide(index);
                }
                ui.separator();
                if ui.button("Add slide").clicked() {
                    self.add_slide();
                }
                let can_delete = self.document.slides().len() > 1;
                if ui.add_enabled(can_delete, egui::Button::new("Delete slide")).clicked() {
                    self.delete_current_slide();
                }
            });
    }

    fn inspector(&mut self, ctx: &egui::Context) {
        let slide = self.slide();
        let elements: Vec<&Element> = self.selection.ids().iter().filter_map(|id| slide.get(*id)).collect();
        let Some(first) = elements.first() else {
            return;
        };
        let single = (elements.len() == 1).then_some((first.id, first.geometry, first.kind_name()));
        let all_locked = elements.iter().all(|e| e.locked);
        let unlocked: Vec<&Element> = elements.iter().copied().filter(|e| !e.locked).collect();

        let mut geometry_edit = None;
        let mut locked = all_locked;
        let mut edits = Vec::new();
        egui::SidePanel::right("inspector").show(ctx, |ui| {
            match single {
                Some((_, original, kind)) => {
                    ui.heading(kind);
                    let mut geometry = original;
                    ui.add_enabled_ui(!all_locked, |ui| {
                        egui::Grid::new("geometry").num_columns(2).show(ui, |ui| {
                            for (label, value) in [
                                ("X", &mut geometry.x),
                                ("Y", &mut geometry.y),
                                ("Width", &mut geometry.width),
                                ("Height", &mut geometry.height),
                                ("Rotation", &mut geometry.rotation),
                            ] {
                                ui.label(label);
                                ui.add(egui::DragValue::new(value).speed(1.0));
                                ui.end_row();
                            }
                        });
                    });
                    if geometry != original {
                        geometry_edit = Some(geometry);
                    }
                }
                None => {
                    ui.heading(format!("{} selected", elements.len()));
                }
            }
            egui::ScrollArea::vertical().show(ui, |ui| {
                edits = style_controls(ui, &unlocked);
            });
            ui.separator();
            ui.checkbox(&mut locked, "Locked");
        });

        if let (Some((id, _, _)), Some(geometry)) = (single, geometry_edit) {
            let min_size = self.config.min_element_size;
            self.document
                .current_slide_mut()
                .apply_update(id, &ElementUpdate::geometry(&geometry), min_size);
            self.inspector_dirty = true;
        }
        if self.restyle_selection(&edits) > 0 {
            self.inspector_dirty = true;
        }
        if locked != all_locked {
            self.set_locked(locked);
        }
        // Drags and typing in progress become one undo step when they end
        let settled = !ctx.input(|i| i.pointer.any_down()) && ctx.memory(|m| m.focused().is_none());
        if self.inspector_dirty && settled {
            self.commit();
        }
    }

    fn canvas_ui(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let slide_size = self.document.size();
            let origin = rect.center() - slide_size * self.zoom / 2.0;
            let transform = ViewportTransform::new(origin, self.zoom);
            self.controller.set_viewport(transform);
            self.input.set_canvas_rect(rect);

            let events = self.input.process_input(ctx);
            self.handle_events(ctx, events, response.contains_pointer());

            if response.double_clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.edit_at(&PointerSource::Mouse(pos));
                }
            }
            if self.input.long_press_pending() {
                ctx.request_repaint_after(std::time::Duration::from_secs_f64(LONG_PRESS_SECONDS));
            }
            for image in self.files.take_dropped_images(ctx) {
                debug!("Inserting dropped image {}", image.name);
                self.add_element(Element::image(ImageSource::Bitmap(image.bytes), DEFAULT_POSITION));
            }

            let painter = painter.with_clip_rect(rect);
            painter.rect_filled(rect, 0.0, ui.visuals().faint_bg_color);
            let slide = self.document.current_slide();
            paint_background(&painter, &transform, slide_size, &slide.background);
            let nodes = scene(
                &slide.elements,
                &SceneState {
                    selection: &self.selection,
                    editing: self.controller.editing(),
                    dragging: self.controller.is_dragging(),
                    read_only: self.controller.read_only(),
                    current_step: None,
                },
                &self.config,
            );
            for node in &nodes {
                paint_node(&painter, &transform, node, &mut self.textures, self.config.handle_radius);
            }
            paint_guides(&painter, &transform, self.controller.guides(), slide_size);
            if let Some(marquee) = self.controller.marquee() {
                paint_marquee(&painter, &transform, marquee);
            }

            self.text_edit_overlay(ui, &transform);
        });
    }

    fn text_edit_overlay(&mut self, ui: &mut egui::Ui, transform: &ViewportTransform) {
        let Some(target) = self.controller.editing() else {
            return;
        };
        let placement = self.slide().get(target.id).and_then(|e| match (&e.kind, target.cell) {
            (ElementKind::Text { style, .. }, None) => Some((e.rect(), style.font_size, style.color)),
            (ElementKind::Table { data, style }, Some((row, col))) if row < data.rows() && col < data.cols() => {
                let color = if data.is_header_row(row) {
                    style.header_text_color
                } else {
                    style.text_color
                };
                Some((data.cell_rect(e.rect(), row, col), style.font_size, color))
            }
            _ => None,
        });
        let Some((rect, font_size, color)) = placement else {
            self.controller.stop_editing();
            return;
        };

        let screen = Rect::from_min_max(transform.to_screen(rect.min), transform.to_screen(rect.max));
        let editor = if target.cell.is_some() {
            egui::TextEdit::singleline(&mut self.edit_buffer)
        } else {
            egui::TextEdit::multiline(&mut self.edit_buffer)
        };
        let response = ui.put(
            screen,
            editor
                .font(FontId::proportional(font_size * transform.scale()))
                .text_color(color)
                .frame(false),
        );
        if std::mem::take(&mut self.edit_needs_focus) {
            response.request_focus();
        }
        if response.changed() {
            self.apply_edit_buffer();
        }
        if response.lost_focus() {
            self.finish_text_edit();
        }
    }

    fn context_menu_ui(&mut self, ctx: &egui::Context) {
        let Some(menu) = self.context_menu else {
            return;
        };
        let pos = self.controller.transform().to_screen(menu.at);
        let mut command = None;
        let inner = egui::Area::new(egui::Id::new("canvas_context_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(pos)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(140.0);
                    match menu.target {
                        ContextTarget::Element { kind, .. } => {
                            ui.weak(kind);
                            for (label, cmd) in [
                                ("Duplicate", MenuCommand::Duplicate),
                                ("Delete", MenuCommand::Delete),
                                ("Lock / unlock", MenuCommand::ToggleLock),
                                ("Bring to front", MenuCommand::BringToFront),
                                ("Send to back", MenuCommand::SendToBack),
                            ] {
                                if ui.button(label).clicked() {
                                    command = Some(cmd);
                                }
                            }
                        }
                        ContextTarget::Slide | ContextTarget::Canvas => {
                            if ui.button("Add text here").clicked() {
                                command = Some(MenuCommand::AddText(menu.at));
                            }
                            if ui.button("Select all").clicked() {
                                command = Some(MenuCommand::SelectAll);
                            }
                            if ui.button("Add slide").clicked() {
                                command = Some(MenuCommand::AddSlide);
                            }
                        }
                    }
                });
            });

        if let Some(command) = command {
            self.context_menu = None;
            self.run_menu_command(command);
            return;
        }
        let menu_rect = inner.response.rect;
        let pressed_outside = ctx.input(|i| {
            i.pointer.any_pressed() && i.pointer.interact_pos().is_some_and(|p| !menu_rect.contains(p))
        });
        if pressed_outside {
            self.context_menu = None;
        }
    }

    fn presentation_ui(&mut self, ctx: &egui::Context) {
        let (forward, back, exit) = ctx.input(|i| {
            (
                i.key_pressed(Key::ArrowRight)
                    || i.key_pressed(Key::Space)
                    || i.key_pressed(Key::PageDown)
                    || i.pointer.primary_clicked(),
                i.key_pressed(Key::ArrowLeft) || i.key_pressed(Key::PageUp),
                i.key_pressed(Key::Escape),
            )
        });
        if exit {
            self.stop_presentation();
            return;
        }
        if forward {
            self.step_presentation(true);
        } else if back {
            self.step_presentation(false);
        }
        let Some(presentation) = self.presentation else {
            return;
        };

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let size = self.document.size();
                let zoom = (rect.width() / size.x).min(rect.height() / size.y);
                let transform = ViewportTransform::new(rect.center() - size * zoom / 2.0, zoom);
                let painter = ui.painter_at(rect);
                let slide = self.document.current_slide();
                paint_background(&painter, &transform, size, &slide.background);
                let nodes = scene(
                    &slide.elements,
                    &SceneState {
                        selection: &self.selection,
                        editing: None,
                        dragging: false,
                        read_only: true,
                        current_step: Some(presentation.current_step),
                    },
                    &self.config,
                );
                for node in &nodes {
                    paint_node(&painter, &transform, node, &mut self.textures, self.config.handle_radius);
                }
            });
    }
}

impl eframe::App for SlideEditorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = SavedState {
            config: self.config.clone(),
            document: self.document.clone(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &state);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();
        if self.presentation.is_some() {
            self.presentation_ui(ctx);
            return;
        }
        self.toolbar(ctx);
        self.slide_panel(ctx);
        self.inspector(ctx);
        self.canvas_ui(ctx);
        self.context_menu_ui(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Animation, AnimationKind, Fill, StyleChange};
    use crate::input::InputLocation;
    use crate::inspector::StyleSection;
    use egui::Modifiers;

    fn app() -> SlideEditorApp {
        let mut app = SlideEditorApp::default();
        app.controller_mut()
            .set_viewport(ViewportTransform::new(Pos2::ZERO, 1.0));
        app
    }

    fn at(x: f32, y: f32) -> (PointerSource, InputLocation) {
        let position = Pos2::new(x, y);
        (
            PointerSource::Mouse(position),
            InputLocation {
                position,
                is_in_canvas: true,
            },
        )
    }

    fn drag(from: Pos2, to: Pos2) -> Vec<InputEvent> {
        let (source, location) = at(from.x, from.y);
        let (end, end_location) = at(to.x, to.y);
        vec![
            InputEvent::PointerDown {
                source,
                location,
                button: PointerButton::Primary,
                modifiers: Modifiers::NONE,
            },
            InputEvent::PointerMove {
                source: end.clone(),
                location: end_location,
            },
            InputEvent::PointerUp {
                source: end,
                location: end_location,
                button: PointerButton::Primary,
            },
        ]
    }

    #[test]
    fn drag_moves_element_and_records_one_undo_step() {
        let ctx = egui::Context::default();
        let mut app = app();
        let id = app.add_element(Element::shape(ShapeKind::Rectangle, Pos2::new(100.0, 100.0)));
        let steps = app.history().len();

        app.handle_events(&ctx, drag(Pos2::new(150.0, 150.0), Pos2::new(183.0, 171.0)), true);
        let moved = app.document().current_slide().get(id).unwrap().rect().min;
        assert_eq!(moved, Pos2::new(133.0, 121.0));
        assert_eq!(app.history().len(), steps + 1);

        app.undo();
        let restored = app.document().current_slide().get(id).unwrap().rect().min;
        assert_eq!(restored, Pos2::new(100.0, 100.0));
    }

    #[test]
    fn click_without_move_adds_no_history() {
        let ctx = egui::Context::default();
        let mut app = app();
        app.add_element(Element::shape(ShapeKind::Rectangle, Pos2::new(100.0, 100.0)));
        let steps = app.history().len();
        app.handle_events(&ctx, drag(Pos2::new(150.0, 150.0), Pos2::new(150.0, 150.0)), true);
        assert_eq!(app.history().len(), steps);
    }

    #[test]
    fn presses_outside_canvas_are_ignored() {
        let ctx = egui::Context::default();
        let mut app = app();
        let id = app.add_element(Element::shape(ShapeKind::Rectangle, Pos2::new(100.0, 100.0)));
        app.handle_events(&ctx, drag(Pos2::new(150.0, 150.0), Pos2::new(250.0, 250.0)), false);
        assert_eq!(app.document().current_slide().get(id).unwrap().rect().min, Pos2::new(100.0, 100.0));
    }

    #[test]
    fn duplicate_delete_and_undo() {
        let mut app = app();
        app.add_element(Element::text("a", Pos2::ZERO));
        let copies = app.duplicate_selection();
        assert_eq!(copies.len(), 1);
        assert_eq!(app.selection().ids(), copies.as_slice());
        assert_eq!(app.document().current_slide().elements.len(), 2);

        assert_eq!(app.delete_selection(), 1);
        assert!(app.selection().is_empty());
        app.undo();
        assert_eq!(app.document().current_slide().elements.len(), 2);
        app.redo();
        assert_eq!(app.document().current_slide().elements.len(), 1);
    }

    #[test]
    fn locked_elements_survive_delete() {
        let mut app = app();
        let id = app.add_element(Element::text("a", Pos2::ZERO).with_locked(true));
        assert_eq!(app.delete_selection(), 0);
        assert!(app.document().current_slide().contains(id));
    }

    #[test]
    fn copy_then_paste_selects_fresh_copies() {
        let mut app = app();
        let id = app.add_element(Element::shape(ShapeKind::Star, Pos2::new(10.0, 10.0)));
        let text = app.copy_selection().unwrap();
        let pasted = app.paste_text(&text);
        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0], id);
        assert_eq!(app.selection().ids(), pasted.as_slice());
        let rect = app.document().current_slide().get(pasted[0]).unwrap().rect();
        assert_eq!(rect.min, Pos2::new(30.0, 30.0));
        assert!(app.paste_text("not json").is_empty());
    }

    #[test]
    fn arrow_keys_nudge_selection() {
        let ctx = egui::Context::default();
        let mut app = app();
        let id = app.add_element(Element::text("a", Pos2::new(50.0, 50.0)));
        app.handle_events(
            &ctx,
            vec![
                InputEvent::KeyDown {
                    key: Key::ArrowRight,
                    modifiers: Modifiers::NONE,
                },
                InputEvent::KeyDown {
                    key: Key::ArrowDown,
                    modifiers: Modifiers::SHIFT,
                },
            ],
            true,
        );
        let rect = app.document().current_slide().get(id).unwrap().rect();
        assert_eq!(rect.min, Pos2::new(51.0, 60.0));
    }

    #[test]
    fn slides_can_be_added_and_deleted() {
        let mut app = app();
        app.add_element(Element::text("first", Pos2::ZERO));
        assert_eq!(app.add_slide(), 1);
        assert!(app.selection().is_empty());
        assert!(app.document().current_slide().elements.is_empty());
        app.delete_current_slide();
        assert_eq!(app.document().slides().len(), 1);
        app.delete_current_slide();
        assert_eq!(app.document().slides().len(), 1);
    }

    #[test]
    fn presentation_walks_steps_then_slides() {
        let mut app = app();
        app.add_element(
            Element::text("a", Pos2::ZERO).with_animation(Some(Animation::on_step(AnimationKind::FadeIn, 1))),
        );
        app.add_slide();
        app.switch_slide(0);
        app.start_presentation();
        assert!(app.controller().read_only());
        assert_eq!(app.presentation.map(|p| p.max_step), Some(1));

        app.step_presentation(true);
        assert_eq!(app.presentation.map(|p| p.current_step), Some(1));
        app.step_presentation(true);
        assert_eq!(app.document().current_index(), 1);
        app.step_presentation(false);
        assert_eq!(app.document().current_index(), 0);
        assert_eq!(app.presentation.map(|p| p.current_step), Some(1));

        app.stop_presentation();
        assert!(!app.controller().read_only());
    }

    fn rect_of(app: &SlideEditorApp, id: ElementId) -> Rect {
        app.document().current_slide().get(id).unwrap().rect()
    }

    #[test]
    fn long_press_opens_menu_without_moving() {
        let ctx = egui::Context::default();
        let mut app = app();
        let id = app.add_element(Element::shape(ShapeKind::Rectangle, Pos2::new(100.0, 100.0)));
        let steps = app.history().len();
        let (_, location) = at(150.0, 150.0);
        let finger = PointerSource::Touch(vec![Pos2::new(150.0, 150.0)]);
        app.handle_events(
            &ctx,
            vec![
                InputEvent::PointerDown {
                    source: finger.clone(),
                    location,
                    button: PointerButton::Primary,
                    modifiers: Modifiers::NONE,
                },
                InputEvent::LongPress {
                    source: finger.clone(),
                    location,
                },
                InputEvent::PointerUp {
                    source: finger,
                    location,
                    button: PointerButton::Primary,
                },
            ],
            true,
        );
        assert_eq!(
            app.context_menu.map(|m| m.target),
            Some(ContextTarget::Element { id, kind: "rectangle" })
        );
        assert_eq!(rect_of(&app, id).min, Pos2::new(100.0, 100.0));
        assert_eq!(app.history().len(), steps);
        assert!(app.controller().state().is_none());
    }

    #[test]
    fn long_press_outside_canvas_is_ignored() {
        let ctx = egui::Context::default();
        let mut app = app();
        app.add_element(Element::shape(ShapeKind::Rectangle, Pos2::new(100.0, 100.0)));
        let (source, mut location) = at(150.0, 150.0);
        location.is_in_canvas = false;
        app.handle_events(&ctx, vec![InputEvent::LongPress { source, location }], true);
        assert!(app.context_menu.is_none());
    }

    #[test]
    fn table_cells_edit_in_place() {
        let mut app = app();
        let id = app.add_element(Element::table(3, 3, DEFAULT_POSITION));
        let steps = app.history().len();

        // 200x200 at (100, 100): cells are a third of that each way
        let target = app.edit_at(&PointerSource::Mouse(Pos2::new(250.0, 190.0)));
        assert_eq!(target, Some(EditTarget::cell(id, 1, 2)));
        assert_eq!(app.edit_buffer, "");

        app.edit_buffer = "42".into();
        app.apply_edit_buffer();
        let cell = |app: &SlideEditorApp| match &app.document().current_slide().get(id).unwrap().kind {
            ElementKind::Table { data, .. } => data.cell(1, 2).map(str::to_owned),
            _ => None,
        };
        assert_eq!(cell(&app).as_deref(), Some("42"));

        app.finish_text_edit();
        assert_eq!(app.controller().editing(), None);
        assert_eq!(app.history().len(), steps + 1);

        // Re-entering the same cell starts from its content
        app.edit_at(&PointerSource::Mouse(Pos2::new(250.0, 190.0)));
        assert_eq!(app.edit_buffer, "42");
        app.undo();
        assert_eq!(app.controller().editing(), None);
        assert_eq!(cell(&app).as_deref(), Some(""));
    }

    #[test]
    fn deleting_an_edited_table_stops_editing() {
        let mut app = app();
        app.add_element(Element::table(2, 2, DEFAULT_POSITION));
        assert!(app.edit_at(&PointerSource::Mouse(Pos2::new(150.0, 150.0))).is_some());
        assert_eq!(app.delete_selection(), 1);
        assert_eq!(app.controller().editing(), None);
    }

    #[test]
    fn bulk_style_edit_merges_into_each_selected_element() {
        let mut app = app();
        let text = app.add_element(Element::text("a", Pos2::new(0.0, 0.0)));
        let star = app.add_element(Element::shape(ShapeKind::Star, Pos2::new(300.0, 0.0)));
        let table = app.add_element(Element::table(2, 2, Pos2::new(0.0, 300.0)));
        let locked = app.add_element(Element::text("b", Pos2::new(500.0, 300.0)).with_locked(true));
        app.select_all();
        let before: Vec<Element> = app.document().current_slide().elements.clone();
        let steps = app.history().len();

        let edits = [
            (StyleSection::Appearance, StyleChange::Opacity(0.4)),
            (StyleSection::Text, StyleChange::TextColor(Color32::RED)),
            (StyleSection::Shape, StyleChange::Fill(Fill::Solid(Color32::BLUE))),
        ];
        assert_eq!(app.restyle_selection(&edits), 3);
        app.commit();
        assert_eq!(app.history().len(), steps + 1);

        let slide = app.document().current_slide();
        let get = move |id: ElementId| slide.get(id).unwrap();
        for id in [text, star, table] {
            assert_eq!(get(id).appearance.opacity, 0.4);
            assert_eq!(get(id).geometry, before.iter().find(|e| e.id == id).unwrap().geometry);
        }
        let ElementKind::Text { style, .. } = &get(text).kind else {
            panic!("expected text");
        };
        assert_eq!(style.color, Color32::RED);
        assert_eq!(style.font_size, 24.0);
        assert!(!style.bold);

        let ElementKind::Shape { style, .. } = &get(star).kind else {
            panic!("expected shape");
        };
        assert_eq!(style.fill, Fill::Solid(Color32::BLUE));
        let ElementKind::Shape { style: old, .. } = &before[1].kind else {
            panic!("expected shape");
        };
        assert_eq!((style.detail1, style.detail2), (old.detail1, old.detail2));

        // The text color edit belongs to the text section only
        assert_eq!(get(table).kind, before[2].kind);
        assert_eq!(get(locked), &before[3]);
    }

    #[test]
    fn element_deleted_mid_drag_is_dropped_from_the_move() {
        let ctx = egui::Context::default();
        let mut app = app();
        let a = app.add_element(Element::shape(ShapeKind::Rectangle, Pos2::new(100.0, 100.0)));
        let b = app.add_element(Element::shape(ShapeKind::Rectangle, Pos2::new(400.0, 100.0)));
        app.select_all();
        let steps = app.history().len();

        let (source, location) = at(150.0, 150.0);
        let (step, step_location) = at(160.0, 160.0);
        app.handle_events(
            &ctx,
            vec![
                InputEvent::PointerDown {
                    source,
                    location,
                    button: PointerButton::Primary,
                    modifiers: Modifiers::NONE,
                },
                InputEvent::PointerMove {
                    source: step,
                    location: step_location,
                },
            ],
            true,
        );
        assert_eq!(rect_of(&app, b).min, Pos2::new(410.0, 110.0));

        assert_eq!(app.document.current_slide_mut().remove_elements(&[b]), 1);

        let (end, end_location) = at(180.0, 190.0);
        app.handle_events(
            &ctx,
            vec![InputEvent::PointerMove {
                source: end.clone(),
                location: end_location,
            }],
            true,
        );
        // The survivor still follows its start position plus the delta
        assert_eq!(rect_of(&app, a).min, Pos2::new(130.0, 140.0));
        assert!(app.document().current_slide().get(b).is_none());
        assert_eq!(app.document().current_slide().elements.len(), 1);
        assert!(app.controller().is_dragging());

        app.handle_events(
            &ctx,
            vec![InputEvent::PointerUp {
                source: end,
                location: end_location,
                button: PointerButton::Primary,
            }],
            true,
        );
        assert!(app.controller().state().is_none());
        assert_eq!(app.history().len(), steps + 1);
        assert_eq!(app.selection().ids(), &[a]);
    }
}
