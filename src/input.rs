use egui::{Context, Event, Key, Modifiers, PointerButton, Pos2, Rect, TouchId, TouchPhase};

use crate::surface::PointerSource;

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position in screen coordinates
    pub position: Pos2,
    /// Whether this position is within the slide surface
    pub is_in_canvas: bool,
}

/// Input events the editor reacts to, already stripped of egui details
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        source: PointerSource,
        location: InputLocation,
        button: PointerButton,
        modifiers: Modifiers,
    },
    /// Pointer moved, with or without buttons held
    PointerMove {
        source: PointerSource,
        location: InputLocation,
    },
    PointerUp {
        source: PointerSource,
        location: InputLocation,
        button: PointerButton,
    },
    /// Pointer left the window
    PointerLeave,
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
    Copy,
    Cut,
    Paste(String),
    /// A finger held still on the surface, standing in for a secondary click
    LongPress {
        source: PointerSource,
        location: InputLocation,
    },
}

impl InputEvent {
    /// Helper to check if an input event occurred within the canvas
    pub fn is_in_canvas(&self) -> bool {
        match self {
            InputEvent::PointerDown { location, .. }
            | InputEvent::PointerUp { location, .. }
            | InputEvent::PointerMove { location, .. }
            | InputEvent::LongPress { location, .. } => location.is_in_canvas,
            _ => false,
        }
    }
}

/// Editor commands bound to keys
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorAction {
    Delete,
    Duplicate,
    Undo,
    Redo,
    SelectAll,
    /// Arrow keys; `large` when shift is held
    Nudge { dx: f32, dy: f32, large: bool },
    Cancel,
}

/// Maps a key press to an editor command
pub fn shortcut_action(key: Key, modifiers: &Modifiers) -> Option<EditorAction> {
    let command = modifiers.command || modifiers.ctrl;
    let nudge = |dx: f32, dy: f32| EditorAction::Nudge {
        dx,
        dy,
        large: modifiers.shift,
    };
    match key {
        Key::Delete | Key::Backspace => Some(EditorAction::Delete),
        Key::Escape => Some(EditorAction::Cancel),
        Key::Z if command && modifiers.shift => Some(EditorAction::Redo),
        Key::Z if command => Some(EditorAction::Undo),
        Key::Y if command => Some(EditorAction::Redo),
        Key::D if command => Some(EditorAction::Duplicate),
        Key::A if command => Some(EditorAction::SelectAll),
        Key::ArrowLeft => Some(nudge(-1.0, 0.0)),
        Key::ArrowRight => Some(nudge(1.0, 0.0)),
        Key::ArrowUp => Some(nudge(0.0, -1.0)),
        Key::ArrowDown => Some(nudge(0.0, 1.0)),
        _ => None,
    }
}

/// Seconds a single finger must stay down before it counts as a long press
pub const LONG_PRESS_SECONDS: f64 = 0.5;
/// Screen distance a held finger may drift and still long-press
pub const LONG_PRESS_SLOP: f32 = 8.0;

/// Handles converting raw egui input into our domain-specific InputEvents.
///
/// Pointer events that happen while a finger is down are reported with a
/// touch source carrying every active touch point. A single finger held
/// still for [`LONG_PRESS_SECONDS`] produces [`InputEvent::LongPress`].
pub struct InputHandler {
    canvas_rect: Rect,
    touches: Vec<(TouchId, Pos2)>,
    /// Where and when the current touch press started
    pending_press: Option<(Pos2, f64)>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Rect::NOTHING)
    }
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            touches: Vec::new(),
            pending_press: None,
        }
    }

    /// Update the slide surface rectangle, once per frame after layout
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn make_location(&self, pos: Pos2) -> InputLocation {
        InputLocation {
            position: pos,
            is_in_canvas: self.canvas_rect.contains(pos),
        }
    }

    fn source(&self, pos: Pos2) -> PointerSource {
        if self.touches.is_empty() {
            PointerSource::Mouse(pos)
        } else {
            PointerSource::Touch(self.touches.iter().map(|(_, p)| *p).collect())
        }
    }

    /// True while a touch press could still turn into a long press
    pub fn long_press_pending(&self) -> bool {
        self.pending_press.is_some()
    }

    fn drifted(&mut self, pos: Pos2) {
        if let Some((start, _)) = self.pending_press {
            if start.distance(pos) > LONG_PRESS_SLOP {
                self.pending_press = None;
            }
        }
    }

    /// Process this frame's egui input
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        ctx.input(|input| self.translate(&input.events, input.time))
    }

    /// Translates raw egui events, in order. `time` is the input clock in
    /// seconds, used to time long presses.
    pub fn translate(&mut self, events: &[Event], time: f64) -> Vec<InputEvent> {
        let mut out = Vec::new();
        for event in events {
            match event {
                Event::Touch { id, phase, pos, .. } => match phase {
                    TouchPhase::Start | TouchPhase::Move => {
                        match self.touches.iter_mut().find(|(touch, _)| touch == id) {
                            Some(entry) => entry.1 = *pos,
                            None => self.touches.push((*id, *pos)),
                        }
                        if self.touches.len() > 1 {
                            self.pending_press = None;
                        }
                        self.drifted(*pos);
                    }
                    TouchPhase::End | TouchPhase::Cancel => {
                        self.touches.retain(|(touch, _)| touch != id);
                        self.pending_press = None;
                    }
                },
                Event::PointerMoved(pos) => {
                    self.drifted(*pos);
                    out.push(InputEvent::PointerMove {
                        source: self.source(*pos),
                        location: self.make_location(*pos),
                    })
                }
                Event::PointerButton {
                    pos,
                    button,
                    pressed: true,
                    modifiers,
                } => {
                    if *button == PointerButton::Primary && self.touches.len() == 1 {
                        self.pending_press = Some((*pos, time));
                    }
                    out.push(InputEvent::PointerDown {
                        source: self.source(*pos),
                        location: self.make_location(*pos),
                        button: *button,
                        modifiers: *modifiers,
                    })
                }
                Event::PointerButton {
                    pos,
                    button,
                    pressed: false,
                    ..
                } => {
                    self.pending_press = None;
                    out.push(InputEvent::PointerUp {
                        source: self.source(*pos),
                        location: self.make_location(*pos),
                        button: *button,
                    })
                }
                Event::PointerGone => out.push(InputEvent::PointerLeave),
                Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => out.push(InputEvent::KeyDown {
                    key: *key,
                    modifiers: *modifiers,
                }),
                Event::Copy => out.push(InputEvent::Copy),
                Event::Cut => out.push(InputEvent::Cut),
                Event::Paste(text) => out.push(InputEvent::Paste(text.clone())),
                _ => {}
            }
        }
        if let Some((pos, start)) = self.pending_press {
            if time - start >= LONG_PRESS_SECONDS {
                self.pending_press = None;
                out.push(InputEvent::LongPress {
                    source: self.source(pos),
                    location: self.make_location(pos),
                });
            }
        }
        out
    }
}
