use egui::Vec2;
use serde::{Deserialize, Serialize};

/// Tunables for the canvas editor.
///
/// Persisted together with the app state, so every field has a default and
/// older saved states keep loading when fields are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Logical slide width in slide-space units
    pub slide_width: f32,
    /// Logical slide height in slide-space units
    pub slide_height: f32,
    /// Lower bound for width and height after any resize
    pub min_element_size: f32,
    /// Distance (slide units) under which a moving element snaps to a guide
    pub snap_threshold: f32,
    pub snap_enabled: bool,
    /// Whether dragging on empty canvas draws a selection marquee
    pub marquee_enabled: bool,
    /// Maximum number of undo snapshots kept
    pub history_limit: usize,
    /// Hit radius of resize and rotate handles, in slide units
    pub handle_radius: f32,
    /// Distance of the rotate handle above the top edge
    pub rotate_handle_offset: f32,
    /// Offset applied to duplicated and pasted elements
    pub duplicate_offset: Vec2,
    pub nudge_step: f32,
    pub nudge_step_large: f32,
    /// Snap rotation to multiples of this many degrees. `None` rotates freely.
    pub rotation_snap_degrees: Option<f32>,
    pub initial_zoom: f32,
    /// Frames a decoded image texture may stay unused before it is evicted
    pub texture_cache_frames: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            slide_width: 960.0,
            slide_height: 540.0,
            min_element_size: 5.0,
            snap_threshold: 5.0,
            snap_enabled: true,
            marquee_enabled: true,
            history_limit: 50,
            handle_radius: 6.0,
            rotate_handle_offset: 32.0,
            duplicate_offset: Vec2::new(20.0, 20.0),
            nudge_step: 1.0,
            nudge_step_large: 10.0,
            rotation_snap_degrees: None,
            initial_zoom: 0.8,
            texture_cache_frames: 120,
        }
    }
}

impl CanvasConfig {
    pub fn slide_size(&self) -> Vec2 {
        Vec2::new(self.slide_width, self.slide_height)
    }
}
