use egui::{Pos2, Rect, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

mod animation;
mod common;
mod image;
pub mod path;
mod shape;
mod style;
mod table;

pub use animation::{Animation, AnimationKind, Easing};
pub use common::{normalize_degrees, rotate_about, Geometry, MIN_ELEMENT_SIZE};
pub use image::ImageSource;
pub use shape::{polygon_in_rect, ShapeKind};
pub use style::{
    Appearance, Border, Fill, ImageStyle, LineCap, LineJoin, LineStyle, ObjectFit, PathStyle,
    Shadow, ShapeStyle, StyleChange, TableStyle, TextAlign, TextDecoration, TextStyle,
    VerticalAlign,
};
pub use table::TableData;

use crate::id_generator::ElementId;

/// Default top-left corner for newly added elements
pub const DEFAULT_POSITION: Pos2 = Pos2::new(100.0, 100.0);
pub const DEFAULT_TEXT_SIZE: Vec2 = Vec2::new(400.0, 100.0);
pub const DEFAULT_ELEMENT_SIZE: Vec2 = Vec2::new(200.0, 200.0);

/// Kind-specific payload of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    Text { content: String, style: TextStyle },
    Shape { shape: ShapeKind, style: ShapeStyle },
    Image { source: ImageSource, style: ImageStyle },
    Table { data: TableData, style: TableStyle },
    /// SVG-style path data in the element's local frame, see [`path`]
    Path { path: String, style: PathStyle },
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text { .. } => "text",
            ElementKind::Shape { shape, .. } => shape.name(),
            ElementKind::Image { .. } => "image",
            ElementKind::Table { .. } => "table",
            ElementKind::Path { .. } => "path",
        }
    }

    pub fn is_path(&self) -> bool {
        matches!(self, ElementKind::Path { .. })
    }

    fn apply_style(&mut self, change: &StyleChange) -> bool {
        match self {
            ElementKind::Text { style, .. } => change.apply_to_text(style),
            ElementKind::Shape { style, .. } => change.apply_to_shape(style),
            ElementKind::Image { style, .. } => change.apply_to_image(style),
            ElementKind::Table { style, .. } => change.apply_to_table(style),
            ElementKind::Path { style, .. } => change.apply_to_path(style),
        }
    }

    fn apply_content(&mut self, change: &ContentChange) -> bool {
        match (self, change) {
            (ElementKind::Text { content, .. }, ContentChange::Text(text)) => {
                content.clone_from(text);
                true
            }
            (ElementKind::Table { data, .. }, ContentChange::TableCell { row, col, text }) => {
                data.set_cell(*row, *col, text.clone())
            }
            (ElementKind::Table { data, .. }, ContentChange::Table(new_data)) => {
                *data = new_data.clone();
                true
            }
            (ElementKind::Image { source, .. }, ContentChange::ImageSource(new_source)) => {
                *source = new_source.clone();
                true
            }
            (ElementKind::Path { path, .. }, ContentChange::Path(data)) => {
                path.clone_from(data);
                true
            }
            _ => false,
        }
    }
}

/// Replacement of an element's content, as opposed to its style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentChange {
    Text(String),
    TableCell { row: usize, col: usize, text: String },
    Table(TableData),
    ImageSource(ImageSource),
    Path(String),
}

/// Text being edited in place: a text element's content, or one table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditTarget {
    pub id: ElementId,
    /// `(row, col)` for table cells
    pub cell: Option<(usize, usize)>,
}

impl EditTarget {
    pub fn text(id: ElementId) -> Self {
        Self { id, cell: None }
    }

    pub fn cell(id: ElementId, row: usize, col: usize) -> Self {
        Self {
            id,
            cell: Some((row, col)),
        }
    }

    /// The content change that writes `text` back to the target
    pub fn content_change(&self, text: &str) -> ContentChange {
        match self.cell {
            Some((row, col)) => ContentChange::TableCell {
                row,
                col,
                text: text.to_owned(),
            },
            None => ContentChange::Text(text.to_owned()),
        }
    }
}

/// Partial update addressed to one element.
///
/// Every `None` field is left untouched. Style changes are merged field by
/// field into the existing style, never replacing it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementUpdate {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub rotation: Option<f32>,
    pub locked: Option<bool>,
    pub content: Option<ContentChange>,
    pub style: Vec<StyleChange>,
}

impl ElementUpdate {
    pub fn position(pos: Pos2) -> Self {
        Self {
            x: Some(pos.x),
            y: Some(pos.y),
            ..Default::default()
        }
    }

    /// Position, size and rotation at once
    pub fn geometry(geometry: &Geometry) -> Self {
        Self {
            x: Some(geometry.x),
            y: Some(geometry.y),
            width: Some(geometry.width),
            height: Some(geometry.height),
            rotation: Some(geometry.rotation),
            ..Default::default()
        }
    }

    pub fn rotation(degrees: f32) -> Self {
        Self {
            rotation: Some(degrees),
            ..Default::default()
        }
    }

    pub fn locked(locked: bool) -> Self {
        Self {
            locked: Some(locked),
            ..Default::default()
        }
    }

    pub fn content(change: ContentChange) -> Self {
        Self {
            content: Some(change),
            ..Default::default()
        }
    }

    pub fn with_style(mut self, change: StyleChange) -> Self {
        self.style.push(change);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.rotation.is_none()
            && self.locked.is_none()
            && self.content.is_none()
            && self.style.is_empty()
    }
}

/// One visual object on a slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub geometry: Geometry,
    pub kind: ElementKind,
    #[serde(default)]
    pub appearance: Appearance,
    #[serde(default)]
    pub animation: Option<Animation>,
    #[serde(default)]
    pub locked: bool,
}

impl Element {
    /// Creates an element with a fresh ID, default appearance and the
    /// default fade-in entrance.
    pub fn new(kind: ElementKind, geometry: Geometry) -> Self {
        Self {
            id: ElementId::new(),
            geometry,
            kind,
            appearance: Appearance::default(),
            animation: Some(Animation::default()),
            locked: false,
        }
    }

    pub fn text(content: impl Into<String>, at: Pos2) -> Self {
        Self::new(
            ElementKind::Text {
                content: content.into(),
                style: TextStyle::default(),
            },
            Geometry::new(at.x, at.y, DEFAULT_TEXT_SIZE.x, DEFAULT_TEXT_SIZE.y),
        )
    }

    pub fn shape(shape: ShapeKind, at: Pos2) -> Self {
        Self::new(
            ElementKind::Shape {
                shape,
                style: ShapeStyle::default(),
            },
            Self::default_geometry(at),
        )
    }

    pub fn image(source: ImageSource, at: Pos2) -> Self {
        Self::new(
            ElementKind::Image {
                source,
                style: ImageStyle::default(),
            },
            Self::default_geometry(at),
        )
    }

    pub fn table(rows: usize, cols: usize, at: Pos2) -> Self {
        Self::new(
            ElementKind::Table {
                data: TableData::new(rows, cols),
                style: TableStyle::default(),
            },
            Self::default_geometry(at),
        )
    }

    pub fn path(data: impl Into<String>, at: Pos2) -> Self {
        Self::new(
            ElementKind::Path {
                path: data.into(),
                style: PathStyle::default(),
            },
            Self::default_geometry(at),
        )
    }

    fn default_geometry(at: Pos2) -> Geometry {
        Geometry::new(at.x, at.y, DEFAULT_ELEMENT_SIZE.x, DEFAULT_ELEMENT_SIZE.y)
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_animation(mut self, animation: Option<Animation>) -> Self {
        self.animation = animation;
        self
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn rect(&self) -> Rect {
        self.geometry.rect()
    }

    /// Step at which the element is revealed during presentation
    pub fn reveal_step(&self) -> Option<u32> {
        self.animation.as_ref().and_then(Animation::reveal_step)
    }

    /// Whether a slide-space point hits the element.
    ///
    /// Paths are hit along their stroke, widened by `tolerance`; every other
    /// kind by its (rotated) box.
    pub fn hit_test(&self, point: Pos2, tolerance: f32) -> bool {
        if let ElementKind::Path { path: data, style } = &self.kind {
            if let Ok(subpaths) = path::parse_path(data) {
                let local = self.geometry.to_local(point) - self.geometry.rect().min.to_vec2();
                return path::hit_test_path(&subpaths, local, style.width / 2.0 + tolerance);
            }
        }
        self.geometry.contains(point)
    }

    /// Merges a partial update into the element. Width and height are
    /// clamped to `min_size`; changes that do not fit the kind are skipped.
    pub fn apply_update(&mut self, update: &ElementUpdate, min_size: f32) {
        let min_size = min_size.max(f32::EPSILON);
        if let Some(x) = update.x {
            self.geometry.x = x;
        }
        if let Some(y) = update.y {
            self.geometry.y = y;
        }
        if let Some(width) = update.width {
            self.geometry.width = width.max(min_size);
        }
        if let Some(height) = update.height {
            self.geometry.height = height.max(min_size);
        }
        if let Some(rotation) = update.rotation {
            self.geometry.rotation = rotation;
        }
        if let Some(locked) = update.locked {
            self.locked = locked;
        }
        if let Some(content) = &update.content {
            if !self.kind.apply_content(content) {
                debug!("Ignoring content change {:?} for {} element {}", content, self.kind_name(), self.id);
            }
        }
        for change in &update.style {
            if !change.apply_to_appearance(&mut self.appearance) && !self.kind.apply_style(change) {
                debug!("Ignoring style change {:?} for {} element {}", change, self.kind_name(), self.id);
            }
        }
    }

    /// Current text at an edit target, if the element has one there
    pub fn editable_text(&self, cell: Option<(usize, usize)>) -> Option<&str> {
        match (&self.kind, cell) {
            (ElementKind::Text { content, .. }, None) => Some(content),
            (ElementKind::Table { data, .. }, Some((row, col))) => data.cell(row, col),
            _ => None,
        }
    }

    /// Copy of this element under a new ID, shifted by `offset`
    pub fn duplicate(&self, offset: Vec2) -> Self {
        let mut copy = self.clone();
        copy.id = ElementId::new();
        copy.geometry.x += offset.x;
        copy.geometry.y += offset.y;
        copy
    }
}
