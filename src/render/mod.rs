//! Element to visual node mapping.
//!
//! [`visual_node`] is a pure function of an element and its visual state.
//! It knows nothing about gestures or egui; [`painter`] turns the nodes into
//! egui shapes.

use egui::{Color32, Pos2, Rect};
use log::debug;

use crate::config::CanvasConfig;
use crate::element::{
    path::parse_path, polygon_in_rect, Appearance, Border, EditTarget, Element, ElementKind, Fill,
    ImageSource, ObjectFit, PathStyle, ShapeKind, TextStyle,
};
use crate::gesture::{handle_positions, HandleKind};
use crate::id_generator::ElementId;
use crate::selection::Selection;

pub mod painter;
pub mod textures;

pub use painter::{paint_background, paint_guides, paint_marquee, paint_node};
pub use textures::TextureCache;

/// Flags that change how an element is drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisualState {
    pub selected: bool,
    /// More than one element is selected
    pub multi_selected: bool,
    /// Text is being edited in place
    pub editing: bool,
    /// Table cell being edited in place
    pub editing_cell: Option<(usize, usize)>,
    /// A move, resize or rotate gesture is running
    pub dragging: bool,
    pub read_only: bool,
    /// Presentation reveal step, when playing back
    pub current_step: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableCell {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    pub text: String,
    pub header: bool,
    pub fill: Color32,
    pub text_color: Color32,
    /// Covered by an input widget, so the text is not painted
    pub editing: bool,
}

/// Kind-specific drawable content. Coordinates are slide space on the
/// un-rotated box; the node's rotation applies on top.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualBody {
    Text {
        content: String,
        style: TextStyle,
        editing: bool,
    },
    /// Rectangles and circles
    Fill { fill: Fill, ellipse: bool },
    /// Masked shapes
    Polygon { points: Vec<Pos2>, fill: Fill },
    Image { source: ImageSource, fit: ObjectFit },
    Table {
        cells: Vec<TableCell>,
        font_size: f32,
        grid: Option<Border>,
    },
    Stroke {
        subpaths: Vec<Vec<Pos2>>,
        style: PathStyle,
    },
}

/// Selection border and handles of a selected element
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionChrome {
    pub border: bool,
    /// Slide-space positions, already rotated with the element
    pub handles: Vec<(HandleKind, Pos2)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub id: ElementId,
    pub rect: Rect,
    /// Degrees in `[0, 360)`
    pub rotation: f32,
    pub opacity: f32,
    pub z_hint: i32,
    pub appearance: Appearance,
    pub body: VisualBody,
    pub chrome: Option<SelectionChrome>,
}

/// Whether the element is visible at the current presentation step.
///
/// Outside read-only playback everything is visible. During playback an
/// element with an entrance step stays hidden until that step is reached.
pub fn is_revealed(element: &Element, state: &VisualState) -> bool {
    match (state.read_only, state.current_step, element.reveal_step()) {
        (true, Some(current), Some(step)) => step <= current,
        _ => true,
    }
}

fn body_for(element: &Element, rect: Rect, state: &VisualState) -> VisualBody {
    match &element.kind {
        ElementKind::Text { content, style } => VisualBody::Text {
            content: content.clone(),
            style: style.clone(),
            editing: state.editing,
        },
        ElementKind::Shape { shape, style } => match shape.clip_polygon(style.detail1, style.detail2) {
            Some(percent) => VisualBody::Polygon {
                points: polygon_in_rect(&percent, rect),
                fill: style.fill.clone(),
            },
            None => VisualBody::Fill {
                fill: style.fill.clone(),
                ellipse: *shape == ShapeKind::Circle,
            },
        },
        ElementKind::Image { source, style } => VisualBody::Image {
            source: source.clone(),
            fit: style.fit,
        },
        ElementKind::Table { data, style } => {
            let mut cells = Vec::with_capacity(data.rows() * data.cols());
            for (row, texts) in data.iter_rows().enumerate() {
                let header = data.is_header_row(row);
                let fill = if header {
                    style.header_fill
                } else if style.striped && data.is_striped_row(row) {
                    style.stripe_color
                } else {
                    style.background.base_color()
                };
                let text_color = if header { style.header_text_color } else { style.text_color };
                for (col, text) in texts.iter().enumerate() {
                    cells.push(TableCell {
                        row,
                        col,
                        rect: data.cell_rect(rect, row, col),
                        text: text.clone(),
                        header,
                        fill,
                        text_color,
                        editing: state.editing_cell == Some((row, col)),
                    });
                }
            }
            VisualBody::Table {
                cells,
                font_size: style.font_size,
                grid: style.grid,
            }
        }
        ElementKind::Path { path, style } => {
            let subpaths = match parse_path(path) {
                Ok(subpaths) => subpaths,
                Err(err) => {
                    debug!("Path element {} has malformed data: {}", element.id, err);
                    Vec::new()
                }
            };
            let offset = rect.min.to_vec2();
            VisualBody::Stroke {
                subpaths: subpaths
                    .into_iter()
                    .map(|sub| sub.into_iter().map(|p| p + offset).collect())
                    .collect(),
                style: style.clone(),
            }
        }
    }
}

/// Maps an element and its visual state to a drawable node.
pub fn visual_node(element: &Element, state: &VisualState, config: &CanvasConfig) -> VisualNode {
    let rect = element.rect();
    let is_path = element.kind.is_path();

    let chrome = (state.selected && !state.read_only).then(|| {
        let show_handles = !state.multi_selected && !state.dragging && !element.locked;
        SelectionChrome {
            border: !is_path,
            handles: if show_handles {
                handle_positions(&element.geometry, config.rotate_handle_offset, !is_path)
            } else {
                Vec::new()
            },
        }
    });

    let opacity = if is_revealed(element, state) {
        element.appearance.opacity
    } else {
        0.0
    };

    VisualNode {
        id: element.id,
        rect,
        rotation: element.geometry.normalized_rotation(),
        opacity,
        z_hint: element.appearance.z_hint,
        appearance: element.appearance.clone(),
        body: body_for(element, rect, state),
        chrome,
    }
}

/// Per-frame inputs for laying out a whole slide
#[derive(Debug, Clone, Copy)]
pub struct SceneState<'a> {
    pub selection: &'a Selection,
    pub editing: Option<EditTarget>,
    pub dragging: bool,
    pub read_only: bool,
    pub current_step: Option<u32>,
}

/// Visual nodes for every element, in paint order.
pub fn scene(elements: &[Element], scene: &SceneState<'_>, config: &CanvasConfig) -> Vec<VisualNode> {
    let multi_selected = scene.selection.len() > 1;
    elements
        .iter()
        .map(|element| {
            let target = scene.editing.filter(|t| t.id == element.id);
            let state = VisualState {
                selected: scene.selection.contains(element.id),
                multi_selected,
                editing: target.is_some_and(|t| t.cell.is_none()),
                editing_cell: target.and_then(|t| t.cell),
                dragging: scene.dragging,
                read_only: scene.read_only,
                current_step: scene.current_step,
            };
            visual_node(element, &state, config)
        })
        .collect()
}
