use egui::{Color32, Vec2};
use serde::{Deserialize, Serialize};

/// How an area is filled
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Fill {
    #[default]
    None,
    Solid(Color32),
    LinearGradient { from: Color32, to: Color32, angle: f32 },
    RadialGradient { inner: Color32, outer: Color32 },
}

impl Fill {
    /// Single representative color, used where a backend cannot draw gradients
    pub fn base_color(&self) -> Color32 {
        match self {
            Fill::None => Color32::TRANSPARENT,
            Fill::Solid(c) => *c,
            Fill::LinearGradient { from, .. } => *from,
            Fill::RadialGradient { inner, .. } => *inner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub width: f32,
    pub color: Color32,
    pub line: LineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset: Vec2,
    pub blur: f32,
    pub color: Color32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset: Vec2::new(0.0, 4.0),
            blur: 4.0,
            color: Color32::from_black_alpha(77),
        }
    }
}

/// Visual attributes shared by every element kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Appearance {
    pub opacity: f32,
    pub border: Option<Border>,
    pub shadow: Option<Shadow>,
    pub corner_radius: f32,
    /// Tie-break hint only. Paint order is the slide's list order.
    pub z_hint: i32,
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            border: None,
            shadow: None,
            corner_radius: 0.0,
            z_hint: 10,
            flip_x: false,
            flip_y: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub color: Color32,
    pub font_size: f32,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub decoration: TextDecoration,
    pub align: TextAlign,
    pub vertical_align: VerticalAlign,
    pub background: Fill,
    pub line_height: f32,
    pub letter_spacing: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color32::from_rgb(30, 41, 59),
            font_size: 24.0,
            font_family: "Noto Sans JP".to_owned(),
            bold: false,
            italic: false,
            decoration: TextDecoration::None,
            align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            background: Fill::None,
            line_height: 1.2,
            letter_spacing: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub fill: Fill,
    /// Primary proportion parameter in percent (arrow head start, bubble tail x)
    pub detail1: Option<f32>,
    /// Secondary proportion parameter in percent (arrow shaft width, bubble tail width)
    pub detail2: Option<f32>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Fill::Solid(Color32::from_rgb(249, 115, 22)),
            detail1: None,
            detail2: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageStyle {
    pub fit: ObjectFit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    pub font_size: f32,
    pub text_color: Color32,
    pub background: Fill,
    pub header_fill: Color32,
    pub header_text_color: Color32,
    pub striped: bool,
    pub stripe_color: Color32,
    pub cell_padding: Vec2,
    pub grid: Option<Border>,
    pub align: TextAlign,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            text_color: Color32::from_rgb(30, 41, 59),
            background: Fill::Solid(Color32::WHITE),
            header_fill: Color32::from_rgb(226, 232, 240),
            header_text_color: Color32::from_rgb(15, 23, 42),
            striped: false,
            stripe_color: Color32::from_rgb(248, 250, 252),
            cell_padding: Vec2::new(8.0, 4.0),
            grid: Some(Border {
                width: 1.0,
                color: Color32::BLACK,
                line: LineStyle::Solid,
            }),
            align: TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
    Miter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathStyle {
    pub color: Color32,
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            width: 2.0,
            cap: LineCap::Round,
            join: LineJoin::Round,
        }
    }
}

/// One field-level style edit. A partial update carries a list of these and
/// applies them in order, which gives shallow-merge semantics: every field
/// not mentioned keeps its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleChange {
    // Appearance, valid for every kind
    Opacity(f32),
    Border(Option<Border>),
    Shadow(Option<Shadow>),
    CornerRadius(f32),
    ZHint(i32),
    FlipX(bool),
    FlipY(bool),
    // Text and table
    TextColor(Color32),
    FontSize(f32),
    TextAlign(TextAlign),
    // Text
    FontFamily(String),
    Bold(bool),
    Italic(bool),
    Decoration(TextDecoration),
    VerticalAlign(VerticalAlign),
    TextBackground(Fill),
    // Shapes
    Fill(Fill),
    ShapeDetail1(Option<f32>),
    ShapeDetail2(Option<f32>),
    // Images
    ObjectFit(ObjectFit),
    // Tables
    HeaderFill(Color32),
    HeaderTextColor(Color32),
    Striped(bool),
    StripeColor(Color32),
    // Paths
    StrokeColor(Color32),
    StrokeWidth(f32),
    LineCap(LineCap),
    LineJoin(LineJoin),
}

impl StyleChange {
    /// Applies the change to the shared appearance. Returns `false` if the
    /// change targets a kind-specific field instead.
    pub(crate) fn apply_to_appearance(&self, appearance: &mut Appearance) -> bool {
        match self {
            StyleChange::Opacity(v) => appearance.opacity = v.clamp(0.0, 1.0),
            StyleChange::Border(v) => appearance.border = *v,
            StyleChange::Shadow(v) => appearance.shadow = *v,
            StyleChange::CornerRadius(v) => appearance.corner_radius = v.max(0.0),
            StyleChange::ZHint(v) => appearance.z_hint = *v,
            StyleChange::FlipX(v) => appearance.flip_x = *v,
            StyleChange::FlipY(v) => appearance.flip_y = *v,
            _ => return false,
        }
        true
    }

    pub(crate) fn apply_to_text(&self, style: &mut TextStyle) -> bool {
        match self {
            StyleChange::TextColor(v) => style.color = *v,
            StyleChange::FontSize(v) => style.font_size = v.max(1.0),
            StyleChange::TextAlign(v) => style.align = *v,
            StyleChange::FontFamily(v) => style.font_family = v.clone(),
            StyleChange::Bold(v) => style.bold = *v,
            StyleChange::Italic(v) => style.italic = *v,
            StyleChange::Decoration(v) => style.decoration = *v,
            StyleChange::VerticalAlign(v) => style.vertical_align = *v,
            StyleChange::TextBackground(v) => style.background = v.clone(),
            _ => return false,
        }
        true
    }

    pub(crate) fn apply_to_shape(&self, style: &mut ShapeStyle) -> bool {
        match self {
            StyleChange::Fill(v) => style.fill = v.clone(),
            StyleChange::ShapeDetail1(v) => style.detail1 = *v,
            StyleChange::ShapeDetail2(v) => style.detail2 = *v,
            _ => return false,
        }
        true
    }

    pub(crate) fn apply_to_image(&self, style: &mut ImageStyle) -> bool {
        match self {
            StyleChange::ObjectFit(v) => style.fit = *v,
            _ => return false,
        }
        true
    }

    pub(crate) fn apply_to_table(&self, style: &mut TableStyle) -> bool {
        match self {
            StyleChange::TextColor(v) => style.text_color = *v,
            StyleChange::FontSize(v) => style.font_size = v.max(1.0),
            StyleChange::TextAlign(v) => style.align = *v,
            StyleChange::Fill(v) => style.background = v.clone(),
            StyleChange::HeaderFill(v) => style.header_fill = *v,
            StyleChange::HeaderTextColor(v) => style.header_text_color = *v,
            StyleChange::Striped(v) => style.striped = *v,
            StyleChange::StripeColor(v) => style.stripe_color = *v,
            _ => return false,
        }
        true
    }

    pub(crate) fn apply_to_path(&self, style: &mut PathStyle) -> bool {
        match self {
            StyleChange::StrokeColor(v) => style.color = *v,
            StyleChange::StrokeWidth(v) => style.width = v.max(0.5),
            StyleChange::LineCap(v) => style.cap = *v,
            StyleChange::LineJoin(v) => style.join = *v,
            _ => return false,
        }
        true
    }
}
