//! Style controls for the inspector panel.
//!
//! Every control shows the value of the first element it applies to. Edits
//! come back tagged with the section that produced them, and the caller
//! applies each edit only to the elements that section covers, so one
//! change fans out over a whole multi-selection.

use std::ops::RangeInclusive;

use egui::{Color32, Ui};

use crate::element::{Border, Element, ElementKind, Fill, LineStyle, ObjectFit, StyleChange, TextAlign};

const NEW_BORDER: Border = Border {
    width: 2.0,
    color: Color32::BLACK,
    line: LineStyle::Solid,
};

/// Group of style controls, one per element kind plus the shared appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleSection {
    Appearance,
    Text,
    Shape,
    Image,
    Table,
    Path,
}

impl StyleSection {
    pub fn of(kind: &ElementKind) -> Self {
        match kind {
            ElementKind::Text { .. } => StyleSection::Text,
            ElementKind::Shape { .. } => StyleSection::Shape,
            ElementKind::Image { .. } => StyleSection::Image,
            ElementKind::Table { .. } => StyleSection::Table,
            ElementKind::Path { .. } => StyleSection::Path,
        }
    }

    /// Whether edits from this section apply to `element`
    pub fn covers(self, element: &Element) -> bool {
        self == StyleSection::Appearance || StyleSection::of(&element.kind) == self
    }

    pub fn title(self) -> &'static str {
        match self {
            StyleSection::Appearance => "Appearance",
            StyleSection::Text => "Text",
            StyleSection::Shape => "Shape",
            StyleSection::Image => "Image",
            StyleSection::Table => "Table",
            StyleSection::Path => "Path",
        }
    }
}

/// A style change and the section it was made in
pub type StyleEdit = (StyleSection, StyleChange);

/// Draws the style controls for `elements` and returns this frame's edits.
pub fn style_controls(ui: &mut Ui, elements: &[&Element]) -> Vec<StyleEdit> {
    let mut edits = Vec::new();
    let Some(first) = elements.first() else {
        return edits;
    };
    section(ui, StyleSection::Appearance, &mut edits, |ui, out| appearance(ui, first, out));

    for kind in [
        StyleSection::Text,
        StyleSection::Shape,
        StyleSection::Image,
        StyleSection::Table,
        StyleSection::Path,
    ] {
        let Some(sample) = elements.iter().find(|e| kind.covers(e)) else {
            continue;
        };
        section(ui, kind, &mut edits, |ui, out| kind_controls(ui, sample, out));
    }
    edits
}

fn section(
    ui: &mut Ui,
    section: StyleSection,
    edits: &mut Vec<StyleEdit>,
    add_contents: impl FnOnce(&mut Ui, &mut Vec<StyleChange>),
) {
    ui.separator();
    ui.strong(section.title());
    let mut changes = Vec::new();
    egui::Grid::new(section.title())
        .num_columns(2)
        .show(ui, |ui| add_contents(ui, &mut changes));
    edits.extend(changes.into_iter().map(|change| (section, change)));
}

fn appearance(ui: &mut Ui, element: &Element, out: &mut Vec<StyleChange>) {
    let look = &element.appearance;

    let mut opacity = look.opacity;
    ui.label("Opacity");
    if ui.add(egui::Slider::new(&mut opacity, 0.0..=1.0)).changed() {
        out.push(StyleChange::Opacity(opacity));
    }
    ui.end_row();

    if let Some(radius) = number_row(ui, "Corner radius", look.corner_radius, 0.0..=200.0) {
        out.push(StyleChange::CornerRadius(radius));
    }

    if let Some(on) = toggle_row(ui, "Border", look.border.is_some()) {
        out.push(StyleChange::Border(on.then(|| look.border.unwrap_or(NEW_BORDER))));
    }
    if let Some(border) = look.border {
        let mut edited = border;
        if let Some(width) = number_row(ui, "Border width", border.width, 0.0..=50.0) {
            edited.width = width;
        }
        if let Some(color) = color_row(ui, "Border color", border.color) {
            edited.color = color;
        }
        if let Some(line) = choice_row(
            ui,
            "Border line",
            border.line,
            &[
                (LineStyle::Solid, "Solid"),
                (LineStyle::Dashed, "Dashed"),
                (LineStyle::Dotted, "Dotted"),
                (LineStyle::Double, "Double"),
            ],
        ) {
            edited.line = line;
        }
        if edited != border {
            out.push(StyleChange::Border(Some(edited)));
        }
    }

    if let Some(on) = toggle_row(ui, "Shadow", look.shadow.is_some()) {
        out.push(StyleChange::Shadow(on.then(|| look.shadow.unwrap_or_default())));
    }
    if let Some(shadow) = look.shadow {
        let mut edited = shadow;
        if let Some(color) = color_row(ui, "Shadow color", shadow.color) {
            edited.color = color;
        }
        if let Some(blur) = number_row(ui, "Shadow blur", shadow.blur, 0.0..=50.0) {
            edited.blur = blur;
        }
        if edited != shadow {
            out.push(StyleChange::Shadow(Some(edited)));
        }
    }
}

fn kind_controls(ui: &mut Ui, element: &Element, out: &mut Vec<StyleChange>) {
    match &element.kind {
        ElementKind::Text { style, .. } => {
            out.extend(color_row(ui, "Color", style.color).map(StyleChange::TextColor));
            out.extend(number_row(ui, "Size", style.font_size, 1.0..=200.0).map(StyleChange::FontSize));
            out.extend(toggle_row(ui, "Bold", style.bold).map(StyleChange::Bold));
            out.extend(toggle_row(ui, "Italic", style.italic).map(StyleChange::Italic));
            out.extend(align_row(ui, "Text align", style.align).map(StyleChange::TextAlign));
        }
        ElementKind::Shape { style, .. } => {
            out.extend(
                color_row(ui, "Fill", style.fill.base_color()).map(|c| StyleChange::Fill(Fill::Solid(c))),
            );
        }
        ElementKind::Image { style, .. } => {
            let fit = choice_row(
                ui,
                "Fit",
                style.fit,
                &[
                    (ObjectFit::Cover, "Cover"),
                    (ObjectFit::Contain, "Contain"),
                    (ObjectFit::Fill, "Fill"),
                ],
            );
            out.extend(fit.map(StyleChange::ObjectFit));
        }
        ElementKind::Table { style, .. } => {
            out.extend(color_row(ui, "Text color", style.text_color).map(StyleChange::TextColor));
            out.extend(number_row(ui, "Text size", style.font_size, 1.0..=100.0).map(StyleChange::FontSize));
            out.extend(color_row(ui, "Header", style.header_fill).map(StyleChange::HeaderFill));
            out.extend(color_row(ui, "Header text", style.header_text_color).map(StyleChange::HeaderTextColor));
            out.extend(
                color_row(ui, "Background", style.background.base_color())
                    .map(|c| StyleChange::Fill(Fill::Solid(c))),
            );
            out.extend(toggle_row(ui, "Striped", style.striped).map(StyleChange::Striped));
            out.extend(align_row(ui, "Cell align", style.align).map(StyleChange::TextAlign));
        }
        ElementKind::Path { style, .. } => {
            out.extend(color_row(ui, "Stroke", style.color).map(StyleChange::StrokeColor));
            out.extend(number_row(ui, "Width", style.width, 0.5..=50.0).map(StyleChange::StrokeWidth));
        }
    }
}

fn color_row(ui: &mut Ui, label: &str, color: Color32) -> Option<Color32> {
    let mut value = color;
    ui.label(label);
    let changed = ui.color_edit_button_srgba(&mut value).changed();
    ui.end_row();
    changed.then_some(value)
}

fn number_row(ui: &mut Ui, label: &str, value: f32, range: RangeInclusive<f32>) -> Option<f32> {
    let mut edited = value;
    ui.label(label);
    let changed = ui
        .add(egui::DragValue::new(&mut edited).range(range).speed(0.5))
        .changed();
    ui.end_row();
    changed.then_some(edited)
}

fn toggle_row(ui: &mut Ui, label: &str, value: bool) -> Option<bool> {
    let mut edited = value;
    ui.label(label);
    let changed = ui.checkbox(&mut edited, "").changed();
    ui.end_row();
    changed.then_some(edited)
}

fn choice_row<T: Copy + PartialEq>(ui: &mut Ui, label: &str, value: T, options: &[(T, &str)]) -> Option<T> {
    let mut edited = value;
    ui.label(label);
    let current = options
        .iter()
        .find(|(option, _)| *option == value)
        .map_or("", |(_, name)| *name);
    egui::ComboBox::from_id_salt(label)
        .selected_text(current)
        .show_ui(ui, |ui| {
            for (option, name) in options {
                ui.selectable_value(&mut edited, *option, *name);
            }
        });
    ui.end_row();
    (edited != value).then_some(edited)
}

fn align_row(ui: &mut Ui, label: &str, align: TextAlign) -> Option<TextAlign> {
    choice_row(
        ui,
        label,
        align,
        &[
            (TextAlign::Left, "Left"),
            (TextAlign::Center, "Center"),
            (TextAlign::Right, "Right"),
            (TextAlign::Justify, "Justify"),
        ],
    )
}
