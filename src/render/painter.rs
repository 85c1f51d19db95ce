//! egui backend for visual nodes.
//!
//! Everything is built in slide space on the un-rotated box, then flipped,
//! rotated about the element center and mapped to the screen. Fills become
//! triangulated meshes so that rotated and non-convex outlines paint
//! correctly.

use egui::emath::Rot2;
use egui::epaint::TextShape;
use egui::text::{LayoutJob, TextFormat};
use egui::{Align, Color32, FontId, Mesh, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use super::{SelectionChrome, TableCell, TextureCache, VisualBody, VisualNode};
use crate::element::{
    rotate_about, Border, Fill, ImageSource, LineStyle, ObjectFit, TextAlign, TextDecoration,
    TextStyle, VerticalAlign,
};
use crate::gesture::HandleKind;
use crate::slide::Background;
use crate::snap::Guide;
use crate::surface::ViewportTransform;

pub const SELECTION_COLOR: Color32 = Color32::from_rgb(59, 130, 246);
const GUIDE_COLOR: Color32 = Color32::from_rgb(236, 72, 153);
const PLACEHOLDER_FILL: Color32 = Color32::from_rgb(241, 245, 249);
const PLACEHOLDER_TEXT: Color32 = Color32::from_rgb(100, 116, 139);
const ELLIPSE_SEGMENTS: usize = 48;
const CORNER_SEGMENTS: usize = 6;

/// Places slide-space points of one node on the screen
struct NodeFrame<'a> {
    transform: &'a ViewportTransform,
    center: Pos2,
    rotation: f32,
    flip_x: bool,
    flip_y: bool,
}

impl<'a> NodeFrame<'a> {
    fn new(transform: &'a ViewportTransform, node: &VisualNode) -> Self {
        Self {
            transform,
            center: node.rect.center(),
            rotation: node.rotation,
            flip_x: node.appearance.flip_x,
            flip_y: node.appearance.flip_y,
        }
    }

    /// Without flipping, for text and chrome
    fn place_rigid(&self, p: Pos2) -> Pos2 {
        self.transform.to_screen(rotate_about(p, self.center, self.rotation))
    }

    fn place(&self, mut p: Pos2) -> Pos2 {
        if self.flip_x {
            p.x = 2.0 * self.center.x - p.x;
        }
        if self.flip_y {
            p.y = 2.0 * self.center.y - p.y;
        }
        self.place_rigid(p)
    }

    fn place_all(&self, points: &[Pos2]) -> Vec<Pos2> {
        points.iter().map(|p| self.place(*p)).collect()
    }

    fn scale(&self) -> f32 {
        self.transform.scale()
    }
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgba_premultiplied(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()), mix(a.a(), b.a()))
}

/// Fill color at a slide-space point of `bounds`.
///
/// Linear gradient angles follow the CSS convention: 0 points up, 90 right.
pub fn color_at(fill: &Fill, bounds: Rect, p: Pos2) -> Color32 {
    match fill {
        Fill::None => Color32::TRANSPARENT,
        Fill::Solid(color) => *color,
        Fill::LinearGradient { from, to, angle } => {
            let (sin, cos) = angle.to_radians().sin_cos();
            let dir = Vec2::new(sin, -cos);
            let half = (bounds.width() * sin.abs() + bounds.height() * cos.abs()) / 2.0;
            if half <= f32::EPSILON {
                return *from;
            }
            let t = 0.5 + (p - bounds.center()).dot(dir) / (2.0 * half);
            lerp_color(*from, *to, t)
        }
        Fill::RadialGradient { inner, outer } => {
            let radius = bounds.size().length() / 2.0;
            if radius <= f32::EPSILON {
                return *inner;
            }
            lerp_color(*inner, *outer, (p - bounds.center()).length() / radius)
        }
    }
}

fn cross(a: Pos2, b: Pos2, c: Pos2) -> f32 {
    let ab = b - a;
    let bc = c - b;
    ab.x * bc.y - ab.y * bc.x
}

fn strictly_inside(p: Pos2, a: Pos2, b: Pos2, c: Pos2) -> bool {
    let d1 = cross(a, b, p);
    let d2 = cross(b, c, p);
    let d3 = cross(c, a, p);
    (d1 > 0.0 && d2 > 0.0 && d3 > 0.0) || (d1 < 0.0 && d2 < 0.0 && d3 < 0.0)
}

fn is_convex(points: &[Pos2]) -> bool {
    let n = points.len();
    let mut sign = 0.0f32;
    for i in 0..n {
        let c = cross(points[i], points[(i + 1) % n], points[(i + 2) % n]);
        if c.abs() <= f32::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = c.signum();
        } else if c.signum() != sign {
            return false;
        }
    }
    true
}

/// Triangulates a simple polygon by ear clipping. Returns vertex indices,
/// three per triangle.
pub fn triangulate(points: &[Pos2]) -> Vec<u32> {
    let n = points.len();
    if n < 3 {
        return Vec::new();
    }
    let area: f32 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    let orientation = if area >= 0.0 { 1.0 } else { -1.0 };

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut indices = Vec::with_capacity((n - 2) * 3);
    while remaining.len() > 3 {
        let m = remaining.len();
        let ear = (0..m).find(|&i| {
            let (ia, ib, ic) = (remaining[(i + m - 1) % m], remaining[i], remaining[(i + 1) % m]);
            let (a, b, c) = (points[ia], points[ib], points[ic]);
            if cross(a, b, c) * orientation <= 0.0 {
                return false;
            }
            remaining
                .iter()
                .filter(|&&j| j != ia && j != ib && j != ic)
                .all(|&j| !strictly_inside(points[j], a, b, c))
        });
        // Degenerate input: finish with a fan below
        let Some(i) = ear else { break };
        let m = remaining.len();
        indices.extend([remaining[(i + m - 1) % m], remaining[i], remaining[(i + 1) % m]].map(|v| v as u32));
        remaining.remove(i);
    }
    for k in 1..remaining.len().saturating_sub(1) {
        indices.extend([remaining[0], remaining[k], remaining[k + 1]].map(|v| v as u32));
    }
    indices
}

/// Outline of a rectangle with rounded corners, clockwise on screen
pub fn rounded_rect_points(rect: Rect, radius: f32) -> Vec<Pos2> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
    if r <= 0.0 {
        return vec![rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
    }
    let corners = [
        (Pos2::new(rect.left() + r, rect.top() + r), 180.0f32),
        (Pos2::new(rect.right() - r, rect.top() + r), 270.0),
        (Pos2::new(rect.right() - r, rect.bottom() - r), 0.0),
        (Pos2::new(rect.left() + r, rect.bottom() - r), 90.0),
    ];
    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (center, start) in corners {
        for s in 0..=CORNER_SEGMENTS {
            let angle = (start + 90.0 * s as f32 / CORNER_SEGMENTS as f32).to_radians();
            points.push(center + r * Vec2::new(angle.cos(), angle.sin()));
        }
    }
    points
}

pub fn ellipse_points(rect: Rect) -> Vec<Pos2> {
    let radius = rect.size() / 2.0;
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let t = std::f32::consts::TAU * i as f32 / ELLIPSE_SEGMENTS as f32;
            rect.center() + Vec2::new(radius.x * t.cos(), radius.y * t.sin())
        })
        .collect()
}

/// Destination rect and UV rect for an image of `image_size` drawn into `rect`
pub fn fit_image(fit: ObjectFit, rect: Rect, image_size: Vec2) -> (Rect, Rect) {
    let full = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return (rect, full);
    }
    match fit {
        ObjectFit::Fill => (rect, full),
        ObjectFit::Contain => {
            let scale = (rect.width() / image_size.x).min(rect.height() / image_size.y);
            (Rect::from_center_size(rect.center(), image_size * scale), full)
        }
        ObjectFit::Cover => {
            let scale = (rect.width() / image_size.x).max(rect.height() / image_size.y);
            let visible = Vec2::new(
                rect.width() / (image_size.x * scale),
                rect.height() / (image_size.y * scale),
            );
            (rect, Rect::from_center_size(Pos2::new(0.5, 0.5), visible))
        }
    }
}

fn fill_mesh(points: &[Pos2], fill: &Fill, bounds: Rect, frame: &NodeFrame<'_>, opacity: f32) -> Option<Shape> {
    if matches!(fill, Fill::None) || points.len() < 3 || opacity <= 0.0 {
        return None;
    }
    let mut mesh = Mesh::default();
    let radial_fan = matches!(fill, Fill::RadialGradient { .. }) && is_convex(points);
    if radial_fan {
        // A center vertex gives the gradient something to interpolate from
        let center = bounds.center();
        mesh.colored_vertex(frame.place(center), color_at(fill, bounds, center).gamma_multiply(opacity));
    }
    let base = mesh.vertices.len() as u32;
    for p in points {
        mesh.colored_vertex(frame.place(*p), color_at(fill, bounds, *p).gamma_multiply(opacity));
    }
    if radial_fan {
        let n = points.len() as u32;
        for i in 0..n {
            mesh.add_triangle(0, base + i, base + (i + 1) % n);
        }
    } else {
        for tri in triangulate(points).chunks_exact(3) {
            mesh.add_triangle(base + tri[0], base + tri[1], base + tri[2]);
        }
    }
    Some(Shape::mesh(mesh))
}

fn outline_shapes(shapes: &mut Vec<Shape>, screen: Vec<Pos2>, closed: bool, border: &Border, scale: f32, opacity: f32) {
    let stroke = Stroke::new(border.width * scale, border.color.gamma_multiply(opacity));
    if border.width <= 0.0 || screen.len() < 2 {
        return;
    }
    let mut path = screen;
    if closed {
        if let Some(first) = path.first().copied() {
            path.push(first);
        }
    }
    match border.line {
        LineStyle::Solid | LineStyle::Double => shapes.push(Shape::line(path, stroke)),
        LineStyle::Dashed => shapes.extend(Shape::dashed_line(&path, stroke, 3.0 * stroke.width.max(1.0), 2.0 * stroke.width.max(1.0))),
        LineStyle::Dotted => shapes.extend(Shape::dotted_line(&path, stroke.color, 2.0 * stroke.width.max(1.0), stroke.width / 2.0)),
    }
}

/// Outline used for shadows and borders, in slide space
fn body_outline(node: &VisualNode) -> Option<Vec<Pos2>> {
    match &node.body {
        VisualBody::Fill { ellipse: true, .. } => Some(ellipse_points(node.rect)),
        VisualBody::Polygon { points, .. } => Some(points.clone()),
        VisualBody::Stroke { .. } => None,
        _ => Some(rounded_rect_points(node.rect, node.appearance.corner_radius)),
    }
}

fn paint_text(
    shapes: &mut Vec<Shape>,
    painter: &Painter,
    frame: &NodeFrame<'_>,
    rect: Rect,
    content: &str,
    style: &TextStyle,
    opacity: f32,
) {
    let scale = frame.scale();
    let color = style.color.gamma_multiply(opacity);
    let line = |on: bool| {
        if on {
            Stroke::new((style.font_size * scale / 16.0).max(1.0), color)
        } else {
            Stroke::NONE
        }
    };

    let mut job = LayoutJob::default();
    job.wrap.max_width = (rect.width() * scale).max(1.0);
    job.halign = match style.align {
        TextAlign::Left | TextAlign::Justify => Align::LEFT,
        TextAlign::Center => Align::Center,
        TextAlign::Right => Align::RIGHT,
    };
    job.append(
        content,
        0.0,
        TextFormat {
            font_id: FontId::proportional(style.font_size * scale),
            color,
            italics: style.italic,
            underline: line(style.decoration == TextDecoration::Underline),
            strikethrough: line(style.decoration == TextDecoration::LineThrough),
            extra_letter_spacing: style.letter_spacing * scale,
            line_height: Some(style.font_size * style.line_height * scale),
            ..Default::default()
        },
    );
    let halign = job.halign;
    let galley = painter.layout_job(job);

    let text_height = galley.size().y / scale.max(f32::EPSILON);
    let x = match halign {
        Align::Min => rect.left(),
        Align::Center => rect.center().x,
        Align::Max => rect.right(),
    };
    let y = match style.vertical_align {
        VerticalAlign::Top => rect.top(),
        VerticalAlign::Middle => rect.center().y - text_height / 2.0,
        VerticalAlign::Bottom => rect.bottom() - text_height,
    };
    let anchor = frame.place_rigid(Pos2::new(x, y));
    shapes.push(TextShape::new(anchor, galley, color).with_angle(frame.rotation.to_radians()).into());
}

fn rect_points(rect: Rect) -> Vec<Pos2> {
    vec![rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()]
}

fn paint_table(
    shapes: &mut Vec<Shape>,
    painter: &Painter,
    frame: &NodeFrame<'_>,
    cells: &[TableCell],
    font_size: f32,
    grid: Option<&Border>,
    opacity: f32,
) {
    for cell in cells {
        let points = rect_points(cell.rect);
        shapes.extend(fill_mesh(&points, &Fill::Solid(cell.fill), cell.rect, frame, opacity));
        let style = TextStyle {
            color: cell.text_color,
            font_size,
            bold: cell.header,
            vertical_align: VerticalAlign::Middle,
            ..TextStyle::default()
        };
        if !cell.editing {
            paint_text(shapes, painter, frame, cell.rect.shrink(4.0), &cell.text, &style, opacity);
        }
        if let Some(border) = grid {
            outline_shapes(shapes, frame.place_all(&points), true, border, frame.scale(), opacity);
        }
    }
}

fn paint_image(
    shapes: &mut Vec<Shape>,
    painter: &Painter,
    frame: &NodeFrame<'_>,
    node: &VisualNode,
    source: &ImageSource,
    fit: ObjectFit,
    textures: &mut TextureCache,
) {
    let texture = match source {
        ImageSource::Bitmap(bytes) if !bytes.is_empty() => textures.texture_for(painter.ctx(), node.id, bytes),
        _ => None,
    };

    let Some(texture) = texture else {
        let outline = rounded_rect_points(node.rect, node.appearance.corner_radius);
        shapes.extend(fill_mesh(&outline, &Fill::Solid(PLACEHOLDER_FILL), node.rect, frame, node.opacity));
        let label = match source {
            ImageSource::Url(url) if !url.trim().is_empty() => url.as_str(),
            _ => "🖼 Image",
        };
        let style = TextStyle {
            color: PLACEHOLDER_TEXT,
            font_size: 14.0,
            align: TextAlign::Center,
            vertical_align: VerticalAlign::Middle,
            ..TextStyle::default()
        };
        paint_text(shapes, painter, frame, node.rect, label, &style, node.opacity);
        return;
    };

    let (dest, mut uv) = fit_image(fit, node.rect, texture.size_vec2());
    if node.appearance.flip_x {
        uv = Rect::from_min_max(Pos2::new(uv.max.x, uv.min.y), Pos2::new(uv.min.x, uv.max.y));
    }
    if node.appearance.flip_y {
        uv = Rect::from_min_max(Pos2::new(uv.min.x, uv.max.y), Pos2::new(uv.max.x, uv.min.y));
    }
    let transform = frame.transform;
    let screen = Rect::from_min_max(transform.to_screen(dest.min), transform.to_screen(dest.max));
    let mut mesh = Mesh::with_texture(texture.id());
    mesh.add_rect_with_uv(screen, uv, Color32::WHITE.gamma_multiply(node.opacity));
    mesh.rotate(Rot2::from_angle(node.rotation.to_radians()), transform.to_screen(frame.center));
    shapes.push(Shape::mesh(mesh));
}

fn paint_chrome(shapes: &mut Vec<Shape>, frame: &NodeFrame<'_>, node: &VisualNode, chrome: &SelectionChrome, handle_radius: f32) {
    let scale = frame.scale();
    let stroke = Stroke::new(2.0, SELECTION_COLOR);
    if chrome.border {
        let mut corners: Vec<Pos2> = rect_points(node.rect).into_iter().map(|p| frame.place_rigid(p)).collect();
        corners.push(corners[0]);
        shapes.push(Shape::line(corners, stroke));
    }
    let radius = (handle_radius * scale).max(3.0);
    for (kind, pos) in &chrome.handles {
        let screen = frame.transform.to_screen(*pos);
        if *kind == HandleKind::Rotate {
            let top = frame.place_rigid(Pos2::new(node.rect.center().x, node.rect.top()));
            shapes.push(Shape::line_segment([top, screen], Stroke::new(1.0, SELECTION_COLOR)));
        }
        shapes.push(Shape::circle_filled(screen, radius, Color32::WHITE));
        shapes.push(Shape::circle_stroke(screen, radius, Stroke::new(1.5, SELECTION_COLOR)));
    }
}

/// Paints one node: shadow, body, border, then selection chrome.
pub fn paint_node(
    painter: &Painter,
    transform: &ViewportTransform,
    node: &VisualNode,
    textures: &mut TextureCache,
    handle_radius: f32,
) {
    let frame = NodeFrame::new(transform, node);
    let scale = frame.scale();
    let mut shapes = Vec::new();

    if node.opacity > 0.0 {
        // Transparent text boxes cast no box shadow
        let casts_shadow = !matches!(&node.body, VisualBody::Text { style, .. } if style.background == Fill::None);
        if let (Some(shadow), Some(outline), true) = (&node.appearance.shadow, body_outline(node), casts_shadow) {
            let shifted: Vec<Pos2> = outline.iter().map(|p| *p + shadow.offset).collect();
            shapes.extend(fill_mesh(&shifted, &Fill::Solid(shadow.color), node.rect, &frame, node.opacity));
        }

        match &node.body {
            VisualBody::Text { content, style, editing } => {
                let outline = rounded_rect_points(node.rect, node.appearance.corner_radius);
                shapes.extend(fill_mesh(&outline, &style.background, node.rect, &frame, node.opacity));
                // While editing, the owner draws an input widget on top
                if !editing {
                    paint_text(&mut shapes, painter, &frame, node.rect, content, style, node.opacity);
                }
            }
            VisualBody::Fill { fill, ellipse } => {
                let outline = if *ellipse {
                    ellipse_points(node.rect)
                } else {
                    rounded_rect_points(node.rect, node.appearance.corner_radius)
                };
                shapes.extend(fill_mesh(&outline, fill, node.rect, &frame, node.opacity));
            }
            VisualBody::Polygon { points, fill } => {
                shapes.extend(fill_mesh(points, fill, node.rect, &frame, node.opacity));
            }
            VisualBody::Image { source, fit } => {
                paint_image(&mut shapes, painter, &frame, node, source, *fit, textures);
            }
            VisualBody::Table { cells, font_size, grid } => {
                paint_table(&mut shapes, painter, &frame, cells, *font_size, grid.as_ref(), node.opacity);
            }
            VisualBody::Stroke { subpaths, style } => {
                let stroke = Stroke::new(style.width * scale, style.color.gamma_multiply(node.opacity));
                for sub in subpaths {
                    shapes.push(Shape::line(frame.place_all(sub), stroke));
                }
            }
        }

        if let (Some(border), Some(outline)) = (&node.appearance.border, body_outline(node)) {
            outline_shapes(&mut shapes, frame.place_all(&outline), true, border, scale, node.opacity);
        }
    }

    if let Some(chrome) = &node.chrome {
        paint_chrome(&mut shapes, &frame, node, chrome, handle_radius);
    }
    painter.extend(shapes);
}

/// Paints the slide background
pub fn paint_background(painter: &Painter, transform: &ViewportTransform, slide_size: Vec2, background: &Background) {
    let bounds = Rect::from_min_size(Pos2::ZERO, slide_size);
    let fill = match background {
        Background::Solid(color) => Fill::Solid(*color),
        Background::LinearGradient { from, to, angle } => Fill::LinearGradient {
            from: *from,
            to: *to,
            angle: *angle,
        },
        Background::RadialGradient { inner, outer } => Fill::RadialGradient {
            inner: *inner,
            outer: *outer,
        },
    };
    let frame = NodeFrame {
        transform,
        center: bounds.center(),
        rotation: 0.0,
        flip_x: false,
        flip_y: false,
    };
    if let Some(shape) = fill_mesh(&rect_points(bounds), &fill, bounds, &frame, 1.0) {
        painter.add(shape);
    }
}

/// Paints active snap guides across the slide
pub fn paint_guides(painter: &Painter, transform: &ViewportTransform, guides: &[Guide], slide_size: Vec2) {
    let stroke = Stroke::new(1.0, GUIDE_COLOR);
    for guide in guides {
        let [a, b] = guide.segment(slide_size);
        painter.extend(Shape::dashed_line(&[transform.to_screen(a), transform.to_screen(b)], stroke, 6.0, 4.0));
    }
}

/// Paints the rubber-band rectangle
pub fn paint_marquee(painter: &Painter, transform: &ViewportTransform, rect: Rect) {
    let screen = Rect::from_min_max(transform.to_screen(rect.min), transform.to_screen(rect.max));
    painter.rect_filled(screen, 0.0, SELECTION_COLOR.gamma_multiply(0.1));
    painter.rect_stroke(screen, 0.0, Stroke::new(1.0, SELECTION_COLOR));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{polygon_in_rect, ShapeKind};

    fn polygon_area(points: &[Pos2]) -> f32 {
        let n = points.len();
        (0..n)
            .map(|i| {
                let (a, b) = (points[i], points[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f32>()
            .abs()
            / 2.0
    }

    fn triangles_area(points: &[Pos2], indices: &[u32]) -> f32 {
        indices
            .chunks_exact(3)
            .map(|t| polygon_area(&[points[t[0] as usize], points[t[1] as usize], points[t[2] as usize]]))
            .sum()
    }

    #[test]
    fn triangulation_covers_non_convex_shapes() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.0));
        for shape in [ShapeKind::Star, ShapeKind::Arrow, ShapeKind::Bubble, ShapeKind::Hexagon] {
            let points = polygon_in_rect(&shape.clip_polygon(None, None).unwrap(), rect);
            let indices = triangulate(&points);
            assert_eq!(indices.len(), (points.len() - 2) * 3, "{}", shape.name());
            let expected = polygon_area(&points);
            assert!((triangles_area(&points, &indices) - expected).abs() < 1e-2, "{}", shape.name());
        }
    }

    #[test]
    fn triangulation_handles_tiny_input() {
        assert!(triangulate(&[Pos2::ZERO, Pos2::new(1.0, 0.0)]).is_empty());
        assert_eq!(triangulate(&[Pos2::ZERO, Pos2::new(1.0, 0.0), Pos2::new(0.0, 1.0)]).len(), 3);
    }

    #[test]
    fn contain_letterboxes_and_cover_crops() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(200.0, 100.0));
        let image = Vec2::new(100.0, 100.0);

        let (dest, uv) = fit_image(ObjectFit::Contain, rect, image);
        assert_eq!(dest, Rect::from_min_size(Pos2::new(50.0, 0.0), Vec2::splat(100.0)));
        assert_eq!(uv.size(), Vec2::splat(1.0));

        let (dest, uv) = fit_image(ObjectFit::Cover, rect, image);
        assert_eq!(dest, rect);
        assert_eq!(uv, Rect::from_min_max(Pos2::new(0.0, 0.25), Pos2::new(1.0, 0.75)));
    }

    #[test]
    fn linear_gradient_runs_along_angle() {
        let bounds = Rect::from_min_size(Pos2::ZERO, Vec2::new(100.0, 50.0));
        let fill = Fill::LinearGradient {
            from: Color32::BLACK,
            to: Color32::WHITE,
            angle: 90.0,
        };
        assert_eq!(color_at(&fill, bounds, Pos2::new(0.0, 25.0)), Color32::BLACK);
        assert_eq!(color_at(&fill, bounds, Pos2::new(100.0, 0.0)), Color32::WHITE);
    }

    #[test]
    fn rounded_corners_are_clamped() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::new(20.0, 10.0));
        assert_eq!(rounded_rect_points(rect, 0.0).len(), 4);
        let points = rounded_rect_points(rect, 50.0);
        assert!(points.iter().all(|p| rect.expand(1e-3).contains(*p)));
    }
}
