use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Star,
    Diamond,
    Hexagon,
    Arrow,
    Bubble,
}

const ARROW_HEAD_START: f32 = 70.0;
const ARROW_SHAFT: f32 = 60.0;
const BUBBLE_TAIL_X: f32 = 70.0;
const BUBBLE_TAIL_WIDTH: f32 = 20.0;
/// Bubble body ends at 80% of the height, the tail fills the rest
const BUBBLE_BODY: f32 = 80.0;

impl ShapeKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Diamond => "diamond",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Arrow => "arrow",
            ShapeKind::Bubble => "bubble",
        }
    }

    /// Rectangles and circles are drawn directly; every other kind is a
    /// polygon mask over the element box.
    pub fn is_basic(&self) -> bool {
        matches!(self, ShapeKind::Rectangle | ShapeKind::Circle)
    }

    /// Outline polygon in percent of the element box (0..=100 on both axes).
    ///
    /// Returns `None` for basic shapes. `detail1`/`detail2` only affect arrows
    /// (head start, shaft thickness) and bubbles (tail x, tail width); zero or
    /// missing values fall back to the defaults.
    pub fn clip_polygon(&self, detail1: Option<f32>, detail2: Option<f32>) -> Option<Vec<[f32; 2]>> {
        let d1 = detail1.filter(|v| *v > 0.0);
        let d2 = detail2.filter(|v| *v > 0.0);
        let points = match self {
            ShapeKind::Rectangle | ShapeKind::Circle => return None,
            ShapeKind::Triangle => vec![[50.0, 0.0], [0.0, 100.0], [100.0, 100.0]],
            ShapeKind::Star => vec![
                [50.0, 0.0],
                [61.0, 35.0],
                [98.0, 35.0],
                [68.0, 57.0],
                [79.0, 91.0],
                [50.0, 70.0],
                [21.0, 91.0],
                [32.0, 57.0],
                [2.0, 35.0],
                [39.0, 35.0],
            ],
            ShapeKind::Diamond => vec![[50.0, 0.0], [100.0, 50.0], [50.0, 100.0], [0.0, 50.0]],
            ShapeKind::Hexagon => vec![
                [25.0, 0.0],
                [75.0, 0.0],
                [100.0, 50.0],
                [75.0, 100.0],
                [25.0, 100.0],
                [0.0, 50.0],
            ],
            ShapeKind::Arrow => {
                let head = d1.unwrap_or(ARROW_HEAD_START).clamp(0.0, 100.0);
                let shaft = d2.unwrap_or(ARROW_SHAFT).clamp(0.0, 100.0);
                let gap = (100.0 - shaft) / 2.0;
                vec![
                    [0.0, gap],
                    [head, gap],
                    [head, 0.0],
                    [100.0, 50.0],
                    [head, 100.0],
                    [head, 100.0 - gap],
                    [0.0, 100.0 - gap],
                ]
            }
            ShapeKind::Bubble => {
                let tail_x = d1.unwrap_or(BUBBLE_TAIL_X).clamp(0.0, 100.0);
                let half = d2.map_or(BUBBLE_TAIL_WIDTH / 2.0, |w| w / 2.0);
                vec![
                    [0.0, 0.0],
                    [100.0, 0.0],
                    [100.0, BUBBLE_BODY],
                    [(tail_x + half).min(100.0), BUBBLE_BODY],
                    [tail_x, 100.0],
                    [(tail_x - half).max(0.0), BUBBLE_BODY],
                    [0.0, BUBBLE_BODY],
                ]
            }
        };
        Some(points)
    }
}

/// Scales a percent polygon into `rect`.
pub fn polygon_in_rect(percent: &[[f32; 2]], rect: Rect) -> Vec<Pos2> {
    percent
        .iter()
        .map(|[px, py]| {
            Pos2::new(
                rect.min.x + rect.width() * px / 100.0,
                rect.min.y + rect.height() * py / 100.0,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Vec2;

    #[test]
    fn basic_shapes_have_no_mask() {
        assert!(ShapeKind::Rectangle.clip_polygon(None, None).is_none());
        assert!(ShapeKind::Circle.clip_polygon(Some(10.0), None).is_none());
    }

    #[test]
    fn arrow_uses_detail_parameters() {
        let pts = ShapeKind::Arrow.clip_polygon(Some(50.0), Some(40.0)).unwrap();
        assert_eq!(pts[0], [0.0, 30.0]);
        assert_eq!(pts[1], [50.0, 30.0]);
        assert_eq!(pts[3], [100.0, 50.0]);
        assert_eq!(pts[6], [0.0, 70.0]);
    }

    #[test]
    fn arrow_defaults_when_details_missing() {
        let pts = ShapeKind::Arrow.clip_polygon(None, Some(0.0)).unwrap();
        assert_eq!(pts[1], [70.0, 20.0]);
    }

    #[test]
    fn bubble_tail_is_clamped_to_box() {
        let pts = ShapeKind::Bubble.clip_polygon(Some(95.0), Some(20.0)).unwrap();
        assert_eq!(pts[3], [100.0, 80.0]);
        assert_eq!(pts[4], [95.0, 100.0]);
        assert_eq!(pts[5], [85.0, 80.0]);
    }

    #[test]
    fn polygon_scales_into_rect() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(200.0, 100.0));
        let pts = polygon_in_rect(&[[50.0, 0.0], [100.0, 100.0]], rect);
        assert_eq!(pts, vec![Pos2::new(110.0, 20.0), Pos2::new(210.0, 120.0)]);
    }
}
