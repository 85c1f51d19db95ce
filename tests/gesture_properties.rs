use egui::{Modifiers, PointerButton, Pos2, Vec2};
use slide_canvas::canvas::{CanvasController, CanvasHost, ContextTarget};
use slide_canvas::config::CanvasConfig;
use slide_canvas::element::{Element, ElementUpdate, Geometry, ShapeKind};
use slide_canvas::gesture::{
    rotation_from_pointer, snapshot_of, GestureEnd, GestureParams, GestureState, ResizeHandle,
};
use slide_canvas::id_generator::ElementId;
use slide_canvas::selection::{SelectRequest, Selection};
use slide_canvas::snap::snap_position;
use slide_canvas::surface::{PointerSource, ViewportTransform};

#[derive(Default)]
struct Recorder {
    updates: Vec<(ElementId, ElementUpdate)>,
    selects: Vec<(SelectRequest, bool)>,
    menus: Vec<ContextTarget>,
}

impl CanvasHost for Recorder {
    fn update_element(&mut self, id: ElementId, update: ElementUpdate) {
        self.updates.push((id, update));
    }

    fn select(&mut self, request: SelectRequest, multi: bool) {
        self.selects.push((request, multi));
    }

    fn request_context_menu(&mut self, _at: Pos2, target: ContextTarget) {
        self.menus.push(target);
    }
}

fn rect_element(x: f32, y: f32, w: f32, h: f32) -> Element {
    Element::shape(ShapeKind::Rectangle, Pos2::ZERO).with_geometry(Geometry::new(x, y, w, h))
}

fn unsnapped() -> GestureParams {
    GestureParams {
        snap_enabled: false,
        ..GestureParams::default()
    }
}

fn controller() -> CanvasController {
    let mut controller = CanvasController::new(CanvasConfig::default());
    controller.set_viewport(ViewportTransform::new(Pos2::ZERO, 1.0));
    controller
}

fn mouse(x: f32, y: f32) -> PointerSource {
    PointerSource::Mouse(Pos2::new(x, y))
}

#[test]
fn test_move_result_depends_only_on_final_pointer() {
    let elements = vec![rect_element(100.0, 100.0, 80.0, 60.0), rect_element(300.0, 200.0, 40.0, 40.0)];
    let ids: Vec<ElementId> = elements.iter().map(|e| e.id).collect();
    let origin = Pos2::new(120.0, 120.0);
    let target = Pos2::new(247.0, 83.0);

    for params in [unsnapped(), GestureParams::default()] {
        let single = GestureState::start_move(origin, snapshot_of(&elements, &ids))
            .apply_pointer(target, &params)
            .1;

        let mut state = GestureState::start_move(origin, snapshot_of(&elements, &ids));
        let mut last = None;
        for i in 0..50 {
            let wobble = Vec2::new((i * 37 % 23) as f32 - 11.0, (i * 17 % 31) as f32 - 15.0);
            let (next, frame) = state.apply_pointer(origin + wobble * i as f32, &params);
            state = next;
            last = Some(frame);
        }
        assert!(last.is_some());
        let (_, frame) = state.apply_pointer(target, &params);
        assert_eq!(frame, single);
    }
}

#[test]
fn test_resize_never_goes_below_minimum() {
    let element = rect_element(100.0, 100.0, 50.0, 50.0);
    let entry = snapshot_of(std::slice::from_ref(&element), &[element.id])[0];
    let params = GestureParams::default();

    for handle in ResizeHandle::ALL {
        let state = GestureState::start_resize(Pos2::ZERO, handle, entry);
        for delta in [Vec2::new(-500.0, -500.0), Vec2::new(500.0, 500.0), Vec2::new(-49.0, 49.0)] {
            let (_, frame) = state.clone().apply_pointer(Pos2::ZERO + delta, &params);
            let (_, update) = &frame.updates[0];
            assert!(update.width.unwrap() >= params.min_size, "{handle}");
            assert!(update.height.unwrap() >= params.min_size, "{handle}");
        }
    }
}

#[test]
fn test_resize_keeps_opposite_edge() {
    let start = Geometry::new(100.0, 100.0, 200.0, 100.0);
    let west = ResizeHandle::W.apply(&start, Vec2::new(50.0, 30.0), 5.0);
    assert_eq!(west.x + west.width, 300.0);
    assert_eq!(west.y, 100.0);
    assert_eq!(west.height, 100.0);

    let collapsed = ResizeHandle::N.apply(&start, Vec2::new(0.0, 500.0), 5.0);
    assert_eq!(collapsed.height, 5.0);
    assert_eq!(collapsed.y + collapsed.height, 200.0);
}

#[test]
fn test_snapping_is_idempotent() {
    let slide = Vec2::new(960.0, 540.0);
    for (x, y) in [(3.0, 2.0), (757.0, 336.0), (378.0, 168.0), (500.0, 100.0)] {
        let candidate = egui::Rect::from_min_size(Pos2::new(x, y), Vec2::new(200.0, 200.0));
        let once = snap_position(candidate, slide, 5.0);
        let again = snap_position(egui::Rect::from_min_size(once.position, candidate.size()), slide, 5.0);
        assert_eq!(once.position, again.position);
    }
}

#[test]
fn test_marquee_selects_by_unrotated_box() {
    let mut rotated = rect_element(100.0, 100.0, 100.0, 100.0);
    rotated.geometry.rotation = 45.0;
    let elements = vec![rotated];

    let finish_at = |to: Pos2| {
        let (state, _) = GestureState::start_marquee(Pos2::ZERO).apply_pointer(to, &unsnapped());
        state.finish(&elements)
    };
    // The rotated corner pokes out to about x = 79, but only the box counts
    assert_eq!(finish_at(Pos2::new(90.0, 160.0)), GestureEnd::Select(Vec::new()));
    assert_eq!(finish_at(Pos2::new(100.0, 100.0)), GestureEnd::Select(Vec::new()));
    assert_eq!(finish_at(Pos2::new(101.0, 101.0)), GestureEnd::Select(vec![elements[0].id]));
}

#[test]
fn test_rotation_cardinal_angles() {
    let c = Pos2::new(50.0, 50.0);
    for (pointer, expected) in [
        (Pos2::new(50.0, 0.0), 0.0),
        (Pos2::new(100.0, 50.0), 90.0),
        (Pos2::new(50.0, 100.0), 180.0),
        (Pos2::new(0.0, 50.0), 270.0),
    ] {
        let angle = rotation_from_pointer(c, pointer, None);
        assert!((angle - expected).abs() < 1e-3, "{angle} != {expected}");
    }
}

#[test]
fn test_locked_elements_are_never_moved() {
    let locked = rect_element(100.0, 100.0, 100.0, 100.0).with_locked(true);
    let free = rect_element(400.0, 100.0, 100.0, 100.0);
    let elements = vec![locked.clone(), free.clone()];
    let mut controller = controller();
    let mut host = Recorder::default();

    controller.pointer_down(&mut host, &mouse(150.0, 150.0), PointerButton::Primary, &Modifiers::NONE, &elements, &Selection::new());
    assert!(controller.state().is_none());
    controller.pointer_move(&mut host, &mouse(250.0, 250.0));
    assert!(host.updates.is_empty());

    // Part of a multi selection, the locked element stays put
    let mut selection = Selection::new();
    selection.apply(&SelectRequest::Many(vec![locked.id, free.id]), false);
    controller.pointer_down(&mut host, &mouse(450.0, 150.0), PointerButton::Primary, &Modifiers::NONE, &elements, &selection);
    controller.pointer_move(&mut host, &mouse(460.0, 170.0));
    assert!(!host.updates.is_empty());
    assert!(host.updates.iter().all(|(id, _)| *id == free.id));
}

#[test]
fn test_read_only_controller_ignores_everything() {
    let elements = vec![rect_element(100.0, 100.0, 100.0, 100.0)];
    let mut controller = controller();
    controller.set_read_only(true);
    let mut host = Recorder::default();

    controller.pointer_down(&mut host, &mouse(150.0, 150.0), PointerButton::Primary, &Modifiers::NONE, &elements, &Selection::new());
    controller.pointer_down(&mut host, &mouse(150.0, 150.0), PointerButton::Secondary, &Modifiers::NONE, &elements, &Selection::new());
    controller.pointer_move(&mut host, &mouse(10.0, 10.0));
    assert!(!controller.pointer_up(&mut host, None, &elements));
    assert!(host.updates.is_empty() && host.selects.is_empty() && host.menus.is_empty());
}

#[test]
fn test_zoomed_drag_moves_in_slide_units() {
    let elements = vec![rect_element(100.0, 100.0, 100.0, 100.0)];
    let mut controller = CanvasController::new(CanvasConfig {
        snap_enabled: false,
        ..CanvasConfig::default()
    });
    controller.set_viewport(ViewportTransform::new(Pos2::new(20.0, 10.0), 0.5));
    let mut host = Recorder::default();

    // Slide (150, 150) is screen (95, 85)
    controller.pointer_down(&mut host, &mouse(95.0, 85.0), PointerButton::Primary, &Modifiers::NONE, &elements, &Selection::new());
    controller.pointer_move(&mut host, &mouse(105.0, 90.0));
    let (id, update) = host.updates.last().unwrap();
    assert_eq!(*id, elements[0].id);
    assert_eq!((update.x, update.y), (Some(120.0), Some(110.0)));
    assert!(controller.pointer_up(&mut host, Some(&mouse(105.0, 90.0)), &elements));
}
