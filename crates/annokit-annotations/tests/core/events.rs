use annokit_annotations::events::{EventFlags, PointerEvent, ShapeEvent};
use annokit_annotations::model::{Point, ShapeGeometry};
use annokit_annotations::{AnnotationController, RecordingSurface, ShapeConfig, StaticViewport};

fn controller_with_rect() -> (AnnotationController, annokit_annotations::RenderableId) {
    let mut controller = AnnotationController::default();
    controller.build_canvas(
        &StaticViewport::new(200.0, 200.0, 1.0),
        Some(Box::new(RecordingSurface::default())),
    );
    controller.draw_rectangle(Some("r"), 10.0, 10.0, 20.0, 20.0, None, &ShapeConfig::new(), false);
    let target = controller.get_shape("r").unwrap().renderable().unwrap().id();
    (controller, target)
}

#[test]
fn test_events_start_disabled() {
    let (mut controller, target) = controller_with_rect();
    assert!(controller.get_shape("r").unwrap().event_flags().is_empty());
    assert!(!controller.handle_pointer_event(PointerEvent::Drag { target, dx: 5.0, dy: 0.0 }));
}

#[test]
fn test_unknown_event_name_is_skipped() {
    let (mut controller, _) = controller_with_rect();
    controller.enable_events_on_shapes(Some(&["r"]), Some(&["hover", "drag"]));
    let flags = controller.get_shape("r").unwrap().event_flags();
    assert!(flags.contains(ShapeEvent::Drag));
    assert_eq!(flags, [ShapeEvent::Drag].into_iter().collect::<EventFlags>());
}

#[test]
fn test_drag_updates_model_and_view() {
    let (mut controller, target) = controller_with_rect();
    controller.enable_events_on_shapes(None, None);

    assert!(controller.handle_pointer_event(PointerEvent::Drag { target, dx: 5.0, dy: -2.0 }));
    assert!(controller.handle_pointer_event(PointerEvent::Drag { target, dx: 1.0, dy: 1.0 }));
    assert!(controller.handle_pointer_event(PointerEvent::DragEnd { target }));

    match controller.get_shape("r").unwrap().geometry() {
        ShapeGeometry::Rectangle(rect) => assert_eq!(rect.origin, Point::new(16.0, 9.0)),
        other => panic!("unexpected geometry {:?}", other),
    }
    assert_eq!(controller.get_shape_center("r", true), Some(Point::new(26.0, 19.0)));
    assert!(controller.surface().unwrap().frames_drawn() >= 2);
}

#[test]
fn test_dragged_shape_serializes_new_position() {
    let (mut controller, target) = controller_with_rect();
    controller.enable_events_on_shapes(Some(&["r"]), Some(&["drag"]));
    controller.handle_pointer_event(PointerEvent::Drag { target, dx: 10.0, dy: 10.0 });

    let json = controller.get_shape_json("r").unwrap().to_value().unwrap();
    assert_eq!(json["origin_x"], serde_json::json!(20.0));
    assert_eq!(json["origin_y"], serde_json::json!(20.0));
}

#[test]
fn test_mouse_switch_blocks_pointer_events() {
    let (mut controller, target) = controller_with_rect();
    controller.enable_events_on_shapes(None, None);
    controller.disable_mouse_events();
    assert!(!controller.mouse_events_enabled());
    assert!(!controller.handle_pointer_event(PointerEvent::Drag { target, dx: 5.0, dy: 5.0 }));

    controller.enable_mouse_events();
    assert!(controller.handle_pointer_event(PointerEvent::Drag { target, dx: 5.0, dy: 5.0 }));
}

#[test]
fn test_disable_events_stops_drag() {
    let (mut controller, target) = controller_with_rect();
    controller.enable_events_on_shapes(None, None);
    controller.disable_events_on_shapes(Some(&["r", "missing"]), Some(&["drag"]));
    assert!(!controller.handle_pointer_event(PointerEvent::Drag { target, dx: 5.0, dy: 5.0 }));
}

#[test]
fn test_events_for_deleted_shape_are_ignored() {
    let (mut controller, target) = controller_with_rect();
    controller.enable_events_on_shapes(None, None);
    controller.delete_shape("r", false);
    assert!(!controller.handle_pointer_event(PointerEvent::DragEnd { target }));
}
