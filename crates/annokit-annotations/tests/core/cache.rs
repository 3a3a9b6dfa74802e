use annokit_annotations::model::{Circle, Point, Rectangle, Shape, ShapeKind};
use annokit_annotations::{AnnotationController, RecordingSurface, ShapeConfig, StaticViewport};
use annokit_core::AnnotationError;

fn controller() -> AnnotationController {
    let mut controller = AnnotationController::default();
    controller.build_canvas(
        &StaticViewport::new(400.0, 300.0, 1.0),
        Some(Box::new(RecordingSurface::default())),
    );
    controller
}

fn frames(controller: &AnnotationController) -> u64 {
    controller.surface().map(|s| s.frames_drawn()).unwrap_or(0)
}

#[test]
fn test_generate_id_after_existing() {
    let mut controller = controller();
    assert!(controller.add_to_cache(Shape::new("a_1", Circle::new(Point::new(0.0, 0.0), 1.0), None)));
    assert!(controller.add_to_cache(Shape::new("a_2", Circle::new(Point::new(0.0, 0.0), 1.0), None)));
    assert_eq!(controller.generate_id("a"), "a_3");
    assert_eq!(controller.generate_id("b"), "b_1");
}

#[test]
fn test_duplicate_insert_keeps_first() {
    let mut controller = controller();
    controller.draw_circle(Some("c"), 10.0, 10.0, 5.0, None, &ShapeConfig::new(), false);

    let duplicate = Shape::new("c", Rectangle::new(Point::new(0.0, 0.0), 1.0, 1.0), None);
    assert!(!controller.add_to_cache(duplicate));
    assert_eq!(controller.shape_count(), 1);
    assert_eq!(controller.get_shape("c").unwrap().kind(), ShapeKind::Circle);
}

#[test]
fn test_generated_ids_follow_kind() {
    let mut controller = controller();
    let config = ShapeConfig::new();
    let r1 = controller.draw_rectangle(None, 0.0, 0.0, 5.0, 5.0, None, &config, false);
    let r2 = controller.draw_rectangle(None, 10.0, 0.0, 5.0, 5.0, None, &config, false);
    let l1 = controller.draw_line(None, Point::new(0.0, 0.0), Point::new(5.0, 5.0), None, &config, false);
    assert_eq!(r1.as_deref(), Some("rectangle_1"));
    assert_eq!(r2.as_deref(), Some("rectangle_2"));
    assert_eq!(l1.as_deref(), Some("polyline_1"));
}

#[test]
fn test_bulk_hide_refreshes_exactly_once() {
    let mut controller = controller();
    for i in 0..5 {
        controller.draw_circle(None, 20.0 * i as f64, 50.0, 5.0, None, &ShapeConfig::new(), false);
    }
    let before = frames(&controller);
    controller.hide_shapes(None, true);
    assert_eq!(frames(&controller), before + 1);
    assert!(controller.get_shapes(None).iter().all(|s| !s.is_visible()));

    controller.show_shapes(Some(&["circle_2", "circle_4"]), true);
    assert_eq!(frames(&controller), before + 2);
    assert!(controller.get_shape("circle_2").unwrap().is_visible());
    assert!(!controller.get_shape("circle_3").unwrap().is_visible());
}

#[test]
fn test_draw_without_refresh_does_not_draw() {
    let mut controller = controller();
    controller.draw_circle(None, 10.0, 10.0, 5.0, None, &ShapeConfig::new(), false);
    assert_eq!(frames(&controller), 0);
    controller.draw_circle(None, 30.0, 10.0, 5.0, None, &ShapeConfig::new(), true);
    assert_eq!(frames(&controller), 1);
}

#[test]
fn test_remove_point_on_empty_polyline() {
    let mut controller = controller();
    controller.draw_polyline(Some("p"), Vec::new(), None, &ShapeConfig::new(), false);

    let err = controller
        .get_shape_mut("p")
        .unwrap()
        .remove_point(None)
        .unwrap_err();
    assert!(matches!(err, AnnotationError::PreconditionViolation { .. }));
    assert_eq!(controller.shape_count(), 1);
    assert_eq!(controller.get_shape("p").unwrap().segments().unwrap().len(), 0);
}

#[test]
fn test_delete_shapes_skips_missing() {
    let mut controller = controller();
    let config = ShapeConfig::new();
    controller.draw_circle(Some("a"), 10.0, 10.0, 5.0, None, &config, false);
    controller.draw_circle(Some("b"), 30.0, 10.0, 5.0, None, &config, false);
    assert_eq!(controller.delete_shapes(Some(&["a", "ghost"]), true), 1);
    assert_eq!(controller.shape_ids(), vec!["b".to_string()]);
}

#[test]
fn test_build_canvas_clears_cache_and_is_idempotent() {
    let mut controller = AnnotationController::default();
    controller.draw_circle(Some("early"), 10.0, 10.0, 5.0, None, &ShapeConfig::new(), false);
    assert!(!controller.is_canvas_built());

    assert!(controller.build_canvas(&StaticViewport::new(100.0, 100.0, 1.0), None));
    assert_eq!(controller.shape_count(), 0);

    controller.draw_circle(Some("later"), 10.0, 10.0, 5.0, None, &ShapeConfig::new(), false);
    assert!(!controller.build_canvas(&StaticViewport::new(100.0, 100.0, 1.0), None));
    assert_eq!(controller.shape_count(), 1);
}

#[test]
fn test_style_overrides_per_field() {
    let mut controller = controller();
    let config = ShapeConfig::new().stroke_width(3.0);
    controller.draw_circle(Some("c"), 10.0, 10.0, 5.0, None, &config, false);
    let style = controller.get_shape("c").unwrap().style().unwrap();
    assert_eq!(style.stroke_width, 3.0);
    assert_eq!(style.fill.to_hex(), "#ffffff");
    assert_eq!(style.stroke.to_hex(), "#000000");
}
