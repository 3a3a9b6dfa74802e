use annokit_annotations::model::{Point, ShapeKind};
use annokit_annotations::{
    AnnotationController, CombineOutcome, RecordingSurface, ShapeConfig, StaticViewport,
    TransformMatrix,
};

fn controller() -> AnnotationController {
    let mut controller = AnnotationController::default();
    controller.build_canvas(
        &StaticViewport::new(500.0, 500.0, 1.0),
        Some(Box::new(RecordingSurface::default())),
    );
    controller
}

#[test]
fn test_merge_overlapping_circles() {
    let mut controller = controller();
    let style = ShapeConfig::new().fill("#336699", 0.4).stroke_width(2.0);
    controller.draw_circle(Some("a"), 100.0, 100.0, 10.0, None, &style, false);
    controller.draw_circle(Some("b"), 110.0, 100.0, 10.0, None, &ShapeConfig::new(), false);

    let expected = {
        let a = controller.get_shape("a").unwrap().renderable().unwrap();
        let b = controller.get_shape("b").unwrap().renderable().unwrap();
        a.union(b).unwrap().area().unwrap()
    };

    let outcome = controller.merge_shapes("a", "b", true, true);
    assert!(matches!(outcome, CombineOutcome::Computed { replaced: Some(ref id), .. } if id == "a"));
    assert!(controller.get_shape("b").is_none());

    let merged = controller.get_shape("a").unwrap();
    assert_eq!(merged.kind(), ShapeKind::Polygon);
    assert!(merged.original_transform().is_none());
    let style = merged.style().unwrap();
    assert_eq!(style.fill.to_hex(), "#336699");
    assert_eq!(style.stroke_width, 2.0);

    let area = controller.get_shape_dimensions("a", Some(6)).unwrap().area.unwrap();
    assert!((area - expected).abs() < 1e-3, "{} vs {}", area, expected);

    let analytic = 2.0 * std::f64::consts::PI * 100.0
        - (2.0 * 100.0 * (0.5f64).acos() - 5.0 * 300.0f64.sqrt());
    assert!((area - analytic).abs() / analytic < 0.01);
}

#[test]
fn test_merge_keeps_union_when_asked() {
    let mut controller = controller();
    controller.draw_rectangle(Some("a"), 0.0, 0.0, 10.0, 10.0, None, &ShapeConfig::new(), false);
    controller.draw_rectangle(Some("b"), 5.0, 0.0, 10.0, 10.0, None, &ShapeConfig::new(), false);
    match controller.merge_shapes("a", "b", false, false) {
        CombineOutcome::Computed { replaced, retained, .. } => {
            assert!(replaced.is_none());
            assert!((retained.unwrap().area().unwrap() - 150.0).abs() < 1e-6);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
    assert_eq!(controller.shape_count(), 2);
}

#[test]
fn test_merge_disjoint_is_noop() {
    let mut controller = controller();
    controller.draw_circle(Some("a"), 50.0, 50.0, 10.0, None, &ShapeConfig::new(), false);
    controller.draw_circle(Some("b"), 200.0, 200.0, 10.0, None, &ShapeConfig::new(), false);
    let outcome = controller.merge_shapes("a", "b", true, true);
    assert!(matches!(outcome, CombineOutcome::Disjoint));
    assert!(!outcome.changed_cache());
    assert_eq!(controller.shape_count(), 2);
    assert_eq!(controller.get_shape("a").unwrap().kind(), ShapeKind::Circle);
}

#[test]
fn test_intersect_with_transformed_operand() {
    let mut controller = controller();
    controller.draw_rectangle(
        Some("a"),
        0.0,
        0.0,
        10.0,
        10.0,
        Some(TransformMatrix::translation(5.0, 0.0)),
        &ShapeConfig::new(),
        false,
    );
    controller.draw_rectangle(Some("b"), 10.0, 0.0, 10.0, 10.0, None, &ShapeConfig::new(), false);

    let outcome = controller.intersect_shapes("a", "b", true, false, true);
    assert!(outcome.changed_cache());

    let a = controller.get_shape("a").unwrap();
    assert_eq!(a.kind(), ShapeKind::Polygon);
    assert!(a.original_transform().is_none());
    assert_eq!(controller.get_shape_dimensions("a", None).unwrap().area, Some(50.0));
    let center = controller.get_shape_center("a", true).unwrap();
    assert!(center.distance_to(&Point::new(12.5, 5.0)) < 1e-6);
}

#[test]
fn test_intersect_replace_b_when_a_not_requested() {
    let mut controller = controller();
    controller.draw_rectangle(Some("a"), 0.0, 0.0, 10.0, 10.0, None, &ShapeConfig::new(), false);
    controller.draw_rectangle(Some("b"), 5.0, 5.0, 10.0, 10.0, None, &ShapeConfig::new(), false);
    controller.intersect_shapes("a", "b", false, true, true);
    assert_eq!(controller.get_shape("a").unwrap().kind(), ShapeKind::Rectangle);
    assert_eq!(controller.get_shape("b").unwrap().kind(), ShapeKind::Polygon);
}

#[test]
fn test_intersect_contained_shape() {
    let mut controller = controller();
    controller.draw_rectangle(Some("outer"), 0.0, 0.0, 100.0, 100.0, None, &ShapeConfig::new(), false);
    controller.draw_circle(Some("inner"), 50.0, 50.0, 10.0, None, &ShapeConfig::new(), false);
    let inner_area = controller.get_shape_dimensions("inner", Some(4)).unwrap().area.unwrap();

    controller.intersect_shapes("outer", "inner", true, false, true);
    let area = controller.get_shape_dimensions("outer", Some(4)).unwrap().area.unwrap();
    assert!((area - inner_area).abs() < 1e-3);
}

#[test]
fn test_polyline_operands_are_skipped() {
    let mut controller = controller();
    controller.draw_rectangle(Some("r"), 0.0, 0.0, 10.0, 10.0, None, &ShapeConfig::new(), false);
    controller.draw_line(
        Some("l"),
        Point::new(-5.0, 5.0),
        Point::new(15.0, 5.0),
        None,
        &ShapeConfig::new(),
        false,
    );
    let outcome = controller.intersect_shapes("r", "l", true, false, true);
    assert!(!outcome.changed_cache());
    assert_eq!(controller.get_shape("r").unwrap().kind(), ShapeKind::Rectangle);
}
