use annokit_annotations::model::{Point, Segment, ShapeGeometry, ShapeKind};
use annokit_annotations::{
    AnnotationController, GeometryJson, RecordingSurface, ShapeConfig, StaticViewport,
    TransformMatrix,
};

fn controller() -> AnnotationController {
    let mut controller = AnnotationController::default();
    controller.build_canvas(
        &StaticViewport::new(100.0, 100.0, 1.0),
        Some(Box::new(RecordingSurface::default())),
    );
    controller
}

#[test]
fn test_ellipse_area_close_to_analytic() {
    let mut controller = controller();
    controller.draw_ellipse(Some("e"), 50.0, 50.0, 20.0, 10.0, None, &ShapeConfig::new(), false);
    let area = controller.get_shape_dimensions("e", None).unwrap().area.unwrap();
    let expected = std::f64::consts::PI * 20.0 * 10.0;
    assert!((area - expected).abs() / expected < 0.01, "area {}", area);
}

#[test]
fn test_transformed_shape_keeps_local_parameters() {
    let mut controller = controller();
    let transform = TransformMatrix::translation(10.0, 20.0);
    controller.draw_rectangle(Some("r"), 0.0, 0.0, 10.0, 10.0, Some(transform), &ShapeConfig::new(), false);

    assert_eq!(controller.get_shape_center("r", true), Some(Point::new(15.0, 25.0)));
    let json = controller.get_shape_json("r").unwrap();
    assert_eq!(json.transform, Some(transform));
    assert_eq!(
        json.geometry,
        GeometryJson::Rectangle {
            origin_x: 0.0,
            origin_y: 0.0,
            width: 10.0,
            height: 10.0
        }
    );
}

#[test]
fn test_add_point_extends_polyline() {
    let mut controller = controller();
    controller.draw_polyline(
        Some("p"),
        vec![Segment::new(Point::new(0.0, 0.0)), Segment::new(Point::new(3.0, 0.0))],
        None,
        &ShapeConfig::new(),
        false,
    );
    controller.get_shape_mut("p").unwrap().add_point(3.0, 4.0).unwrap();

    let dims = controller.get_shape_dimensions("p", None).unwrap();
    assert_eq!(dims.area, None);
    assert_eq!(dims.perimeter, Some(7.0));
    assert_eq!(controller.get_shape("p").unwrap().segments().unwrap().len(), 3);
}

#[test]
fn test_polygon_with_curve_handles() {
    let mut controller = controller();
    let segments = vec![
        Segment::new(Point::new(0.0, 0.0)).with_handle_out(Point::new(5.0, -5.0)),
        Segment::new(Point::new(20.0, 0.0)).with_handle_in(Point::new(-5.0, -5.0)),
        Segment::new(Point::new(10.0, 20.0)),
    ];
    controller.draw_polygon(Some("g"), segments.clone(), None, &ShapeConfig::new(), false);

    let straight = controller.draw_polygon(
        Some("straight"),
        segments.iter().map(|s| Segment::new(s.point)).collect(),
        None,
        &ShapeConfig::new(),
        false,
    );
    assert!(straight.is_some());

    let curved = controller.get_shape_dimensions("g", Some(4)).unwrap().area.unwrap();
    let flat = controller.get_shape_dimensions("straight", Some(4)).unwrap().area.unwrap();
    assert!(curved > flat);
    assert_eq!(controller.get_shape("g").unwrap().segments().unwrap(), segments.as_slice());
}

#[test]
fn test_freehand_path_is_extracted_once() {
    let mut controller = controller();
    let canvas_points = [
        Point::new(-10.0, -10.0),
        Point::new(10.0, -10.0),
        Point::new(10.0, 10.0),
        Point::new(-10.0, 10.0),
    ];
    let id = controller
        .draw_freehand_path(None, true, &canvas_points, &ShapeConfig::new(), false)
        .unwrap();
    assert_eq!(id, "polygon_1");
    assert_eq!(controller.get_shape(&id).unwrap().segments().unwrap().len(), 0);

    let first = controller.get_shape_json(&id).unwrap();
    let second = controller.get_shape_json(&id).unwrap();
    assert_eq!(first, second);

    let segments = controller.get_shape(&id).unwrap().segments().unwrap().to_vec();
    assert_eq!(segments.len(), 4);
    let corners = [
        Point::new(40.0, 40.0),
        Point::new(60.0, 40.0),
        Point::new(60.0, 60.0),
        Point::new(40.0, 60.0),
    ];
    for segment in &segments {
        assert!(
            corners.iter().any(|c| c.distance_to(&segment.point) < 1e-9),
            "unexpected vertex {:?}",
            segment.point
        );
    }
}

#[test]
fn test_freehand_polyline_accepts_edits() {
    let mut controller = controller();
    let id = controller
        .draw_freehand_path(
            Some("ink"),
            false,
            &[Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            &ShapeConfig::new(),
            false,
        )
        .unwrap();
    let shape = controller.get_shape_mut(&id).unwrap();
    shape.add_point(60.0, 60.0).unwrap();

    let segments = shape.segments().unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].point, Point::new(50.0, 50.0));
    assert_eq!(segments[2].point, Point::new(60.0, 60.0));
    assert_eq!(controller.get_shape_center(&id, true), Some(Point::new(55.0, 55.0)));
}

#[test]
fn test_line_is_a_polyline() {
    let mut controller = controller();
    controller.draw_line(
        Some("l"),
        Point::new(10.0, 10.0),
        Point::new(40.0, 50.0),
        None,
        &ShapeConfig::new(),
        false,
    );
    let shape = controller.get_shape("l").unwrap();
    assert_eq!(shape.kind(), ShapeKind::Polyline);
    match shape.geometry() {
        ShapeGeometry::Polyline(p) => assert_eq!(p.segments.len(), 2),
        other => panic!("unexpected geometry {:?}", other),
    }
    assert_eq!(controller.get_shape_dimensions("l", None).unwrap().perimeter, Some(50.0));
}

#[test]
fn test_two_segment_polygon_closes_with_its_curve() {
    let mut controller = controller();
    let upper = Segment::new(Point::new(0.0, 50.0)).with_handle_out(Point::new(0.0, -50.0));
    let lower = Segment::new(Point::new(100.0, 50.0)).with_handle_in(Point::new(0.0, -50.0));
    let config = ShapeConfig::new();

    controller.draw_polygon(Some("arc"), vec![upper, lower], None, &config, false);
    controller.draw_polygon(
        Some("lens"),
        vec![
            upper.with_handle_in(Point::new(0.0, 50.0)),
            lower.with_handle_out(Point::new(0.0, 50.0)),
        ],
        None,
        &config,
        false,
    );

    let arc = controller.get_shape_dimensions("arc", None).unwrap().area.unwrap();
    let lens = controller.get_shape_dimensions("lens", None).unwrap().area.unwrap();
    assert!((arc - 3000.0).abs() < 60.0, "arc area {}", arc);
    assert!((lens / arc - 2.0).abs() < 0.02, "lens area {}", lens);
}
