use annokit_annotations::serialization::{GeometryJson, ShapeJson};
use annokit_annotations::{AnnotationController, RecordingSurface, StaticViewport};
use serde_json::{json, Value};

fn controller() -> AnnotationController {
    let mut controller = AnnotationController::default();
    controller.build_canvas(
        &StaticViewport::new(1000.0, 800.0, 0.25),
        Some(Box::new(RecordingSurface::default())),
    );
    controller
}

fn style() -> Value {
    json!({
        "fill_color": "#ff8800",
        "fill_alpha": 0.25,
        "stroke_color": "#0000ff",
        "stroke_alpha": 0.75,
        "stroke_width": 4.0
    })
}

fn with_style(mut shape: Value) -> Value {
    if let (Value::Object(map), Value::Object(style)) = (&mut shape, style()) {
        map.extend(style);
    }
    shape
}

fn every_kind() -> Vec<Value> {
    vec![
        with_style(json!({
            "shape_id": "rect", "type": "rectangle",
            "origin_x": 10.0, "origin_y": 20.0, "width": 30.0, "height": 40.0,
            "transform": [0.0, 1.0, -1.0, 0.0, 100.0, 50.0]
        })),
        with_style(json!({
            "shape_id": "ell", "type": "ellipse",
            "center_x": 300.0, "center_y": 200.0, "radius_x": 50.0, "radius_y": 20.0
        })),
        with_style(json!({
            "shape_id": "circ", "type": "circle",
            "center_x": 500.0, "center_y": 400.0, "radius": 25.0,
            "transform": [2.0, 0.0, 0.0, 2.0, 0.0, 0.0]
        })),
        with_style(json!({
            "shape_id": "pl", "type": "polyline",
            "segments": [
                {"point": {"x": 0.0, "y": 0.0}},
                {"point": {"x": 100.0, "y": 0.0}, "handle_in": {"x": -10.0, "y": 5.0}},
                {"point": {"x": 100.0, "y": 100.0}}
            ]
        })),
        with_style(json!({
            "shape_id": "pg", "type": "polygon",
            "segments": [
                {"point": {"x": 600.0, "y": 600.0}, "handle_out": {"x": 10.0, "y": 0.0}},
                {"point": {"x": 700.0, "y": 600.0}},
                {"point": {"x": 650.0, "y": 700.0}}
            ]
        })),
    ]
}

#[test]
fn test_every_kind_round_trips() {
    let input = every_kind();
    let mut controller = controller();
    let drawn = controller.draw_shapes_from_json(&input, true);
    assert_eq!(drawn.len(), input.len());

    for value in &input {
        let expected = ShapeJson::from_value(value).unwrap();
        let actual = controller.get_shape_json(&expected.shape_id).unwrap();
        assert_eq!(actual, expected, "round trip of {}", expected.shape_id);
    }
}

#[test]
fn test_string_round_trip_between_controllers() {
    let mut first = controller();
    first.draw_shapes_from_json(&every_kind(), false);
    let text = first.shapes_json_string(None).unwrap();

    let mut second = controller();
    let loaded = second.draw_shapes_from_json_str(&text, false).unwrap();
    assert_eq!(loaded.len(), 5);
    assert_eq!(second.get_shapes_json(None), first.get_shapes_json(None));
}

#[test]
fn test_missing_style_uses_defaults_on_output() {
    let mut controller = controller();
    let id = controller
        .draw_shape_from_json(
            &json!({"shape_id": "c", "type": "circle", "center_x": 1, "center_y": 2, "radius": 3}),
            false,
        )
        .unwrap();
    let json = controller.get_shape_json(&id).unwrap().to_value().unwrap();
    assert_eq!(json["fill_color"], json!("#ffffff"));
    assert_eq!(json["fill_alpha"], json!(1.0));
    assert_eq!(json["stroke_color"], json!("#000000"));
    assert_eq!(json["stroke_alpha"], json!(1.0));
    assert_eq!(json["stroke_width"], json!(20.0));
    assert!(json.get("transform").is_none());
}

#[test]
fn test_line_input_loads_as_polyline() {
    let mut controller = controller();
    controller.draw_shape_from_json(
        &json!({"shape_id": "l", "type": "line", "from_x": 0, "from_y": 0, "to_x": 30, "to_y": 40}),
        false,
    );
    let out = controller.get_shape_json("l").unwrap();
    assert_eq!(out.type_tag(), "polyline");
    match out.geometry {
        GeometryJson::Polyline { segments } => {
            assert_eq!(segments.len(), 2);
            assert_eq!(segments[1].point.x, 30.0);
        }
        other => panic!("unexpected geometry {:?}", other),
    }
}

#[test]
fn test_bad_records_do_not_abort_batch() {
    let mut controller = controller();
    let batch = json!([
        {"shape_id": "ok_1", "type": "circle", "center_x": 10, "center_y": 10, "radius": 5},
        {"shape_id": "bad_type", "type": "star", "points": 5},
        {"shape_id": "bad_transform", "type": "circle", "center_x": 10, "center_y": 10, "radius": 5, "transform": [1, 2]},
        {"shape_id": "ok_1", "type": "circle", "center_x": 90, "center_y": 90, "radius": 1},
        {"shape_id": "ok_2", "type": "rectangle", "origin_x": 0, "origin_y": 0, "width": 5, "height": 5}
    ]);
    let drawn = controller
        .draw_shapes_from_json_str(&batch.to_string(), false)
        .unwrap();
    assert_eq!(drawn, vec!["ok_1".to_string(), "ok_2".to_string()]);
    assert_eq!(controller.shape_count(), 2);
}

#[test]
fn test_bad_color_falls_back_to_default() {
    let mut controller = controller();
    controller.draw_shape_from_json(
        &json!({
            "shape_id": "c", "type": "circle", "center_x": 1, "center_y": 2, "radius": 3,
            "fill_color": "not-a-color", "fill_alpha": 0.5
        }),
        false,
    );
    let out = controller.get_shape_json("c").unwrap();
    assert_eq!(out.style.fill_color.as_deref(), Some("#ffffff"));
    assert_eq!(out.style.fill_alpha, Some(0.5));
}

#[test]
fn test_document_must_be_shapes() {
    let mut controller = controller();
    assert!(controller.draw_shapes_from_json_str("\"nope\"", false).is_err());
    assert!(controller.draw_shapes_from_json_str("{broken", false).is_err());
}
