use annokit_annotations::{AnnotationController, RecordingSurface, ShapeConfig, StaticViewport};
use annokit_settings::Config;
use tempfile::TempDir;

fn custom_config() -> Config {
    let mut config = Config::default();
    config.shape_defaults.fill_color = "#123456".to_string();
    config.shape_defaults.fill_alpha = 0.5;
    config.shape_defaults.stroke_width = 1.5;
    config.measurement.decimals = 1;
    config
}

#[test]
fn test_config_round_trip_json_and_toml() {
    let dir = TempDir::new().unwrap();
    let config = custom_config();

    for name in ["settings.json", "settings.toml"] {
        let path = dir.path().join("nested").join(name);
        config.save_to_file(&path).unwrap();
        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config, "round trip through {}", name);
    }
}

#[test]
fn test_invalid_config_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    let mut value = serde_json::to_value(Config::default()).unwrap();
    value["shape_defaults"]["fill_color"] = serde_json::json!("red");
    std::fs::write(&path, value.to_string()).unwrap();
    assert!(Config::load_from_file(&path).is_err());
}

#[test]
fn test_controller_uses_configured_defaults() {
    let mut controller = AnnotationController::new(&custom_config());
    controller.build_canvas(
        &StaticViewport::new(100.0, 100.0, 3.0),
        Some(Box::new(RecordingSurface::default())),
    );
    controller.draw_circle(Some("c"), 50.0, 50.0, 7.0, None, &ShapeConfig::new(), false);

    let json = controller.get_shape_json("c").unwrap();
    assert_eq!(json.style.fill_color.as_deref(), Some("#123456"));
    assert_eq!(json.style.fill_alpha, Some(0.5));
    assert_eq!(json.style.stroke_width, Some(1.5));

    let perimeter = controller.get_shape_dimensions("c", None).unwrap().perimeter.unwrap();
    assert_eq!(perimeter, (perimeter * 10.0).round() / 10.0);
}
