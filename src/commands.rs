//! Command implementations behind the `annokit` binary.

use std::path::Path;

use anyhow::Context;
use annokit_annotations::{
    AnnotationController, CombineOutcome, PixmapSurface, RecordingSurface, RenderSurface,
    Renderable, StaticViewport,
};
use annokit_settings::Config;

/// Image the shapes are anchored to.
#[derive(Debug, Clone, Copy)]
pub struct ImageSpec {
    pub width: f64,
    pub height: f64,
    pub microns_per_pixel: f64,
}

impl ImageSpec {
    fn viewport(&self) -> StaticViewport {
        StaticViewport::new(self.width, self.height, self.microns_per_pixel)
    }
}

/// Loads a shapes document into a controller bound to `image`.
pub fn load_shapes(path: &Path, image: ImageSpec, config: &Config) -> anyhow::Result<AnnotationController> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut controller = AnnotationController::new(config);
    controller.build_canvas(&image.viewport(), Some(Box::new(RecordingSurface::default())));
    let drawn = controller
        .draw_shapes_from_json_str(&text, false)
        .with_context(|| format!("Failed to parse shapes in {}", path.display()))?;
    tracing::info!("Loaded {} shapes from {}", drawn.len(), path.display());
    Ok(controller)
}

/// One line per shape: id, type, area and perimeter in the configured unit.
pub fn summary(controller: &AnnotationController, config: &Config, decimals: Option<u32>) -> Vec<String> {
    let unit = config.measurement.unit;
    let fmt = |value: Option<f64>| match value {
        Some(v) => format!("{} {}", unit.from_microns(v), unit.label()),
        None => "-".to_string(),
    };

    controller
        .get_shapes_dimensions(None, decimals)
        .into_iter()
        .map(|(id, dims)| {
            let kind = controller
                .get_shape(&id)
                .map(|s| s.type_tag())
                .unwrap_or("?");
            format!(
                "{}\t{}\tarea={}\tperimeter={}",
                id,
                kind,
                fmt(dims.area),
                fmt(dims.perimeter)
            )
        })
        .collect()
}

/// Rasterizes every visible shape to a PNG the size of the image.
pub fn render(controller: &AnnotationController, image: ImageSpec, zoom: f64, output: &Path) -> anyhow::Result<()> {
    let width = (image.width * zoom).round().max(1.0) as u32;
    let height = (image.height * zoom).round().max(1.0) as u32;
    let mut surface = PixmapSurface::new(width, height);
    surface.set_zoom(zoom);

    let scene: Vec<&Renderable> = controller
        .get_shapes(None)
        .into_iter()
        .filter_map(|s| s.renderable())
        .collect();
    surface.draw(&scene);
    surface
        .save_png(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!("Rendered {} shapes to {}", scene.len(), output.display());
    Ok(())
}

/// Merges `b` into `a` and returns the resulting document.
pub fn merge(controller: &mut AnnotationController, a: &str, b: &str) -> anyhow::Result<String> {
    match controller.merge_shapes(a, b, true, true) {
        CombineOutcome::Skipped { reason } => anyhow::bail!(reason),
        CombineOutcome::Disjoint => anyhow::bail!("{} and {} do not overlap", a, b),
        outcome => tracing::info!("Merge of {} and {}: {:?}", a, b, outcome),
    }
    Ok(controller.shapes_json_string(None)?)
}
