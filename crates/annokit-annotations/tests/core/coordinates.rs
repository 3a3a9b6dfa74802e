use annokit_annotations::color::Color;
use annokit_annotations::model::Point;
use annokit_annotations::viewport::{CoordinateOffset, Dimensions};
use annokit_annotations::TransformMatrix;
use proptest::prelude::*;

// Sixteenths and half pixels are exact in binary floating point.
fn sixteenths() -> impl Strategy<Value = f64> {
    (-160_000i32..160_000).prop_map(|v| v as f64 / 16.0)
}

fn image_sizes() -> impl Strategy<Value = Dimensions> {
    (1u32..20_000, 1u32..20_000).prop_map(|(w, h)| Dimensions::new(w as f64, h as f64))
}

proptest! {
    #[test]
    fn image_canvas_round_trip_is_exact(x in sixteenths(), y in sixteenths(), image in image_sizes()) {
        let offset = CoordinateOffset::for_image(image);
        let p = Point::new(x, y);
        prop_assert_eq!(offset.to_image(offset.to_canvas(p)), p);
        prop_assert_eq!(offset.to_canvas(offset.to_image(p)), p);
    }

    #[test]
    fn hex_colors_round_trip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), alpha in 0.0f64..=1.0) {
        let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
        let color = Color::from_hex(&hex, alpha).unwrap();
        prop_assert_eq!(color.to_hex(), hex);
        prop_assert_eq!(color.a, alpha);
    }

    #[test]
    fn translations_invert(tx in sixteenths(), ty in sixteenths(), x in sixteenths(), y in sixteenths()) {
        let m = TransformMatrix::translation(tx, ty);
        let inverse = m.inverse().unwrap();
        prop_assert_eq!(inverse.apply(m.apply(Point::new(x, y))), Point::new(x, y));
    }
}

#[test]
fn test_offset_is_half_image() {
    let offset = CoordinateOffset::for_image(Dimensions::new(1001.0, 640.0));
    assert_eq!(offset, CoordinateOffset::new(500.5, 320.0));
}
