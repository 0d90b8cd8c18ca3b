use super::*;
use crate::field::generator::generate;
use crate::field::grid::Grid;
use crate::foundation::core::{Point, PointerState};
use crate::shape::{Identity, RoundedRectLens, shape_fn};

fn size(w: u32, h: u32) -> RasterSize {
    RasterSize::new(w, h).unwrap()
}

#[test]
fn degenerate_field_encodes_to_neutral_bytes() {
    let out = generate(size(7, 5), &Identity, PointerState::default()).unwrap();
    let tex = encode(&out.field);
    assert_eq!(tex.max_scale(), 0.0);
    assert_eq!(tex.filter_scale(1.0), 0.0);
    for px in tex.as_raw().chunks_exact(4) {
        assert_eq!(px, &[128, 128, 0, 255]);
    }
    for y in 0..5 {
        for x in 0..7 {
            assert_eq!(tex.decode_offset(x, y), Some(Vec2::ZERO));
        }
    }
}

#[test]
fn round_trip_is_within_one_quantization_step() {
    let max_scale = 8.0;
    let s = size(17, 3);
    let offsets = Grid::from_fn(s, |x, y| {
        let t = f64::from(x) / 16.0 * 2.0 - 1.0;
        Vec2::new(t * max_scale, -t * max_scale * f64::from(y) / 2.0)
    });
    let field = DisplacementField::with_max_scale(offsets.clone(), max_scale).unwrap();
    let tex = encode(&field);

    let step = max_scale / 127.5;
    for (x, y, d) in offsets.iter() {
        let back = tex.decode_offset(x, y).unwrap();
        assert!((back.x - d.x).abs() <= step, "x at ({x},{y}): {} vs {}", back.x, d.x);
        assert!((back.y - d.y).abs() <= step, "y at ({x},{y}): {} vs {}", back.y, d.y);
    }
}

#[test]
fn offsets_beyond_max_scale_saturate() {
    // A derived scale is half the peak, so the peak pixel clamps to the end of the range.
    let offsets = Grid::from_fn(size(2, 1), |x, _| {
        if x == 0 {
            Vec2::new(6.0, -6.0)
        } else {
            Vec2::ZERO
        }
    });
    let field = DisplacementField::from_offsets(offsets).unwrap();
    assert_eq!(field.max_scale(), 3.0);
    let tex = encode(&field);
    assert_eq!(tex.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(tex.pixel(1, 0), Some([128, 128, 0, 255]));
}

#[test]
fn unused_and_alpha_channels_are_fixed() {
    let lens = RoundedRectLens::default();
    let out = generate(size(40, 30), &lens, PointerState::default()).unwrap();
    let tex = encode(&out.field);
    for px in tex.as_raw().chunks_exact(4) {
        assert_eq!(px[2], 0);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn filter_scale_accounts_for_pixel_ratio() {
    let shape = shape_fn(|uv, _pointer| Point::new(uv.x + 0.5, uv.y));
    let out = generate(size(8, 8), shape.as_ref(), PointerState::default()).unwrap();
    let tex = encode(&out.field);
    assert_eq!(tex.max_scale(), 2.0);
    assert_eq!(tex.filter_scale(1.0), 4.0);
    assert_eq!(tex.filter_scale(2.0), 2.0);
}

#[test]
fn png_export_decodes_to_same_pixels() {
    let lens = RoundedRectLens::default();
    let out = generate(size(12, 9), &lens, PointerState::default()).unwrap();
    let tex = encode(&out.field);
    let png = tex.to_png().unwrap();
    let back = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
        .unwrap()
        .to_rgba8();
    assert_eq!(back.dimensions(), (12, 9));
    assert_eq!(back.as_raw(), tex.as_raw());
}
