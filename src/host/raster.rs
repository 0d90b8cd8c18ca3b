//! CPU raster operations behind [`crate::SoftwareHost::composite`].

use image::{Rgba, RgbaImage};

use crate::field::EncodedTexture;
use crate::foundation::core::Rect;
use crate::foundation::error::{GlassError, GlassResult};
use crate::foundation::math::mul_div255_u8;
use crate::host::Color;

pub(crate) type Rgba8 = [u8; 4];

/// Integer pixel region of a backdrop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelRegion {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl PixelRegion {
    /// Pixels covered by `bounds`, clipped to a `width x height` backdrop.
    pub(crate) fn covering(bounds: Rect, width: u32, height: u32) -> GlassResult<Self> {
        let x0 = bounds.x0.floor().clamp(0.0, f64::from(width)) as u32;
        let y0 = bounds.y0.floor().clamp(0.0, f64::from(height)) as u32;
        let x1 = bounds.x1.ceil().clamp(0.0, f64::from(width)) as u32;
        let y1 = bounds.y1.ceil().clamp(0.0, f64::from(height)) as u32;
        if x1 <= x0 || y1 <= y0 {
            return Err(GlassError::evaluation(
                "target does not overlap the backdrop",
            ));
        }
        Ok(Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Source-over of an opaque-or-premultiplied `src` scaled by `opacity`.
pub(crate) fn over(dst: Rgba8, src: Rgba8, opacity: f32) -> Rgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }
    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Sample `backdrop` through a displacement texture stretched over `region`.
///
/// Each output pixel reads the backdrop at `p + scale * (channel / 255 - 0.5)` (nearest
/// neighbour, clamped to the backdrop edge).
pub(crate) fn displace(
    backdrop: &RgbaImage,
    region: PixelRegion,
    texture: &EncodedTexture,
    scale: f64,
) -> RgbaImage {
    let tex = texture.size();
    let (bw, bh) = backdrop.dimensions();
    RgbaImage::from_fn(region.width, region.height, |lx, ly| {
        let tx = (u64::from(lx) * u64::from(tex.width) / u64::from(region.width)) as u32;
        let ty = (u64::from(ly) * u64::from(tex.height) / u64::from(region.height)) as u32;
        let [r, g, _, _] = texture.pixel(tx, ty).unwrap_or([128, 128, 0, 255]);
        let dx = scale * (f64::from(r) / 255.0 - 0.5);
        let dy = scale * (f64::from(g) / 255.0 - 0.5);
        let sx = (f64::from(region.x + lx) + dx)
            .round()
            .clamp(0.0, f64::from(bw - 1)) as u32;
        let sy = (f64::from(region.y + ly) + dy)
            .round()
            .clamp(0.0, f64::from(bh - 1)) as u32;
        *backdrop.get_pixel(sx, sy)
    })
}

/// Contrast, then brightness, then saturation, on straight-alpha sRGB components.
pub(crate) fn adjust_color(px: Rgba8, contrast: f32, brightness: f32, saturate: f32) -> Rgba8 {
    let mut c = [0f32; 3];
    for i in 0..3 {
        let v = f32::from(px[i]) / 255.0;
        c[i] = ((v - 0.5) * contrast + 0.5) * brightness;
    }
    let s = saturate;
    let [r, g, b] = c;
    let out = [
        (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
    ];
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [to_u8(out[0]), to_u8(out[1]), to_u8(out[2]), px[3]]
}

/// Paint `color` over every pixel.
pub(crate) fn fill_over(img: &mut RgbaImage, color: Color) {
    let src = [color.r, color.g, color.b, 255];
    for p in img.pixels_mut() {
        *p = Rgba(over(p.0, src, color.a));
    }
}

/// Paint a `width_px` inner border of `color`.
pub(crate) fn stroke_border(img: &mut RgbaImage, width_px: f32, color: Color) {
    let bw = width_px.round() as u32;
    if bw == 0 {
        return;
    }
    let (w, h) = img.dimensions();
    let src = [color.r, color.g, color.b, 255];
    for (x, y, p) in img.enumerate_pixels_mut() {
        let edge = x < bw || y < bw || x + bw >= w || y + bw >= h;
        if edge {
            *p = Rgba(over(p.0, src, color.a));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/raster.rs"]
mod tests;
