use std::io::Cursor;
use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::field::generator::DisplacementField;
use crate::foundation::core::{RasterSize, Vec2};
use crate::foundation::error::{GlassError, GlassResult};
use crate::foundation::math::{NEUTRAL_CHANNEL, dequantize, quantize_unit};

/// Immutable RGBA8 displacement texture.
///
/// R carries the horizontal offset, G the vertical one, B is zero and A is opaque. Clones share
/// the pixel buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodedTexture {
    image: Arc<RgbaImage>,
    max_scale: f64,
}

impl EncodedTexture {
    /// Texture that displaces nothing.
    pub fn neutral(size: RasterSize) -> Self {
        let px = Rgba([NEUTRAL_CHANNEL, NEUTRAL_CHANNEL, 0, 255]);
        Self {
            image: Arc::new(RgbaImage::from_pixel(size.width, size.height, px)),
            max_scale: 0.0,
        }
    }

    /// Texture dimensions.
    pub fn size(&self) -> RasterSize {
        RasterSize {
            width: self.image.width(),
            height: self.image.height(),
        }
    }

    /// Unscaled normalization factor the channels were encoded against.
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Scale for a filter that displaces by `scale * (channel / 255 - 0.5)`.
    ///
    /// `pixel_ratio` converts raster pixels back into the surface's device-independent pixels.
    pub fn filter_scale(&self, pixel_ratio: f64) -> f64 {
        2.0 * self.max_scale / pixel_ratio
    }

    /// Borrow the raster.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Tightly packed RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// RGBA bytes of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Offset (in raster pixels) a consumer recovers from the pixel at `(x, y)`.
    pub fn decode_offset(&self, x: u32, y: u32) -> Option<Vec2> {
        let [r, g, _, _] = self.pixel(x, y)?;
        Some(Vec2::new(
            dequantize(r, self.max_scale),
            dequantize(g, self.max_scale),
        ))
    }

    /// PNG encoding of the raster.
    pub fn to_png(&self) -> GlassResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .map_err(|e| GlassError::evaluation(format!("png encode failed: {e}")))?;
        Ok(buf)
    }
}

/// Quantize a field into a displacement texture.
///
/// A degenerate field (`max_scale == 0`) encodes to the neutral texture instead of dividing by
/// zero.
pub fn encode(field: &DisplacementField) -> EncodedTexture {
    let size = field.size();
    let max_scale = field.max_scale();
    if max_scale == 0.0 {
        return EncodedTexture::neutral(size);
    }

    let offsets = field.offsets();
    let image = RgbaImage::from_fn(size.width, size.height, |x, y| {
        let d = offsets.get(x, y).copied().unwrap_or(Vec2::ZERO);
        Rgba([
            quantize_unit(d.x / max_scale),
            quantize_unit(d.y / max_scale),
            0,
            255,
        ])
    });
    EncodedTexture {
        image: Arc::new(image),
        max_scale,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/field/encoder.rs"]
mod tests;
