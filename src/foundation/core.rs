use crate::foundation::error::{GlassError, GlassResult};

pub use kurbo::{Point, Rect, Size, Vec2};

/// Pointer position relative to a target's bounding box, `(0,0)` top-left, `(1,1)` bottom-right.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointerState {
    /// Horizontal position in box-relative units.
    pub x: f64,
    /// Vertical position in box-relative units.
    pub y: f64,
}

impl PointerState {
    /// Create a pointer state from box-relative coordinates.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a position in host coordinates into box-relative units.
    ///
    /// Returns the default state when the box is empty.
    pub fn relative_to(position: Point, bounds: Rect) -> Self {
        let (w, h) = (bounds.width(), bounds.height());
        if w <= 0.0 || h <= 0.0 {
            return Self::default();
        }
        Self {
            x: (position.x - bounds.x0) / w,
            y: (position.y - bounds.y0) / h,
        }
    }
}

/// Pixel dimensions of a raster (displacement texture, filter region).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RasterSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl RasterSize {
    /// Create a validated raster size; both dimensions must be non-zero.
    pub fn new(width: u32, height: u32) -> GlassResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlassError::validation(format!(
                "raster size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Raster size covering `size` device-independent pixels at `pixel_ratio`.
    ///
    /// Fractional sizes round up so the raster always covers the surface.
    pub fn from_logical(size: Size, pixel_ratio: f64) -> GlassResult<Self> {
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(GlassError::validation("pixel_ratio must be finite and > 0"));
        }
        if !size.width.is_finite() || !size.height.is_finite() {
            return Err(GlassError::validation("surface size must be finite"));
        }
        if size.width <= 0.0 || size.height <= 0.0 {
            return Err(GlassError::validation(format!(
                "surface size must be positive, got {}x{}",
                size.width, size.height
            )));
        }
        let w = (size.width * pixel_ratio).ceil();
        let h = (size.height * pixel_ratio).ceil();
        if w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
            return Err(GlassError::validation("surface size exceeds raster limits"));
        }
        Self::new(w as u32, h as u32)
    }

    /// Number of pixels.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
