use crate::foundation::core::Point;
use crate::foundation::error::{GlassError, GlassResult};
use crate::foundation::math::{rounded_rect_sdf, smooth_step};
use crate::shape::{PointerProbe, ShapeFunction};

/// Parameters of the rounded-rectangle glass lens, in normalized box units.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LensConfig {
    /// Half width of the lens body.
    pub half_width: f64,
    /// Half height of the lens body.
    pub half_height: f64,
    /// Corner radius.
    pub radius: f64,
    /// Distance subtracted from the SDF before the falloff is applied.
    pub edge_offset: f64,
    /// Width of the falloff band; the lens compresses fully at `falloff` outside the edge.
    pub falloff: f64,
    /// Centre the lens on the pointer instead of the box centre.
    pub follow_pointer: bool,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            half_width: 0.45,
            half_height: 0.45,
            radius: 0.1,
            edge_offset: 0.1,
            falloff: 0.8,
            follow_pointer: false,
        }
    }
}

impl LensConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> GlassResult<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check that every parameter is finite and geometrically meaningful.
    pub fn validate(&self) -> GlassResult<()> {
        let fields = [
            ("half_width", self.half_width),
            ("half_height", self.half_height),
            ("radius", self.radius),
            ("edge_offset", self.edge_offset),
            ("falloff", self.falloff),
        ];
        for (name, v) in fields {
            if !v.is_finite() {
                return Err(GlassError::validation(format!("lens {name} must be finite")));
            }
        }
        if self.half_width <= 0.0 || self.half_height <= 0.0 {
            return Err(GlassError::validation("lens half extents must be > 0"));
        }
        if self.radius < 0.0 || self.radius > self.half_width.min(self.half_height) {
            return Err(GlassError::validation(
                "lens radius must be within [0, min(half_width, half_height)]",
            ));
        }
        if self.falloff <= 0.0 {
            return Err(GlassError::validation("lens falloff must be > 0"));
        }
        Ok(())
    }
}

/// Glass lens that magnifies toward its centre and compresses near its rounded edge.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RoundedRectLens {
    config: LensConfig,
}

impl RoundedRectLens {
    /// Build a lens from a validated config.
    pub fn new(config: LensConfig) -> GlassResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Lens parameters.
    pub fn config(&self) -> &LensConfig {
        &self.config
    }
}

impl ShapeFunction for RoundedRectLens {
    fn sample(&self, uv: Point, pointer: &PointerProbe) -> Point {
        let c = &self.config;
        let (cx, cy) = if c.follow_pointer {
            (pointer.x(), pointer.y())
        } else {
            (0.5, 0.5)
        };
        let ix = uv.x - cx;
        let iy = uv.y - cy;
        let distance_to_edge = rounded_rect_sdf(ix, iy, c.half_width, c.half_height, c.radius);
        let displacement = smooth_step(c.falloff, 0.0, distance_to_edge - c.edge_offset);
        let scaled = smooth_step(0.0, 1.0, displacement);
        Point::new(ix * scaled + cx, iy * scaled + cy)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shape/lens.rs"]
mod tests;
