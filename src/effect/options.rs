use crate::foundation::error::{GlassError, GlassResult};
use crate::host::GlassStyle;

/// Per-effect configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlassOptions {
    /// Raster pixels per device-independent pixel of the target.
    pub pixel_ratio: f64,
    /// Displacement scale the filter is registered with, before the first field is pushed.
    pub initial_scale: f64,
    /// Visual treatment applied to the target.
    pub style: GlassStyle,
}

impl Default for GlassOptions {
    fn default() -> Self {
        Self {
            pixel_ratio: 1.0,
            initial_scale: 10.0,
            style: GlassStyle::default(),
        }
    }
}

impl GlassOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(s: &str) -> GlassResult<Self> {
        let opts: Self = serde_json::from_str(s)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject options an effect cannot be built with.
    pub fn validate(&self) -> GlassResult<()> {
        if !self.pixel_ratio.is_finite() || self.pixel_ratio <= 0.0 {
            return Err(GlassError::validation("pixel_ratio must be finite and > 0"));
        }
        if !self.initial_scale.is_finite() {
            return Err(GlassError::validation("initial_scale must be finite"));
        }
        self.style.validate()
    }
}
