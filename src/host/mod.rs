//! Interface to the environment that hosts glass effects.
//!
//! A host owns the on-screen surfaces, the compositing filter primitives and event delivery.
//! Effects only talk to it through [`GlassHost`].

use crate::field::EncodedTexture;
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{GlassError, GlassResult};

pub(crate) mod blur;
pub(crate) mod raster;
pub(crate) mod software;

pub use software::{AppliedStyle, FilterRecord, SoftwareHost};

/// Identity of a target surface inside its host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// Handle of a registered displacement filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterHandle(pub u64);

/// Handle of an event subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// What a listener is subscribed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// Pointer movement over one target.
    PointerMove(TargetId),
    /// Viewport resize.
    Resize,
}

/// An event delivered by the host's dispatcher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    /// The pointer moved over `target`; `position` is in host coordinates.
    PointerMove {
        /// Surface under the pointer.
        target: TargetId,
        /// Pointer position in the same space as [`GlassHost::bounding_box`].
        position: Point,
    },
    /// The viewport was resized; any surface may have changed geometry.
    Resize,
}

/// Straight-alpha color with an 8-bit RGB triple and a unit opacity.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Color {
    /// Create a color.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    fn css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Drop shadow cast by the glass panel.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Shadow {
    /// Vertical offset in pixels.
    pub offset_y: f32,
    /// Blur radius in pixels.
    pub blur_px: f32,
    /// Shadow color.
    pub color: Color,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset_y: 4.0,
            blur_px: 20.0,
            color: Color::rgba(0, 0, 0, 0.1),
        }
    }
}

/// Visual treatment applied to a target: refraction filter, blur, color adjust, tint, border.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlassStyle {
    /// Gaussian blur standard deviation in pixels applied after refraction.
    pub blur_px: f32,
    /// Contrast multiplier.
    pub contrast: f32,
    /// Brightness multiplier.
    pub brightness: f32,
    /// Saturation multiplier.
    pub saturate: f32,
    /// Translucent fill painted over the refracted backdrop.
    pub tint: Color,
    /// Border width in pixels.
    pub border_px: f32,
    /// Border color.
    pub border: Color,
    /// Drop shadow.
    pub shadow: Shadow,
}

impl Default for GlassStyle {
    fn default() -> Self {
        Self {
            blur_px: 10.0,
            contrast: 1.05,
            brightness: 1.05,
            saturate: 1.05,
            tint: Color::rgba(240, 240, 240, 0.8),
            border_px: 1.0,
            border: Color::rgba(200, 200, 200, 0.3),
            shadow: Shadow::default(),
        }
    }
}

impl GlassStyle {
    /// Check that every parameter is finite and in range.
    pub fn validate(&self) -> GlassResult<()> {
        let non_negative = [
            ("blur_px", self.blur_px),
            ("contrast", self.contrast),
            ("brightness", self.brightness),
            ("saturate", self.saturate),
            ("border_px", self.border_px),
            ("shadow.blur_px", self.shadow.blur_px),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(GlassError::validation(format!(
                    "style {name} must be finite and >= 0"
                )));
            }
        }
        if (3.0 * self.blur_px).ceil() > blur::MAX_RADIUS as f32 {
            return Err(GlassError::validation(format!(
                "style blur_px must be <= {}",
                blur::MAX_RADIUS as f32 / 3.0
            )));
        }
        if !self.shadow.offset_y.is_finite() {
            return Err(GlassError::validation("style shadow.offset_y must be finite"));
        }
        for (name, c) in [
            ("tint", self.tint),
            ("border", self.border),
            ("shadow.color", self.shadow.color),
        ] {
            if !(0.0..=1.0).contains(&c.a) {
                return Err(GlassError::validation(format!(
                    "style {name} opacity must be within [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// CSS `backdrop-filter` value chaining the displacement filter `filter_id` with the
    /// blur and color adjustments.
    pub fn backdrop_filter(&self, filter_id: &str) -> String {
        format!(
            "url(#{filter_id}) blur({}px) contrast({}) brightness({}) saturate({})",
            self.blur_px, self.contrast, self.brightness, self.saturate
        )
    }

    /// CSS declarations equivalent to this style.
    pub fn css_declarations(&self, filter_id: &str) -> Vec<(&'static str, String)> {
        vec![
            ("backdrop-filter", self.backdrop_filter(filter_id)),
            ("background", self.tint.css()),
            (
                "border",
                format!("{}px solid {}", self.border_px, self.border.css()),
            ),
            (
                "box-shadow",
                format!(
                    "0 {}px {}px {}",
                    self.shadow.offset_y,
                    self.shadow.blur_px,
                    self.shadow.color.css()
                ),
            ),
        ]
    }
}

/// Primitives an effect needs from its host.
///
/// Implementations are single-threaded; every call runs to completion before the next.
pub trait GlassHost {
    /// Current geometry of `target` in device-independent pixels.
    fn bounding_box(&self, target: TargetId) -> GlassResult<Rect>;

    /// Register a displacement filter named `id` covering `width x height` raster pixels.
    fn create_displacement_filter(
        &mut self,
        id: &str,
        width: u32,
        height: u32,
    ) -> GlassResult<FilterHandle>;

    /// Change the declared region of a registered filter.
    fn resize_filter(&mut self, handle: FilterHandle, width: u32, height: u32) -> GlassResult<()>;

    /// Replace the filter's displacement texture.
    fn set_filter_texture(
        &mut self,
        handle: FilterHandle,
        texture: &EncodedTexture,
    ) -> GlassResult<()>;

    /// Set the filter's displacement scale.
    fn set_filter_scale(&mut self, handle: FilterHandle, scale: f64) -> GlassResult<()>;

    /// Unregister a filter. Unknown handles are ignored.
    fn remove_filter(&mut self, handle: FilterHandle);

    /// Apply `style` to `target`, chaining the filter `handle` into it.
    fn apply_style(
        &mut self,
        target: TargetId,
        style: &GlassStyle,
        handle: FilterHandle,
    ) -> GlassResult<()>;

    /// Restore `target` to its appearance before [`GlassHost::apply_style`].
    fn clear_style(&mut self, target: TargetId);

    /// Start listening to `source`.
    fn subscribe(&mut self, source: EventSource) -> GlassResult<ListenerId>;

    /// Stop a listener. Unknown ids are ignored.
    fn unsubscribe(&mut self, listener: ListenerId);
}

#[cfg(test)]
#[path = "../../tests/unit/host/style.rs"]
mod tests;
