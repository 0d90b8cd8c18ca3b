//! Procedural "liquid glass" refraction.
//!
//! A [`ShapeFunction`] describes, per pixel, where the glass samples the surface behind it.
//! The crate evaluates it into a [`DisplacementField`], quantizes that into an RGBA8
//! [`EncodedTexture`], and drives a host displacement filter with it:
//!
//! - Describe the lens with a [`ShapeFunction`] (for example [`RoundedRectLens`])
//! - Attach it to a host surface through an [`EffectRegistry`]
//! - Feed host events to [`EffectRegistry::dispatch`]; fields are regenerated only when the
//!   geometry changes or the shape actually depends on the pointer
//!
//! [`SoftwareHost`] is an in-memory [`GlassHost`] that can also composite the result on the CPU.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Effect lifecycle.
pub mod effect;
/// Field generation and encoding.
pub mod field;
/// Host interface and the software host.
pub mod host;
/// Shape functions.
pub mod shape;

pub use crate::effect::{EffectRegistry, EffectStats, GlassEffect, GlassOptions};
pub use crate::field::{DisplacementField, EncodedTexture, FieldOutcome, Grid, encode, generate};
pub use crate::foundation::core::{Point, PointerState, RasterSize, Rect, Size, Vec2};
pub use crate::foundation::error::{GlassError, GlassResult};
pub use crate::foundation::math::{
    NEUTRAL_CHANNEL, dequantize, length, quantize_unit, rounded_rect_sdf, smooth_step,
};
pub use crate::host::{
    AppliedStyle, Color, EventSource, FilterHandle, FilterRecord, GlassHost, GlassStyle,
    HostEvent, ListenerId, Shadow, SoftwareHost, TargetId,
};
pub use crate::shape::{
    Identity, LensConfig, PointerProbe, RoundedRectLens, ShapeFunction, SharedShape, shape_fn,
};
