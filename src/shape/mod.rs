//! Shape functions: the per-pixel mapping that decides what the glass refracts.

use std::cell::Cell;
use std::sync::Arc;

use crate::foundation::core::{Point, PointerState};

pub(crate) mod lens;

/// Read-tracking view of the pointer handed to a [`ShapeFunction`].
///
/// Any call to [`PointerProbe::x`], [`PointerProbe::y`] or [`PointerProbe::position`] marks
/// the probe as read. The field generator uses that mark to decide whether later pointer
/// moves need a full regeneration.
#[derive(Debug)]
pub struct PointerProbe {
    state: PointerState,
    read: Cell<bool>,
}

impl PointerProbe {
    pub(crate) fn new(state: PointerState) -> Self {
        Self {
            state,
            read: Cell::new(false),
        }
    }

    /// Box-relative horizontal pointer position.
    pub fn x(&self) -> f64 {
        self.read.set(true);
        self.state.x
    }

    /// Box-relative vertical pointer position.
    pub fn y(&self) -> f64 {
        self.read.set(true);
        self.state.y
    }

    /// Both coordinates at once.
    pub fn position(&self) -> PointerState {
        self.read.set(true);
        self.state
    }

    pub(crate) fn was_read(&self) -> bool {
        self.read.get()
    }
}

/// Maps a normalized coordinate `uv ∈ [0,1]²` to the normalized coordinate it samples from.
///
/// Returning `uv` unchanged means "no displacement" at that pixel.
pub trait ShapeFunction {
    /// Source coordinate for `uv`.
    fn sample(&self, uv: Point, pointer: &PointerProbe) -> Point;
}

impl<F> ShapeFunction for F
where
    F: Fn(Point, &PointerProbe) -> Point,
{
    fn sample(&self, uv: Point, pointer: &PointerProbe) -> Point {
        self(uv, pointer)
    }
}

/// Shared handle to a shape function.
pub type SharedShape = Arc<dyn ShapeFunction>;

/// Wrap a closure as a [`SharedShape`].
pub fn shape_fn<F>(f: F) -> SharedShape
where
    F: Fn(Point, &PointerProbe) -> Point + 'static,
{
    Arc::new(f)
}

/// The shape that samples every pixel from itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl ShapeFunction for Identity {
    fn sample(&self, uv: Point, _pointer: &PointerProbe) -> Point {
        uv
    }
}

pub use lens::{LensConfig, RoundedRectLens};

#[cfg(test)]
#[path = "../../tests/unit/shape/probe.rs"]
mod tests;
