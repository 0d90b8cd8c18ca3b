use crate::field::grid::Grid;
use crate::foundation::core::{Point, PointerState, RasterSize, Vec2};
use crate::foundation::error::{GlassError, GlassResult};
use crate::shape::{PointerProbe, ShapeFunction};

/// Per-pixel `(dx, dy)` offsets in pixels plus the normalization scale used for encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementField {
    offsets: Grid<Vec2>,
    max_scale: f64,
}

impl DisplacementField {
    /// Wrap raw offsets and derive `max_scale = 0.5 * max(|dx|, |dy|)`.
    pub fn from_offsets(offsets: Grid<Vec2>) -> GlassResult<Self> {
        let mut peak = 0.0f64;
        for (x, y, d) in offsets.iter() {
            if !d.x.is_finite() || !d.y.is_finite() {
                return Err(GlassError::evaluation(format!(
                    "non-finite displacement at ({x},{y})"
                )));
            }
            peak = peak.max(d.x.abs()).max(d.y.abs());
        }
        Ok(Self {
            offsets,
            max_scale: 0.5 * peak,
        })
    }

    /// Wrap offsets with an explicit normalization scale.
    pub fn with_max_scale(offsets: Grid<Vec2>, max_scale: f64) -> GlassResult<Self> {
        if !max_scale.is_finite() || max_scale < 0.0 {
            return Err(GlassError::validation("max_scale must be finite and >= 0"));
        }
        if offsets
            .cells()
            .iter()
            .any(|d| !d.x.is_finite() || !d.y.is_finite())
        {
            return Err(GlassError::evaluation("displacement offsets must be finite"));
        }
        Ok(Self { offsets, max_scale })
    }

    /// Grid dimensions.
    pub fn size(&self) -> RasterSize {
        self.offsets.size()
    }

    /// All offsets.
    pub fn offsets(&self) -> &Grid<Vec2> {
        &self.offsets
    }

    /// Offset at `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> Option<Vec2> {
        self.offsets.get(x, y).copied()
    }

    /// Half the largest absolute offset component, or the explicit scale.
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// `true` when no pixel is displaced.
    pub fn is_neutral(&self) -> bool {
        self.max_scale == 0.0
    }
}

/// A generated field plus whether the shape read the pointer while producing it.
#[derive(Clone, Debug)]
pub struct FieldOutcome {
    /// The generated field.
    pub field: DisplacementField,
    /// Whether the shape function read pointer state during this run.
    pub pointer_dependent: bool,
}

/// Evaluate `shape` at every pixel of a `size` raster.
///
/// Cost is `O(width * height)` shape evaluations.
#[tracing::instrument(level = "debug", skip(shape))]
pub fn generate(
    size: RasterSize,
    shape: &dyn ShapeFunction,
    pointer: PointerState,
) -> GlassResult<FieldOutcome> {
    let size = RasterSize::new(size.width, size.height)?;
    let probe = PointerProbe::new(pointer);
    let (w, h) = (f64::from(size.width), f64::from(size.height));

    let offsets = Grid::from_fn(size, |x, y| {
        let uv = Point::new(f64::from(x) / w, f64::from(y) / h);
        let src = shape.sample(uv, &probe);
        // Equal to `src * size - pixel`, but exactly zero wherever the shape returns `uv`.
        Vec2::new((src.x - uv.x) * w, (src.y - uv.y) * h)
    });

    let field = DisplacementField::from_offsets(offsets)?;
    let pointer_dependent = probe.was_read();
    tracing::debug!(
        max_scale = field.max_scale(),
        pointer_dependent,
        "displacement field generated"
    );
    Ok(FieldOutcome {
        field,
        pointer_dependent,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/field/generator.rs"]
mod tests;
