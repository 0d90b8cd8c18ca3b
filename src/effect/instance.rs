use crate::effect::options::GlassOptions;
use crate::field::{EncodedTexture, encode, generate};
use crate::foundation::core::{Point, PointerState, RasterSize};
use crate::foundation::error::GlassResult;
use crate::host::{EventSource, FilterHandle, GlassHost, ListenerId, TargetId};
use crate::shape::SharedShape;

/// Counters describing the work an effect has done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EffectStats {
    /// Full-grid field evaluations, including the one at construction.
    pub regenerations: u64,
    /// Pointer-move events received.
    pub pointer_events: u64,
    /// Resize events that changed the raster size.
    pub resizes: u64,
}

/// A live glass effect bound to one target surface.
///
/// Created with [`GlassEffect::new`], driven by [`GlassEffect::on_pointer_move`] and
/// [`GlassEffect::on_resize`], and torn down with [`GlassEffect::destroy`]. Usually managed
/// through [`crate::EffectRegistry`].
pub struct GlassEffect {
    id: String,
    target: TargetId,
    shape: SharedShape,
    options: GlassOptions,
    size: RasterSize,
    pointer: PointerState,
    pointer_dependent: bool,
    texture: Option<EncodedTexture>,
    filter: FilterHandle,
    listeners: Vec<ListenerId>,
    stats: EffectStats,
    destroyed: bool,
}

impl std::fmt::Debug for GlassEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlassEffect")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("size", &self.size)
            .field("pointer", &self.pointer)
            .field("pointer_dependent", &self.pointer_dependent)
            .field("filter", &self.filter)
            .field("stats", &self.stats)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl GlassEffect {
    /// Build the effect and wire it into `host`.
    ///
    /// The field and texture are computed before anything is registered, and the style is
    /// applied last. On failure every registration made so far is undone and the target keeps
    /// its original appearance.
    pub fn new(
        host: &mut dyn GlassHost,
        target: TargetId,
        shape: SharedShape,
        options: GlassOptions,
    ) -> GlassResult<Self> {
        options.validate()?;
        let bounds = host.bounding_box(target)?;
        let size = RasterSize::from_logical(bounds.size(), options.pixel_ratio)?;

        let pointer = PointerState::default();
        let outcome = generate(size, shape.as_ref(), pointer)?;
        let texture = encode(&outcome.field);

        let id = format!("liquid-glass-{}", uuid::Uuid::new_v4().simple());
        let filter = host.create_displacement_filter(&filter_id(&id), size.width, size.height)?;

        let mut effect = Self {
            id,
            target,
            shape,
            options,
            size,
            pointer,
            pointer_dependent: outcome.pointer_dependent,
            texture: None,
            filter,
            listeners: Vec::with_capacity(2),
            stats: EffectStats {
                regenerations: 1,
                ..EffectStats::default()
            },
            destroyed: false,
        };

        if let Err(err) = effect.wire(host, texture) {
            for l in effect.listeners.drain(..) {
                host.unsubscribe(l);
            }
            host.remove_filter(filter);
            tracing::debug!(?target, error = %err, "glass effect setup rolled back");
            return Err(err);
        }

        tracing::debug!(
            id = %effect.id,
            ?target,
            width = size.width,
            height = size.height,
            pointer_dependent = effect.pointer_dependent,
            "glass effect attached"
        );
        Ok(effect)
    }

    fn wire(&mut self, host: &mut dyn GlassHost, texture: EncodedTexture) -> GlassResult<()> {
        host.set_filter_scale(self.filter, self.options.initial_scale)?;
        self.push(host, texture)?;
        self.listeners
            .push(host.subscribe(EventSource::PointerMove(self.target))?);
        self.listeners.push(host.subscribe(EventSource::Resize)?);
        host.apply_style(self.target, &self.options.style, self.filter)
    }

    /// Unique id; the host filter is registered as `<id>_filter`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Name of the registered filter.
    pub fn filter_id(&self) -> String {
        filter_id(&self.id)
    }

    /// Target surface.
    pub fn target(&self) -> TargetId {
        self.target
    }

    /// Host filter handle.
    pub fn filter(&self) -> FilterHandle {
        self.filter
    }

    /// Current raster size.
    pub fn size(&self) -> RasterSize {
        self.size
    }

    /// Last pointer position seen.
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Whether the last generation read the pointer.
    pub fn is_pointer_dependent(&self) -> bool {
        self.pointer_dependent
    }

    /// Texture currently pushed to the filter; `None` once destroyed.
    pub fn texture(&self) -> Option<&EncodedTexture> {
        self.texture.as_ref()
    }

    /// Work counters.
    pub fn stats(&self) -> EffectStats {
        self.stats
    }

    /// Effect configuration.
    pub fn options(&self) -> &GlassOptions {
        &self.options
    }

    /// Whether [`GlassEffect::destroy`] has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Handle a pointer move at `position` (host coordinates).
    ///
    /// Returns `true` when the field was regenerated. Shapes that did not read the pointer on
    /// their last run are not re-evaluated. If the host rejects the new texture the previous
    /// one stays current.
    pub fn on_pointer_move(
        &mut self,
        host: &mut dyn GlassHost,
        position: Point,
    ) -> GlassResult<bool> {
        if self.destroyed {
            return Ok(false);
        }
        self.stats.pointer_events += 1;
        let bounds = host.bounding_box(self.target)?;
        self.pointer = PointerState::relative_to(position, bounds);
        if !self.pointer_dependent {
            return Ok(false);
        }
        let (texture, pointer_dependent) = self.evaluate(self.size)?;
        self.push(host, texture)?;
        self.commit(pointer_dependent);
        Ok(true)
    }

    /// Handle a viewport resize.
    ///
    /// Returns `true` when the target's raster size changed and the field was regenerated.
    /// A target that collapsed to zero width or height (e.g. hidden) is skipped and keeps its
    /// last texture; it regenerates once it has an area again. Effect state only changes after
    /// the host accepted the resized filter and texture.
    pub fn on_resize(&mut self, host: &mut dyn GlassHost) -> GlassResult<bool> {
        if self.destroyed {
            return Ok(false);
        }
        let bounds = host.bounding_box(self.target)?;
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            tracing::debug!(id = %self.id, target = ?self.target, "target collapsed; resize skipped");
            return Ok(false);
        }
        let size = RasterSize::from_logical(bounds.size(), self.options.pixel_ratio)?;
        if size == self.size {
            return Ok(false);
        }

        let (texture, pointer_dependent) = self.evaluate(size)?;
        host.resize_filter(self.filter, size.width, size.height)?;
        self.push(host, texture)?;
        self.size = size;
        self.stats.resizes += 1;
        self.commit(pointer_dependent);
        tracing::debug!(
            id = %self.id,
            width = size.width,
            height = size.height,
            "glass effect resized"
        );
        Ok(true)
    }

    /// Remove the style, filter and listeners from `host` and drop the texture.
    ///
    /// Calling it again does nothing.
    pub fn destroy(&mut self, host: &mut dyn GlassHost) {
        if self.destroyed {
            return;
        }
        host.clear_style(self.target);
        host.remove_filter(self.filter);
        for l in self.listeners.drain(..) {
            host.unsubscribe(l);
        }
        self.texture = None;
        self.destroyed = true;
        tracing::debug!(id = %self.id, target = ?self.target, "glass effect destroyed");
    }

    fn evaluate(&self, size: RasterSize) -> GlassResult<(EncodedTexture, bool)> {
        let outcome = generate(size, self.shape.as_ref(), self.pointer)?;
        Ok((encode(&outcome.field), outcome.pointer_dependent))
    }

    fn commit(&mut self, pointer_dependent: bool) {
        self.pointer_dependent = pointer_dependent;
        self.stats.regenerations += 1;
    }

    fn push(&mut self, host: &mut dyn GlassHost, texture: EncodedTexture) -> GlassResult<()> {
        host.set_filter_texture(self.filter, &texture)?;
        host.set_filter_scale(self.filter, texture.filter_scale(self.options.pixel_ratio))?;
        self.texture = Some(texture);
        Ok(())
    }
}

fn filter_id(effect_id: &str) -> String {
    format!("{effect_id}_filter")
}

#[cfg(test)]
#[path = "../../tests/unit/effect/instance.rs"]
mod tests;
