use std::collections::HashMap;

use crate::effect::instance::GlassEffect;
use crate::effect::options::GlassOptions;
use crate::foundation::error::{GlassError, GlassResult};
use crate::host::{GlassHost, HostEvent, TargetId};
use crate::shape::SharedShape;

/// Live glass effects keyed by target, at most one per target.
///
/// Re-attaching to a target tears the old effect down before building the new one, so filters
/// never stack on a surface.
#[derive(Debug, Default)]
pub struct EffectRegistry {
    effects: HashMap<TargetId, GlassEffect>,
}

impl EffectRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new effect to `target`, replacing any existing one.
    ///
    /// The previous effect is destroyed first. If the new one fails to build, the target is left
    /// without an effect and nothing is registered.
    pub fn attach(
        &mut self,
        host: &mut dyn GlassHost,
        target: TargetId,
        shape: SharedShape,
        options: GlassOptions,
    ) -> GlassResult<&GlassEffect> {
        if let Some(mut previous) = self.effects.remove(&target) {
            previous.destroy(host);
            tracing::debug!(?target, id = previous.id(), "replaced glass effect");
        }
        let effect = GlassEffect::new(host, target, shape, options)?;
        Ok(self.effects.entry(target).or_insert(effect))
    }

    /// Destroy and forget the effect on `target`. Returns `false` when there was none.
    pub fn detach(&mut self, host: &mut dyn GlassHost, target: TargetId) -> bool {
        match self.effects.remove(&target) {
            Some(mut effect) => {
                effect.destroy(host);
                true
            }
            None => false,
        }
    }

    /// Destroy every effect.
    pub fn detach_all(&mut self, host: &mut dyn GlassHost) {
        for (_, mut effect) in self.effects.drain() {
            effect.destroy(host);
        }
    }

    /// Effect attached to `target`.
    pub fn get(&self, target: TargetId) -> Option<&GlassEffect> {
        self.effects.get(&target)
    }

    /// Mutable effect attached to `target`.
    pub fn get_mut(&mut self, target: TargetId) -> Option<&mut GlassEffect> {
        self.effects.get_mut(&target)
    }

    /// Number of live effects.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// `true` when no effect is attached.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Targets with a live effect, sorted.
    pub fn targets(&self) -> Vec<TargetId> {
        let mut out: Vec<_> = self.effects.keys().copied().collect();
        out.sort_unstable();
        out
    }

    /// Route a host event to the effects it concerns.
    ///
    /// Returns how many effects regenerated their field. A resize visits every effect even if
    /// one fails; the first failure is returned.
    pub fn dispatch(&mut self, host: &mut dyn GlassHost, event: HostEvent) -> GlassResult<usize> {
        match event {
            HostEvent::PointerMove { target, position } => match self.effects.get_mut(&target) {
                Some(effect) => Ok(usize::from(effect.on_pointer_move(host, position)?)),
                None => Ok(0),
            },
            HostEvent::Resize => {
                let mut regenerated = 0;
                let mut first_err: Option<GlassError> = None;
                for target in self.targets() {
                    let Some(effect) = self.effects.get_mut(&target) else {
                        continue;
                    };
                    match effect.on_resize(host) {
                        Ok(true) => regenerated += 1,
                        Ok(false) => {}
                        Err(err) => {
                            tracing::warn!(?target, error = %err, "resize handling failed");
                            first_err.get_or_insert(err);
                        }
                    }
                }
                match first_err {
                    Some(err) => Err(err),
                    None => Ok(regenerated),
                }
            }
        }
    }
}
