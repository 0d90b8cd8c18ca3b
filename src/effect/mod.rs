//! Effect lifecycle: per-target instances and the registry that owns them.

pub(crate) mod instance;
pub(crate) mod options;
pub(crate) mod registry;

pub use instance::{EffectStats, GlassEffect};
pub use options::GlassOptions;
pub use registry::EffectRegistry;
