//! # Steel Registry
//!
//! Materials and the generation rules keyed by them.
//!
//! Rules are registered once while configuration is loaded, then the registry
//! is frozen and only read from the tick thread.

pub mod material;
pub mod registry;
pub mod rule;

pub use material::{FluidFamily, Material, MaterialFamily, UnknownMaterial, family_of};
pub use registry::{RegistryError, RuleRegistry};
pub use rule::{GenerationRule, RuleFlags, RuleId};

/// Shared behaviour of registries that are built once and then locked.
pub trait RegistryExt {
    /// Stops further registration. Registering afterwards is an error.
    fn freeze(&mut self);

    /// Returns true once [`RegistryExt::freeze`] was called.
    fn is_frozen(&self) -> bool;
}
