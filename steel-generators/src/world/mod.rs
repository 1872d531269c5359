//! The host port: everything the engine needs to read from or write to a world.

use std::time::Instant;

use steel_registry::Material;
use steel_utils::{GlobalPos, PlayerId, WorldId};

mod memory;

pub use memory::MemoryWorld;

/// Ambient effects the engine asks the host to play after a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// The fizz sound of fluid turning into a block.
    GenerationSound,
    /// The smoke particles of fluid turning into a block.
    GenerationParticles,
}

/// World access implemented by the host.
///
/// Reads return `None` when the position is outside loaded chunks; the engine
/// treats that as "no match" rather than an error.
pub trait GeneratorWorld {
    /// Material at `pos`.
    fn material_at(&self, pos: GlobalPos) -> Option<Material>;

    /// Fluid level at `pos` (0 = source, higher = further from one), or
    /// `None` if `pos` holds no fluid.
    fn fluid_level(&self, pos: GlobalPos) -> Option<u8>;

    /// The closest player within `radius` blocks of `pos`, in the same world.
    fn nearest_player(&self, pos: GlobalPos, radius: f64) -> Option<PlayerId>;

    /// Replaces the block at `pos`.
    fn set_material(&mut self, pos: GlobalPos, material: Material);

    /// Plays an effect at `pos`. Returns false if the host could not play it.
    fn play_effect(&mut self, pos: GlobalPos, effect: Effect) -> bool;

    /// Whether a world-wide hazard is active in `world`.
    fn is_hazard_active(&self, _world: WorldId) -> bool {
        false
    }

    /// Current time, used for attribution expiry.
    fn now(&self) -> Instant {
        Instant::now()
    }
}
