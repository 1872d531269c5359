//! In-memory world.
//!
//! A [`GeneratorWorld`] backed by hash maps. Useful for:
//! - Tests
//! - Dry-running a generator config against a hand-built layout
//!
//! Every write made through the trait is recorded so callers can assert on
//! exactly what the engine changed.

use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use steel_registry::Material;
use steel_utils::{GlobalPos, PlayerId, WorldId};

use super::{Effect, GeneratorWorld};

#[derive(Debug, Clone, Copy)]
struct PlayerPosition {
    world: WorldId,
    x: f64,
    y: f64,
    z: f64,
}

/// In-memory world storage.
pub struct MemoryWorld {
    blocks: FxHashMap<GlobalPos, Material>,
    levels: FxHashMap<GlobalPos, u8>,
    players: FxHashMap<PlayerId, PlayerPosition>,
    hazards: FxHashSet<WorldId>,
    /// If true, unset positions read as air instead of unloaded.
    air_on_miss: bool,
    effects_fail: bool,
    origin: Instant,
    elapsed: Duration,
    changes: Vec<(GlobalPos, Material)>,
    effects: Vec<(GlobalPos, Effect)>,
}

impl MemoryWorld {
    /// Creates a world where every unset position is air.
    #[must_use]
    pub fn empty_world() -> Self {
        Self::with_miss_policy(true)
    }

    /// Creates a world where only explicitly set positions are loaded.
    #[must_use]
    pub fn preloaded() -> Self {
        Self::with_miss_policy(false)
    }

    fn with_miss_policy(air_on_miss: bool) -> Self {
        Self {
            blocks: FxHashMap::default(),
            levels: FxHashMap::default(),
            players: FxHashMap::default(),
            hazards: FxHashSet::default(),
            air_on_miss,
            effects_fail: false,
            origin: Instant::now(),
            elapsed: Duration::ZERO,
            changes: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Places a block without recording it as an engine change.
    pub fn set_block(&mut self, pos: GlobalPos, material: Material) {
        self.levels.remove(&pos);
        self.blocks.insert(pos, material);
    }

    /// Places a fluid with the given level.
    pub fn set_fluid(&mut self, pos: GlobalPos, material: Material, level: u8) {
        debug_assert!(material.is_fluid(), "{material} is not a fluid");
        self.blocks.insert(pos, material);
        self.levels.insert(pos, level);
    }

    /// Adds or moves a player.
    pub fn put_player(&mut self, player: PlayerId, world: WorldId, x: f64, y: f64, z: f64) {
        self.players
            .insert(player, PlayerPosition { world, x, y, z });
    }

    /// Removes a player.
    pub fn remove_player(&mut self, player: PlayerId) {
        self.players.remove(&player);
    }

    /// Turns the global hazard of `world` on or off.
    pub fn set_hazard(&mut self, world: WorldId, active: bool) {
        if active {
            self.hazards.insert(world);
        } else {
            self.hazards.remove(&world);
        }
    }

    /// Makes every following `play_effect` call report failure.
    pub fn fail_effects(&mut self, fail: bool) {
        self.effects_fail = fail;
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, by: Duration) {
        self.elapsed += by;
    }

    /// Block writes made through [`GeneratorWorld::set_material`], in order.
    #[must_use]
    pub fn changes(&self) -> &[(GlobalPos, Material)] {
        &self.changes
    }

    /// Effects successfully played, in order.
    #[must_use]
    pub fn effects(&self) -> &[(GlobalPos, Effect)] {
        &self.effects
    }
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::empty_world()
    }
}

impl GeneratorWorld for MemoryWorld {
    fn material_at(&self, pos: GlobalPos) -> Option<Material> {
        match self.blocks.get(&pos) {
            Some(&material) => Some(material),
            None if self.air_on_miss => Some(Material::Air),
            None => None,
        }
    }

    fn fluid_level(&self, pos: GlobalPos) -> Option<u8> {
        let material = self.blocks.get(&pos)?;
        if !material.is_fluid() {
            return None;
        }
        Some(self.levels.get(&pos).copied().unwrap_or(0))
    }

    fn nearest_player(&self, pos: GlobalPos, radius: f64) -> Option<PlayerId> {
        let max = radius * radius;
        self.players
            .iter()
            .filter(|(_, at)| at.world == pos.world)
            .map(|(&id, at)| (id, pos.pos.distance_to_center_sqr(at.x, at.y, at.z)))
            .filter(|&(_, distance)| distance <= max)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn set_material(&mut self, pos: GlobalPos, material: Material) {
        self.set_block(pos, material);
        self.changes.push((pos, material));
    }

    fn play_effect(&mut self, pos: GlobalPos, effect: Effect) -> bool {
        if self.effects_fail {
            return false;
        }
        self.effects.push((pos, effect));
        true
    }

    fn is_hazard_active(&self, world: WorldId) -> bool {
        self.hazards.contains(&world)
    }

    fn now(&self) -> Instant {
        self.origin + self.elapsed
    }
}
