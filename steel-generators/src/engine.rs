//! The per-event control flow.

use std::time::Duration;

use steel_registry::{Material, RuleFlags, RuleId, RuleRegistry};
use steel_utils::{Direction, GlobalPos, PlayerId, WorldId};

use crate::config::GeneratorConfig;
use crate::error::{ConfigError, GeneratorError};
use crate::events::EventDispatcher;
use crate::fluid::{CollisionResolver, SolidifyAction};
use crate::location::LocationStore;
use crate::matcher::is_match;
use crate::piston::PistonTracker;
use crate::world::{Effect, GeneratorWorld};

/// Tunables shared by every rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Radius of the nearest-player search, in blocks.
    pub search_radius: f64,
    /// Lifetime of every attribution record.
    pub attribution_ttl: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            search_radius: 8.0,
            attribution_ttl: Duration::from_secs(300),
        }
    }
}

/// What a fluid-flow notification turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    /// No collision and no rule matched.
    Ignored,
    /// Two streams collided and one cell was solidified.
    Solidified(SolidifyAction),
    /// A rule matched, but nobody is credited for the location.
    Inert {
        /// The matching rule.
        rule: RuleId,
        /// The destination cell.
        location: GlobalPos,
    },
    /// A listener vetoed the generation.
    Cancelled {
        /// The matching rule.
        rule: RuleId,
        /// The destination cell.
        location: GlobalPos,
    },
    /// The destination cell was converted.
    Generated {
        /// The matching rule.
        rule: RuleId,
        /// The placed material.
        material: Material,
        /// The credited player.
        owner: PlayerId,
        /// The converted cell.
        location: GlobalPos,
    },
}

impl FlowOutcome {
    /// Whether the host should cancel the vanilla flow because the engine
    /// already rewrote a cell.
    #[must_use]
    pub fn cancels_flow(&self) -> bool {
        matches!(self, Self::Solidified(_) | Self::Generated { .. })
    }
}

/// Owns all generator state for one server.
///
/// Every method must be called from the tick thread.
#[derive(Debug)]
pub struct GeneratorEngine {
    registry: RuleRegistry,
    settings: EngineSettings,
    collision: CollisionResolver,
    locations: LocationStore,
    pistons: PistonTracker,
    events: EventDispatcher,
}

impl GeneratorEngine {
    /// Creates an engine around an already loaded registry.
    #[must_use]
    pub fn new(
        registry: RuleRegistry,
        settings: EngineSettings,
        collision: CollisionResolver,
    ) -> Self {
        log::debug!(
            "Generator engine started with {} rules, search radius {}, attribution ttl {:?}",
            registry.len(),
            settings.search_radius,
            settings.attribution_ttl
        );
        Self {
            registry,
            settings,
            collision,
            locations: LocationStore::new(),
            pistons: PistonTracker::new(),
            events: EventDispatcher::new(),
        }
    }

    /// Validates `config` and builds an engine from it.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            config.build_registry()?,
            config.settings(),
            config.collision_resolver(),
        ))
    }

    /// Handles fluid flowing from `source` into `destination`.
    ///
    /// # Errors
    /// Returns [`GeneratorError::UnresolvedMaterial`] if a rule fired with no
    /// fallback material and no listener supplied one.
    pub fn on_fluid_flow<W: GeneratorWorld + ?Sized>(
        &mut self,
        world: &mut W,
        source: GlobalPos,
        destination: GlobalPos,
        direction: Direction,
    ) -> Result<FlowOutcome, GeneratorError> {
        if let Some(action) = self.collision.resolve(&*world, source, destination, direction) {
            log::debug!("Solidifying {} into {}", action.pos, action.material);
            world.set_material(action.pos, action.material);
            return Ok(FlowOutcome::Solidified(action));
        }

        let Some(material) = world.material_at(source) else {
            return Ok(FlowOutcome::Ignored);
        };
        let hazard = world.is_hazard_active(destination.world);
        let reader: &W = world;
        let Some(rule) = self
            .registry
            .rules_matching(material)
            .filter(|rule| !hazard || rule.flags().contains(RuleFlags::ACTIVE_DURING_HAZARD))
            .find(|rule| is_match(rule, material, destination, |pos| reader.material_at(pos)))
        else {
            return Ok(FlowOutcome::Ignored);
        };

        let now = world.now();
        if self.locations.mark_known(destination)
            && rule.flags().contains(RuleFlags::SEARCH_NEARBY_PLAYERS)
            && let Some(player) = world.nearest_player(destination, self.settings.search_radius)
        {
            self.locations
                .establish(destination, player, self.settings.attribution_ttl, now);
        }

        let Some(owner) = self.locations.attribution(destination, now) else {
            log::trace!("Rule `{}` matched at {destination}, but it is inert", rule.id());
            return Ok(FlowOutcome::Inert {
                rule: rule.id().clone(),
                location: destination,
            });
        };

        let outcome = self.events.dispatch_generation(
            rule.id().clone(),
            rule.fallback_material(),
            owner,
            destination,
        );
        if outcome.is_cancelled() {
            log::debug!("Generation of `{}` at {destination} was cancelled", rule.id());
            return Ok(FlowOutcome::Cancelled {
                rule: rule.id().clone(),
                location: destination,
            });
        }
        let Some(output) = outcome.material() else {
            log::error!(
                "Rule `{}` fired at {destination} without a fallback material and no listener supplied one",
                rule.id()
            );
            return Err(GeneratorError::UnresolvedMaterial {
                rule: rule.id().clone(),
                pos: destination,
            });
        };

        world.set_material(destination, output);
        let flags = rule.flags();
        for (flag, effect) in [
            (RuleFlags::SOUND, Effect::GenerationSound),
            (RuleFlags::PARTICLES, Effect::GenerationParticles),
        ] {
            if flags.contains(flag) && !world.play_effect(destination, effect) {
                log::trace!("Host could not play {effect:?} at {destination}");
            }
        }

        Ok(FlowOutcome::Generated {
            rule: rule.id().clone(),
            material: output,
            owner: outcome.owner(),
            location: destination,
        })
    }

    /// Handles `player` breaking the block at `pos`.
    ///
    /// Returns true if a known location was re-armed for `player`.
    pub fn on_block_broken<W: GeneratorWorld + ?Sized>(
        &mut self,
        world: &W,
        player: PlayerId,
        pos: GlobalPos,
    ) -> bool {
        if self.pistons.unregister(pos).is_some() {
            log::debug!("Piston at {pos} was broken by {player}");
        }
        if !self.locations.is_known(pos) {
            return false;
        }
        if !self.events.dispatch_break(player, pos) {
            log::debug!("Re-arming {pos} for {player} was cancelled");
            return false;
        }
        self.locations
            .establish(pos, player, self.settings.attribution_ttl, world.now());
        true
    }

    /// Handles `player` placing a piston at `pos`.
    pub fn on_piston_placed(&mut self, pos: GlobalPos, player: PlayerId) {
        self.pistons.register(pos, player);
    }

    /// Handles the piston at `piston` extending towards `direction`.
    ///
    /// Returns the player now credited for the pushed location, if any.
    pub fn on_piston_extend<W: GeneratorWorld + ?Sized>(
        &mut self,
        world: &W,
        piston: GlobalPos,
        direction: Direction,
    ) -> Option<PlayerId> {
        self.pistons.on_extend(
            piston,
            piston.relative(direction),
            &mut self.locations,
            self.settings.attribution_ttl,
            world.now(),
        )
    }

    /// Forgets a location that can never generate again.
    pub fn forget_location(&mut self, pos: GlobalPos) {
        log::debug!("Forgetting generator location {pos}");
        self.locations.clear(pos);
    }

    /// Drops every expired attribution record. Returns how many were dropped.
    pub fn purge_expired<W: GeneratorWorld + ?Sized>(&mut self, world: &W) -> usize {
        self.locations.purge_expired(world.now())
    }

    /// Drops all state that belongs to `world`.
    pub fn unload_world(&mut self, world: WorldId) {
        self.locations.unload_world(world);
        self.pistons.unload_world(world);
        log::debug!("Dropped generator state for world {}", world.0);
    }

    /// The loaded rules.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// The engine tunables.
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Known locations and attributions.
    #[must_use]
    pub fn locations(&self) -> &LocationStore {
        &self.locations
    }

    /// Tracked pistons.
    #[must_use]
    pub fn pistons(&self) -> &PistonTracker {
        &self.pistons
    }

    /// The listener subscription point.
    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }
}
