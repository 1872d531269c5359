//! Piston ownership.
//!
//! Automated farms push generated blocks out with a piston. Whoever placed
//! the piston, not whoever stands nearby, gets the credit for what it pushes.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use steel_utils::{GlobalPos, PlayerId, WorldId};

use crate::location::LocationStore;

/// A tracked piston.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PistonRecord {
    /// Where the piston block sits.
    pub pos: GlobalPos,
    /// The player who placed it.
    pub owner: PlayerId,
    /// Set once the piston has pushed at a known location.
    pub triggered: bool,
}

/// Tracks player-placed pistons by position.
#[derive(Debug, Default)]
pub struct PistonTracker {
    pistons: FxHashMap<GlobalPos, PistonRecord>,
}

impl PistonTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `player` placed a piston at `pos`.
    pub fn register(&mut self, pos: GlobalPos, player: PlayerId) {
        self.pistons.insert(
            pos,
            PistonRecord {
                pos,
                owner: player,
                triggered: false,
            },
        );
    }

    /// Stops tracking the piston at `pos`.
    pub fn unregister(&mut self, pos: GlobalPos) -> Option<PistonRecord> {
        self.pistons.remove(&pos)
    }

    /// The player who placed the piston at `pos`.
    #[must_use]
    pub fn owner_of(&self, pos: GlobalPos) -> Option<PlayerId> {
        self.pistons.get(&pos).map(|record| record.owner)
    }

    /// The record of the piston at `pos`.
    #[must_use]
    pub fn get(&self, pos: GlobalPos) -> Option<&PistonRecord> {
        self.pistons.get(&pos)
    }

    /// Handles a piston at `piston` extending into `push_destination`.
    ///
    /// If the destination is a known location, the piston is marked triggered
    /// and the location is credited to the piston's owner. Returns the
    /// credited player.
    pub fn on_extend(
        &mut self,
        piston: GlobalPos,
        push_destination: GlobalPos,
        locations: &mut LocationStore,
        ttl: Duration,
        now: Instant,
    ) -> Option<PlayerId> {
        if !locations.is_known(push_destination) {
            return None;
        }
        let record = self.pistons.get_mut(&piston)?;
        record.triggered = true;
        log::debug!(
            "Piston at {piston} pushed generator at {push_destination}, crediting {}",
            record.owner
        );
        locations.establish(push_destination, record.owner, ttl, now);
        Some(record.owner)
    }

    /// Drops all pistons in `world`.
    pub fn unload_world(&mut self, world: WorldId) {
        self.pistons.retain(|pos, _| pos.world != world);
    }

    /// Returns true if no pistons are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pistons.is_empty()
    }
}
