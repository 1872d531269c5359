//! Known generator locations and who gets credit for them.
//!
//! A location becomes known the first time a rule matches there. Separately,
//! it may carry an [`AttributionRecord`] naming the player credited for the
//! next generation. Records expire lazily: an expired record is dropped the
//! next time it is read, never by a background sweep.

use std::time::{Duration, Instant};

use rustc_hash::{FxHashMap, FxHashSet};
use steel_utils::{GlobalPos, PlayerId, WorldId};

/// The player currently credited for a known location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributionRecord {
    /// The credited player.
    pub owner: PlayerId,
    /// When the record was created or last overwritten.
    pub established_at: Instant,
    /// How long the record stays live.
    pub ttl: Duration,
}

impl AttributionRecord {
    /// A record is live while `now - established_at <= ttl`.
    #[inline]
    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.established_at) > self.ttl
    }
}

/// Location-indexed generator state.
#[derive(Debug, Default)]
pub struct LocationStore {
    known: FxHashSet<GlobalPos>,
    attributions: FxHashMap<GlobalPos, AttributionRecord>,
}

impl LocationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `pos` as a known location. Returns true if it was not known yet.
    pub fn mark_known(&mut self, pos: GlobalPos) -> bool {
        let inserted = self.known.insert(pos);
        if inserted {
            log::debug!("Generator location {pos} is now known");
        }
        inserted
    }

    /// Returns true if `pos` is a known location.
    #[must_use]
    pub fn is_known(&self, pos: GlobalPos) -> bool {
        self.known.contains(&pos)
    }

    /// The live owner of `pos`, dropping the record if it has expired.
    pub fn attribution(&mut self, pos: GlobalPos, now: Instant) -> Option<PlayerId> {
        let record = self.attributions.get(&pos)?;
        if record.is_expired(now) {
            log::trace!("Attribution of {pos} to {} expired", record.owner);
            self.attributions.remove(&pos);
            return None;
        }
        Some(record.owner)
    }

    /// The stored record for `pos`, live or not.
    #[must_use]
    pub fn record(&self, pos: GlobalPos) -> Option<&AttributionRecord> {
        self.attributions.get(&pos)
    }

    /// Credits `player` for `pos` for the next `ttl`, replacing any record.
    pub fn establish(&mut self, pos: GlobalPos, player: PlayerId, ttl: Duration, now: Instant) {
        log::debug!("Attributing generator at {pos} to {player} for {ttl:?}");
        self.attributions.insert(
            pos,
            AttributionRecord {
                owner: player,
                established_at: now,
                ttl,
            },
        );
    }

    /// Forgets `pos` entirely.
    pub fn clear(&mut self, pos: GlobalPos) {
        self.known.remove(&pos);
        self.attributions.remove(&pos);
    }

    /// Drops every expired record. Returns how many were dropped.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.attributions.len();
        self.attributions.retain(|_, record| !record.is_expired(now));
        before - self.attributions.len()
    }

    /// Drops all state belonging to `world`.
    pub fn unload_world(&mut self, world: WorldId) {
        self.known.retain(|pos| pos.world != world);
        self.attributions.retain(|pos, _| pos.world != world);
    }

    /// Number of known locations.
    #[must_use]
    pub fn known_len(&self) -> usize {
        self.known.len()
    }

    /// Number of stored attribution records, including expired ones not yet read.
    #[must_use]
    pub fn attribution_len(&self) -> usize {
        self.attributions.len()
    }
}
