//! Cancellable notifications for other features.
//!
//! Listeners never mutate a shared event. Each one takes the current value and
//! returns the next one, so cancellation and material overrides are plain data.
//! A listener that panics is skipped: its input is passed on unchanged.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use steel_registry::{Material, RuleId};
use steel_utils::{GlobalPos, PlayerId};

/// The result of a generation notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    rule: RuleId,
    material: Option<Material>,
    owner: PlayerId,
    location: GlobalPos,
    cancelled: bool,
}

impl GenerationOutcome {
    pub(crate) fn new(
        rule: RuleId,
        material: Option<Material>,
        owner: PlayerId,
        location: GlobalPos,
    ) -> Self {
        Self {
            rule,
            material,
            owner,
            location,
            cancelled: false,
        }
    }

    /// The rule that matched.
    #[must_use]
    pub fn rule(&self) -> &RuleId {
        &self.rule
    }

    /// The material that will be placed, if one has been resolved yet.
    #[must_use]
    pub fn material(&self) -> Option<Material> {
        self.material
    }

    /// The credited player.
    #[must_use]
    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The cell being converted.
    #[must_use]
    pub fn location(&self) -> GlobalPos {
        self.location
    }

    /// Whether a listener vetoed the generation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Vetoes the generation.
    #[must_use]
    pub fn cancel(mut self) -> Self {
        self.cancelled = true;
        self
    }

    /// Overrides the material to place.
    #[must_use]
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    /// Credits a different player.
    #[must_use]
    pub fn with_owner(mut self, owner: PlayerId) -> Self {
        self.owner = owner;
        self
    }
}

/// A player broke a block at a known location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakEvent {
    player: PlayerId,
    location: GlobalPos,
    cancelled: bool,
}

impl BreakEvent {
    /// The breaking player.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// The known location that was broken.
    #[must_use]
    pub fn location(&self) -> GlobalPos {
        self.location
    }

    /// Whether a listener vetoed the re-arm.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Vetoes re-arming the location for this player.
    #[must_use]
    pub fn cancel(mut self) -> Self {
        self.cancelled = true;
        self
    }
}

/// Reacts to a generation before the world is changed.
pub trait GenerationListener {
    /// Returns the outcome to pass to the next listener.
    fn on_generation(&mut self, outcome: GenerationOutcome) -> GenerationOutcome;
}

impl<F> GenerationListener for F
where
    F: FnMut(GenerationOutcome) -> GenerationOutcome,
{
    fn on_generation(&mut self, outcome: GenerationOutcome) -> GenerationOutcome {
        self(outcome)
    }
}

/// Reacts to a player breaking a block at a known location.
pub trait BreakListener {
    /// Returns the event to pass to the next listener.
    fn on_break(&mut self, event: BreakEvent) -> BreakEvent;
}

impl<F> BreakListener for F
where
    F: FnMut(BreakEvent) -> BreakEvent,
{
    fn on_break(&mut self, event: BreakEvent) -> BreakEvent {
        self(event)
    }
}

/// Runs listeners in subscription order.
#[derive(Default)]
pub struct EventDispatcher {
    generation: Vec<Box<dyn GenerationListener>>,
    breaks: Vec<Box<dyn BreakListener>>,
}

impl EventDispatcher {
    /// Creates a dispatcher with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a generation listener.
    pub fn subscribe_generation(&mut self, listener: impl GenerationListener + 'static) {
        self.generation.push(Box::new(listener));
    }

    /// Adds a break listener.
    pub fn subscribe_break(&mut self, listener: impl BreakListener + 'static) {
        self.breaks.push(Box::new(listener));
    }

    /// Number of break listeners.
    #[must_use]
    pub fn break_listeners(&self) -> usize {
        self.breaks.len()
    }

    /// Runs every generation listener over a fresh outcome.
    ///
    /// Listeners after a cancellation still run and may see `is_cancelled`.
    pub fn dispatch_generation(
        &mut self,
        rule: RuleId,
        material: Option<Material>,
        owner: PlayerId,
        location: GlobalPos,
    ) -> GenerationOutcome {
        let mut outcome = GenerationOutcome::new(rule, material, owner, location);
        for (index, listener) in self.generation.iter_mut().enumerate() {
            let input = outcome.clone();
            match catch_unwind(AssertUnwindSafe(|| listener.on_generation(input))) {
                Ok(next) => outcome = next,
                Err(_) => log::error!(
                    "Generation listener #{index} panicked at {location}, ignoring its result"
                ),
            }
        }
        outcome
    }

    /// Runs every break listener. Returns true if the break was not cancelled.
    pub fn dispatch_break(&mut self, player: PlayerId, location: GlobalPos) -> bool {
        let mut event = BreakEvent {
            player,
            location,
            cancelled: false,
        };
        for (index, listener) in self.breaks.iter_mut().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| listener.on_break(event))) {
                Ok(next) => event = next,
                Err(_) => log::error!(
                    "Break listener #{index} panicked at {location}, ignoring its result"
                ),
            }
        }
        !event.cancelled
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("generation", &self.generation.len())
            .field("breaks", &self.breaks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use steel_utils::WorldId;
    use uuid::Uuid;

    use super::*;

    const POS: GlobalPos = GlobalPos::new(WorldId(0), 4, 70, -2);

    fn dispatch(dispatcher: &mut EventDispatcher, owner: PlayerId) -> GenerationOutcome {
        dispatcher.dispatch_generation(
            RuleId::new("cobblestone"),
            Some(Material::Cobblestone),
            owner,
            POS,
        )
    }

    #[test]
    fn test_no_listeners_passes_through() {
        let owner = Uuid::new_v4();
        let outcome = dispatch(&mut EventDispatcher::new(), owner);
        assert!(!outcome.is_cancelled());
        assert_eq!(outcome.material(), Some(Material::Cobblestone));
        assert_eq!(outcome.owner(), owner);
        assert_eq!(outcome.location(), POS);
        assert_eq!(outcome.rule().as_str(), "cobblestone");
    }

    #[test]
    fn test_listeners_run_in_order() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe_generation(|o: GenerationOutcome| o.with_material(Material::IronOre));
        dispatcher.subscribe_generation(|o: GenerationOutcome| {
            assert_eq!(o.material(), Some(Material::IronOre));
            o.with_material(Material::DiamondOre)
        });
        let outcome = dispatch(&mut dispatcher, Uuid::new_v4());
        assert_eq!(outcome.material(), Some(Material::DiamondOre));
    }

    #[test]
    fn test_cancel() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe_generation(GenerationOutcome::cancel);
        assert!(dispatch(&mut dispatcher, Uuid::new_v4()).is_cancelled());
    }

    #[test]
    fn test_panicking_listener_is_skipped() {
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);

        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe_generation(|o: GenerationOutcome| o.with_material(Material::GoldOre));
        dispatcher.subscribe_generation(|o: GenerationOutcome| -> GenerationOutcome {
            let _ = o.cancel();
            panic!("listener fault");
        });
        dispatcher.subscribe_generation(move |o: GenerationOutcome| {
            counter.set(counter.get() + 1);
            o
        });

        let outcome = dispatch(&mut dispatcher, Uuid::new_v4());
        assert!(!outcome.is_cancelled());
        assert_eq!(outcome.material(), Some(Material::GoldOre));
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_break_dispatch() {
        let player = Uuid::new_v4();
        let mut dispatcher = EventDispatcher::new();
        assert!(dispatcher.dispatch_break(player, POS));

        let vetoed = Uuid::new_v4();
        dispatcher.subscribe_break(move |event: BreakEvent| {
            if event.player() == vetoed {
                event.cancel()
            } else {
                event
            }
        });
        dispatcher.subscribe_break(|_: BreakEvent| -> BreakEvent { panic!("listener fault") });

        assert!(dispatcher.dispatch_break(player, POS));
        assert!(!dispatcher.dispatch_break(vetoed, POS));
        assert_eq!(dispatcher.break_listeners(), 2);
    }
}
