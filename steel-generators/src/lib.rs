//! # Steel Generators
//!
//! Turns fluid flow into generated blocks and decides which player gets the
//! credit.
//!
//! The host forwards four world events to a [`GeneratorEngine`]: fluid flow,
//! block breaks, piston placement and piston extension. Everything runs on
//! the tick thread; the engine owns its state and never spawns work.
//!
//! # Architecture
//!
//! - [`matcher`] - neighbour-pattern check for a single rule
//! - [`fluid`] - same-family fluid collisions that solidify a stream
//! - [`location`] - known generator locations and their attribution
//! - [`piston`] - piston owners, used to credit automated farms
//! - [`events`] - cancellable generation and break notifications
//! - [`world`] - the host port and an in-memory host
//! - [`config`] - JSON5 configuration
//! - [`engine`] - wires the above into the per-event control flow

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod fluid;
pub mod location;
pub mod matcher;
pub mod piston;
pub mod world;

pub use config::{CollisionConfig, FixedConfig, GeneratorConfig, RuleConfig};
pub use engine::{EngineSettings, FlowOutcome, GeneratorEngine};
pub use error::{ConfigError, GeneratorError};
pub use events::{
    BreakEvent, BreakListener, EventDispatcher, GenerationListener, GenerationOutcome,
};
pub use fluid::{CollisionResolver, SolidifyAction};
pub use location::{AttributionRecord, LocationStore};
pub use piston::{PistonRecord, PistonTracker};
pub use world::{Effect, GeneratorWorld, MemoryWorld};
