//! # Steel Utils
//!
//! Value types shared by the generator crates: block and world positions,
//! the six cardinal directions, player identifiers and logger setup.

pub mod direction;
pub mod logger;
pub mod types;

pub use direction::Direction;
pub use types::{BlockPos, GlobalPos, PlayerId, WorldId};
