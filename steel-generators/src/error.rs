//! Error types.

use std::io;

use steel_registry::{RegistryError, RuleId};
use steel_utils::GlobalPos;
use thiserror::Error;

/// Errors raised while loading generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("failed to access generator config: {0}")]
    Io(#[from] io::Error),
    /// The config file is not valid JSON5 or has the wrong shape.
    #[error("failed to parse generator config: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A setting is out of range.
    #[error("invalid generator config: {0}")]
    Invalid(&'static str),
    /// A rule was rejected by the registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors surfaced by the engine.
///
/// These are configuration faults. Lookup misses and listener panics never
/// turn into errors.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A rule fired but neither its fallback nor any listener named an output.
    #[error("generation rule `{rule}` fired at {pos} without a material to place")]
    UnresolvedMaterial {
        /// The rule that fired.
        rule: RuleId,
        /// Where it fired.
        pos: GlobalPos,
    },
}
