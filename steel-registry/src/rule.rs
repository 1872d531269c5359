//! Generation rules.
//!
//! A rule names the fluids that trigger it, the neighbours that must surround
//! the cell the fluid flows into, and the material to produce when it fires.

use std::borrow::Cow;
use std::fmt::{self, Display};

use bitflags::bitflags;
use smallvec::SmallVec;
use steel_utils::Direction;

use crate::Material;
use crate::registry::RegistryError;

bitflags! {
    /// Per-rule switches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RuleFlags: u8 {
        /// Credit the nearest player when the location is first seen.
        const SEARCH_NEARBY_PLAYERS = 1 << 0;
        /// Keep firing while the host reports a global hazard.
        const ACTIVE_DURING_HAZARD = 1 << 1;
        /// Play the generation sound.
        const SOUND = 1 << 2;
        /// Spawn the generation particles.
        const PARTICLES = 1 << 3;
    }
}

/// Stable identifier of a rule, e.g. `"cobblestone"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleId(Cow<'static, str>);

impl RuleId {
    /// Creates a rule id.
    #[must_use]
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable neighbour-pattern rule.
///
/// Built with the `with_*` methods and handed to
/// [`RuleRegistry::register`](crate::RuleRegistry::register), which validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRule {
    id: RuleId,
    triggers: SmallVec<[Material; 2]>,
    fixed: SmallVec<[(Direction, Material); 6]>,
    floating: SmallVec<[Material; 6]>,
    fallback: Option<Material>,
    flags: RuleFlags,
}

impl GenerationRule {
    /// Creates a rule with no constraints, no fallback and no flags.
    #[must_use]
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: RuleId::new(id),
            triggers: SmallVec::new(),
            fixed: SmallVec::new(),
            floating: SmallVec::new(),
            fallback: None,
            flags: RuleFlags::empty(),
        }
    }

    /// Adds a trigger material.
    #[must_use]
    pub fn with_trigger(mut self, material: Material) -> Self {
        self.triggers.push(material);
        self
    }

    /// Requires the neighbour at `direction` to be `material`.
    #[must_use]
    pub fn with_fixed(mut self, direction: Direction, material: Material) -> Self {
        self.fixed.push((direction, material));
        self
    }

    /// Requires one of the remaining neighbours to be `material`.
    #[must_use]
    pub fn with_floating(mut self, material: Material) -> Self {
        self.floating.push(material);
        self
    }

    /// Sets the material produced when no listener overrides it.
    #[must_use]
    pub fn with_fallback(mut self, material: Material) -> Self {
        self.fallback = Some(material);
        self
    }

    /// Replaces the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: RuleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// The stable id of this rule.
    #[must_use]
    pub fn id(&self) -> &RuleId {
        &self.id
    }

    /// Materials that make a flow destination a candidate for this rule.
    #[must_use]
    pub fn triggers(&self) -> &[Material] {
        &self.triggers
    }

    /// Direction-bound neighbour constraints.
    #[must_use]
    pub fn fixed_constraints(&self) -> &[(Direction, Material)] {
        &self.fixed
    }

    /// Unordered bag of neighbour constraints.
    #[must_use]
    pub fn floating_constraints(&self) -> &[Material] {
        &self.floating
    }

    /// Material produced when no listener supplies one.
    #[must_use]
    pub fn fallback_material(&self) -> Option<Material> {
        self.fallback
    }

    /// The rule's flags.
    #[must_use]
    pub fn flags(&self) -> RuleFlags {
        self.flags
    }

    /// Total number of neighbour constraints.
    #[must_use]
    pub fn required(&self) -> usize {
        self.fixed.len() + self.floating.len()
    }

    /// Checks the rule can ever match.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.triggers.is_empty() {
            return Err(RegistryError::NoTriggers(self.id.clone()));
        }

        let mut seen = [false; 6];
        for &(direction, _) in &self.fixed {
            if seen[direction.index()] {
                return Err(RegistryError::DuplicateFixedFace(self.id.clone(), direction));
            }
            seen[direction.index()] = true;
        }

        if self.required() > Direction::ALL.len() {
            return Err(RegistryError::TooManyConstraints(
                self.id.clone(),
                self.required(),
            ));
        }

        Ok(())
    }
}
