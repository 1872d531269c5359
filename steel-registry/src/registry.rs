use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use steel_utils::Direction;
use thiserror::Error;

use crate::{GenerationRule, Material, MaterialFamily, RegistryExt, RuleId};

/// Configuration errors raised while rules are loaded.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The rule set handed to the registry was empty.
    #[error("no generation rules were configured")]
    EmptyRuleSet,
    /// Two rules share an id.
    #[error("generation rule `{0}` is registered twice")]
    DuplicateRule(RuleId),
    /// A rule without any trigger material.
    #[error("generation rule `{0}` has no trigger materials")]
    NoTriggers(RuleId),
    /// A rule constrains the same face twice.
    #[error("generation rule `{0}` constrains the {1} face more than once")]
    DuplicateFixedFace(RuleId, Direction),
    /// A rule needs more neighbours than a block has faces.
    #[error("generation rule `{0}` needs {1} neighbours but a block only has 6")]
    TooManyConstraints(RuleId, usize),
    /// Registration after [`RegistryExt::freeze`].
    #[error("cannot register generation rule `{0}` after the registry is frozen")]
    Frozen(RuleId),
}

/// Holds every [`GenerationRule`], indexed by trigger family.
#[derive(Debug)]
pub struct RuleRegistry {
    rules: Vec<GenerationRule>,
    by_id: FxHashMap<RuleId, usize>,
    by_trigger: FxHashMap<MaterialFamily, SmallVec<[usize; 4]>>,
    allows_registering: bool,
}

impl RuleRegistry {
    /// Creates an empty, unfrozen registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            by_id: FxHashMap::default(),
            by_trigger: FxHashMap::default(),
            allows_registering: true,
        }
    }

    /// Builds a frozen registry from a rule set.
    ///
    /// Fails if the set is empty or any rule is malformed.
    pub fn from_rules(
        rules: impl IntoIterator<Item = GenerationRule>,
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for rule in rules {
            registry.register(rule)?;
        }
        if registry.is_empty() {
            return Err(RegistryError::EmptyRuleSet);
        }
        registry.freeze();
        Ok(registry)
    }

    /// Validates and registers a rule.
    pub fn register(&mut self, rule: GenerationRule) -> Result<(), RegistryError> {
        if !self.allows_registering {
            return Err(RegistryError::Frozen(rule.id().clone()));
        }
        rule.validate()?;
        if self.by_id.contains_key(rule.id()) {
            return Err(RegistryError::DuplicateRule(rule.id().clone()));
        }

        if rule.fallback_material().is_none() {
            // Legal, but every firing then depends on a listener supplying the output.
            log::warn!(
                "Generation rule `{}` has no fallback material; a listener must supply one",
                rule.id()
            );
        }

        let index = self.rules.len();
        for trigger in rule.triggers() {
            let indices = self.by_trigger.entry(trigger.family()).or_default();
            if indices.last() != Some(&index) {
                indices.push(index);
            }
        }
        self.by_id.insert(rule.id().clone(), index);
        log::debug!("Registered generation rule `{}`", rule.id());
        self.rules.push(rule);
        Ok(())
    }

    /// Every rule triggered by `material`, in registration order.
    pub fn rules_matching(&self, material: Material) -> impl Iterator<Item = &GenerationRule> {
        self.by_trigger
            .get(&material.family())
            .into_iter()
            .flatten()
            .map(|&index| &self.rules[index])
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn get(&self, id: &RuleId) -> Option<&GenerationRule> {
        self.by_id.get(id).map(|&index| &self.rules[index])
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryExt for RuleRegistry {
    fn freeze(&mut self) {
        self.allows_registering = false;
        log::debug!("Rule registry frozen with {} rules", self.rules.len());
    }

    fn is_frozen(&self) -> bool {
        !self.allows_registering
    }
}
