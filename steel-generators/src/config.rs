//! Generator configuration, loaded from JSON5.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use steel_registry::{FluidFamily, GenerationRule, Material, RuleFlags, RuleRegistry};
use steel_utils::Direction;

use crate::engine::EngineSettings;
use crate::error::ConfigError;
use crate::fluid::CollisionResolver;

const DEFAULT_CONFIG: &str = include_str!("../../package-content/generators.json5");

/// Top-level generator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Radius of the nearest-player search, in blocks.
    pub search_radius: f64,
    /// Attribution lifetime, in seconds.
    pub attribution_ttl_secs: u64,
    /// Fluid self-collision settings.
    pub collision: CollisionConfig,
    /// Generation rules, in priority order.
    pub rules: Vec<RuleConfig>,
}

/// Fluid self-collision settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollisionConfig {
    /// Whether collisions are resolved at all.
    pub enabled: bool,
    /// Fluid families that solidify when two streams meet.
    pub families: Vec<FluidFamily>,
    /// What the solidified cell becomes.
    pub solidify_material: Material,
}

/// One generation rule as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Stable rule id.
    pub id: String,
    /// Fluids that trigger the rule.
    pub triggers: Vec<Material>,
    /// Faces that must hold a specific material.
    #[serde(default)]
    pub fixed: Vec<FixedConfig>,
    /// Materials any remaining face may hold.
    #[serde(default)]
    pub floating: Vec<Material>,
    /// Material produced unless a listener overrides it.
    #[serde(default)]
    pub fallback: Option<Material>,
    /// Credit the nearest player when the location is first seen.
    #[serde(default)]
    pub search_nearby_players: bool,
    /// Keep firing during a global hazard.
    #[serde(default)]
    pub active_during_hazard: bool,
    /// Play the generation sound.
    #[serde(default)]
    pub sound: bool,
    /// Spawn the generation particles.
    #[serde(default)]
    pub particles: bool,
}

/// A fixed face constraint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedConfig {
    /// The face.
    pub face: Direction,
    /// The material it must hold.
    pub material: Material,
}

impl RuleConfig {
    /// Converts the entry into an unvalidated rule.
    #[must_use]
    pub fn to_rule(&self) -> GenerationRule {
        let mut flags = RuleFlags::empty();
        flags.set(RuleFlags::SEARCH_NEARBY_PLAYERS, self.search_nearby_players);
        flags.set(RuleFlags::ACTIVE_DURING_HAZARD, self.active_during_hazard);
        flags.set(RuleFlags::SOUND, self.sound);
        flags.set(RuleFlags::PARTICLES, self.particles);

        let mut rule = GenerationRule::new(self.id.clone()).with_flags(flags);
        for &material in &self.triggers {
            rule = rule.with_trigger(material);
        }
        for fixed in &self.fixed {
            rule = rule.with_fixed(fixed.face, fixed.material);
        }
        for &material in &self.floating {
            rule = rule.with_floating(material);
        }
        if let Some(fallback) = self.fallback {
            rule = rule.with_fallback(fallback);
        }
        rule
    }
}

impl GeneratorConfig {
    /// Parses a JSON5 document.
    pub fn from_json5(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json5::from_str(source)?)
    }

    /// The configuration shipped with the server.
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::from_json5(DEFAULT_CONFIG)
    }

    /// Reads and validates the config at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::from_json5(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, writing the bundled config there first if it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_CONFIG)?;
        log::info!("Wrote default generator config to {}", path.display());
        let config = Self::bundled()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that the registry does not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.search_radius.is_finite() || self.search_radius <= 0.0 {
            return Err(ConfigError::Invalid("search_radius must be a positive number"));
        }
        if self.attribution_ttl_secs == 0 {
            return Err(ConfigError::Invalid("attribution_ttl_secs must be greater than 0"));
        }
        if self.collision.solidify_material.is_fluid() {
            return Err(ConfigError::Invalid("collision.solidify_material must not be a fluid"));
        }
        Ok(())
    }

    /// Builds a frozen registry from the rule entries.
    pub fn build_registry(&self) -> Result<RuleRegistry, ConfigError> {
        Ok(RuleRegistry::from_rules(
            self.rules.iter().map(RuleConfig::to_rule),
        )?)
    }

    /// The engine tunables.
    #[must_use]
    pub fn settings(&self) -> EngineSettings {
        EngineSettings {
            search_radius: self.search_radius,
            attribution_ttl: Duration::from_secs(self.attribution_ttl_secs),
        }
    }

    /// The collision resolver described by `collision`.
    #[must_use]
    pub fn collision_resolver(&self) -> CollisionResolver {
        if self.collision.enabled {
            CollisionResolver::new(
                self.collision.families.iter().copied(),
                self.collision.solidify_material,
            )
        } else {
            CollisionResolver::disabled()
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let settings = EngineSettings::default();
        Self {
            search_radius: settings.search_radius,
            attribution_ttl_secs: settings.attribution_ttl.as_secs(),
            collision: CollisionConfig::default(),
            rules: Vec::new(),
        }
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            families: vec![FluidFamily::Lava],
            solidify_material: Material::Stone,
        }
    }
}

#[cfg(test)]
mod tests {
    use steel_registry::{RegistryError, RuleId};
    use steel_utils::{GlobalPos, WorldId};

    use super::*;
    use crate::world::MemoryWorld;

    #[test]
    fn test_bundled_config_is_valid() {
        let config = GeneratorConfig::bundled().expect("bundled config parses");
        config.validate().expect("bundled config is valid");
        let registry = config.build_registry().expect("bundled rules are valid");

        let basalt = registry
            .get(&RuleId::new("basalt"))
            .expect("basalt rule is bundled");
        assert_eq!(
            basalt.fixed_constraints(),
            [(Direction::Down, Material::SoulSoil)]
        );
        assert_eq!(basalt.floating_constraints(), [Material::BlueIce]);
        assert_eq!(basalt.fallback_material(), Some(Material::Basalt));
        assert!(basalt.flags().contains(RuleFlags::SOUND | RuleFlags::PARTICLES));

        assert_eq!(config.settings(), EngineSettings::default());
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = GeneratorConfig::from_json5(
            r#"{ rules: [{ id: "obsidian", triggers: ["stationary_water"], fallback: "obsidian" }] }"#,
        )
        .expect("minimal config parses");
        assert!((config.search_radius - 8.0).abs() < f64::EPSILON);
        assert_eq!(config.attribution_ttl_secs, 300);
        assert!(config.collision.enabled);

        let rule = config.rules[0].to_rule();
        assert_eq!(rule.triggers(), [Material::StationaryWater]);
        assert!(rule.flags().is_empty());
        assert!(rule.fixed_constraints().is_empty());
    }

    #[test]
    fn test_flowing_alias() {
        let config = GeneratorConfig::from_json5(
            r#"{ rules: [{ id: "a", triggers: ["flowing_lava"], floating: ["flowing_water"] }] }"#,
        )
        .expect("aliases parse");
        assert_eq!(config.rules[0].triggers, [Material::Lava]);
        assert_eq!(config.rules[0].floating, [Material::Water]);
    }

    #[test]
    fn test_namespaced_material_names() {
        let config = GeneratorConfig::from_json5(
            r#"{
                rules: [{
                    id: "a",
                    triggers: ["minecraft:lava"],
                    fixed: [{ face: "down", material: "minecraft:soul_soil" }],
                    fallback: "minecraft:basalt",
                }],
                collision: { solidify_material: "minecraft:obsidian" },
            }"#,
        )
        .expect("namespaced names parse");
        assert_eq!(config.rules[0].triggers, [Material::Lava]);
        assert_eq!(config.rules[0].fixed[0].material, Material::SoulSoil);
        assert_eq!(config.rules[0].fallback, Some(Material::Basalt));
        assert_eq!(config.collision.solidify_material, Material::Obsidian);
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = GeneratorConfig {
            search_radius: 0.0,
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.search_radius = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.search_radius = 4.0;
        config.attribution_ttl_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.attribution_ttl_secs = 10;
        config.collision.solidify_material = Material::Lava;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.collision.solidify_material = Material::Obsidian;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_registry_errors_surface() {
        let empty = GeneratorConfig::default();
        assert!(matches!(
            empty.build_registry(),
            Err(ConfigError::Registry(RegistryError::EmptyRuleSet))
        ));

        let duplicate = GeneratorConfig::from_json5(
            r#"{ rules: [
                { id: "a", triggers: ["lava"], fallback: "stone" },
                { id: "a", triggers: ["water"], fallback: "stone" },
            ] }"#,
        )
        .expect("config parses");
        assert!(matches!(
            duplicate.build_registry(),
            Err(ConfigError::Registry(RegistryError::DuplicateRule(_)))
        ));

        let no_triggers =
            GeneratorConfig::from_json5(r#"{ rules: [{ id: "b", triggers: [] }] }"#)
                .expect("config parses");
        assert!(matches!(
            no_triggers.build_registry(),
            Err(ConfigError::Registry(RegistryError::NoTriggers(_)))
        ));
    }

    #[test]
    fn test_unknown_material_is_a_parse_error() {
        let result =
            GeneratorConfig::from_json5(r#"{ rules: [{ id: "a", triggers: ["magma"] }] }"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_disabled_collision() {
        let source = GlobalPos::new(WorldId(0), 0, 64, 0);
        let destination = source.relative(Direction::South);
        let mut world = MemoryWorld::empty_world();
        world.set_fluid(source, Material::Lava, 2);
        world.set_fluid(destination.relative(Direction::South), Material::Lava, 2);

        let mut config = GeneratorConfig::default();
        let fires = |config: &GeneratorConfig| {
            config
                .collision_resolver()
                .resolve(&world, source, destination, Direction::South)
                .is_some()
        };
        assert!(fires(&config));
        config.collision.enabled = false;
        assert!(!fires(&config));
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().expect("temp dir is created");
        let path = dir.path().join("nested").join("generators.json5");

        let created = GeneratorConfig::load_or_create(&path).expect("default config is written");
        assert!(path.exists());
        let loaded = GeneratorConfig::load(&path).expect("written config loads");
        assert_eq!(created.rules.len(), loaded.rules.len());
    }
}
