//! Block materials the generator engine can read and write.
//!
//! Fluids come in two legacy variants per family: the flowing block and its
//! "stationary" source block. Everywhere rules are matched the two variants of
//! one family are interchangeable, see [`Material::is_equivalent`].

use std::fmt::{self, Display};

use serde::Deserialize;
use thiserror::Error;

/// Fluid families. Matches vanilla's `FluidTags.WATER` and `FluidTags.LAVA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FluidFamily {
    /// Water and stationary water.
    Water,
    /// Lava and stationary lava.
    Lava,
}

/// Equivalence class of a material.
///
/// Two materials are equivalent iff they share a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialFamily {
    /// Any variant of a fluid.
    Fluid(FluidFamily),
    /// A non-fluid block; only equivalent to itself.
    Block(Material),
}

/// A block material.
///
/// Config files name materials through [`Material::by_name`].
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Material {
    /// Empty space.
    Air = 0,
    /// Flowing water.
    Water = 1,
    /// Water source block.
    StationaryWater = 2,
    /// Flowing lava.
    Lava = 3,
    /// Lava source block.
    StationaryLava = 4,
    /// Stone.
    Stone = 5,
    /// Cobblestone.
    Cobblestone = 6,
    /// Obsidian.
    Obsidian = 7,
    /// Basalt.
    Basalt = 8,
    /// Blue ice.
    BlueIce = 9,
    /// Soul soil.
    SoulSoil = 10,
    /// Dirt.
    Dirt = 11,
    /// Deepslate.
    Deepslate = 12,
    /// Cobbled deepslate.
    CobbledDeepslate = 13,
    /// Netherrack.
    Netherrack = 14,
    /// Blackstone.
    Blackstone = 15,
    /// Coal ore.
    CoalOre = 16,
    /// Iron ore.
    IronOre = 17,
    /// Gold ore.
    GoldOre = 18,
    /// Diamond ore.
    DiamondOre = 19,
    /// Emerald ore.
    EmeraldOre = 20,
    /// Glass.
    Glass = 21,
    /// Piston.
    Piston = 22,
    /// Sticky piston.
    StickyPiston = 23,
}

impl Material {
    /// Every material, in id order.
    pub const ALL: [Material; 24] = [
        Material::Air,
        Material::Water,
        Material::StationaryWater,
        Material::Lava,
        Material::StationaryLava,
        Material::Stone,
        Material::Cobblestone,
        Material::Obsidian,
        Material::Basalt,
        Material::BlueIce,
        Material::SoulSoil,
        Material::Dirt,
        Material::Deepslate,
        Material::CobbledDeepslate,
        Material::Netherrack,
        Material::Blackstone,
        Material::CoalOre,
        Material::IronOre,
        Material::GoldOre,
        Material::DiamondOre,
        Material::EmeraldOre,
        Material::Glass,
        Material::Piston,
        Material::StickyPiston,
    ];

    /// Looks up a material by its snake_case name, with or without the
    /// `minecraft:` namespace. Accepts the legacy `flowing_*` spellings for
    /// the flowing fluid variants.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix("minecraft:").unwrap_or(name);
        match name {
            "flowing_water" => Some(Self::Water),
            "flowing_lava" => Some(Self::Lava),
            _ => Self::ALL.into_iter().find(|m| m.name() == name),
        }
    }

    /// The snake_case name of this material.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Air => "air",
            Self::Water => "water",
            Self::StationaryWater => "stationary_water",
            Self::Lava => "lava",
            Self::StationaryLava => "stationary_lava",
            Self::Stone => "stone",
            Self::Cobblestone => "cobblestone",
            Self::Obsidian => "obsidian",
            Self::Basalt => "basalt",
            Self::BlueIce => "blue_ice",
            Self::SoulSoil => "soul_soil",
            Self::Dirt => "dirt",
            Self::Deepslate => "deepslate",
            Self::CobbledDeepslate => "cobbled_deepslate",
            Self::Netherrack => "netherrack",
            Self::Blackstone => "blackstone",
            Self::CoalOre => "coal_ore",
            Self::IronOre => "iron_ore",
            Self::GoldOre => "gold_ore",
            Self::DiamondOre => "diamond_ore",
            Self::EmeraldOre => "emerald_ore",
            Self::Glass => "glass",
            Self::Piston => "piston",
            Self::StickyPiston => "sticky_piston",
        }
    }

    /// Returns the fluid family, or `None` for solid blocks and air.
    #[must_use]
    pub const fn fluid_family(self) -> Option<FluidFamily> {
        match self {
            Self::Water | Self::StationaryWater => Some(FluidFamily::Water),
            Self::Lava | Self::StationaryLava => Some(FluidFamily::Lava),
            _ => None,
        }
    }

    /// Returns true for any fluid variant.
    #[inline]
    #[must_use]
    pub const fn is_fluid(self) -> bool {
        self.fluid_family().is_some()
    }

    /// Returns the equivalence class of this material.
    #[must_use]
    pub const fn family(self) -> MaterialFamily {
        match self.fluid_family() {
            Some(fluid) => MaterialFamily::Fluid(fluid),
            None => MaterialFamily::Block(self),
        }
    }

    /// Returns true if both materials belong to the same family.
    #[inline]
    #[must_use]
    pub fn is_equivalent(self, other: Material) -> bool {
        self.family() == other.family()
    }
}

/// Free-function form of [`Material::family`].
#[inline]
#[must_use]
pub const fn family_of(material: Material) -> MaterialFamily {
    material.family()
}

impl Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A material name [`Material::by_name`] does not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown material `{0}`")]
pub struct UnknownMaterial(pub String);

impl TryFrom<String> for Material {
    type Error = UnknownMaterial;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::by_name(&name).ok_or(UnknownMaterial(name))
    }
}
