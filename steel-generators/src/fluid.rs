//! Same-family fluid collisions.
//!
//! When a stream flows toward another stream of the same fluid one cell
//! further along, one of the two cells solidifies. Levels follow vanilla:
//! 0 is a source and higher levels are further from one.
//!
//! | near vs far      | result                          |
//! |------------------|---------------------------------|
//! | `near < far`     | the far cell solidifies         |
//! | `near == far`    | the destination cell solidifies |
//! | `near > far`     | nothing happens                 |

use std::cmp::Ordering;

use smallvec::SmallVec;
use steel_registry::{FluidFamily, Material};
use steel_utils::{Direction, GlobalPos};

use crate::world::GeneratorWorld;

/// A cell that should turn into `material`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolidifyAction {
    /// The cell to convert.
    pub pos: GlobalPos,
    /// The inert material to place.
    pub material: Material,
}

/// Decides whether a flow event is a same-family collision.
#[derive(Debug, Clone)]
pub struct CollisionResolver {
    families: SmallVec<[FluidFamily; 2]>,
    solidify_material: Material,
}

impl CollisionResolver {
    /// Creates a resolver for the given fluid families.
    #[must_use]
    pub fn new(
        families: impl IntoIterator<Item = FluidFamily>,
        solidify_material: Material,
    ) -> Self {
        Self {
            families: families.into_iter().collect(),
            solidify_material,
        }
    }

    /// A resolver that never fires.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            families: SmallVec::new(),
            solidify_material: Material::Stone,
        }
    }

    /// Checks the flow `source -> destination` for a collision with the cell
    /// one step past `destination` along `direction`.
    #[must_use]
    pub fn resolve<W: GeneratorWorld + ?Sized>(
        &self,
        world: &W,
        source: GlobalPos,
        destination: GlobalPos,
        direction: Direction,
    ) -> Option<SolidifyAction> {
        let family = world.material_at(source)?.fluid_family()?;
        if !self.families.contains(&family) {
            return None;
        }

        let far = destination.relative(direction);
        if world.material_at(far)?.fluid_family()? != family {
            return None;
        }

        let level_near = world.fluid_level(source)?;
        let level_far = world.fluid_level(far)?;
        let pos = match level_near.cmp(&level_far) {
            Ordering::Less => far,
            Ordering::Equal => destination,
            // The weaker stream never solidifies anything.
            Ordering::Greater => return None,
        };

        Some(SolidifyAction {
            pos,
            material: self.solidify_material,
        })
    }
}

#[cfg(test)]
mod tests {
    use steel_utils::WorldId;

    use super::*;
    use crate::world::MemoryWorld;

    const SOURCE: GlobalPos = GlobalPos::new(WorldId(0), 0, 64, 0);

    fn setup(near: u8, far: u8) -> (MemoryWorld, GlobalPos, GlobalPos) {
        let mut world = MemoryWorld::empty_world();
        let destination = SOURCE.relative(Direction::East);
        let far_pos = destination.relative(Direction::East);
        world.set_fluid(SOURCE, Material::Lava, near);
        world.set_fluid(far_pos, Material::Lava, far);
        (world, destination, far_pos)
    }

    fn lava_resolver() -> CollisionResolver {
        CollisionResolver::new([FluidFamily::Lava], Material::Stone)
    }

    #[test]
    fn test_fresher_stream_solidifies_far_cell() {
        let (world, destination, far) = setup(3, 5);
        let action = lava_resolver().resolve(&world, SOURCE, destination, Direction::East);
        assert_eq!(
            action,
            Some(SolidifyAction {
                pos: far,
                material: Material::Stone
            })
        );
    }

    #[test]
    fn test_equal_levels_solidify_destination() {
        let (world, destination, _) = setup(4, 4);
        let action = lava_resolver().resolve(&world, SOURCE, destination, Direction::East);
        assert_eq!(action.map(|a| a.pos), Some(destination));
    }

    #[test]
    fn test_weaker_stream_does_nothing() {
        let (world, destination, _) = setup(5, 3);
        assert_eq!(
            lava_resolver().resolve(&world, SOURCE, destination, Direction::East),
            None
        );
    }

    #[test]
    fn test_requires_same_family_two_cells_apart() {
        let (mut world, destination, far) = setup(3, 5);
        world.set_fluid(far, Material::Water, 5);
        assert_eq!(
            lava_resolver().resolve(&world, SOURCE, destination, Direction::East),
            None
        );

        world.set_block(far, Material::Stone);
        assert_eq!(
            lava_resolver().resolve(&world, SOURCE, destination, Direction::East),
            None
        );
    }

    #[test]
    fn test_source_and_stationary_variants_collide() {
        let (mut world, destination, far) = setup(0, 0);
        world.set_fluid(far, Material::StationaryLava, 2);
        let action = lava_resolver().resolve(&world, SOURCE, destination, Direction::East);
        assert_eq!(action.map(|a| a.pos), Some(far));
    }

    #[test]
    fn test_unconfigured_family_is_ignored() {
        let mut world = MemoryWorld::empty_world();
        let destination = SOURCE.relative(Direction::North);
        world.set_fluid(SOURCE, Material::Water, 1);
        world.set_fluid(destination.relative(Direction::North), Material::Water, 1);
        assert_eq!(
            lava_resolver().resolve(&world, SOURCE, destination, Direction::North),
            None
        );
        assert_eq!(
            CollisionResolver::disabled().resolve(&world, SOURCE, destination, Direction::North),
            None
        );
    }
}
