// Wrapper types making it harder to accidentaly use the wrong underlying type.

use std::fmt::{self, Display};

use uuid::Uuid;

use crate::Direction;

/// A player is identified by their profile uuid.
pub type PlayerId = Uuid;

/// A world id. The host decides how ids map to its loaded dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WorldId(pub u16);

/// A block position inside a single world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockPos {
    /// East/west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North/south axis.
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns this position moved by the given deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Returns the neighbouring position in `direction`.
    #[must_use]
    pub const fn relative(self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        self.offset(dx, dy, dz)
    }

    /// Squared distance between the centers of this block and the point `(x, y, z)`.
    #[must_use]
    pub fn distance_to_center_sqr(self, x: f64, y: f64, z: f64) -> f64 {
        let dx = f64::from(self.x) + 0.5 - x;
        let dy = f64::from(self.y) + 0.5 - y;
        let dz = f64::from(self.z) + 0.5 - z;
        dx * dx + dy * dy + dz * dz
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// A block position qualified by the world it lives in.
///
/// This is the key for every location-indexed map in the generator engine.
/// Equality and hashing cover all four components, so the same block
/// coordinates in two worlds never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalPos {
    /// The world this position belongs to.
    pub world: WorldId,
    /// The position inside `world`.
    pub pos: BlockPos,
}

impl GlobalPos {
    /// Creates a new global position.
    #[must_use]
    pub const fn new(world: WorldId, x: i32, y: i32, z: i32) -> Self {
        Self {
            world,
            pos: BlockPos::new(x, y, z),
        }
    }

    /// Returns the neighbouring position in `direction`, in the same world.
    #[must_use]
    pub const fn relative(self, direction: Direction) -> Self {
        Self {
            world: self.world,
            pos: self.pos.relative(direction),
        }
    }
}

impl Display for GlobalPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world {} at {}", self.world.0, self.pos)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_relative() {
        let pos = GlobalPos::new(WorldId(0), 4, 64, -2);
        assert_eq!(pos.relative(Direction::Up), GlobalPos::new(WorldId(0), 4, 65, -2));
        assert_eq!(
            pos.relative(Direction::North),
            GlobalPos::new(WorldId(0), 4, 64, -3)
        );
        assert_eq!(pos.relative(Direction::East).relative(Direction::West), pos);
    }

    #[test]
    fn test_world_is_part_of_the_key() {
        let positions = [
            GlobalPos::new(WorldId(0), 1, 2, 3),
            GlobalPos::new(WorldId(1), 1, 2, 3),
            GlobalPos::new(WorldId(0), 1, 2, 3),
        ];
        assert_eq!(positions.iter().collect::<HashSet<_>>().len(), 2);
    }

    #[test]
    fn test_distance_to_center() {
        let pos = BlockPos::new(0, 0, 0);
        assert!((pos.distance_to_center_sqr(0.5, 0.5, 0.5)).abs() < f64::EPSILON);
        assert!((pos.distance_to_center_sqr(3.5, 0.5, 0.5) - 9.0).abs() < f64::EPSILON);
    }
}
