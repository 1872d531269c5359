//! Neighbour-pattern matching.
//!
//! A rule matches a cell when every fixed face holds its required material
//! and the remaining faces cover the floating bag. Neighbours equivalent to
//! the trigger material itself never satisfy anything.

use smallvec::SmallVec;
use steel_registry::{GenerationRule, Material};
use steel_utils::{Direction, GlobalPos};

/// Returns true if `rule` matches `cell`, where `material` is the fluid
/// flowing into it.
///
/// `neighbor` reads the material at an absolute position; `None` means the
/// position is not loaded and never satisfies a constraint.
#[must_use]
pub fn is_match<F>(rule: &GenerationRule, material: Material, cell: GlobalPos, neighbor: F) -> bool
where
    F: Fn(GlobalPos) -> Option<Material>,
{
    let required = rule.required();
    let mut matched = 0;
    let mut tested = [false; 6];

    for &(direction, wanted) in rule.fixed_constraints() {
        // A cell can't require itself as a neighbour.
        if wanted.is_equivalent(material) {
            continue;
        }
        tested[direction.index()] = true;
        match neighbor(cell.relative(direction)) {
            Some(found) if found.is_equivalent(wanted) => matched += 1,
            _ => return false,
        }
    }

    let mut bag: SmallVec<[Material; 6]> = rule.floating_constraints().iter().copied().collect();
    for direction in Direction::ALL {
        if bag.is_empty() {
            break;
        }
        if tested[direction.index()] {
            continue;
        }
        let Some(found) = neighbor(cell.relative(direction)) else {
            continue;
        };
        if found.is_equivalent(material) {
            continue;
        }
        if let Some(slot) = bag.iter().position(|wanted| wanted.is_equivalent(found)) {
            bag.swap_remove(slot);
            matched += 1;
        }
    }

    // The candidate cell itself.
    matched += 1;

    matched > required
}
