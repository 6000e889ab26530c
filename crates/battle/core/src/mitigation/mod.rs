//! The ordered mitigation pipeline applied to raw damage.
//!
//! Stage order is a contract: elemental affinity fix, equipment percentage
//! chain, defense reduction, critical multiplier, minimum-damage floors,
//! battlefield rate scaling. Each stage is a pure function over (damage,
//! inputs) so it can be tested against its formula in isolation; the damage
//! engine owns the sequencing.

pub mod cards;
pub mod defense;
pub mod element;
pub mod rates;

pub use cards::{CardTarget, offense_chain, percent_step, resist_chain};
pub use defense::{DefenseParams, vit_bonus_max};
pub use element::{DEFENSE_LEVELS, ElementTable};
pub use rates::{battlefield_scale, hit_count_floor};

/// Floor division toward negative infinity.
///
/// Damage may be negative (healing-through-attack) until the commit floor,
/// and every percentage step must round the same direction for both signs.
#[inline]
pub(crate) fn floor_div(n: i64, d: i64) -> i64 {
    n.div_euclid(d)
}
