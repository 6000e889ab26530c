//! Elemental affinity fix.
//!
//! The affinity table is keyed by (target defense level, attacking element,
//! defending element) and holds percentages with 100 meaning "no affinity".
//! The two ruleset modes round differently: the legacy mode multiplies
//! straight through, the renewal mode subtracts the complement so damage
//! erodes toward a floor instead of scaling to zero.

use strum::EnumCount;
use tracing::warn;

use crate::combatant::{DefenseElement, Element};
use crate::config::RulesetMode;

use super::floor_div;

/// Defense levels carried by monster elements.
pub const DEFENSE_LEVELS: usize = 4;

/// The (defense level x attack element x defense element) percentage table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementTable {
    rows: [[[i16; Element::COUNT]; Element::COUNT]; DEFENSE_LEVELS],
}

impl Default for ElementTable {
    /// Every pairing at 100 percent; the fix is then the identity.
    fn default() -> Self {
        Self {
            rows: [[[100; Element::COUNT]; Element::COUNT]; DEFENSE_LEVELS],
        }
    }
}

impl ElementTable {
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Sets the percentage for one (defense level, attack, defense) cell.
    /// Levels outside 1..=4 are ignored with a warning.
    pub fn set(&mut self, def_level: u8, atk: Element, def: Element, pct: i16) {
        if !(1..=DEFENSE_LEVELS as u8).contains(&def_level) {
            warn!(def_level, "element table entry outside level range, ignored");
            return;
        }
        self.rows[def_level as usize - 1][atk as usize][def as usize] = pct;
    }

    /// Percentage for the pairing; a defense level outside the table logs
    /// and falls back to 100 rather than aborting the resolution.
    pub fn modifier(&self, atk: Element, def: DefenseElement) -> i32 {
        if !(1..=DEFENSE_LEVELS as u8).contains(&def.level) {
            warn!(
                def_level = def.level,
                "defense element level outside table, treating as neutral"
            );
            return 100;
        }
        self.rows[def.level as usize - 1][atk as usize][def.element as usize] as i32
    }
}

/// Applies the affinity fix.
///
/// `pct_bonus` carries additive adjustments from active statuses (element
/// amplifier fields and the like); it is added to the table percentage
/// before the divide, never applied as its own step.
pub fn element_fix(
    damage: i64,
    table: &ElementTable,
    atk: Element,
    def: DefenseElement,
    pct_bonus: i32,
    mode: RulesetMode,
) -> i64 {
    let pct = table.modifier(atk, def) as i64 + pct_bonus as i64;
    match mode {
        RulesetMode::PreRenewal => floor_div(damage * pct, 100),
        RulesetMode::Renewal => damage - floor_div(damage * (100 - pct), 100),
    }
}
