//! Equipment percentage chain ("card fix").
//!
//! Bonuses apply as a sequence of multiplicative steps, one per category,
//! in a fixed order: race, element, size, boss/non-boss, then named
//! per-class overrides. Each step runs at base 1000 to keep one extra digit
//! of precision over the elemental step, with floor division every time.
//! Summing the percentages first would round differently and is wrong.

use crate::combatant::{Element, PercentTables, Race, SizeClass};

use super::floor_div;

/// The attributes one side of the chain is matched against. For the
/// attacker's offense chain these describe the target; for the target's
/// resist chain they describe the attacker and the incoming attack element.
#[derive(Clone, Copy, Debug)]
pub struct CardTarget {
    pub race: Race,
    pub element: Element,
    pub size: SizeClass,
    pub boss: bool,
    pub class_id: u16,
}

/// One chain step: `x * (1000 + pct*10) / 1000`, floored. Zero-percent
/// entries are skipped so an empty table is the identity.
#[inline]
pub fn percent_step(damage: i64, pct: i32) -> i64 {
    if pct == 0 {
        return damage;
    }
    floor_div(damage * (1000 + pct as i64 * 10), 1000)
}

/// Attacker-side offense chain: bonuses raise damage.
pub fn offense_chain(damage: i64, tables: &PercentTables, target: CardTarget) -> i64 {
    let mut damage = percent_step(damage, tables.race[target.race as usize]);
    damage = percent_step(damage, tables.element[target.element as usize]);
    damage = percent_step(damage, tables.size[target.size as usize]);
    damage = percent_step(
        damage,
        if target.boss {
            tables.boss
        } else {
            tables.non_boss
        },
    );
    percent_step(damage, tables.class_bonus(target.class_id))
}

/// Target-side resist chain: positive entries reduce damage, so every step
/// applies negated.
pub fn resist_chain(damage: i64, tables: &PercentTables, attacker: CardTarget) -> i64 {
    let mut damage = percent_step(damage, -tables.race[attacker.race as usize]);
    damage = percent_step(damage, -tables.element[attacker.element as usize]);
    damage = percent_step(damage, -tables.size[attacker.size as usize]);
    damage = percent_step(
        damage,
        -if attacker.boss {
            tables.boss
        } else {
            tables.non_boss
        },
    );
    percent_step(damage, -tables.class_bonus(attacker.class_id))
}

/// Merges `extra` into `base` entry-wise; used for `left_cardfix_to_right`
/// and for folding ammunition bonuses into the main-hand chain.
pub fn merge_tables(base: &PercentTables, extra: &PercentTables) -> PercentTables {
    let mut merged = base.clone();
    for (dst, src) in merged.race.iter_mut().zip(extra.race.iter()) {
        *dst += src;
    }
    for (dst, src) in merged.element.iter_mut().zip(extra.element.iter()) {
        *dst += src;
    }
    for (dst, src) in merged.size.iter_mut().zip(extra.size.iter()) {
        *dst += src;
    }
    merged.boss += extra.boss;
    merged.non_boss += extra.non_boss;
    for &(class_id, pct) in &extra.class {
        if let Some(entry) = merged.class.iter_mut().find(|(id, _)| *id == class_id) {
            entry.1 += pct;
        } else {
            let _ = merged.class.try_push((class_id, pct));
        }
    }
    merged
}
