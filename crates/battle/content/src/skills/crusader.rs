//! Crusader skills.

use battle_core::combatant::{Combatant, StatusEffect, StatusKind, Tick};
use battle_core::registry::{SkillContext, SkillHandler};
use battle_core::RollStream;

/// Holy two-strike slash; may sear the target's eyes.
pub struct HolyCross;

impl SkillHandler for HolyCross {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 35 * ctx.level
    }

    fn on_hit(
        &self,
        attacker: &Combatant,
        target: &mut Combatant,
        level: i32,
        rolls: &RollStream<'_>,
        now: Tick,
    ) {
        if rolls.chance(3 * level) {
            target.statuses.apply(
                StatusEffect::new(StatusKind::Blind, level, now + 15_000)
                    .from_source(attacker.id),
            );
        }
    }
}

/// Thrown shield.
pub struct ShieldBoomerang;

impl SkillHandler for ShieldBoomerang {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 30 * ctx.level
    }
}
