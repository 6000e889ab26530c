//! Mage and wizard spells.

use battle_core::combatant::{Combatant, StatusEffect, StatusKind, Tick};
use battle_core::registry::{MagicBase, SkillContext, SkillHandler};
use battle_core::RollStream;

/// Ghost-element mind blast, split across everything in the burst.
pub struct NapalmBeat;

impl SkillHandler for NapalmBeat {
    fn magic_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> MagicBase {
        MagicBase::Ratio(70 + 10 * ctx.level)
    }
}

/// Spirit bolts; extra weight against the undead.
pub struct SoulStrike;

impl SkillHandler for SoulStrike {
    fn magic_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> MagicBase {
        let target = ctx.target;
        let undead_bonus = if target.race.is_undead(target.defense_element) {
            5 * ctx.level
        } else {
            0
        };
        MagicBase::Ratio(100 + undead_bonus)
    }
}

/// Ice spike with a freeze rider.
pub struct FrostDiver;

impl SkillHandler for FrostDiver {
    fn magic_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> MagicBase {
        MagicBase::Ratio(100 + 10 * ctx.level)
    }

    fn on_hit(
        &self,
        attacker: &Combatant,
        target: &mut Combatant,
        level: i32,
        rolls: &RollStream<'_>,
        now: Tick,
    ) {
        if rolls.chance(35 + 3 * level) {
            target.statuses.apply(
                StatusEffect::new(StatusKind::Freeze, level, now + 12_000)
                    .from_source(attacker.id),
            );
        }
    }
}

/// Lobbed fireball; the blast weakens past the two-cell core.
pub struct Fireball;

impl SkillHandler for Fireball {
    fn magic_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> MagicBase {
        let mut pct = 140 + 20 * ctx.level;
        if ctx.distance > 2 {
            pct = pct * 3 / 4;
        }
        MagicBase::Ratio(pct)
    }
}

/// Bolt strikes, one per level; the count lives in the catalog.
pub struct Thunderstorm;

impl SkillHandler for Thunderstorm {}

/// Eruption column; burns straight through magic defense.
pub struct FirePillar;

impl SkillHandler for FirePillar {
    fn magic_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> MagicBase {
        MagicBase::Ratio(40 + 20 * ctx.level)
    }
}

/// Orb of lightning that batters and shoves.
pub struct JupitelThunder;

impl SkillHandler for JupitelThunder {}

/// Wide lightning storm.
pub struct LordOfVermilion;

impl SkillHandler for LordOfVermilion {
    fn magic_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> MagicBase {
        MagicBase::Ratio(80 + 20 * ctx.level)
    }
}

/// Blizzard field; repeated exposure freezes.
pub struct StormGust;

impl SkillHandler for StormGust {
    fn magic_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> MagicBase {
        MagicBase::Ratio(100 + 40 * ctx.level)
    }

    fn on_hit(
        &self,
        attacker: &Combatant,
        target: &mut Combatant,
        level: i32,
        rolls: &RollStream<'_>,
        now: Tick,
    ) {
        if rolls.chance(35) {
            target.statuses.apply(
                StatusEffect::new(StatusKind::Freeze, level, now + 8000)
                    .from_source(attacker.id),
            );
        }
    }
}
