//! Swordsman and knight weapon skills.

use battle_core::combatant::{Combatant, StatusEffect, StatusKind, Tick};
use battle_core::registry::{HitRateAdjust, SkillContext, SkillHandler};
use battle_core::RollStream;

/// Single heavy strike; accurate, and stunning at high training.
pub struct Bash;

impl SkillHandler for Bash {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 30 * ctx.level
    }

    fn hit_rate(&self, ctx: &SkillContext<'_>) -> HitRateAdjust {
        HitRateAdjust {
            multiply_pct: 100 + 5 * ctx.level,
            ..HitRateAdjust::default()
        }
    }

    fn on_hit(
        &self,
        attacker: &Combatant,
        target: &mut Combatant,
        level: i32,
        rolls: &RollStream<'_>,
        now: Tick,
    ) {
        // The fatal-blow training kicks in past level 5.
        if level > 5 && rolls.chance(10 * (level - 5)) {
            target.statuses.apply(
                StatusEffect::new(StatusKind::Stun, level, now + 3000).from_source(attacker.id),
            );
        }
    }
}

/// Fire-element burst around the attacker.
pub struct MagnumBreak;

impl SkillHandler for MagnumBreak {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 20 * ctx.level
    }

    fn hit_rate(&self, ctx: &SkillContext<'_>) -> HitRateAdjust {
        HitRateAdjust {
            multiply_pct: 100 + 10 * ctx.level,
            ..HitRateAdjust::default()
        }
    }
}

/// Spear thrust that strikes once per target size step.
pub struct Pierce;

impl SkillHandler for Pierce {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 10 * ctx.level
    }

    fn div(&self, ctx: &SkillContext<'_>) -> Option<i32> {
        Some(ctx.target.size as i32 + 1)
    }
}

/// Thrown spear.
pub struct SpearBoomerang;

impl SkillHandler for SpearBoomerang {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 50 * ctx.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::combatant::{CombatantKind, EntityId, SizeClass};
    use battle_core::damage::AttackChannel;
    use battle_core::{SkillId, SkillInfo};

    fn ctx<'a>(
        attacker: &'a Combatant,
        target: &'a Combatant,
        info: &'a SkillInfo,
        level: i32,
    ) -> SkillContext<'a> {
        SkillContext {
            attacker,
            target,
            skill: SkillId(5),
            level,
            channel: AttackChannel::Weapon,
            info,
            splash_count: 0,
            distance: 1,
        }
    }

    #[test]
    fn pierce_hits_once_per_size_step() {
        let attacker = Combatant::new(EntityId(1), CombatantKind::Player);
        let mut target = Combatant::new(EntityId(2), CombatantKind::Monster);
        let info = SkillInfo::default();

        target.size = SizeClass::Small;
        assert_eq!(Pierce.div(&ctx(&attacker, &target, &info, 5)), Some(1));
        target.size = SizeClass::Large;
        assert_eq!(Pierce.div(&ctx(&attacker, &target, &info, 5)), Some(3));
    }

    #[test]
    fn bash_ratio_and_accuracy_scale_with_level() {
        let attacker = Combatant::new(EntityId(1), CombatantKind::Player);
        let target = Combatant::new(EntityId(2), CombatantKind::Monster);
        let info = SkillInfo::default();
        let c = ctx(&attacker, &target, &info, 10);
        assert_eq!(Bash.weapon_ratio(&c), 400);
        assert_eq!(Bash.hit_rate(&c).multiply_pct, 150);
    }
}
