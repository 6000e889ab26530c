//! Thief, assassin and rogue skills.

use battle_core::combatant::{Combatant, StatusEffect, StatusKind, Tick};
use battle_core::registry::{HitRateAdjust, SkillContext, SkillHandler};
use battle_core::RollStream;

/// A rock. Fixed damage, never misses.
pub struct ThrowStone;

impl SkillHandler for ThrowStone {
    fn misc_base(&self, _ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> i64 {
        50
    }
}

/// Eight-strike katar flurry.
pub struct SonicBlow;

impl SkillHandler for SonicBlow {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        300 + 40 * ctx.level
    }

    fn hit_rate(&self, _ctx: &SkillContext<'_>) -> HitRateAdjust {
        HitRateAdjust {
            add: 30,
            ..HitRateAdjust::default()
        }
    }
}

/// Ranged katar slash.
pub struct Grimtooth;

impl SkillHandler for Grimtooth {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 20 * ctx.level
    }
}

/// A strike from behind; positioning is the caller's check, the damage
/// never rolls accuracy.
pub struct BackStab;

impl SkillHandler for BackStab {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        300 + 40 * ctx.level
    }
}

/// Ambush out of hiding; dazes and blinds what it hits.
pub struct Raid;

impl SkillHandler for Raid {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 40 * ctx.level
    }

    fn on_hit(
        &self,
        attacker: &Combatant,
        target: &mut Combatant,
        level: i32,
        rolls: &RollStream<'_>,
        now: Tick,
    ) {
        let rate = 10 + 3 * level;
        if rolls.chance(rate) {
            target.statuses.apply(
                StatusEffect::new(StatusKind::Stun, level, now + 5000).from_source(attacker.id),
            );
        }
        if rolls.chance(rate) {
            target.statuses.apply(
                StatusEffect::new(StatusKind::Blind, level, now + 20_000)
                    .from_source(attacker.id),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::combatant::{CombatantKind, EntityId};
    use battle_core::env::{PcgRng, RngOracle};

    struct FixedRng(u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    #[test]
    fn raid_applies_both_debuffs_on_a_low_roll() {
        let attacker = Combatant::new(EntityId(1), CombatantKind::Player);
        let mut target = Combatant::new(EntityId(2), CombatantKind::Monster);
        let rng = FixedRng(0);
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));

        Raid.on_hit(&attacker, &mut target, 5, &rolls, Tick::new(100));
        assert!(target.statuses.has(StatusKind::Stun));
        assert!(target.statuses.has(StatusKind::Blind));
        assert_eq!(
            target.statuses.get(StatusKind::Stun).unwrap().source,
            EntityId(1)
        );

        // A high roll leaves the target clean.
        let mut clean = Combatant::new(EntityId(3), CombatantKind::Monster);
        let rng = FixedRng(99);
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));
        Raid.on_hit(&attacker, &mut clean, 5, &rolls, Tick::new(100));
        assert!(clean.statuses.is_empty());
    }
}
