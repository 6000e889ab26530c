//! Archer and sniper skills.

use battle_core::registry::{SkillContext, SkillHandler};
use battle_core::RollStream;

/// Two arrows in one motion.
pub struct DoubleStrafe;

impl SkillHandler for DoubleStrafe {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        90 + 10 * ctx.level
    }
}

/// Spread volley; weaker per target but knocks back.
pub struct ArrowShower;

impl SkillHandler for ArrowShower {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        75 + 5 * ctx.level
    }
}

/// The falcon dives on command: stat-derived misc damage that ignores the
/// weapon entirely.
pub struct FalconAssault;

impl SkillHandler for FalconAssault {
    fn misc_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> i64 {
        let stats = &ctx.attacker.stats;
        let dive = (stats.dexterity / 10 + stats.intellect / 2 + 40) as i64 * 2;
        dive * (150 + 70 * ctx.level as i64) / 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::combatant::{Combatant, CombatantKind, EntityId};
    use battle_core::damage::AttackChannel;
    use battle_core::{PcgRng, SkillId, SkillInfo};

    #[test]
    fn falcon_dive_scales_with_handler_stats() {
        let mut attacker = Combatant::new(EntityId(1), CombatantKind::Player);
        attacker.stats.dexterity = 100;
        attacker.stats.intellect = 40;
        let target = Combatant::new(EntityId(2), CombatantKind::Monster);
        let info = SkillInfo::default();
        let ctx = SkillContext {
            attacker: &attacker,
            target: &target,
            skill: SkillId(389),
            level: 5,
            channel: AttackChannel::Misc,
            info: &info,
            splash_count: 0,
            distance: 7,
        };
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));
        // (10 + 20 + 40) * 2 = 140, times 500 percent.
        assert_eq!(FalconAssault.misc_base(&ctx, &rolls), 700);
    }
}
