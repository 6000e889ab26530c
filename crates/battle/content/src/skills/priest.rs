//! Priest-line offensive spells. Holy support magic turns hostile against
//! the undead; both handlers deal nothing to anything else.

use battle_core::registry::{MagicBase, SkillContext, SkillHandler};
use battle_core::RollStream;

/// Heal turned on an undead target: half the restoration, as holy damage.
pub struct OffensiveHeal;

impl OffensiveHeal {
    /// The restoration amount for this caster and level.
    pub fn heal_amount(base_level: i32, intellect: i32, level: i32) -> i64 {
        ((base_level + intellect) / 8) as i64 * (4 + 8 * level) as i64
    }
}

impl SkillHandler for OffensiveHeal {
    fn magic_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> MagicBase {
        let target = ctx.target;
        if !target.race.is_undead(target.defense_element) {
            return MagicBase::Fixed(0);
        }
        let heal = Self::heal_amount(
            ctx.attacker.base_level,
            ctx.attacker.stats.intellect,
            ctx.level,
        );
        MagicBase::Fixed(heal / 2)
    }
}

/// Exorcism gamble: a chance to destroy the undead outright, token holy
/// damage otherwise.
pub struct TurnUndead;

impl SkillHandler for TurnUndead {
    fn misc_base(&self, ctx: &SkillContext<'_>, rolls: &RollStream<'_>) -> i64 {
        let target = ctx.target;
        if !target.race.is_undead(target.defense_element) || target.is_boss() {
            return 0;
        }

        // Success grows with training, caster stats and the target's missing
        // health, capped well short of certainty.
        let missing = if target.hp.maximum > 0 {
            ((target.hp.maximum - target.hp.current) as i64 * 200 / target.hp.maximum as i64) as i32
        } else {
            0
        };
        let stats = &ctx.attacker.stats;
        let threshold = (20 * ctx.level + stats.luck + stats.intellect
            + ctx.attacker.base_level
            + missing)
            .min(700);
        if rolls.chance_permille(threshold) {
            return target.hp.current as i64;
        }
        (ctx.attacker.base_level + stats.intellect + 10 * ctx.level) as i64
    }
}
