//! Monk combo chain and fist arts.

use battle_core::registry::{DefenseBehavior, SkillContext, SkillHandler};

/// Rapid four-strike chain.
pub struct ChainCombo;

impl SkillHandler for ChainCombo {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        150 + 50 * ctx.level
    }
}

/// Chain closer.
pub struct ComboFinish;

impl SkillHandler for ComboFinish {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        240 + 60 * ctx.level
    }
}

/// Strikes harder the more armored the target is: damage scales with the
/// target's defense instead of being reduced by it.
pub struct Investigate;

impl SkillHandler for Investigate {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 75 * ctx.level
    }

    fn defense(&self, _ctx: &SkillContext<'_>) -> DefenseBehavior {
        DefenseBehavior::DefRatio
    }
}

/// The ultimate fist: spends the caster's remaining spirit as raw power and
/// ignores armor outright.
pub struct ExtremityFist;

impl SkillHandler for ExtremityFist {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 * (8 + ctx.attacker.sp.current / 10)
    }

    fn defense(&self, _ctx: &SkillContext<'_>) -> DefenseBehavior {
        DefenseBehavior::Pierce
    }
}
