//! Merchant weapon skills.

use battle_core::registry::{SkillContext, SkillHandler};

/// Zeny-fueled overhead strike; the currency cost lives with the caster.
pub struct Mammonite;

impl SkillHandler for Mammonite {
    fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
        100 + 50 * ctx.level
    }
}

/// Cart slam; pushes everything it catches.
pub struct CartRevolution;

impl SkillHandler for CartRevolution {
    fn weapon_ratio(&self, _ctx: &SkillContext<'_>) -> i32 {
        150
    }
}
