//! Monster-only skills.

use battle_core::registry::{SkillContext, SkillHandler};
use battle_core::RollStream;

/// The caster detonates; everything caught takes its remaining health as
/// raw damage. The caster's own death is handled by whoever fired the skill.
pub struct SelfDestruct;

impl SkillHandler for SelfDestruct {
    fn misc_base(&self, ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> i64 {
        ctx.attacker.hp.current as i64
    }
}
