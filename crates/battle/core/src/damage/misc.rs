//! Misc-channel damage: falcon strikes, thrown objects, fixed-percent
//! self-destruct style attacks. The base comes entirely from the skill
//! handler; the channel only supplies the shared reductions.

use crate::combatant::{Combatant, Element, ModeFlags};
use crate::env::SkillFlags;
use crate::mitigation::{CardTarget, cards, element::element_fix};

use super::{AttackChannel, ChannelDamage, PipelineCtx};

pub(crate) fn compute(
    attacker: &Combatant,
    target: &Combatant,
    ctx: &PipelineCtx<'_>,
) -> ChannelDamage {
    let skill_ctx = ctx.skill_ctx(attacker, target, AttackChannel::Misc);
    let mut div = ctx.handler.div(&skill_ctx).unwrap_or(ctx.info.hits as i32);

    let element = ctx
        .handler
        .element_override(&skill_ctx)
        .or(ctx.info.element)
        .unwrap_or(Element::Neutral);

    let mut damage = ctx.handler.misc_base(&skill_ctx, ctx.rolls);
    damage += ctx.handler.flat_bonus(&skill_ctx);

    if !ctx.info.flags.contains(SkillFlags::NO_CARDFIX) {
        let attacker_attrs = CardTarget {
            race: attacker.race,
            element,
            size: attacker.size,
            boss: attacker.is_boss(),
            class_id: attacker.class_id,
        };
        damage = cards::resist_chain(damage, &target.gear.resist, attacker_attrs);
    }
    damage = cards::percent_step(damage, -target.gear.misc_def_rate);

    damage = element_fix(
        damage,
        ctx.elements,
        element,
        target.defense_element,
        0,
        ctx.config.mode,
    );

    if div < 0 {
        div = -div;
        damage *= div as i64;
    }
    if div < 1 {
        div = 1;
    }
    if target.mode.contains(ModeFlags::PLANT) && damage > 0 {
        damage = div as i64;
    }

    ChannelDamage {
        damage,
        damage2: 0,
        div,
        element,
        range: ctx.info.range,
        blow: ctx.info.blow_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{CombatantKind, EntityId};
    use crate::config::BattleConfig;
    use crate::env::{PcgRng, RollStream, SkillId, SkillInfo};
    use crate::mitigation::ElementTable;
    use crate::registry::{SkillContext, SkillHandler};

    struct FlatHundred;

    impl SkillHandler for FlatHundred {
        fn misc_base(&self, _ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> i64 {
            100
        }
    }

    #[test]
    fn misc_base_comes_from_the_handler() {
        let config = BattleConfig::default();
        let elements = ElementTable::neutral();
        let info = SkillInfo::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 5, 5, EntityId(1));
        let ctx = PipelineCtx {
            config: &config,
            elements: &elements,
            handler: &FlatHundred,
            info: &info,
            skill: SkillId(129),
            level: 1,
            rolls: &rolls,
            map: crate::config::MapFlags::default(),
            splash_count: 0,
            distance: 2,
            targeted_count: 1,
        };

        let attacker = Combatant::new(EntityId(1), CombatantKind::Player);
        let mut target = Combatant::new(EntityId(2), CombatantKind::Monster);
        target.gear.misc_def_rate = 20;

        let out = compute(&attacker, &target, &ctx);
        assert_eq!(out.damage, 80);
    }
}
