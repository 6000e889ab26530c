//! Magic-channel damage.
//!
//! Base damage samples the caster's matk range (or a handler-fixed base),
//! splits across splash targets where the skill says so, then runs magic
//! defense, the magic card fixes and the elemental fix. Magic never rolls
//! the accuracy check; field nullifiers live in the status gate.

use tracing::warn;

use crate::combatant::{Combatant, Element, ModeFlags};
use crate::env::SkillFlags;
use crate::mitigation::{CardTarget, DefenseParams, cards, defense, element::element_fix};
use crate::registry::MagicBase;

use super::{AttackChannel, ChannelDamage, PipelineCtx};

pub(crate) fn compute(
    attacker: &Combatant,
    target: &Combatant,
    ctx: &PipelineCtx<'_>,
) -> ChannelDamage {
    let skill_ctx = ctx.skill_ctx(attacker, target, AttackChannel::Magic);
    let mut div = ctx.handler.div(&skill_ctx).unwrap_or(ctx.info.hits as i32);

    let element = ctx
        .handler
        .element_override(&skill_ctx)
        .or(ctx.info.element)
        .unwrap_or(Element::Neutral);

    // ===== base damage =====
    let mut damage = match ctx.handler.magic_base(&skill_ctx, ctx.rolls) {
        MagicBase::Ratio(pct) => {
            let sample = ctx.rolls.range(attacker.matk.min, attacker.matk.max) as i64;
            sample * pct as i64 / 100
        }
        MagicBase::Fixed(base) => base,
    };
    damage += ctx.handler.flat_bonus(&skill_ctx);

    // Split-damage splash: a zero target count is a caller bug; divide by
    // one and keep going rather than aborting the resolution.
    if ctx.info.flags.contains(SkillFlags::SPLIT_AMONG_TARGETS) {
        if ctx.splash_count <= 0 {
            warn!(
                skill = ctx.skill.0,
                "split-damage splash resolved with zero targets, dividing by one"
            );
        } else {
            damage /= ctx.splash_count as i64;
        }
    }

    // ===== magic defense =====
    let pierce = ctx.info.flags.contains(SkillFlags::IGNORE_DEF)
        || attacker.gear.ignore_mdef.matches(
            target.race,
            target.defense_element.element,
            target.is_boss(),
        );
    if !pierce {
        damage = defense::apply(
            damage,
            DefenseParams {
                hard: target.mdef,
                soft: target.mdef2,
                override_type: ctx.config.magic_defense_type,
                mode: ctx.config.mode,
            },
            0,
        );
    }
    if damage < 1 {
        damage = 1;
    }

    // ===== magic card fixes =====
    if !ctx.info.flags.contains(SkillFlags::NO_CARDFIX) {
        let card_target = CardTarget {
            race: target.race,
            element: target.defense_element.element,
            size: target.size,
            boss: target.is_boss(),
            class_id: target.class_id,
        };
        damage = cards::offense_chain(damage, &attacker.gear.magic_offense, card_target);
    }
    let attacker_attrs = CardTarget {
        race: attacker.race,
        element,
        size: attacker.size,
        boss: attacker.is_boss(),
        class_id: attacker.class_id,
    };
    damage = cards::resist_chain(damage, &target.gear.magic_resist, attacker_attrs);
    damage = cards::percent_step(damage, -target.gear.magic_def_rate);

    damage = element_fix(
        damage,
        ctx.elements,
        element,
        target.defense_element,
        0,
        ctx.config.mode,
    );

    // ===== multiplicity and immunities =====
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

    if target.gear.no_magic_damage
        && !ctx.info.flags.contains(SkillFlags::PIERCE_MAGIC_BARRIER)
    {
        let siege = ctx.map.pvp || ctx.map.gvg || ctx.map.battleground;
        if ctx.config.magic_barrier_pvp_only > 0 && siege {
            damage = damage * (100 - ctx.config.magic_barrier_pvp_only as i64) / 100;
        } else {
            damage = 0;
        }
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
