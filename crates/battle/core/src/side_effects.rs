//! Side-effect dispatcher: commits resolved damage and everything that
//! rides on it.
//!
//! Commit order is fixed: apply the damage, break fragile statuses, drains,
//! reflects, autocast procs, knockback, then the skill's additional effect.
//! Reflected damage is not applied here; it is handed back to the caller to
//! route through the deferred scheduler, tagged so it cannot re-reflect.

use arrayvec::ArrayVec;

use crate::combatant::{Combatant, Drain, EntityId, ModeFlags, StatusKind, Tick};
use crate::damage::{AttackChannel, AttackFlags, DamageResult, DamageTag};
use crate::env::{BattleEvent, EventSink, RangeClass, RollStream, SkillFlags, SkillId, SkillOracle};
use crate::registry::SkillHandler;

/// Follow-up damage the caller must schedule through the deferred path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReflectedHit {
    pub target: EntityId,
    pub damage: i64,
    pub channel: AttackChannel,
}

/// An autocast that procced; the caller invokes the skill and applies the
/// aftercast lockout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutocastProc {
    pub skill: SkillId,
    pub level: i32,
    pub cast_delay: u32,
}

/// What one commit did.
#[derive(Clone, Debug, Default)]
pub struct CommitOutcome {
    /// Hit points actually removed from the target.
    pub dealt: i64,
    /// Healing applied instead, for negative damage.
    pub healed: i64,
    pub target_died: bool,
    pub knockback: u8,
    pub coma: bool,
    pub reflected: ArrayVec<ReflectedHit, 2>,
    pub autocasts: ArrayVec<AutocastProc, 2>,
}

/// Shared inputs of one commit.
pub struct CommitContext<'a> {
    pub handler: &'a dyn SkillHandler,
    pub skills: &'a dyn SkillOracle,
    pub skill: SkillId,
    pub level: i32,
    pub rolls: &'a RollStream<'a>,
    pub now: Tick,
}

/// Commits `result` against the target. `result.reflect` carries damage a
/// gate already earmarked for return (reject-style parries).
pub fn commit(
    attacker: &mut Combatant,
    target: &mut Combatant,
    result: &DamageResult,
    ctx: &CommitContext<'_>,
    events: &mut dyn EventSink,
) -> CommitOutcome {
    let mut outcome = CommitOutcome::default();
    if !result.connected() {
        return outcome;
    }

    // ===== (a) vital change =====
    let total = result.total();
    if total < 0 {
        outcome.healed = target.hp.restore(clamp_i32(-total)) as i64;
    } else if total > 0 {
        outcome.dealt = target.hp.drain(clamp_i32(total), 0) as i64;
        if target.hp.is_depleted() {
            target.flags.insert(crate::combatant::CombatantFlags::DEAD);
            outcome.target_died = true;
        }
    }
    events.emit(BattleEvent::DamageDealt {
        attacker: attacker.id,
        target: target.id,
        damage: total,
        hits: result.div,
    });

    // ===== (b) fragile statuses break on damage =====
    if outcome.dealt > 0 {
        break_fragile_statuses(target, ctx.now, events);
    }

    if result.tag == DamageTag::Blocked {
        // A pure block commits nothing further; the gate already fired the
        // side effects it owns.
        return outcome;
    }

    // ===== (c) drains =====
    if outcome.dealt > 0 && result.channel == AttackChannel::Weapon && !attacker.is_dead() {
        let hands = [
            (attacker.gear.hp_drain, attacker.gear.sp_drain, result.damage),
            (
                attacker.gear.hp_drain_off,
                attacker.gear.sp_drain_off,
                result.damage2,
            ),
        ];
        for (hp_spec, sp_spec, dealt) in hands {
            if dealt <= 0 {
                continue;
            }
            if let Some(amount) = drain_amount(&hp_spec, dealt, ctx.rolls) {
                if amount >= 0 {
                    attacker.hp.restore(amount);
                } else {
                    attacker.hp.drain(-amount, 1);
                }
            }
            if let Some(amount) = drain_amount(&sp_spec, dealt, ctx.rolls) {
                if amount >= 0 {
                    attacker.sp.restore(amount);
                } else {
                    attacker.sp.drain(-amount, 0);
                }
            }
        }
    }

    // ===== (d) reflects =====
    if outcome.dealt > 0 && !result.flags.contains(AttackFlags::REFLECTED) {
        let mut reflect = result.reflect;
        let pct = match (result.channel, result.range) {
            (AttackChannel::Weapon, RangeClass::Short) => {
                let shield = target
                    .statuses
                    .get(StatusKind::ReflectShield)
                    .map(|s| s.power)
                    .unwrap_or(0);
                target.gear.reflect_short + shield
            }
            (AttackChannel::Weapon, RangeClass::Long) => target.gear.reflect_long,
            (AttackChannel::Magic, _) => target.gear.reflect_magic,
            _ => 0,
        };
        if pct > 0 {
            reflect += (outcome.dealt * pct as i64 / 100).max(1);
        }
        if reflect > 0 {
            // Bounded by the reflector's own vitality ceiling.
            reflect = reflect.min(target.hp.maximum as i64);
            outcome.reflected.push(ReflectedHit {
                target: attacker.id,
                damage: reflect,
                channel: result.channel,
            });
        }
    }

    // ===== (e) autocasts =====
    if outcome.dealt > 0 && !attacker.is_dead() {
        collect_autocasts(attacker, ctx, &mut outcome.autocasts);
    }

    // ===== (f) knockback =====
    if outcome.dealt > 0
        && result.blow > 0
        && !target.statuses.has(StatusKind::Endure)
        && !target.mode.contains(ModeFlags::KNOCKBACK_IMMUNE)
        && !target.gear.no_knockback
    {
        outcome.knockback = result.blow;
        events.emit(BattleEvent::Knockback {
            entity: target.id,
            cells: result.blow,
        });
    }

    // ===== (g) additional effect =====
    let suppressed = ctx
        .skills
        .info(ctx.skill, ctx.level)
        .flags
        .contains(SkillFlags::NO_ADDITIONAL_EFFECT);
    if outcome.dealt > 0 && !suppressed {
        ctx.handler
            .on_hit(attacker, target, ctx.level, ctx.rolls, ctx.now);
    }

    // ===== (h) coma procs =====
    if outcome.dealt > 0 && !outcome.target_died {
        for spec in &attacker.gear.coma {
            if spec.race == target.race && ctx.rolls.chance_permyriad(spec.rate) {
                target.hp.current = 1;
                outcome.coma = true;
                break;
            }
        }
    }

    target.statuses.sweep(ctx.now);
    outcome
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(0, i32::MAX as i64) as i32
}

/// Freeze, sleep and hardening petrification shatter when hit.
fn break_fragile_statuses(target: &mut Combatant, now: Tick, events: &mut dyn EventSink) {
    for kind in [StatusKind::Freeze, StatusKind::Sleep] {
        if target.statuses.mark_ended(kind) {
            events.emit(BattleEvent::StatusEnded {
                entity: target.id,
                kind,
            });
        }
    }
    let hardening = matches!(
        target.statuses.get(StatusKind::Stone),
        Some(stone) if stone.charges > 0
    );
    if hardening && target.statuses.mark_ended(StatusKind::Stone) {
        events.emit(BattleEvent::StatusEnded {
            entity: target.id,
            kind: StatusKind::Stone,
        });
    }
    target.statuses.sweep(now);
}

/// Drain amount for one hand, or `None` when the proc fails. The amount is
/// floored away from zero so a successful proc always moves at least one
/// point, in either direction.
fn drain_amount(spec: &Drain, dealt: i64, rolls: &RollStream<'_>) -> Option<i32> {
    if spec.rate == 0 || spec.percent == 0 {
        return None;
    }
    if !rolls.chance(spec.rate) {
        return None;
    }
    let mut amount = dealt * spec.percent as i64 / 100;
    if amount == 0 {
        amount = if spec.percent > 0 { 1 } else { -1 };
    }
    Some(amount.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Rolls equipment and status autocasts, paying the reduced mana price.
fn collect_autocasts(
    attacker: &mut Combatant,
    ctx: &CommitContext<'_>,
    procs: &mut ArrayVec<AutocastProc, 2>,
) {
    let mut candidates: ArrayVec<(SkillId, i32, i32), 2> = ArrayVec::new();
    if let Some(spec) = &attacker.gear.autocast {
        candidates.push((SkillId(spec.skill), spec.level, spec.rate));
    }
    if let Some(auto) = attacker.statuses.get(StatusKind::AutoSpell) {
        candidates.push((SkillId(auto.power as u16), auto.charges, auto.rate));
    }

    for (skill, level, rate) in candidates {
        if !ctx.rolls.chance(rate) {
            continue;
        }
        // The proc may fire below the trained level.
        let decay = ctx.rolls.below(100) as i32;
        let mut level = level;
        if decay >= 50 {
            level -= 2;
        } else if decay >= 15 {
            level -= 1;
        }
        let level = level.max(1);

        let info = ctx.skills.info(skill, level);
        let cost = info.sp_cost * 2 / 3;
        if attacker.sp.current < cost {
            continue;
        }
        attacker.sp.drain(cost, 0);
        procs.push(AutocastProc {
            skill,
            level,
            cast_delay: info.cast_delay,
        });
        if procs.is_full() {
            break;
        }
    }
}
