//! Status-gate layer: the priority-ordered scan of the target's defensive
//! effects, run after the mitigation pipeline and before the final floors.
//!
//! The scan order is a contract inherited from the reference ruleset, not a
//! cleanliness choice: nullifying fields are consulted ahead of reducing
//! shields, and a pure block terminates the scan so lower-priority effects
//! are left untouched. Effects end themselves as they are consumed; removal
//! only marks the slot, and the caller sweeps after the resolution.

use crate::combatant::{Combatant, Element, StatusKind};
use crate::config::{BattleConfig, MapFlags};
use crate::damage::AttackChannel;
use crate::env::{RangeClass, RollStream, SkillFlags};

/// Per-attack inputs of one gate scan.
pub struct GateContext<'a> {
    pub config: &'a BattleConfig,
    pub map: MapFlags,
    pub channel: AttackChannel,
    pub range: RangeClass,
    pub element: Element,
    pub skill_flags: SkillFlags,
    pub rolls: &'a RollStream<'a>,
}

impl GateContext<'_> {
    fn weapon_short(&self) -> bool {
        self.channel == AttackChannel::Weapon && self.range == RangeClass::Short
    }

    fn weapon_long(&self) -> bool {
        self.channel == AttackChannel::Weapon && self.range == RangeClass::Long
    }
}

/// Result of the scan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GateOutcome {
    pub damage: i64,
    /// A gate zeroed the damage outright.
    pub blocked: bool,
    /// Damage to return to the attacker (reject-style parries).
    pub reflect: i64,
}

impl GateOutcome {
    fn pass(damage: i64) -> Self {
        Self {
            damage,
            blocked: false,
            reflect: 0,
        }
    }

    fn block() -> Self {
        Self {
            damage: 0,
            blocked: true,
            reflect: 0,
        }
    }
}

/// Runs the scan. `damage` is the post-mitigation total for the attack;
/// dual-wield callers gate the sum so barrier capacity is consumed once.
pub fn apply(
    _attacker: &Combatant,
    target: &mut Combatant,
    damage: i64,
    ctx: &GateContext<'_>,
) -> GateOutcome {
    if damage == 0 {
        return GateOutcome::pass(0);
    }
    let mut damage = damage;

    // Melee null field. One charge per blocked hit.
    if ctx.weapon_short() && target.statuses.has(StatusKind::SafetyWall) {
        if let Some(wall) = target.statuses.get_mut(StatusKind::SafetyWall) {
            wall.charges -= 1;
            if wall.charges <= 0 {
                target.statuses.mark_ended(StatusKind::SafetyWall);
            }
        }
        return GateOutcome::block();
    }

    // Ranged null field; also covers listed ranged misc attacks.
    if target.statuses.has(StatusKind::Pneuma)
        && (ctx.weapon_long() || (ctx.channel == AttackChannel::Misc && ctx.range == RangeClass::Long))
    {
        return GateOutcome::block();
    }

    if ctx.channel == AttackChannel::Magic && target.statuses.has(StatusKind::LokisVeil) {
        return GateOutcome::block();
    }

    // One-shot doubling; the debuff consumes itself on the first hit.
    if target.statuses.has(StatusKind::LexAeterna) {
        damage *= 2;
        target.statuses.mark_ended(StatusKind::LexAeterna);
    }

    // Element amplifier fields.
    for (kind, element) in [
        (StatusKind::Volcano, Element::Fire),
        (StatusKind::ViolentGale, Element::Wind),
        (StatusKind::Deluge, Element::Water),
    ] {
        if ctx.element == element {
            if let Some(field) = target.statuses.get(kind) {
                damage += damage * field.power as i64 / 100;
            }
        }
    }

    // SP-funded reduction; expires with the wearer's mana.
    if ctx.channel == AttackChannel::Weapon {
        if let Some(coat) = target.statuses.get(StatusKind::EnergyCoat).copied() {
            if target.sp.current <= 0 {
                target.statuses.mark_ended(StatusKind::EnergyCoat);
            } else {
                damage -= damage * coat.power as i64 / 100;
                let upkeep = (damage / 100).max(1) as i32;
                target.sp.drain(upkeep, 0);
                if target.sp.is_depleted() {
                    target.statuses.mark_ended(StatusKind::EnergyCoat);
                }
            }
        }
    }

    // Absorption barrier. An overflowing hit is still a full block; the
    // excess is discarded with the barrier, never carried to the target.
    if let Some(barrier) = target.statuses.get_mut(StatusKind::Kyrie) {
        if damage >= barrier.power as i64 {
            target.statuses.mark_ended(StatusKind::Kyrie);
        } else {
            barrier.power -= damage as i32;
            barrier.charges -= 1;
            if barrier.charges <= 0 {
                target.statuses.mark_ended(StatusKind::Kyrie);
            }
        }
        if matches!(ctx.channel, AttackChannel::Weapon | AttackChannel::Misc) {
            return GateOutcome::block();
        }
    }

    if target.statuses.has(StatusKind::Basilica) {
        return GateOutcome::block();
    }

    if ctx.channel == AttackChannel::Magic && target.statuses.has(StatusKind::LandProtector) {
        return GateOutcome::block();
    }

    if ctx.channel == AttackChannel::Weapon {
        if let Some(guard) = target.statuses.get(StatusKind::AutoGuard) {
            if ctx.rolls.chance(guard.rate) {
                return GateOutcome::block();
            }
        }
        if let Some(parry) = target.statuses.get(StatusKind::Parrying) {
            if ctx.rolls.chance(parry.rate) {
                return GateOutcome::block();
            }
        }
    }

    // Reject: halve the hit and throw the other half back.
    if ctx.weapon_short() {
        if let Some(reject) = target.statuses.get(StatusKind::RejectSword).copied() {
            if reject.charges > 0 && ctx.rolls.chance(reject.rate) {
                damage /= 2;
                let reflect = damage;
                if let Some(live) = target.statuses.get_mut(StatusKind::RejectSword) {
                    live.charges -= 1;
                    if live.charges <= 0 {
                        target.statuses.mark_ended(StatusKind::RejectSword);
                    }
                }
                return GateOutcome {
                    damage,
                    blocked: false,
                    reflect,
                };
            }
        }
    }

    // The web burns away and feeds the flame.
    if ctx.element == Element::Fire && target.statuses.has(StatusKind::SpiderWeb) {
        damage *= 2;
        target.statuses.mark_ended(StatusKind::SpiderWeb);
    }

    if ctx.channel == AttackChannel::Magic
        && target.statuses.has(StatusKind::FogWall)
        && !ctx.skill_flags.contains(SkillFlags::PIERCE_MAGIC_BARRIER)
        && ctx.rolls.chance(25)
    {
        return GateOutcome::block();
    }

    GateOutcome::pass(damage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{CombatantKind, EntityId, StatusEffect, Tick};
    use crate::env::{PcgRng, RngOracle};

    struct FixedRng(u32);

    impl RngOracle for FixedRng {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    fn gate_ctx<'a>(
        config: &'a BattleConfig,
        rolls: &'a RollStream<'a>,
        channel: AttackChannel,
        range: RangeClass,
        element: Element,
    ) -> GateContext<'a> {
        GateContext {
            config,
            map: MapFlags::default(),
            channel,
            range,
            element,
            skill_flags: SkillFlags::empty(),
            rolls,
        }
    }

    fn target() -> Combatant {
        Combatant::new(EntityId(2), CombatantKind::Player)
    }

    fn tick(t: u64) -> Tick {
        Tick::new(t)
    }

    #[test]
    fn safety_wall_blocks_melee_and_leaves_kyrie_untouched() {
        let config = BattleConfig::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));
        let ctx = gate_ctx(
            &config,
            &rolls,
            AttackChannel::Weapon,
            RangeClass::Short,
            Element::Neutral,
        );

        let mut tgt = target();
        tgt.statuses.apply(
            StatusEffect::new(StatusKind::SafetyWall, 5, tick(1000)).with_charges(3),
        );
        tgt.statuses.apply(
            StatusEffect::new(StatusKind::Kyrie, 10, tick(1000))
                .with_power(500)
                .with_charges(10),
        );

        let out = apply(&target(), &mut tgt, 800, &ctx);
        assert!(out.blocked);
        assert_eq!(out.damage, 0);
        // The wall consumed a charge, the barrier is untouched.
        assert_eq!(tgt.statuses.get(StatusKind::SafetyWall).unwrap().charges, 2);
        assert_eq!(tgt.statuses.get(StatusKind::Kyrie).unwrap().power, 500);
    }

    #[test]
    fn overflowing_barrier_still_fully_blocks_without_carryover() {
        let config = BattleConfig::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));
        let ctx = gate_ctx(
            &config,
            &rolls,
            AttackChannel::Weapon,
            RangeClass::Short,
            Element::Neutral,
        );

        let mut tgt = target();
        tgt.statuses.apply(
            StatusEffect::new(StatusKind::Kyrie, 10, tick(1000))
                .with_power(500)
                .with_charges(10),
        );

        let out = apply(&target(), &mut tgt, 800, &ctx);
        assert!(out.blocked);
        assert_eq!(out.damage, 0);
        assert!(!tgt.statuses.has(StatusKind::Kyrie));
    }

    #[test]
    fn barrier_capacity_decrements_under_capacity() {
        let config = BattleConfig::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));
        let ctx = gate_ctx(
            &config,
            &rolls,
            AttackChannel::Weapon,
            RangeClass::Short,
            Element::Neutral,
        );

        let mut tgt = target();
        tgt.statuses.apply(
            StatusEffect::new(StatusKind::Kyrie, 10, tick(1000))
                .with_power(500)
                .with_charges(10),
        );

        let out = apply(&target(), &mut tgt, 200, &ctx);
        assert!(out.blocked);
        let barrier = tgt.statuses.get(StatusKind::Kyrie).unwrap();
        assert_eq!(barrier.power, 300);
        assert_eq!(barrier.charges, 9);
    }

    #[test]
    fn lex_aeterna_doubles_once_then_ends() {
        let config = BattleConfig::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));
        let ctx = gate_ctx(
            &config,
            &rolls,
            AttackChannel::Weapon,
            RangeClass::Short,
            Element::Neutral,
        );

        let mut tgt = target();
        tgt.statuses
            .apply(StatusEffect::new(StatusKind::LexAeterna, 1, tick(1000)));

        let out = apply(&target(), &mut tgt, 100, &ctx);
        assert_eq!(out.damage, 200);
        assert!(!tgt.statuses.has(StatusKind::LexAeterna));
    }

    #[test]
    fn reject_sword_halves_and_reflects() {
        let config = BattleConfig::default();
        let rng = FixedRng(0);
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));
        let ctx = gate_ctx(
            &config,
            &rolls,
            AttackChannel::Weapon,
            RangeClass::Short,
            Element::Neutral,
        );

        let mut tgt = target();
        tgt.statuses.apply(
            StatusEffect::new(StatusKind::RejectSword, 1, tick(1000))
                .with_charges(3)
                .with_rate(100),
        );

        let out = apply(&target(), &mut tgt, 100, &ctx);
        assert_eq!(out.damage, 50);
        assert_eq!(out.reflect, 50);
        assert_eq!(
            tgt.statuses.get(StatusKind::RejectSword).unwrap().charges,
            2
        );
    }

    #[test]
    fn loki_silences_magic_only() {
        let config = BattleConfig::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));

        let mut tgt = target();
        tgt.statuses
            .apply(StatusEffect::new(StatusKind::LokisVeil, 1, tick(1000)));

        let magic = gate_ctx(
            &config,
            &rolls,
            AttackChannel::Magic,
            RangeClass::Long,
            Element::Fire,
        );
        assert!(apply(&target(), &mut tgt, 100, &magic).blocked);

        let weapon = gate_ctx(
            &config,
            &rolls,
            AttackChannel::Weapon,
            RangeClass::Short,
            Element::Neutral,
        );
        assert!(!apply(&target(), &mut tgt, 100, &weapon).blocked);
    }

    #[test]
    fn unmatched_statuses_pass_damage_through() {
        let config = BattleConfig::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 1, 1, EntityId(1));
        let ctx = gate_ctx(
            &config,
            &rolls,
            AttackChannel::Weapon,
            RangeClass::Short,
            Element::Neutral,
        );
        let mut tgt = target();
        let out = apply(&target(), &mut tgt, 321, &ctx);
        assert_eq!(out, GateOutcome::pass(321));
    }
}
