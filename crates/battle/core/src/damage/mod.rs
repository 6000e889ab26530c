//! Damage formula engine: entry point of a combat resolution.
//!
//! `BattleEngine::resolve` runs one attack through eligibility, hit
//! resolution, the channel formula, the mitigation pipeline and the status
//! gate, and returns a [`DamageResult`] for the caller to defer or commit.
//! The engine never touches hit points itself; committing is the side-effect
//! dispatcher's job after the deferred tick fires.

pub mod magic;
pub mod misc;
pub mod weapon;

use crate::combatant::{Combatant, Element, StatusKind, Tick};
use crate::config::{BattleConfig, MapFlags};
use crate::eligibility::{self, EligibilityContext, RelationMask, TargetVerdict};
use crate::env::{RangeClass, RngOracle, RollStream, SkillFlags, SkillId, SkillInfo, SkillOracle};
use crate::gate;
use crate::hit::{self, HitContext, HitResolution};
use crate::mitigation::{ElementTable, battlefield_scale, hit_count_floor};
use crate::registry::{SkillContext, SkillHandler, SkillRegistry};

/// Attack channel selecting the formula family and the rate tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackChannel {
    #[default]
    Weapon,
    Magic,
    Misc,
}

bitflags::bitflags! {
    /// Situational bits on one attack request.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AttackFlags: u8 {
        /// Reflected damage; must not be reflected again.
        const REFLECTED = 1 << 0;
        /// Skip the eligibility check; the caller already resolved it.
        const PRECHECKED = 1 << 1;
    }
}

/// Damage-state tag attached to the result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DamageTag {
    #[default]
    Normal,
    Critical,
    Miss,
    PerfectDodge,
    /// A status gate zeroed the damage.
    Blocked,
    /// Damage landed but the target does not flinch.
    Endure,
    /// The pairing was not a legal target.
    NoTarget,
}

/// One attack request entering the engine.
#[derive(Clone, Copy, Debug)]
pub struct AttackRequest {
    pub skill: SkillId,
    pub level: i32,
    pub channel: AttackChannel,
    pub flags: AttackFlags,
    /// Action nonce feeding the roll stream; unique per attack.
    pub nonce: u64,
    pub now: Tick,
    pub map: MapFlags,
    /// Attackers currently engaging the target.
    pub targeted_count: i32,
    /// Targets sharing a split-damage splash; 0 when unknown.
    pub splash_count: i32,
    /// Cells between attacker and target at cast time.
    pub distance: i32,
}

impl AttackRequest {
    /// A plain attack (skill id 0) on the weapon channel.
    pub fn plain(nonce: u64) -> Self {
        Self {
            skill: SkillId::BASIC_ATTACK,
            level: 0,
            channel: AttackChannel::Weapon,
            flags: AttackFlags::empty(),
            nonce,
            now: Tick::ZERO,
            map: MapFlags::default(),
            targeted_count: 1,
            splash_count: 0,
            distance: 1,
        }
    }

    pub fn skill(skill: SkillId, level: i32, channel: AttackChannel, nonce: u64) -> Self {
        Self {
            skill,
            level,
            channel,
            ..Self::plain(nonce)
        }
    }
}

/// Resolved damage for one attack, per hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageResult {
    pub damage: i64,
    /// Off-hand damage; 0 for single-hand attacks.
    pub damage2: i64,
    /// Damage a gate earmarked for return to the attacker.
    pub reflect: i64,
    pub div: i32,
    pub tag: DamageTag,
    pub element: Element,
    pub range: RangeClass,
    pub channel: AttackChannel,
    pub flags: AttackFlags,
    /// Knockback cells to apply on commit.
    pub blow: u8,
    /// Attack-motion delay before the damage commits.
    pub amotion: u32,
    pub dmotion: u32,
}

impl DamageResult {
    pub fn total(&self) -> i64 {
        self.damage + self.damage2
    }

    pub fn connected(&self) -> bool {
        !matches!(
            self.tag,
            DamageTag::Miss | DamageTag::PerfectDodge | DamageTag::NoTarget
        )
    }

    fn absent(tag: DamageTag, channel: AttackChannel) -> Self {
        Self {
            tag,
            channel,
            div: 1,
            ..Self::default()
        }
    }
}

/// Damage and multiplicity produced by one channel formula, before the gate.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ChannelDamage {
    pub damage: i64,
    pub damage2: i64,
    pub div: i32,
    pub element: Element,
    pub range: RangeClass,
    pub blow: u8,
}

/// Shared read-only state for one resolution.
pub(crate) struct PipelineCtx<'a> {
    pub config: &'a BattleConfig,
    pub elements: &'a ElementTable,
    pub handler: &'a dyn SkillHandler,
    pub info: &'a SkillInfo,
    pub skill: SkillId,
    pub level: i32,
    pub rolls: &'a RollStream<'a>,
    pub map: MapFlags,
    pub splash_count: i32,
    pub distance: i32,
    pub targeted_count: i32,
}

impl<'a> PipelineCtx<'a> {
    pub fn skill_ctx<'b>(
        &'b self,
        attacker: &'b Combatant,
        target: &'b Combatant,
        channel: AttackChannel,
    ) -> SkillContext<'b> {
        SkillContext {
            attacker,
            target,
            skill: self.skill,
            level: self.level,
            channel,
            info: self.info,
            splash_count: self.splash_count,
            distance: self.distance,
        }
    }
}

/// The combat resolution engine. Cheap to construct per tick; all fields are
/// borrowed process-wide state.
pub struct BattleEngine<'a> {
    pub config: &'a BattleConfig,
    pub elements: &'a ElementTable,
    pub registry: &'a SkillRegistry,
    pub skills: &'a dyn SkillOracle,
    pub rng: &'a dyn RngOracle,
    pub game_seed: u64,
}

impl BattleEngine<'_> {
    /// Resolves one attack. The target is mutable because the status gate
    /// consumes barrier capacity and ends one-shot effects while scanning.
    pub fn resolve(
        &self,
        attacker: &Combatant,
        target: &mut Combatant,
        req: &AttackRequest,
    ) -> DamageResult {
        let rolls = RollStream::new(self.rng, self.game_seed, req.nonce, attacker.id);
        let info = self.skills.info(req.skill, req.level);
        let handler = self.registry.handler(req.skill);

        if !req.flags.contains(AttackFlags::PRECHECKED) {
            let elig_ctx = EligibilityContext {
                map_flags: req.map,
                pk_mode: self.config.pk_mode,
                pk_min_level: self.config.pk_min_level,
                ..EligibilityContext::default()
            };
            if eligibility::check(attacker, target, &elig_ctx, RelationMask::ENEMY)
                != TargetVerdict::Allowed
            {
                return DamageResult::absent(DamageTag::NoTarget, req.channel);
            }
        }

        let ctx = PipelineCtx {
            config: self.config,
            elements: self.elements,
            handler,
            info: &info,
            skill: req.skill,
            level: req.level,
            rolls: &rolls,
            map: req.map,
            splash_count: req.splash_count,
            distance: req.distance,
            targeted_count: req.targeted_count,
        };

        // Hit resolution is a weapon-channel concern; magic and misc either
        // always land or roll their own chances inside their formulas.
        let hit = if req.channel != AttackChannel::Weapon
            || info.flags.contains(SkillFlags::GUARANTEED_HIT)
        {
            HitResolution::GUARANTEED
        } else {
            let adjust = handler.hit_rate(&ctx.skill_ctx(attacker, target, req.channel));
            let hit_ctx = HitContext {
                targeted_count: req.targeted_count,
                hit_bonus: adjust.add,
                hit_rate_pct: adjust.multiply_pct,
                crit_bonus: adjust.crit_bonus,
                always_crit: adjust.always_crit,
                allow_crit: true,
                range: info.range,
                plain_attack: req.skill.is_basic_attack(),
            };
            hit::resolve(attacker, target, self.config, &rolls, &hit_ctx)
        };

        if !hit.connects {
            let tag = if hit.perfect_dodge {
                DamageTag::PerfectDodge
            } else {
                DamageTag::Miss
            };
            return DamageResult::absent(tag, req.channel);
        }

        let channel_damage = match req.channel {
            AttackChannel::Weapon => weapon::compute(attacker, target, &ctx, &hit),
            AttackChannel::Magic => magic::compute(attacker, target, &ctx),
            AttackChannel::Misc => misc::compute(attacker, target, &ctx),
        };

        let (main, off, blocked, reflect) =
            self.gate_hands(attacker, target, &channel_damage, &info, req, &rolls);

        let mut result = DamageResult {
            damage: main,
            damage2: off,
            reflect,
            div: channel_damage.div,
            tag: if hit.critical {
                DamageTag::Critical
            } else {
                DamageTag::Normal
            },
            element: channel_damage.element,
            range: channel_damage.range,
            channel: req.channel,
            flags: req.flags,
            blow: channel_damage.blow,
            amotion: attacker.amotion,
            dmotion: target.dmotion,
        };

        if blocked {
            result.tag = DamageTag::Blocked;
        } else if result.total() > 0 && target.statuses.has(StatusKind::Endure) {
            result.tag = DamageTag::Endure;
        }

        // Final floors and battlefield scaling, after every gate.
        let before = result.total();
        let mut total = hit_count_floor(
            before,
            result.div,
            self.config.skill_min_damage && !req.skill.is_basic_attack(),
        );
        total = battlefield_scale(total, req.map, self.config, req.channel, result.range);
        if total != before {
            if result.damage2 == 0 {
                result.damage = total;
            } else {
                let (main, off) = split_hands(total, result.damage, result.damage2);
                result.damage = main;
                result.damage2 = off;
            }
        }

        // The gate may have ended statuses mid-scan; reclaim the slots now
        // that the resolution no longer reads them.
        target.statuses.sweep(req.now);
        result
    }

    /// Runs the status gate over both hands: single-hand damage gates
    /// directly, dual-wield gates the sum and re-splits proportionally so
    /// barrier capacity is consumed once.
    fn gate_hands(
        &self,
        attacker: &Combatant,
        target: &mut Combatant,
        channel: &ChannelDamage,
        info: &SkillInfo,
        req: &AttackRequest,
        rolls: &RollStream<'_>,
    ) -> (i64, i64, bool, i64) {
        let gate_ctx = gate::GateContext {
            config: self.config,
            map: req.map,
            channel: req.channel,
            range: channel.range,
            element: channel.element,
            skill_flags: info.flags,
            rolls,
        };
        if channel.damage2 < 1 {
            let out = gate::apply(attacker, target, channel.damage, &gate_ctx);
            (out.damage, channel.damage2.max(0), out.blocked, out.reflect)
        } else if channel.damage < 1 {
            let out = gate::apply(attacker, target, channel.damage2, &gate_ctx);
            (channel.damage.max(0), out.damage, out.blocked, out.reflect)
        } else {
            let total = channel.damage + channel.damage2;
            let out = gate::apply(attacker, target, total, &gate_ctx);
            let (main, off) = split_hands(out.damage, channel.damage, channel.damage2);
            (main, off, out.blocked, out.reflect)
        }
    }
}

/// Re-splits a gated total across two hands in their original proportion.
/// If the main hand stays above 1 the off hand never reports less than 1.
fn split_hands(total: i64, main: i64, off: i64) -> (i64, i64) {
    if total <= 0 || main + off <= 0 {
        return (total.max(0), 0);
    }
    let mut off_share = (off * 100 / (main + off)) * total / 100;
    if total > 1 && off_share < 1 {
        off_share = 1;
    }
    (total - off_share, off_share)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_preserves_total_and_floors_off_hand() {
        let (main, off) = split_hands(100, 70, 30);
        assert_eq!(main + off, 100);
        assert!(off >= 1);

        let (main, off) = split_hands(3, 1000, 1);
        assert_eq!(main + off, 3);
        assert_eq!(off, 1);
    }

    #[test]
    fn zero_total_zeroes_both_hands() {
        assert_eq!(split_hands(0, 50, 50), (0, 0));
    }
}
