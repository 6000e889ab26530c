//! Skill formula plug-in registry.
//!
//! Per-skill behavior lives in small handler structs registered against a
//! skill id, not in a giant switch inside the engine. The engine consults
//! the registered handler (or the default) at fixed points of the pipeline:
//! ratio and flat bonus on the raw damage, hit-rate adjustment, defense
//! interaction, channel-specific base damage, and the post-hit effect hook.

use std::collections::HashMap;

use crate::combatant::{Combatant, Element, Tick};
use crate::damage::AttackChannel;
use crate::env::{RollStream, SkillId, SkillInfo};
use crate::error::BattleError;

/// Read-only inputs a handler may consult.
pub struct SkillContext<'a> {
    pub attacker: &'a Combatant,
    pub target: &'a Combatant,
    pub skill: SkillId,
    pub level: i32,
    pub channel: AttackChannel,
    pub info: &'a SkillInfo,
    /// Targets sharing a split-damage splash; 0 when unknown.
    pub splash_count: i32,
    /// Cells between attacker and target at cast time.
    pub distance: i32,
}

/// Hit-rate adjustments keyed by skill; applied to the final rate only.
#[derive(Clone, Copy, Debug)]
pub struct HitRateAdjust {
    /// Additive percent on the final rate.
    pub add: i32,
    /// Multiplier percent on the final rate, 100 = unchanged.
    pub multiply_pct: i32,
    /// Per-mille additive critical bonus.
    pub crit_bonus: i32,
    /// The skill is unconditionally critical.
    pub always_crit: bool,
}

impl Default for HitRateAdjust {
    fn default() -> Self {
        Self {
            add: 0,
            multiply_pct: 100,
            crit_bonus: 0,
            always_crit: false,
        }
    }
}

/// How the skill interacts with the defense-reduction stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DefenseBehavior {
    #[default]
    Normal,
    /// Skip the stage entirely.
    Pierce,
    /// Scale with `(hard + soft) / 100` instead of being reduced.
    DefRatio,
}

/// Magic-channel base damage produced by a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MagicBase {
    /// Sample the caster's matk range, then scale by percent (100 = as is).
    Ratio(i32),
    /// Fixed base, bypassing the matk sample.
    Fixed(i64),
}

/// One skill's formula plug-in. Every hook has a default so a handler only
/// overrides the points where the skill deviates.
pub trait SkillHandler: Send + Sync {
    /// Percent of weapon base damage, 100 = unchanged. Applied before any
    /// mitigation.
    fn weapon_ratio(&self, _ctx: &SkillContext<'_>) -> i32 {
        100
    }

    /// Flat addition after the ratio, still before mitigation.
    fn flat_bonus(&self, _ctx: &SkillContext<'_>) -> i64 {
        0
    }

    fn hit_rate(&self, _ctx: &SkillContext<'_>) -> HitRateAdjust {
        HitRateAdjust::default()
    }

    /// Hit multiplicity override; `None` keeps the catalog value. Negative
    /// values keep the sign-encoded "already per-hit" meaning.
    fn div(&self, _ctx: &SkillContext<'_>) -> Option<i32> {
        None
    }

    fn defense(&self, _ctx: &SkillContext<'_>) -> DefenseBehavior {
        DefenseBehavior::Normal
    }

    /// Forced attack element; `None` defers to the catalog, then the weapon.
    fn element_override(&self, _ctx: &SkillContext<'_>) -> Option<Element> {
        None
    }

    fn magic_base(&self, _ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> MagicBase {
        MagicBase::Ratio(100)
    }

    /// Misc-channel base damage; the default deals nothing.
    fn misc_base(&self, _ctx: &SkillContext<'_>, _rolls: &RollStream<'_>) -> i64 {
        0
    }

    /// Additional effect after damage commits (status application and the
    /// like). Suppressed by `NO_ADDITIONAL_EFFECT` and by gate blocks.
    fn on_hit(
        &self,
        _attacker: &Combatant,
        _target: &mut Combatant,
        _level: i32,
        _rolls: &RollStream<'_>,
        _now: Tick,
    ) {
    }
}

/// The fallback for unregistered skills: plain channel defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHandler;

impl SkillHandler for DefaultHandler {}

/// Skill id to handler map with a default fallback.
#[derive(Default)]
pub struct SkillRegistry {
    handlers: HashMap<SkillId, Box<dyn SkillHandler>>,
    default: DefaultHandler,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler. Double registration is a wiring bug, surfaced
    /// as an error instead of a silent overwrite.
    pub fn register(
        &mut self,
        skill: SkillId,
        handler: Box<dyn SkillHandler>,
    ) -> Result<(), BattleError> {
        if self.handlers.contains_key(&skill) {
            return Err(BattleError::DuplicateHandler(skill));
        }
        self.handlers.insert(skill, handler);
        Ok(())
    }

    pub fn handler(&self, skill: SkillId) -> &dyn SkillHandler {
        match self.handlers.get(&skill) {
            Some(handler) => handler.as_ref(),
            None => &self.default,
        }
    }

    pub fn is_registered(&self, skill: SkillId) -> bool {
        self.handlers.contains_key(&skill)
    }
}
