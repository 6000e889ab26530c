//! Hit resolution: does the attack connect, and is it a critical?
//!
//! The check order is fixed and observable through the rolls it consumes:
//! forced-hit statuses on the target come first, then the critical roll
//! (a critical short-circuits the accuracy roll), then perfect dodge, then
//! the accuracy roll itself. Skill adjustments apply to the final rate only,
//! never to the intermediate accuracy value.

use crate::combatant::{Combatant, CombatantKind, StatusKind, WeaponType};
use crate::config::BattleConfig;
use crate::env::{RangeClass, RollStream};

/// Outcome of one hit resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HitResolution {
    pub connects: bool,
    pub critical: bool,
    /// Miss caused by the target's perfect-dodge roll rather than accuracy.
    pub perfect_dodge: bool,
}

impl HitResolution {
    pub const GUARANTEED: Self = Self {
        connects: true,
        critical: false,
        perfect_dodge: false,
    };
}

/// Per-attack inputs beyond the two combatants.
#[derive(Clone, Copy, Debug)]
pub struct HitContext {
    /// Attackers currently engaging the target, for crowd evasion penalties.
    pub targeted_count: i32,
    /// Additive percent on the final hit rate, from the skill handler.
    pub hit_bonus: i32,
    /// Multiplier percent on the final hit rate, 100 = unchanged.
    pub hit_rate_pct: i32,
    /// Per-mille additive critical bonus, from the skill handler.
    pub crit_bonus: i32,
    /// The skill is unconditionally critical.
    pub always_crit: bool,
    /// The weapon channel rolls criticals; magic and misc do not.
    pub allow_crit: bool,
    pub range: RangeClass,
    /// Plain attack, eligible for perfect dodge.
    pub plain_attack: bool,
}

impl Default for HitContext {
    fn default() -> Self {
        Self {
            targeted_count: 1,
            hit_bonus: 0,
            hit_rate_pct: 100,
            crit_bonus: 0,
            always_crit: false,
            allow_crit: true,
            range: RangeClass::Short,
            plain_attack: true,
        }
    }
}

/// Statuses that force the attack to connect regardless of any roll.
///
/// Petrification only counts once complete; a target still hardening keeps
/// its evasion.
fn target_cannot_evade(target: &Combatant) -> bool {
    if target.statuses.has(StatusKind::Sleep)
        || target.statuses.has(StatusKind::Stun)
        || target.statuses.has(StatusKind::Freeze)
    {
        return true;
    }
    matches!(target.statuses.get(StatusKind::Stone), Some(s) if s.charges == 0)
}

/// Critical chance in per-mille after every adjustment, 0 when criticals are
/// not possible for this attack.
fn critical_rate(
    attacker: &Combatant,
    target: &Combatant,
    ctx: &HitContext,
) -> i32 {
    if !ctx.allow_crit {
        return 0;
    }
    let mut cri = attacker.critical;
    if let Some(ammo) = &attacker.ammo {
        cri += ammo.crit;
    }
    if matches!(
        attacker.attack.main_hand().map(|h| h.weapon),
        Some(WeaponType::Katar)
    ) {
        // Katars crit twice as often; their halved off-hand compensates.
        cri *= 2;
    }
    cri += ctx.crit_bonus;
    cri -= target.stats.luck * 3;
    if target.statuses.has(StatusKind::Sleep) {
        cri *= 2;
    }
    if target.gear.crit_shield > 0 {
        cri = cri * (100 - target.gear.crit_shield) / 100;
    }
    cri.max(0)
}

/// Effective evasion after the crowd penalty.
fn effective_flee(target: &Combatant, config: &BattleConfig, targeted_count: i32) -> i32 {
    let mut flee = target.flee;
    if config.agi_penalty_type > 0 && targeted_count >= config.agi_penalty_count {
        let n = targeted_count - config.agi_penalty_count + 1;
        match config.agi_penalty_type {
            1 => flee = flee * (100 - n * config.agi_penalty_num) / 100,
            2 => flee -= n * config.agi_penalty_num,
            _ => {}
        }
        flee = flee.max(1);
    }
    flee
}

/// Resolves whether the attack connects.
///
/// Callers with a guaranteed-hit skill skip this entirely and use
/// [`HitResolution::GUARANTEED`].
pub fn resolve(
    attacker: &Combatant,
    target: &Combatant,
    config: &BattleConfig,
    rolls: &RollStream<'_>,
    ctx: &HitContext,
) -> HitResolution {
    let forced = target_cannot_evade(target);

    let mut critical = false;
    if ctx.always_crit {
        critical = true;
    } else if attacker.critical > 0 && ctx.allow_crit {
        let cri = critical_rate(attacker, target, ctx);
        if cri > 0 && rolls.chance_permille(cri) {
            critical = true;
        }
    }

    if forced || critical {
        return HitResolution {
            connects: true,
            critical,
            perfect_dodge: false,
        };
    }

    // Perfect dodge applies to plain attacks only; monsters join in when the
    // deployment enables it.
    let dodge_allowed = ctx.plain_attack
        && (target.kind == CombatantKind::Player || config.enemy_perfect_flee);
    if dodge_allowed && target.perfect_dodge > 0 && rolls.chance_permille(target.perfect_dodge) {
        return HitResolution {
            connects: false,
            critical: false,
            perfect_dodge: true,
        };
    }

    if attacker.gear.perfect_hit > 0 && rolls.chance(attacker.gear.perfect_hit) {
        return HitResolution::GUARANTEED;
    }

    let flee = effective_flee(target, config, ctx.targeted_count);
    let mut hitrate = attacker.hit - flee + 80;

    // Skill adjustments touch the final rate, never the accuracy above.
    if ctx.hit_rate_pct != 100 {
        hitrate = hitrate * ctx.hit_rate_pct / 100;
    }
    hitrate += ctx.hit_bonus;

    if ctx.range == RangeClass::Long && target.statuses.has(StatusKind::FogWall) {
        hitrate -= 50;
    }

    hitrate = hitrate.clamp(config.min_hitrate, config.max_hitrate);

    HitResolution {
        connects: rolls.chance(hitrate),
        critical: false,
        perfect_dodge: false,
    }
}
