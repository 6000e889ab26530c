//! Target eligibility: may the attacker legally act against the target?
//!
//! The check resolves the *relation* between the pair (self, party, guild,
//! neutral, enemy) after every exception rule, then compares it against the
//! relation mask the caller asked about. Two distinct negative answers exist
//! and callers branch on the difference:
//!
//! - [`TargetVerdict::Denied`]: a legal combatant, but not in the requested
//!   relation (e.g. asked for an enemy, found a party member).
//! - [`TargetVerdict::NotApplicable`]: the target can categorically never be
//!   acted on right now (a pet, an invincible spawn, a corpse).

use crate::combatant::{Combatant, CombatantFlags, CombatantKind, StatusKind};
use crate::config::MapFlags;

bitflags::bitflags! {
    /// Relations a caller may ask about.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RelationMask: u8 {
        const SELF    = 1 << 0;
        const PARTY   = 1 << 1;
        const GUILD   = 1 << 2;
        const NEUTRAL = 1 << 3;
        const ENEMY   = 1 << 4;
    }
}

/// Resolved relation between attacker and target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    Own,
    Party,
    Guild,
    Neutral,
    Enemy,
}

impl Relation {
    fn matches(self, mask: RelationMask) -> bool {
        match self {
            // Acting on yourself counts as acting within your party/guild.
            Relation::Own => {
                mask.intersects(RelationMask::SELF | RelationMask::PARTY | RelationMask::GUILD)
            }
            Relation::Party => mask.contains(RelationMask::PARTY),
            Relation::Guild => mask.contains(RelationMask::GUILD),
            Relation::Neutral => mask.contains(RelationMask::NEUTRAL),
            Relation::Enemy => mask.contains(RelationMask::ENEMY),
        }
    }
}

/// Three-way eligibility verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetVerdict {
    Allowed,
    Denied,
    NotApplicable,
}

/// Inputs beyond the two combatants themselves.
#[derive(Clone, Copy, Debug, Default)]
pub struct EligibilityContext<'a> {
    pub map_flags: MapFlags,
    /// Owner of a skill-unit or summoned attacker, when one exists.
    pub attacker_master: Option<&'a Combatant>,
    /// The acting skill belongs to the restricted trap-damaging set.
    pub trap_breaking: bool,
    /// Open-world hostility between players is enabled server-wide.
    pub pk_mode: bool,
    /// Players below this base level neither deal nor draw PK hostility.
    pub pk_min_level: i32,
}

/// Full eligibility check: resolve the relation, honor every hard block and
/// override, and compare against `requested`.
pub fn check(
    attacker: &Combatant,
    target: &Combatant,
    ctx: &EligibilityContext<'_>,
    requested: RelationMask,
) -> TargetVerdict {
    match resolve_relation(attacker, target, ctx) {
        Some(relation) => {
            if relation.matches(requested) {
                TargetVerdict::Allowed
            } else {
                TargetVerdict::Denied
            }
        }
        None => TargetVerdict::NotApplicable,
    }
}

/// Resolves the relation, or `None` when the pairing is categorically
/// untargetable. The rule order mirrors the reference behavior: hard blocks,
/// then ground-unit rules, then the kill-flag override, then alliances.
pub fn resolve_relation(
    attacker: &Combatant,
    target: &Combatant,
    ctx: &EligibilityContext<'_>,
) -> Option<Relation> {
    // (a) type-specific hard blocks
    if target.kind == CombatantKind::Companion {
        return None;
    }
    if attacker.kind == CombatantKind::Companion && target.kind != CombatantKind::Monster {
        return None;
    }
    if target
        .flags
        .intersects(CombatantFlags::INVISIBLE | CombatantFlags::INVINCIBLE)
        && attacker.id != target.id
    {
        return None;
    }
    // A sanctuary suspends hostilities in both directions.
    if attacker.statuses.has(StatusKind::Basilica) || target.statuses.has(StatusKind::Basilica) {
        return None;
    }

    // (b) ground-unit rules: traps only break to the restricted skill set,
    // and only where siege rules apply.
    if target.kind == CombatantKind::SkillUnit {
        let siege = ctx.map_flags.gvg || ctx.map_flags.battleground;
        if ctx.trap_breaking && siege {
            return Some(Relation::Enemy);
        }
        return None;
    }

    // Resolve the effective attacker: units and summons act as their master.
    let actor = match attacker.kind {
        CombatantKind::SkillUnit => ctx.attacker_master?,
        CombatantKind::Monster if attacker.master.is_some() => {
            ctx.attacker_master.unwrap_or(attacker)
        }
        _ => attacker,
    };

    if actor.id == target.id || attacker.id == target.id {
        return Some(Relation::Own);
    }
    if attacker.master == Some(target.id) {
        // A summon always sides with its master.
        return Some(Relation::Party);
    }
    if actor.is_dead() {
        return None;
    }

    // (d) kill-flag override: bypasses every alliance rule below.
    if actor.flags.contains(CombatantFlags::KILLER)
        || target.flags.contains(CombatantFlags::KILLABLE)
    {
        return Some(Relation::Enemy);
    }

    // (c) faction resolution.
    match (actor.kind, target.kind) {
        (CombatantKind::Player, CombatantKind::Monster)
        | (CombatantKind::Monster, CombatantKind::Player)
        | (CombatantKind::Companion, CombatantKind::Monster) => return Some(Relation::Enemy),
        (CombatantKind::Monster, CombatantKind::Monster) => {
            // Monsters group by summoner, then by class-guild id.
            if actor.master.is_some() && actor.master == target.master {
                return Some(Relation::Party);
            }
            if actor.guild_id != 0 && actor.guild_id == target.guild_id {
                return Some(Relation::Guild);
            }
            return Some(Relation::Neutral);
        }
        _ => {}
    }

    let same_party = actor.party_id != 0 && actor.party_id == target.party_id;

    if ctx.map_flags.pvp {
        if !ctx.map_flags.pvp_no_party && same_party {
            return Some(Relation::Party);
        }
        if !ctx.map_flags.pvp_no_guild
            && actor.guild_id != 0
            && actor.guild_id == target.guild_id
        {
            return Some(Relation::Guild);
        }
        return Some(Relation::Enemy);
    }

    if ctx.map_flags.gvg {
        if actor.is_guild_allied(target.guild_id) || target.is_guild_allied(actor.guild_id) {
            return Some(Relation::Guild);
        }
        if actor.is_guild_hostile(target.guild_id) {
            return Some(Relation::Enemy);
        }
        if !ctx.map_flags.gvg_no_party && same_party {
            return Some(Relation::Party);
        }
        // Everyone else on siege ground is hostile.
        return Some(Relation::Enemy);
    }

    if same_party {
        return Some(Relation::Party);
    }
    if actor.guild_id != 0 && actor.guild_id == target.guild_id {
        return Some(Relation::Guild);
    }

    // PK servers make unaffiliated players hostile everywhere, with a
    // protection band for low levels on either side.
    if ctx.pk_mode
        && actor.kind == CombatantKind::Player
        && target.kind == CombatantKind::Player
    {
        if actor.base_level >= ctx.pk_min_level && target.base_level >= ctx.pk_min_level {
            return Some(Relation::Enemy);
        }
        return Some(Relation::Neutral);
    }

    Some(Relation::Neutral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{EntityId, Tick};
    use crate::combatant::StatusEffect;

    fn player(id: u32) -> Combatant {
        Combatant::new(EntityId(id), CombatantKind::Player)
    }

    fn monster(id: u32) -> Combatant {
        Combatant::new(EntityId(id), CombatantKind::Monster)
    }

    #[test]
    fn pet_target_is_not_applicable_not_denied() {
        let atk = player(1);
        let pet = Combatant::new(EntityId(2), CombatantKind::Companion);
        let ctx = EligibilityContext::default();
        assert_eq!(
            check(&atk, &pet, &ctx, RelationMask::ENEMY),
            TargetVerdict::NotApplicable
        );
    }

    #[test]
    fn companion_may_only_engage_monsters() {
        let pet = Combatant::new(EntityId(1), CombatantKind::Companion);
        let ctx = EligibilityContext::default();
        assert_eq!(
            check(&pet, &player(2), &ctx, RelationMask::ENEMY),
            TargetVerdict::NotApplicable
        );
        assert_eq!(
            check(&pet, &monster(3), &ctx, RelationMask::ENEMY),
            TargetVerdict::Allowed
        );
    }

    #[test]
    fn invincible_window_blocks_targeting() {
        let atk = player(1);
        let mut tgt = monster(2);
        tgt.flags.insert(CombatantFlags::INVINCIBLE);
        let ctx = EligibilityContext::default();
        assert_eq!(
            check(&atk, &tgt, &ctx, RelationMask::ENEMY),
            TargetVerdict::NotApplicable
        );
    }

    #[test]
    fn player_vs_monster_is_enemy() {
        let ctx = EligibilityContext::default();
        assert_eq!(
            check(&player(1), &monster(2), &ctx, RelationMask::ENEMY),
            TargetVerdict::Allowed
        );
        assert_eq!(
            check(&player(1), &monster(2), &ctx, RelationMask::PARTY),
            TargetVerdict::Denied
        );
    }

    #[test]
    fn same_party_players_are_not_enemies_off_pvp() {
        let mut a = player(1);
        let mut b = player(2);
        a.party_id = 5;
        b.party_id = 5;
        let ctx = EligibilityContext::default();
        assert_eq!(
            check(&a, &b, &ctx, RelationMask::ENEMY),
            TargetVerdict::Denied
        );
        assert_eq!(
            check(&a, &b, &ctx, RelationMask::PARTY),
            TargetVerdict::Allowed
        );
    }

    #[test]
    fn pvp_map_forces_hostility_between_strangers() {
        let a = player(1);
        let b = player(2);
        let ctx = EligibilityContext {
            map_flags: MapFlags {
                pvp: true,
                ..MapFlags::default()
            },
            ..EligibilityContext::default()
        };
        assert_eq!(
            check(&a, &b, &ctx, RelationMask::ENEMY),
            TargetVerdict::Allowed
        );
    }

    #[test]
    fn pvp_no_party_dissolves_party_protection() {
        let mut a = player(1);
        let mut b = player(2);
        a.party_id = 5;
        b.party_id = 5;
        let ctx = EligibilityContext {
            map_flags: MapFlags {
                pvp: true,
                pvp_no_party: true,
                ..MapFlags::default()
            },
            ..EligibilityContext::default()
        };
        assert_eq!(
            check(&a, &b, &ctx, RelationMask::ENEMY),
            TargetVerdict::Allowed
        );
    }

    #[test]
    fn gvg_allies_stay_friendly_strangers_do_not() {
        let mut a = player(1);
        let mut b = player(2);
        let mut c = player(3);
        a.guild_id = 10;
        a.allied_guilds.push(11);
        b.guild_id = 11;
        c.guild_id = 12;
        let ctx = EligibilityContext {
            map_flags: MapFlags {
                gvg: true,
                ..MapFlags::default()
            },
            ..EligibilityContext::default()
        };
        assert_eq!(
            check(&a, &b, &ctx, RelationMask::ENEMY),
            TargetVerdict::Denied
        );
        assert_eq!(
            check(&a, &c, &ctx, RelationMask::ENEMY),
            TargetVerdict::Allowed
        );
    }

    #[test]
    fn killer_flag_bypasses_alliances() {
        let mut a = player(1);
        let mut b = player(2);
        a.party_id = 5;
        b.party_id = 5;
        a.flags.insert(CombatantFlags::KILLER);
        let ctx = EligibilityContext::default();
        assert_eq!(
            check(&a, &b, &ctx, RelationMask::ENEMY),
            TargetVerdict::Allowed
        );
    }

    #[test]
    fn pk_mode_spares_low_level_players() {
        let mut a = player(1);
        let mut b = player(2);
        a.base_level = 90;
        b.base_level = 40;
        let ctx = EligibilityContext {
            pk_mode: true,
            pk_min_level: 55,
            ..EligibilityContext::default()
        };
        assert_eq!(
            check(&a, &b, &ctx, RelationMask::ENEMY),
            TargetVerdict::Denied
        );

        b.base_level = 60;
        assert_eq!(
            check(&a, &b, &ctx, RelationMask::ENEMY),
            TargetVerdict::Allowed
        );
    }

    #[test]
    fn basilica_suspends_hostility() {
        let mut a = player(1);
        let b = monster(2);
        a.statuses
            .apply(StatusEffect::new(StatusKind::Basilica, 1, Tick::new(1000)));
        let ctx = EligibilityContext::default();
        assert_eq!(
            check(&a, &b, &ctx, RelationMask::ENEMY),
            TargetVerdict::NotApplicable
        );
    }

    #[test]
    fn traps_require_siege_rules_and_a_breaker_skill() {
        let a = player(1);
        let trap = Combatant::new(EntityId(9), CombatantKind::SkillUnit);
        let plain = EligibilityContext {
            trap_breaking: true,
            ..EligibilityContext::default()
        };
        assert_eq!(
            check(&a, &trap, &plain, RelationMask::ENEMY),
            TargetVerdict::NotApplicable
        );

        let siege = EligibilityContext {
            trap_breaking: true,
            map_flags: MapFlags {
                gvg: true,
                ..MapFlags::default()
            },
            ..EligibilityContext::default()
        };
        assert_eq!(
            check(&a, &trap, &siege, RelationMask::ENEMY),
            TargetVerdict::Allowed
        );
    }
}
