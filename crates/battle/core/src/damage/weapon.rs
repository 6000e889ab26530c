//! Weapon-channel damage.
//!
//! Per-hand evaluation: base sample, size fix, status percentage adders,
//! skill ratio and flat bonus, defense reduction, refinement and mastery
//! additions, the card-fix chains, range and field reductions, the elemental
//! fix, then dual-wield recombination and hit-count expansion. The stage
//! order changes rounding and is deliberate throughout.

use crate::combatant::{
    AttackStats, Combatant, CombatantFlags, CombatantKind, Element, ModeFlags, Race, SizeClass,
    StatusKind, WeaponHand, WeaponType,
};
use crate::config::{BattleConfig, RulesetMode};
use crate::env::{RangeClass, SkillFlags};
use crate::hit::HitResolution;
use crate::mitigation::{CardTarget, DefenseParams, cards, defense, element::element_fix};
use crate::registry::DefenseBehavior;

use super::{AttackChannel, ChannelDamage, PipelineCtx};

/// Target-size damage percentage for one hand, with the exemptions: size-fix
/// gear, weapon perfection, and spears while mounted against medium targets.
fn size_pct(hand: &WeaponHand, attacker: &Combatant, target: &Combatant) -> i32 {
    if attacker.gear.no_size_fix || attacker.statuses.has(StatusKind::WeaponPerfection) {
        return 100;
    }
    if attacker.flags.contains(CombatantFlags::RIDING)
        && hand.weapon.is_spear()
        && target.size == SizeClass::Medium
    {
        return 100;
    }
    hand.size_mods[target.size as usize]
}

/// Soft defense after the crowd penalty.
fn effective_soft_def(def2: i32, config: &BattleConfig, targeted_count: i32) -> i32 {
    let mut soft = def2;
    if config.vit_penalty_type > 0 && targeted_count >= config.vit_penalty_count {
        let n = targeted_count - config.vit_penalty_count + 1;
        match config.vit_penalty_type {
            1 => soft = soft * (100 - n * config.vit_penalty_num) / 100,
            2 => soft -= n * config.vit_penalty_num,
            _ => {}
        }
        soft = soft.max(0);
    }
    soft
}

/// Flat race-mastery damage against this target.
fn bane_bonus(attacker: &Combatant, target: &Combatant) -> i64 {
    let mut bonus = 0i64;
    if attacker.passives.demon_bane > 0
        && (target.race == Race::Demon || target.race.is_undead(target.defense_element))
    {
        bonus += attacker.passives.demon_bane as i64;
    }
    if attacker.passives.beast_bane > 0 && matches!(target.race, Race::Brute | Race::Insect) {
        bonus += attacker.passives.beast_bane as i64;
    }
    bonus
}

struct HandOutcome {
    damage: i64,
    range: RangeClass,
    element: Element,
}

fn compute_hand(
    attacker: &Combatant,
    target: &Combatant,
    ctx: &PipelineCtx<'_>,
    hand: &WeaponHand,
    off_hand: bool,
    critical: bool,
) -> HandOutcome {
    let rolls = ctx.rolls;
    let skill_ctx = ctx.skill_ctx(attacker, target, AttackChannel::Weapon);

    let uses_ammo = !off_hand && hand.weapon.uses_ammo();
    let range = if uses_ammo || ctx.info.range == RangeClass::Long {
        RangeClass::Long
    } else {
        RangeClass::Short
    };

    // Attack element: skill override wins, then catalog, then ammunition,
    // then the hand itself.
    let element = ctx
        .handler
        .element_override(&skill_ctx)
        .or(ctx.info.element)
        .or(if uses_ammo {
            attacker.ammo.and_then(|a| a.element)
        } else {
            None
        })
        .unwrap_or(if off_hand {
            attacker.attack_element_off
        } else {
            attacker.attack_element
        });

    // ===== base sample =====
    let atk_max = hand.atk;
    let mut atk_min = attacker.stats.dexterity.min(atk_max);
    if uses_ammo {
        atk_min = atk_max * atk_min / 100;
    }
    let maximize = critical || attacker.statuses.has(StatusKind::MaximizePower);
    let mut damage = if maximize {
        atk_max as i64
    } else {
        rolls.range(atk_min, atk_max) as i64
    };
    damage += attacker.base_atk as i64;

    let size = size_pct(hand, attacker, target) as i64;
    if size != 100 {
        damage = damage * size / 100;
    }

    if uses_ammo {
        if let Some(ammo) = &attacker.ammo {
            if ammo.atk > 0 {
                damage += rolls.range(0, ammo.atk) as i64;
            }
        }
    }
    if hand.over_refine > 0 {
        damage += rolls.range(1, hand.over_refine) as i64;
    }
    if attacker.gear.atk_rate != 100 {
        damage = damage * attacker.gear.atk_rate as i64 / 100;
    }

    // ===== status percentage adders =====
    let mut status_pct = 0i64;
    if let Some(over_thrust) = attacker.statuses.get(StatusKind::OverThrust) {
        status_pct += 5 * over_thrust.level as i64;
    }
    if let Some(true_sight) = attacker.statuses.get(StatusKind::TrueSight) {
        status_pct += 2 * true_sight.level as i64;
    }
    if status_pct != 0 {
        damage += damage * status_pct / 100;
    }
    if attacker.statuses.has(StatusKind::Berserk) {
        damage *= 3;
    }
    let poison_coat = attacker.statuses.get(StatusKind::DeadlyPoisonCoat).copied();
    if let Some(coat) = &poison_coat {
        damage = damage * (150 + 50 * coat.level as i64) / 100;
    }
    if let Some(aura) = attacker.statuses.get(StatusKind::AuraBlade) {
        damage += 20 * aura.level as i64;
    }

    // ===== skill ratio and flat bonus =====
    let ratio = ctx.handler.weapon_ratio(&skill_ctx) as i64;
    if ratio != 100 {
        damage = damage * ratio / 100;
    }
    damage += ctx.handler.flat_bonus(&skill_ctx);

    // ===== defense =====
    let ignore_mask = if off_hand {
        &attacker.gear.ignore_def_off
    } else {
        &attacker.gear.ignore_def
    };
    let ratio_mask = if off_hand {
        &attacker.gear.def_ratio_off
    } else {
        &attacker.gear.def_ratio
    };
    let behavior = ctx.handler.defense(&skill_ctx);

    let soft = effective_soft_def(target.def2, ctx.config, ctx.targeted_count);
    let crit_pierces = critical && ctx.config.mode == RulesetMode::PreRenewal;
    let pierce = crit_pierces
        || behavior == DefenseBehavior::Pierce
        || ctx.info.flags.contains(SkillFlags::IGNORE_DEF)
        || ignore_mask.matches(target.race, target.defense_element.element, target.is_boss());
    let def_ratio = behavior == DefenseBehavior::DefRatio
        || ratio_mask.matches(target.race, target.defense_element.element, target.is_boss());

    if def_ratio {
        damage = defense::def_ratio_boost(damage, target.def_, soft);
    } else if !pierce {
        let def_type = match target.kind {
            CombatantKind::Monster => ctx.config.monster_defense_type,
            _ => ctx.config.player_defense_type,
        };
        let vit_roll = rolls.range(0, defense::vit_bonus_max(target.stats.vitality));
        damage = defense::apply(
            damage,
            DefenseParams {
                hard: target.def_,
                soft,
                override_type: def_type,
                mode: ctx.config.mode,
            },
            vit_roll,
        );
    }

    // ===== refinement and masteries =====
    damage += hand.refine_atk as i64;
    damage += hand.mastery as i64;
    damage += 2 * attacker.passives.weapon_research as i64;
    damage += bane_bonus(attacker, target);

    // A connecting hand never reports less than 1 before percent bonuses.
    if damage < 1 {
        damage = 1;
    }

    if hand.weapon == WeaponType::Katar && attacker.passives.katar_research > 0 {
        damage += damage * (10 + 2 * attacker.passives.katar_research as i64) / 100;
    }

    // ===== card-fix chains =====
    let no_cards = ctx.info.flags.contains(SkillFlags::NO_CARDFIX) || poison_coat.is_some();
    if !no_cards {
        let card_target = CardTarget {
            race: target.race,
            element: target.defense_element.element,
            size: target.size,
            boss: target.is_boss(),
            class_id: target.class_id,
        };
        if off_hand {
            if !ctx.config.left_cardfix_to_right {
                damage = cards::offense_chain(damage, &attacker.gear.offense_off, card_target);
            }
        } else {
            let mut tables = if ctx.config.left_cardfix_to_right {
                cards::merge_tables(&attacker.gear.offense, &attacker.gear.offense_off)
            } else {
                attacker.gear.offense.clone()
            };
            if uses_ammo {
                tables = cards::merge_tables(&tables, &attacker.gear.ammo_offense);
            }
            damage = cards::offense_chain(damage, &tables, card_target);
        }
    }

    if critical && ctx.config.mode == RulesetMode::Renewal {
        damage = damage * 140 / 100;
    }

    // ===== target-side reductions =====
    let attacker_attrs = CardTarget {
        race: attacker.race,
        element,
        size: attacker.size,
        boss: attacker.is_boss(),
        class_id: attacker.class_id,
    };
    damage = cards::resist_chain(damage, &target.gear.resist, attacker_attrs);
    let range_resist = match range {
        RangeClass::Short => target.gear.short_resist,
        RangeClass::Long => target.gear.long_resist,
    };
    damage = cards::percent_step(damage, -range_resist);

    if range == RangeClass::Long {
        if let Some(defender) = target.statuses.get(StatusKind::Defender) {
            damage = damage * (100 - defender.power as i64) / 100;
        }
        if target.statuses.has(StatusKind::FogWall) {
            damage = damage * 75 / 100;
        }
    }
    if target.statuses.has(StatusKind::Assumptio) {
        let divisor = if ctx.map.pvp || ctx.map.gvg { 2 } else { 3 };
        damage /= divisor;
    }

    // ===== elemental fix and forged extras =====
    damage = element_fix(
        damage,
        ctx.elements,
        element,
        target.defense_element,
        0,
        ctx.config.mode,
    );
    damage += hand.star as i64;
    damage += 3 * attacker.spirit_balls as i64;

    HandOutcome {
        damage,
        range,
        element,
    }
}

pub(crate) fn compute(
    attacker: &Combatant,
    target: &Combatant,
    ctx: &PipelineCtx<'_>,
    hit: &HitResolution,
) -> ChannelDamage {
    let skill_ctx = ctx.skill_ctx(attacker, target, AttackChannel::Weapon);
    let mut div = ctx.handler.div(&skill_ctx).unwrap_or(ctx.info.hits as i32);

    // Monster attackers carry a flat range instead of equipment.
    if let AttackStats::Monster { atk_min, atk_max } = attacker.attack {
        let mut damage = attacker.base_atk as i64 + ctx.rolls.range(atk_min, atk_max) as i64;
        let ratio = ctx.handler.weapon_ratio(&skill_ctx) as i64;
        if ratio != 100 {
            damage = damage * ratio / 100;
        }
        damage += ctx.handler.flat_bonus(&skill_ctx);
        if !hit.critical {
            let vit_roll = ctx
                .rolls
                .range(0, defense::vit_bonus_max(target.stats.vitality));
            damage = defense::apply(
                damage,
                DefenseParams {
                    hard: target.def_,
                    soft: effective_soft_def(target.def2, ctx.config, ctx.targeted_count),
                    override_type: ctx.config.monster_defense_type,
                    mode: ctx.config.mode,
                },
                vit_roll,
            );
        }
        if damage < 1 {
            damage = 1;
        }
        let attacker_attrs = CardTarget {
            race: attacker.race,
            element: attacker.attack_element,
            size: attacker.size,
            boss: attacker.is_boss(),
            class_id: attacker.class_id,
        };
        damage = cards::resist_chain(damage, &target.gear.resist, attacker_attrs);
        damage = element_fix(
            damage,
            ctx.elements,
            attacker.attack_element,
            target.defense_element,
            0,
            ctx.config.mode,
        );
        return finish(
            target,
            ctx,
            damage,
            0,
            div,
            attacker.attack_element,
            ctx.info.range,
        );
    }

    let Some(main_hand) = attacker.attack.main_hand().cloned() else {
        return finish(target, ctx, 0, 0, 1, Element::Neutral, RangeClass::Short);
    };
    let off_hand = attacker.attack.off_hand().cloned();
    let katar = main_hand.weapon == WeaponType::Katar;

    let main = compute_hand(attacker, target, ctx, &main_hand, false, hit.critical);
    let mut damage = main.damage;
    let mut damage2 = 0i64;

    // Double attack: plain dagger strikes proc a second identical hit.
    if ctx.skill.is_basic_attack()
        && !hit.critical
        && main_hand.weapon == WeaponType::Dagger
        && attacker.passives.double_attack > 0
        && ctx.rolls.chance(5 * attacker.passives.double_attack)
    {
        div = 2;
        damage *= 2;
    }

    if katar {
        // The katar off-hand follow-up is a fraction of the main hit.
        damage2 = damage * (1 + 2 * attacker.passives.double_attack as i64) / 100;
    } else if let Some(off) = &off_hand {
        let left = compute_hand(attacker, target, ctx, off, true, hit.critical);
        damage = damage * (50 + 10 * attacker.passives.right_hand_mastery as i64) / 100;
        damage2 = left.damage * (30 + 10 * attacker.passives.left_hand_mastery as i64) / 100;
        if damage > 0 && damage2 < 1 {
            damage2 = 1;
        }
        if damage2 > 0 && damage < 1 {
            damage = 1;
        }
    }

    finish(target, ctx, damage, damage2, div, main.element, main.range)
}

/// Shared tail: hit-count expansion, plant protocol, weapon-damage nullify.
fn finish(
    target: &Combatant,
    ctx: &PipelineCtx<'_>,
    mut damage: i64,
    mut damage2: i64,
    mut div: i32,
    element: Element,
    range: RangeClass,
) -> ChannelDamage {
    // Negative multiplicity means the formula produced a per-hit value.
    if div < 0 {
        div = -div;
        damage *= div as i64;
        damage2 *= div as i64;
    }
    if div < 1 {
        div = 1;
    }

    if target.mode.contains(ModeFlags::PLANT) {
        damage = if damage > 0 { div as i64 } else { 0 };
        if damage2 > 0 {
            damage2 = 1;
        }
    }
    if target.gear.no_weapon_damage {
        damage = 0;
        damage2 = 0;
    }

    ChannelDamage {
        damage,
        damage2,
        div,
        element,
        range,
        blow: ctx.info.blow_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::EntityId;
    use crate::env::{PcgRng, RollStream, SkillId, SkillInfo};
    use crate::mitigation::ElementTable;
    use crate::registry::DefaultHandler;

    fn ctx<'a>(
        config: &'a BattleConfig,
        elements: &'a ElementTable,
        info: &'a SkillInfo,
        rolls: &'a RollStream<'a>,
    ) -> PipelineCtx<'a> {
        PipelineCtx {
            config,
            elements,
            handler: &DefaultHandler,
            info,
            skill: SkillId::BASIC_ATTACK,
            level: 0,
            rolls,
            map: crate::config::MapFlags::default(),
            splash_count: 0,
            distance: 1,
            targeted_count: 1,
        }
    }

    fn swordsman(atk: i32) -> Combatant {
        let mut c = Combatant::new(EntityId(1), CombatantKind::Player);
        c.attack = AttackStats::Equipped {
            main: WeaponHand {
                weapon: WeaponType::OneHandSword,
                atk,
                ..WeaponHand::default()
            },
            off: None,
        };
        c.stats.dexterity = atk;
        c
    }

    #[test]
    fn plain_attack_legacy_defense_scenario() {
        // Weapon range collapses to [120,120] via dex=120, target def 50:
        // 120 * 50 / 100 = 60, no soft def, no other modifiers.
        let config = BattleConfig::default();
        let elements = ElementTable::neutral();
        let info = SkillInfo::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 7, 7, EntityId(1));
        let ctx = ctx(&config, &elements, &info, &rolls);

        let attacker = swordsman(120);
        let mut target = Combatant::new(EntityId(2), CombatantKind::Monster);
        target.def_ = 50;

        let out = compute(&attacker, &target, &ctx, &HitResolution::GUARANTEED);
        assert_eq!(out.damage, 60);
        assert_eq!(out.damage2, 0);
        assert_eq!(out.div, 1);
    }

    #[test]
    fn raw_sample_stays_in_weapon_range() {
        let config = BattleConfig::default();
        let elements = ElementTable::neutral();
        let info = SkillInfo::default();
        let rng = PcgRng;

        let mut attacker = swordsman(120);
        attacker.stats.dexterity = 100;
        let target = Combatant::new(EntityId(2), CombatantKind::Monster);

        for nonce in 0..32 {
            let rolls = RollStream::new(&rng, 7, nonce, EntityId(1));
            let ctx = ctx(&config, &elements, &info, &rolls);
            let out = compute(&attacker, &target, &ctx, &HitResolution::GUARANTEED);
            assert!((100..=120).contains(&out.damage), "got {}", out.damage);
        }
    }

    #[test]
    fn plant_protocol_caps_damage_at_hit_count() {
        let config = BattleConfig::default();
        let elements = ElementTable::neutral();
        let info = SkillInfo {
            hits: 3,
            ..SkillInfo::default()
        };
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 7, 7, EntityId(1));
        let ctx = ctx(&config, &elements, &info, &rolls);

        let attacker = swordsman(500);
        let mut target = Combatant::new(EntityId(2), CombatantKind::Monster);
        target.mode.insert(ModeFlags::PLANT);

        let out = compute(&attacker, &target, &ctx, &HitResolution::GUARANTEED);
        assert_eq!(out.damage, 3);
    }

    #[test]
    fn critical_samples_maximum_and_pierces_defense() {
        let config = BattleConfig::default();
        let elements = ElementTable::neutral();
        let info = SkillInfo::default();
        let rng = PcgRng;

        let mut attacker = swordsman(120);
        attacker.stats.dexterity = 50;
        let mut target = Combatant::new(EntityId(2), CombatantKind::Monster);
        target.def_ = 90;

        let crit = HitResolution {
            connects: true,
            critical: true,
            perfect_dodge: false,
        };
        let rolls = RollStream::new(&rng, 7, 7, EntityId(1));
        let ctx = ctx(&config, &elements, &info, &rolls);
        let out = compute(&attacker, &target, &ctx, &crit);
        assert_eq!(out.damage, 120);
    }

    #[test]
    fn dual_wield_splits_asymmetrically() {
        let config = BattleConfig::default();
        let elements = ElementTable::neutral();
        let info = SkillInfo::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 7, 7, EntityId(1));
        let ctx = ctx(&config, &elements, &info, &rolls);

        let mut attacker = swordsman(100);
        attacker.stats.dexterity = 100;
        attacker.attack = AttackStats::Equipped {
            main: WeaponHand {
                weapon: WeaponType::Dagger,
                atk: 100,
                ..WeaponHand::default()
            },
            off: Some(WeaponHand {
                weapon: WeaponType::Dagger,
                atk: 100,
                ..WeaponHand::default()
            }),
        };
        let target = Combatant::new(EntityId(2), CombatantKind::Monster);

        let out = compute(&attacker, &target, &ctx, &HitResolution::GUARANTEED);
        // Untrained dual wield: 50% main, 30% off.
        assert_eq!(out.damage, 50);
        assert_eq!(out.damage2, 30);
    }

    #[test]
    fn weapon_immunity_zeroes_both_hands() {
        let config = BattleConfig::default();
        let elements = ElementTable::neutral();
        let info = SkillInfo::default();
        let rng = PcgRng;
        let rolls = RollStream::new(&rng, 7, 7, EntityId(1));
        let ctx = ctx(&config, &elements, &info, &rolls);

        let attacker = swordsman(120);
        let mut target = Combatant::new(EntityId(2), CombatantKind::Monster);
        target.gear.no_weapon_damage = true;

        let out = compute(&attacker, &target, &ctx, &HitResolution::GUARANTEED);
        assert_eq!(out.damage, 0);
        assert_eq!(out.damage2, 0);
    }
}
