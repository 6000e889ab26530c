//! The static skill catalog: per-(skill, level) constants consumed by the
//! engine. Formula behavior lives in [`crate::skills`]; this file only holds
//! the flag tables, elements, hit counts and costs.

use battle_core::{Element, RangeClass, SkillFlags, SkillId, SkillInfo, SkillOracle};

/// Skill identifiers, numbered as in the reference skill database.
pub mod ids {
    use battle_core::SkillId;

    // ===== swordsman / knight =====
    pub const BASH: SkillId = SkillId(5);
    pub const MAGNUM_BREAK: SkillId = SkillId(7);
    pub const PIERCE: SkillId = SkillId(56);
    pub const SPEAR_BOOMERANG: SkillId = SkillId(59);

    // ===== mage / wizard =====
    pub const NAPALM_BEAT: SkillId = SkillId(11);
    pub const SOUL_STRIKE: SkillId = SkillId(13);
    pub const FROST_DIVER: SkillId = SkillId(15);
    pub const FIREBALL: SkillId = SkillId(17);
    pub const THUNDERSTORM: SkillId = SkillId(21);
    pub const FIRE_PILLAR: SkillId = SkillId(80);
    pub const JUPITEL_THUNDER: SkillId = SkillId(84);
    pub const LORD_OF_VERMILION: SkillId = SkillId(85);
    pub const STORM_GUST: SkillId = SkillId(89);

    // ===== acolyte / priest =====
    pub const HEAL: SkillId = SkillId(28);
    pub const TURN_UNDEAD: SkillId = SkillId(77);

    // ===== merchant =====
    pub const MAMMONITE: SkillId = SkillId(42);
    pub const CART_REVOLUTION: SkillId = SkillId(153);

    // ===== archer / sniper =====
    pub const DOUBLE_STRAFE: SkillId = SkillId(46);
    pub const ARROW_SHOWER: SkillId = SkillId(47);
    pub const FALCON_ASSAULT: SkillId = SkillId(389);

    // ===== thief / assassin / rogue =====
    pub const THROW_STONE: SkillId = SkillId(152);
    pub const SONIC_BLOW: SkillId = SkillId(136);
    pub const GRIMTOOTH: SkillId = SkillId(137);
    pub const BACK_STAB: SkillId = SkillId(212);
    pub const RAID: SkillId = SkillId(214);

    // ===== crusader =====
    pub const SHIELD_BOOMERANG: SkillId = SkillId(251);
    pub const HOLY_CROSS: SkillId = SkillId(253);

    // ===== monk =====
    pub const CHAIN_COMBO: SkillId = SkillId(269);
    pub const COMBO_FINISH: SkillId = SkillId(270);
    pub const INVESTIGATE: SkillId = SkillId(266);
    pub const EXTREMITY_FIST: SkillId = SkillId(271);

    // ===== monster =====
    pub const SELF_DESTRUCT: SkillId = SkillId(173);
}

/// Catalog oracle backed by the built-in skill database.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkillCatalog;

impl SkillOracle for SkillCatalog {
    fn info(&self, skill: SkillId, level: i32) -> SkillInfo {
        use ids::*;

        let base = SkillInfo::default();
        match skill {
            s if s == BASH => SkillInfo {
                sp_cost: 8,
                ..base
            },
            s if s == MAGNUM_BREAK => SkillInfo {
                element: Some(Element::Fire),
                blow_count: 2,
                sp_cost: 30,
                ..base
            },
            s if s == PIERCE => SkillInfo {
                // Hit count scales with target size; the handler overrides it.
                sp_cost: 7,
                ..base
            },
            s if s == SPEAR_BOOMERANG => SkillInfo {
                range: RangeClass::Long,
                sp_cost: 10,
                ..base
            },

            s if s == NAPALM_BEAT => SkillInfo {
                element: Some(Element::Ghost),
                flags: SkillFlags::GUARANTEED_HIT | SkillFlags::SPLIT_AMONG_TARGETS,
                range: RangeClass::Long,
                sp_cost: 9,
                cast_delay: 1000,
                ..base
            },
            s if s == SOUL_STRIKE => SkillInfo {
                element: Some(Element::Ghost),
                hits: clamp_hits((level + 1) / 2),
                flags: SkillFlags::GUARANTEED_HIT,
                range: RangeClass::Long,
                sp_cost: 18,
                cast_delay: 1200,
                ..base
            },
            s if s == FROST_DIVER => SkillInfo {
                element: Some(Element::Water),
                flags: SkillFlags::GUARANTEED_HIT,
                range: RangeClass::Long,
                sp_cost: 25,
                cast_delay: 1500,
                ..base
            },
            s if s == FIREBALL => SkillInfo {
                element: Some(Element::Fire),
                flags: SkillFlags::GUARANTEED_HIT,
                range: RangeClass::Long,
                sp_cost: 25,
                cast_delay: 1500,
                ..base
            },
            s if s == THUNDERSTORM => SkillInfo {
                element: Some(Element::Wind),
                hits: clamp_hits(level),
                flags: SkillFlags::GUARANTEED_HIT,
                range: RangeClass::Long,
                sp_cost: 29,
                cast_delay: 2000,
                ..base
            },
            s if s == FIRE_PILLAR => SkillInfo {
                element: Some(Element::Fire),
                flags: SkillFlags::GUARANTEED_HIT | SkillFlags::IGNORE_DEF | SkillFlags::TRAP,
                range: RangeClass::Long,
                sp_cost: 25,
                ..base
            },
            s if s == JUPITEL_THUNDER => SkillInfo {
                element: Some(Element::Wind),
                hits: clamp_hits(level + 2),
                blow_count: 3,
                flags: SkillFlags::GUARANTEED_HIT,
                range: RangeClass::Long,
                sp_cost: 20,
                cast_delay: 2500,
                ..base
            },
            s if s == LORD_OF_VERMILION => SkillInfo {
                element: Some(Element::Wind),
                flags: SkillFlags::GUARANTEED_HIT,
                range: RangeClass::Long,
                sp_cost: 60,
                cast_delay: 5000,
                ..base
            },
            s if s == STORM_GUST => SkillInfo {
                element: Some(Element::Water),
                blow_count: 2,
                flags: SkillFlags::GUARANTEED_HIT,
                range: RangeClass::Long,
                sp_cost: 78,
                cast_delay: 4500,
                ..base
            },

            s if s == HEAL => SkillInfo {
                element: Some(Element::Holy),
                flags: SkillFlags::GUARANTEED_HIT,
                range: RangeClass::Long,
                sp_cost: 10 + 3 * level,
                ..base
            },
            s if s == TURN_UNDEAD => SkillInfo {
                element: Some(Element::Holy),
                flags: SkillFlags::GUARANTEED_HIT | SkillFlags::NO_CARDFIX,
                range: RangeClass::Long,
                sp_cost: 20,
                cast_delay: 1000,
                ..base
            },

            s if s == MAMMONITE => SkillInfo {
                sp_cost: 5,
                ..base
            },
            s if s == CART_REVOLUTION => SkillInfo {
                blow_count: 2,
                sp_cost: 12,
                ..base
            },

            s if s == DOUBLE_STRAFE => SkillInfo {
                hits: 2,
                range: RangeClass::Long,
                sp_cost: 12,
                ..base
            },
            s if s == ARROW_SHOWER => SkillInfo {
                blow_count: 2,
                range: RangeClass::Long,
                sp_cost: 15,
                ..base
            },
            s if s == FALCON_ASSAULT => SkillInfo {
                flags: SkillFlags::GUARANTEED_HIT | SkillFlags::NO_CARDFIX,
                range: RangeClass::Long,
                sp_cost: 30,
                cast_delay: 3000,
                ..base
            },

            s if s == THROW_STONE => SkillInfo {
                flags: SkillFlags::GUARANTEED_HIT | SkillFlags::NO_CARDFIX,
                range: RangeClass::Long,
                sp_cost: 2,
                ..base
            },
            s if s == SONIC_BLOW => SkillInfo {
                hits: 8,
                sp_cost: 14 + 2 * level,
                ..base
            },
            s if s == GRIMTOOTH => SkillInfo {
                range: RangeClass::Long,
                sp_cost: 3,
                ..base
            },
            s if s == BACK_STAB => SkillInfo {
                flags: SkillFlags::GUARANTEED_HIT,
                sp_cost: 16,
                ..base
            },
            s if s == RAID => SkillInfo {
                sp_cost: 20,
                ..base
            },

            s if s == SHIELD_BOOMERANG => SkillInfo {
                range: RangeClass::Long,
                sp_cost: 12,
                ..base
            },
            s if s == HOLY_CROSS => SkillInfo {
                element: Some(Element::Holy),
                hits: 2,
                sp_cost: 11,
                ..base
            },

            s if s == CHAIN_COMBO => SkillInfo {
                hits: 4,
                sp_cost: 11,
                ..base
            },
            s if s == COMBO_FINISH => SkillInfo {
                sp_cost: 11,
                ..base
            },
            s if s == INVESTIGATE => SkillInfo {
                sp_cost: 10 + 4 * level,
                ..base
            },
            s if s == EXTREMITY_FIST => SkillInfo {
                flags: SkillFlags::GUARANTEED_HIT,
                sp_cost: 5,
                ..base
            },

            s if s == SELF_DESTRUCT => SkillInfo {
                flags: SkillFlags::GUARANTEED_HIT | SkillFlags::NO_CARDFIX,
                sp_cost: 0,
                ..base
            },

            _ => base,
        }
    }
}

fn clamp_hits(hits: i32) -> i8 {
    hits.clamp(1, i8::MAX as i32) as i8
}
