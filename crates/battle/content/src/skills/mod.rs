//! Per-skill formula handlers, grouped by job tree.
//!
//! Each handler overrides only the pipeline hooks where its skill deviates
//! from the channel defaults; the catalog in [`crate::catalog`] carries the
//! static constants (element, hit count, flags, costs).

pub mod archer;
pub mod crusader;
pub mod mage;
pub mod merchant;
pub mod monk;
pub mod monster;
pub mod priest;
pub mod swordsman;
pub mod thief;

use battle_core::{BattleError, SkillRegistry};

use crate::catalog::ids;

/// Registers every built-in handler. Fails only on a duplicate id, which is
/// a wiring bug in this file.
pub fn register_all(registry: &mut SkillRegistry) -> Result<(), BattleError> {
    registry.register(ids::BASH, Box::new(swordsman::Bash))?;
    registry.register(ids::MAGNUM_BREAK, Box::new(swordsman::MagnumBreak))?;
    registry.register(ids::PIERCE, Box::new(swordsman::Pierce))?;
    registry.register(ids::SPEAR_BOOMERANG, Box::new(swordsman::SpearBoomerang))?;

    registry.register(ids::MAMMONITE, Box::new(merchant::Mammonite))?;
    registry.register(ids::CART_REVOLUTION, Box::new(merchant::CartRevolution))?;

    registry.register(ids::DOUBLE_STRAFE, Box::new(archer::DoubleStrafe))?;
    registry.register(ids::ARROW_SHOWER, Box::new(archer::ArrowShower))?;
    registry.register(ids::FALCON_ASSAULT, Box::new(archer::FalconAssault))?;

    registry.register(ids::THROW_STONE, Box::new(thief::ThrowStone))?;
    registry.register(ids::SONIC_BLOW, Box::new(thief::SonicBlow))?;
    registry.register(ids::GRIMTOOTH, Box::new(thief::Grimtooth))?;
    registry.register(ids::BACK_STAB, Box::new(thief::BackStab))?;
    registry.register(ids::RAID, Box::new(thief::Raid))?;

    registry.register(ids::HOLY_CROSS, Box::new(crusader::HolyCross))?;
    registry.register(ids::SHIELD_BOOMERANG, Box::new(crusader::ShieldBoomerang))?;

    registry.register(ids::CHAIN_COMBO, Box::new(monk::ChainCombo))?;
    registry.register(ids::COMBO_FINISH, Box::new(monk::ComboFinish))?;
    registry.register(ids::INVESTIGATE, Box::new(monk::Investigate))?;
    registry.register(ids::EXTREMITY_FIST, Box::new(monk::ExtremityFist))?;

    registry.register(ids::NAPALM_BEAT, Box::new(mage::NapalmBeat))?;
    registry.register(ids::SOUL_STRIKE, Box::new(mage::SoulStrike))?;
    registry.register(ids::FROST_DIVER, Box::new(mage::FrostDiver))?;
    registry.register(ids::FIREBALL, Box::new(mage::Fireball))?;
    registry.register(ids::THUNDERSTORM, Box::new(mage::Thunderstorm))?;
    registry.register(ids::FIRE_PILLAR, Box::new(mage::FirePillar))?;
    registry.register(ids::JUPITEL_THUNDER, Box::new(mage::JupitelThunder))?;
    registry.register(ids::LORD_OF_VERMILION, Box::new(mage::LordOfVermilion))?;
    registry.register(ids::STORM_GUST, Box::new(mage::StormGust))?;

    registry.register(ids::HEAL, Box::new(priest::OffensiveHeal))?;
    registry.register(ids::TURN_UNDEAD, Box::new(priest::TurnUndead))?;

    registry.register(ids::SELF_DESTRUCT, Box::new(monster::SelfDestruct))?;

    Ok(())
}
