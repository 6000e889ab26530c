//! Combatant data model: identifiers, catalogs, status effects and the
//! computed-stat snapshot every pipeline stage reads.

pub mod common;
pub mod element;
pub mod snapshot;
pub mod status;

pub use common::{EntityId, MapId, Position, ResourceMeter, Tick};
pub use element::{DefenseElement, Element, ModeFlags, Race, SizeClass};
pub use snapshot::{
    Ammo, AttackStats, AutocastSpec, BaseStats, Combatant, CombatantFlags, CombatantKind,
    ComaSpec, Drain, EquipModifiers, MagicAttack, Passives, PercentTables, TargetMask,
    WeaponHand, WeaponType,
};
pub use status::{MAX_STATUS_EFFECTS, StatusEffect, StatusEffects, StatusKind};
