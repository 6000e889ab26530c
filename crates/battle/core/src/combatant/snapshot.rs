//! The combatant view consumed by every pipeline stage.
//!
//! A [`Combatant`] is the computed-stat snapshot of a player, monster,
//! companion or skill-unit at the instant of an attack. The combat core never
//! owns one; it receives references from the entity layer and must tolerate
//! the underlying entity disappearing between damage computation and commit
//! (see the deferred-damage scheduler).

use arrayvec::ArrayVec;
use strum::EnumCount;

use super::common::{EntityId, MapId, Position, ResourceMeter};
use super::element::{DefenseElement, Element, ModeFlags, Race, SizeClass};
use super::status::StatusEffects;

/// Entity category, used by eligibility rules and formula-table selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatantKind {
    #[default]
    Player,
    Monster,
    /// Pet/homunculus style companion: may only engage monsters.
    Companion,
    /// Ground skill unit acting as a pseudo-combatant (traps, pillars).
    SkillUnit,
}

/// Weapon class carried in one hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponType {
    #[default]
    Fist,
    Dagger,
    OneHandSword,
    TwoHandSword,
    OneHandSpear,
    TwoHandSpear,
    OneHandAxe,
    TwoHandAxe,
    Mace,
    Rod,
    Bow,
    Knuckle,
    Instrument,
    Whip,
    Book,
    Katar,
}

impl WeaponType {
    /// Weapons that fire ammunition use the long-range attack path.
    #[inline]
    pub fn uses_ammo(self) -> bool {
        matches!(self, WeaponType::Bow)
    }

    #[inline]
    pub fn is_spear(self) -> bool {
        matches!(self, WeaponType::OneHandSpear | WeaponType::TwoHandSpear)
    }
}

/// Per-hand weapon data for equipment-based attackers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponHand {
    pub weapon: WeaponType,
    /// Equipment weapon attack.
    pub atk: i32,
    /// Refinement attack, added after the per-hand damage floor.
    pub refine_atk: i32,
    /// Refine levels past the safe limit; each grants +1..=n random damage.
    pub over_refine: i32,
    /// Flat mastery damage from weapon-class training passives.
    pub mastery: i32,
    /// Forged star-crumb damage, added after the elemental fix.
    pub star: i32,
    pub element: Element,
    /// Damage percentage against each target size, 100 = unmodified.
    pub size_mods: [i32; SizeClass::COUNT],
}

impl Default for WeaponHand {
    fn default() -> Self {
        Self {
            weapon: WeaponType::Fist,
            atk: 0,
            refine_atk: 0,
            over_refine: 0,
            mastery: 0,
            star: 0,
            element: Element::Neutral,
            size_mods: [100; SizeClass::COUNT],
        }
    }
}

/// Where a combatant's weapon attack numbers come from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttackStats {
    /// Player-style: per-hand equipment data. `off` present when
    /// dual-wielding or holding a katar.
    Equipped {
        main: WeaponHand,
        off: Option<WeaponHand>,
    },
    /// Monster-style: a flat attack range, no equipment decomposition.
    Monster { atk_min: i32, atk_max: i32 },
}

impl Default for AttackStats {
    fn default() -> Self {
        AttackStats::Equipped {
            main: WeaponHand::default(),
            off: None,
        }
    }
}

impl AttackStats {
    pub fn main_hand(&self) -> Option<&WeaponHand> {
        match self {
            AttackStats::Equipped { main, .. } => Some(main),
            AttackStats::Monster { .. } => None,
        }
    }

    pub fn off_hand(&self) -> Option<&WeaponHand> {
        match self {
            AttackStats::Equipped { off, .. } => off.as_ref(),
            AttackStats::Monster { .. } => None,
        }
    }

    /// True when two damage-dealing hands must be evaluated.
    pub fn is_dual_wield(&self) -> bool {
        matches!(
            self,
            AttackStats::Equipped { off: Some(_), .. }
        )
    }
}

/// Equipped ammunition (arrows etc.).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ammo {
    /// Extra damage rolled uniformly in `0..=atk`.
    pub atk: i32,
    pub hit: i32,
    pub crit: i32,
    /// Overrides the attack element when set.
    pub element: Option<Element>,
}

/// Targets matched by an ignore-defense or defense-ratio property.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetMask {
    /// Bit per [`Element`] repr.
    pub elements: u16,
    /// Bit per [`Race`] repr.
    pub races: u16,
    pub boss: bool,
    pub non_boss: bool,
}

impl TargetMask {
    pub fn matches(&self, race: Race, def_ele: Element, boss: bool) -> bool {
        if self.elements & (1 << def_ele as u16) != 0 {
            return true;
        }
        if self.races & (1 << race as u16) != 0 {
            return true;
        }
        if boss { self.boss } else { self.non_boss }
    }
}

/// One percentage-bonus table of the card-fix chain.
///
/// All entries are signed percents; 0 means no card. The chain applies each
/// category as its own multiplicative step, in the documented order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PercentTables {
    pub race: [i32; Race::COUNT],
    pub element: [i32; Element::COUNT],
    pub size: [i32; SizeClass::COUNT],
    pub boss: i32,
    pub non_boss: i32,
    /// Named per-monster-class overrides.
    pub class: ArrayVec<(u16, i32), 4>,
}

impl Default for PercentTables {
    fn default() -> Self {
        Self {
            race: [0; Race::COUNT],
            element: [0; Element::COUNT],
            size: [0; SizeClass::COUNT],
            boss: 0,
            non_boss: 0,
            class: ArrayVec::new(),
        }
    }
}

impl PercentTables {
    pub fn class_bonus(&self, class_id: u16) -> i32 {
        self.class
            .iter()
            .find(|(id, _)| *id == class_id)
            .map(|(_, pct)| *pct)
            .unwrap_or(0)
    }
}

/// Drain-on-hit property: `rate` percent chance to leech `percent` of the
/// damage dealt. Negative percents hurt the attacker instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drain {
    pub rate: i32,
    pub percent: i32,
}

/// Equipment-granted autocast: `rate` percent chance per landed hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AutocastSpec {
    pub skill: u16,
    pub level: i32,
    pub rate: i32,
}

/// Chance (per ten-thousand) of an instant-kill proc against a race.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComaSpec {
    pub race: Race,
    pub rate: i32,
}

/// Aggregated equipment percentage modifiers ("cards").
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipModifiers {
    /// Overall attack rate, 100 = unmodified.
    pub atk_rate: i32,
    /// Main-hand offensive card tables.
    pub offense: PercentTables,
    /// Off-hand offensive card tables.
    pub offense_off: PercentTables,
    /// Ammunition card tables, merged into the main chain for ammo weapons.
    pub ammo_offense: PercentTables,
    pub magic_offense: PercentTables,
    /// Incoming-damage resist tables (positive percent reduces).
    pub resist: PercentTables,
    pub magic_resist: PercentTables,
    /// Flat percent resists by range category.
    pub long_resist: i32,
    pub short_resist: i32,
    pub magic_def_rate: i32,
    pub misc_def_rate: i32,

    pub ignore_def: TargetMask,
    pub ignore_def_off: TargetMask,
    /// Attack scales *with* target defense instead of being reduced by it.
    pub def_ratio: TargetMask,
    pub def_ratio_off: TargetMask,
    pub ignore_mdef: TargetMask,

    /// Reduces incoming critical rate, percent.
    pub crit_shield: i32,
    /// Percent chance to bypass the hit roll entirely.
    pub perfect_hit: i32,

    pub hp_drain: Drain,
    pub hp_drain_off: Drain,
    pub sp_drain: Drain,
    pub sp_drain_off: Drain,

    /// Percent of melee weapon damage returned to the attacker.
    pub reflect_short: i32,
    /// Percent of ranged weapon damage returned to the attacker.
    pub reflect_long: i32,
    /// Percent of magic damage returned to the caster.
    pub reflect_magic: i32,

    pub autocast: Option<AutocastSpec>,
    pub coma: ArrayVec<ComaSpec, 2>,

    /// Disables the target-size damage penalty.
    pub no_size_fix: bool,
    /// Nullifies incoming weapon damage.
    pub no_weapon_damage: bool,
    /// Nullifies incoming magic damage.
    pub no_magic_damage: bool,
    pub no_knockback: bool,
}

impl EquipModifiers {
    pub fn neutral() -> Self {
        Self {
            atk_rate: 100,
            ..Self::default()
        }
    }
}

/// Class passives consulted by the weapon formula.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Passives {
    /// Percent chance per level (x5) to strike twice with a dagger.
    pub double_attack: i32,
    /// +2 flat damage per level.
    pub weapon_research: i32,
    /// Katar damage +10% +2%/level.
    pub katar_research: i32,
    /// Main-hand dual-wield recovery, 50% +10%/level.
    pub right_hand_mastery: i32,
    /// Off-hand dual-wield recovery, 30% +10%/level.
    pub left_hand_mastery: i32,
    /// Bonus flat damage vs demons/undead, scales with base level.
    pub demon_bane: i32,
    /// Bonus flat damage vs brutes/insects.
    pub beast_bane: i32,
}

bitflags::bitflags! {
    /// Transient combatant state consulted by eligibility and the scheduler.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CombatantFlags: u16 {
        /// Hidden/cloaked: cannot be targeted.
        const INVISIBLE = 1 << 0;
        /// Spawn-protection window: cannot be targeted.
        const INVINCIBLE = 1 << 1;
        /// May attack anyone regardless of alliances.
        const KILLER = 1 << 2;
        /// May be attacked by anyone regardless of alliances.
        const KILLABLE = 1 << 3;
        /// Riding a mount (spear size-penalty exemption).
        const RIDING = 1 << 4;
        const DEAD = 1 << 5;
    }
}

/// Base character stats read by the formulas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub strength: i32,
    pub agility: i32,
    pub vitality: i32,
    pub intellect: i32,
    pub dexterity: i32,
    pub luck: i32,
}

/// Magic attack range; `max` >= `min`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MagicAttack {
    pub min: i32,
    pub max: i32,
}

/// Read-only computed-stat snapshot of one combat-capable entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub kind: CombatantKind,
    pub map: MapId,
    pub pos: Position,
    pub class_id: u16,
    pub base_level: i32,

    pub hp: ResourceMeter,
    pub sp: ResourceMeter,
    pub stats: BaseStats,

    /// Status/stat attack added before the weapon sample.
    pub base_atk: i32,
    pub attack: AttackStats,
    pub ammo: Option<Ammo>,
    pub matk: MagicAttack,

    pub hit: i32,
    pub flee: i32,
    /// Per-mille perfect-dodge chance.
    pub perfect_dodge: i32,
    /// Per-mille critical chance before target reductions.
    pub critical: i32,

    /// Hard defense (percent model in the legacy ruleset).
    pub def_: i32,
    /// Soft defense from vitality.
    pub def2: i32,
    pub mdef: i32,
    pub mdef2: i32,

    pub attack_element: Element,
    pub attack_element_off: Element,
    pub defense_element: DefenseElement,
    pub race: Race,
    pub size: SizeClass,
    pub mode: ModeFlags,

    pub party_id: u32,
    pub guild_id: u32,
    /// Allied guild ids (guild-war alliance table).
    pub allied_guilds: ArrayVec<u32, 4>,
    /// Guilds this combatant's guild declared hostility against.
    pub hostile_guilds: ArrayVec<u32, 4>,
    /// Owner of a summon/companion/skill-unit.
    pub master: Option<EntityId>,

    pub statuses: StatusEffects,
    pub gear: EquipModifiers,
    pub passives: Passives,
    /// Monk-style spheres: +3 flat damage each.
    pub spirit_balls: i32,

    /// Attack-motion delay in ticks; damage commits after it.
    pub amotion: u32,
    /// Flinch-motion delay reported with damage events.
    pub dmotion: u32,
    pub flags: CombatantFlags,
}

impl Combatant {
    /// A neutral snapshot with everything zeroed and rates at 100.
    pub fn new(id: EntityId, kind: CombatantKind) -> Self {
        Self {
            id,
            kind,
            map: MapId::default(),
            pos: Position::default(),
            class_id: 0,
            base_level: 1,
            hp: ResourceMeter::full(1),
            sp: ResourceMeter::full(0),
            stats: BaseStats::default(),
            base_atk: 0,
            attack: AttackStats::default(),
            ammo: None,
            matk: MagicAttack::default(),
            hit: 0,
            flee: 0,
            perfect_dodge: 0,
            critical: 0,
            def_: 0,
            def2: 0,
            mdef: 0,
            mdef2: 0,
            attack_element: Element::Neutral,
            attack_element_off: Element::Neutral,
            defense_element: DefenseElement::default(),
            race: Race::default(),
            size: SizeClass::default(),
            mode: ModeFlags::empty(),
            party_id: 0,
            guild_id: 0,
            allied_guilds: ArrayVec::new(),
            hostile_guilds: ArrayVec::new(),
            master: None,
            statuses: StatusEffects::empty(),
            gear: EquipModifiers::neutral(),
            passives: Passives::default(),
            spirit_balls: 0,
            amotion: 500,
            dmotion: 300,
            flags: CombatantFlags::empty(),
        }
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.mode.contains(ModeFlags::BOSS)
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.flags.contains(CombatantFlags::DEAD) || self.hp.is_depleted()
    }

    /// True when the combatant is allied with `guild_id` (own or alliance).
    pub fn is_guild_allied(&self, guild_id: u32) -> bool {
        guild_id != 0
            && (self.guild_id == guild_id || self.allied_guilds.contains(&guild_id))
    }

    pub fn is_guild_hostile(&self, guild_id: u32) -> bool {
        guild_id != 0 && self.hostile_guilds.contains(&guild_id)
    }
}
