//! Elemental, race and size catalogs used by the damage tables.
//!
//! Indices match the reference damage tables: the elemental affinity table is
//! keyed by (defense level, attacking element, defending element), equipment
//! percentage bonuses are keyed by race/element/size.

use strum::{EnumCount, EnumIter, FromRepr};

/// Attack/defense element.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumCount, EnumIter, FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Element {
    #[default]
    Neutral = 0,
    Water = 1,
    Earth = 2,
    Fire = 3,
    Wind = 4,
    Poison = 5,
    Holy = 6,
    Dark = 7,
    Ghost = 8,
    Undead = 9,
}

/// Defensive element paired with its level (1-4).
///
/// Monsters carry a leveled element; players are always level 1 unless an
/// armor status overrides it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefenseElement {
    pub element: Element,
    pub level: u8,
}

impl DefenseElement {
    pub fn new(element: Element, level: u8) -> Self {
        Self { element, level }
    }
}

impl Default for DefenseElement {
    fn default() -> Self {
        Self::new(Element::Neutral, 1)
    }
}

/// Monster race category. Players count as `DemiHuman` for resist tables.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumCount, EnumIter, FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Race {
    Formless = 0,
    Undead = 1,
    Brute = 2,
    Plant = 3,
    Insect = 4,
    Fish = 5,
    Demon = 6,
    #[default]
    DemiHuman = 7,
    Angel = 8,
    Dragon = 9,
}

impl Race {
    /// Undead classification used by bane masteries and Turn Undead:
    /// either the undead race or an undead-element defender.
    pub fn is_undead(self, def_ele: DefenseElement) -> bool {
        self == Race::Undead || def_ele.element == Element::Undead
    }
}

/// Body size category scaling weapon damage.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumCount, EnumIter, FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SizeClass {
    Small = 0,
    #[default]
    Medium = 1,
    Large = 2,
}

bitflags::bitflags! {
    /// Monster mode bits consulted by the pipeline.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ModeFlags: u16 {
        /// Boss protocol: immune to many statuses, hit by boss-slot bonuses.
        const BOSS = 1 << 0;
        /// Takes 1 damage from everything (plant protocol).
        const PLANT = 1 << 1;
        /// Cannot be pushed back.
        const KNOCKBACK_IMMUNE = 1 << 2;
        /// Detects hidden attackers.
        const DETECTOR = 1 << 3;
    }
}
