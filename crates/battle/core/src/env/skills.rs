//! Skill metadata oracle.
//!
//! The per-skill static catalog (ranges, cast times, flag tables) lives
//! outside the combat core; the core only asks for the handful of constants
//! the pipeline consumes.

use crate::combatant::Element;

/// Skill identifier; 0 is the plain attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillId(pub u16);

impl SkillId {
    pub const BASIC_ATTACK: Self = Self(0);

    #[inline]
    pub fn is_basic_attack(self) -> bool {
        self.0 == 0
    }
}

/// Range category of an attack, selecting resist tables and rate scaling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangeClass {
    #[default]
    Short,
    Long,
}

bitflags::bitflags! {
    /// Boolean flag table entries consumed by the pipeline.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SkillFlags: u16 {
        /// Skip the hit roll entirely.
        const GUARANTEED_HIT = 1 << 0;
        /// Skip the defense-reduction stage.
        const IGNORE_DEF = 1 << 1;
        /// Total damage is divided among the targets hit by the splash.
        const SPLIT_AMONG_TARGETS = 1 << 2;
        /// Ground trap unit; only damageable by the trap-removal set.
        const TRAP = 1 << 3;
        /// Equipment percentage bonuses do not apply.
        const NO_CARDFIX = 1 << 4;
        /// Additional-effect hooks are suppressed for this skill.
        const NO_ADDITIONAL_EFFECT = 1 << 5;
        /// A stale deferred ticket redirects to the caster instead of
        /// being dropped.
        const SELF_REDIRECT = 1 << 6;
        /// Damage pierces magic-nullify gear.
        const PIERCE_MAGIC_BARRIER = 1 << 7;
    }
}

/// Constants for one (skill, level) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillInfo {
    /// Forced attack element; `None` inherits the weapon/caster element.
    pub element: Option<Element>,
    /// Hit multiplicity. Negative is the sentinel meaning "the computed
    /// total is per-hit already; expand by |hits| afterwards".
    pub hits: i8,
    /// Knockback cells on hit.
    pub blow_count: u8,
    pub range: RangeClass,
    pub flags: SkillFlags,
    /// SP price, consumed by autocast procs at a 2/3 rate.
    pub sp_cost: i32,
    /// Aftercast lockout in ticks.
    pub cast_delay: u32,
}

impl Default for SkillInfo {
    fn default() -> Self {
        Self {
            element: None,
            hits: 1,
            blow_count: 0,
            range: RangeClass::Short,
            flags: SkillFlags::empty(),
            sp_cost: 0,
            cast_delay: 0,
        }
    }
}

/// Catalog access consumed by the engine.
pub trait SkillOracle: Send + Sync {
    fn info(&self, skill: SkillId, level: i32) -> SkillInfo;
}

/// Oracle returning defaults for every skill; tests and plain attacks.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSkillOracle;

impl SkillOracle for NullSkillOracle {
    fn info(&self, _skill: SkillId, _level: i32) -> SkillInfo {
        SkillInfo::default()
    }
}
