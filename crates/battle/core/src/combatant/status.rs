//! Active status effects and the slot arena that stores them.
//!
//! Nearly every pipeline stage reads this set, and several stages *end* an
//! effect as a side effect of reading it (a barrier that exhausts its
//! capacity, a one-shot debuff that doubles the next hit). To keep that safe
//! while a scan is in flight, removal only marks the slot ended; the physical
//! cleanup happens in [`StatusEffects::sweep`] after the scan completes.

use arrayvec::ArrayVec;
use strum::{EnumCount, EnumIter};

use super::common::{EntityId, Tick};

/// Maximum concurrent status effects per combatant.
pub const MAX_STATUS_EFFECTS: usize = 32;

/// Catalog of status-effect kinds the combat core consults.
///
/// The live game defines hundreds; this enumerates the ones with combat-core
/// behavior. At most one instance of a kind is active per combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusKind {
    // ========================================================================
    // Hard crowd control (forces always-hit, may break on damage)
    // ========================================================================
    Stun,
    Sleep,
    Freeze,
    /// `charges > 0` while still petrifying; fully petrified at 0.
    Stone,

    // ========================================================================
    // Offensive buffs read by the formula engine
    // ========================================================================
    /// Weapon damage +5% per level.
    OverThrust,
    /// Weapon damage +2% per level.
    TrueSight,
    /// Weapon damage tripled.
    Berserk,
    /// Deadly poison coating: +150% +50%/level, bypasses card fixes.
    DeadlyPoisonCoat,
    /// Flat +20 damage per level, applied before skill ratios.
    AuraBlade,
    /// Weapon attack always samples its maximum.
    MaximizePower,
    /// Disables the target-size damage penalty.
    WeaponPerfection,
    /// Autocast spell granted by a buff; `power` = skill id, `charges` =
    /// level, `rate` = proc chance.
    AutoSpell,

    // ========================================================================
    // Defensive gates, scanned in the documented order by the gate layer
    // ========================================================================
    /// Melee-weapon null field; `charges` = remaining blocks.
    SafetyWall,
    /// Ranged-weapon null field.
    Pneuma,
    /// Magic null on the bearer.
    LokisVeil,
    /// Next damage doubled, then the status ends itself.
    LexAeterna,
    /// Fire-element damage amplifier field; `power` = percent.
    Volcano,
    /// Wind-element damage amplifier field.
    ViolentGale,
    /// Water-element damage amplifier field.
    Deluge,
    /// SP-funded weapon-damage reduction; ends when SP is exhausted.
    EnergyCoat,
    /// Absorption barrier; `power` = remaining capacity, `charges` = hits.
    Kyrie,
    /// Sanctuary field: all damage nulled.
    Basilica,
    /// Ground magic null field.
    LandProtector,
    /// Chance to block a weapon hit outright; `rate` = percent.
    AutoGuard,
    /// Chance to parry a weapon hit; `rate` = percent.
    Parrying,
    /// Chance to halve and reflect a melee hit; `charges` = uses left.
    RejectSword,
    /// Next fire-element hit doubled, then the web burns away.
    SpiderWeb,
    /// Ranged hit-rate and damage penalty zone; magic may fizzle.
    FogWall,
    /// Ranged weapon damage reduced by `power` percent.
    Defender,
    /// Incoming damage divided (by 3, or by 2 on PvP ground).
    Assumptio,
    /// Reflects a share of melee damage; `power` = percent.
    ReflectShield,

    // ========================================================================
    // Misc statuses consulted by hit/side-effect stages
    // ========================================================================
    /// Cannot be knocked back.
    Endure,
    /// Guided attacks ignore this target's evasion bonuses.
    Blind,
    Poison,
    Curse,
}

/// One active status effect.
///
/// The payload fields mirror the reference system's per-effect value slots:
/// `level` is the skill level the effect was applied at, `power` and
/// `charges` carry effect-specific state (absorption left, block chance,
/// remaining uses) and `rate` carries a percent chance where one applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub level: i32,
    pub power: i32,
    pub charges: i32,
    pub rate: i32,
    pub expires_at: Tick,
    pub source: EntityId,
}

impl StatusEffect {
    pub fn new(kind: StatusKind, level: i32, expires_at: Tick) -> Self {
        Self {
            kind,
            level,
            power: 0,
            charges: 0,
            rate: 0,
            expires_at,
            source: EntityId::NONE,
        }
    }

    pub fn with_power(mut self, power: i32) -> Self {
        self.power = power;
        self
    }

    pub fn with_charges(mut self, charges: i32) -> Self {
        self.charges = charges;
        self
    }

    pub fn with_rate(mut self, rate: i32) -> Self {
        self.rate = rate;
        self
    }

    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = source;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Slot {
    effect: StatusEffect,
    ended: bool,
}

/// The per-combatant status arena.
///
/// Invariant: at most one live slot per kind. Reapplication overwrites the
/// slot (the effect-specific refresh/stack rules live with whoever applies
/// the status, not here).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    slots: ArrayVec<Slot, MAX_STATUS_EFFECTS>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the live effect of `kind`, if any.
    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.slots
            .iter()
            .find(|s| !s.ended && s.effect.kind == kind)
            .map(|s| &s.effect)
    }

    /// Mutable access to the live effect of `kind`.
    ///
    /// Stages use this to decrement capacities/charges while scanning; when
    /// an effect is exhausted they call [`StatusEffects::mark_ended`] rather
    /// than removing it mid-scan.
    pub fn get_mut(&mut self, kind: StatusKind) -> Option<&mut StatusEffect> {
        self.slots
            .iter_mut()
            .find(|s| !s.ended && s.effect.kind == kind)
            .map(|s| &mut s.effect)
    }

    #[inline]
    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    /// Applies an effect, replacing any live instance of the same kind.
    ///
    /// Returns false when the arena is full and the effect was dropped.
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        if let Some(slot) = self
            .slots
            .iter_mut()
            .find(|s| s.effect.kind == effect.kind)
        {
            slot.effect = effect;
            slot.ended = false;
            return true;
        }
        if self.slots.is_full() {
            return false;
        }
        self.slots.push(Slot {
            effect,
            ended: false,
        });
        true
    }

    /// Marks the live instance of `kind` as ended without removing the slot.
    ///
    /// Returns true if a live instance was found.
    pub fn mark_ended(&mut self, kind: StatusKind) -> bool {
        match self
            .slots
            .iter_mut()
            .find(|s| !s.ended && s.effect.kind == kind)
        {
            Some(slot) => {
                slot.ended = true;
                true
            }
            None => false,
        }
    }

    /// Physically removes ended and expired slots. Call after a scan, never
    /// during one.
    pub fn sweep(&mut self, now: Tick) {
        self.slots
            .retain(|s| !s.ended && s.effect.expires_at > now);
    }

    /// Drains the kinds marked ended since the last sweep, for notification.
    pub fn ended_kinds(&self) -> impl Iterator<Item = StatusKind> + '_ {
        self.slots.iter().filter(|s| s.ended).map(|s| s.effect.kind)
    }

    /// Iterates live effects.
    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.slots.iter().filter(|s| !s.ended).map(|s| &s.effect)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.ended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(t: u64) -> Tick {
        Tick::new(t)
    }

    #[test]
    fn one_slot_per_kind() {
        let mut set = StatusEffects::empty();
        assert!(set.apply(StatusEffect::new(StatusKind::Kyrie, 5, tick(100)).with_power(400)));
        assert!(set.apply(StatusEffect::new(StatusKind::Kyrie, 10, tick(200)).with_power(900)));
        assert_eq!(set.iter().count(), 1);
        assert_eq!(set.get(StatusKind::Kyrie).unwrap().power, 900);
    }

    #[test]
    fn mark_ended_hides_but_keeps_slot_until_sweep() {
        let mut set = StatusEffects::empty();
        set.apply(StatusEffect::new(StatusKind::LexAeterna, 1, tick(100)));
        assert!(set.mark_ended(StatusKind::LexAeterna));
        assert!(!set.has(StatusKind::LexAeterna));
        assert_eq!(set.ended_kinds().count(), 1);

        set.sweep(tick(0));
        assert_eq!(set.ended_kinds().count(), 0);
    }

    #[test]
    fn sweep_drops_expired() {
        let mut set = StatusEffects::empty();
        set.apply(StatusEffect::new(StatusKind::Defender, 3, tick(50)));
        set.apply(StatusEffect::new(StatusKind::Endure, 1, tick(500)));
        set.sweep(tick(60));
        assert!(!set.has(StatusKind::Defender));
        assert!(set.has(StatusKind::Endure));
    }

    #[test]
    fn reapplying_an_ended_kind_revives_the_slot() {
        let mut set = StatusEffects::empty();
        set.apply(StatusEffect::new(StatusKind::SpiderWeb, 1, tick(100)));
        set.mark_ended(StatusKind::SpiderWeb);
        set.apply(StatusEffect::new(StatusKind::SpiderWeb, 2, tick(200)));
        assert_eq!(set.get(StatusKind::SpiderWeb).unwrap().level, 2);
        assert_eq!(set.iter().count(), 1);
    }
}
