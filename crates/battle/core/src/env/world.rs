//! Oracles binding the combat core to its neighboring subsystems: the live
//! entity list, the spatial index, the timer wheel and the presentation
//! layer. All are consumed as black boxes.

use crate::combatant::{Combatant, EntityId, MapId, Position, StatusKind, Tick};
use crate::env::skills::SkillId;

/// Access to live combatants by id.
///
/// Lookups may fail at any time: entities die, teleport or log out between
/// damage computation and commit, and the core must treat a missing entry as
/// "target escaped", never as a bug.
pub trait CombatantStore {
    fn get(&self, id: EntityId) -> Option<&Combatant>;
    fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant>;
}

/// Spatial queries for splash/area resolution.
///
/// Implementations return a snapshot: entities entering the radius while the
/// visitor runs are not reported. The visitor may be invoked zero times.
pub trait SpatialOracle {
    fn for_each_in_range(
        &self,
        map: MapId,
        origin: Position,
        radius: i32,
        visitor: &mut dyn FnMut(EntityId),
    ) -> usize;
}

/// Timer wheel used by the deferred-damage scheduler.
///
/// The core hands over an opaque ticket id; the surrounding server calls
/// [`crate::schedule::DamageScheduler::fire`] with it when the tick arrives.
pub trait CombatScheduler {
    fn schedule(&mut self, at: Tick, ticket: crate::schedule::TicketId);
}

/// Fire-and-forget notifications for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    DamageDealt {
        attacker: EntityId,
        target: EntityId,
        damage: i64,
        hits: i32,
    },
    SkillEffect {
        caster: EntityId,
        target: EntityId,
        skill: SkillId,
        level: i32,
    },
    StatusStarted {
        entity: EntityId,
        kind: StatusKind,
    },
    StatusEnded {
        entity: EntityId,
        kind: StatusKind,
    },
    Knockback {
        entity: EntityId,
        cells: u8,
    },
}

/// Best-effort sink; the core never reads anything back from it.
pub trait EventSink {
    fn emit(&mut self, event: BattleEvent);
}

/// Sink that discards everything; useful in tests and offline tools.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn emit(&mut self, _event: BattleEvent) {}
}
