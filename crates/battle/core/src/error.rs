//! Library errors.
//!
//! Combat-rule outcomes (miss, ineligible target, blocked damage) are values,
//! not errors: every pipeline entry point returns a result object and handles
//! degenerate inputs locally, because combat resolution must never unwind
//! into the surrounding server loop. `BattleError` is reserved for caller
//! bugs and resource exhaustion.

use crate::combatant::EntityId;
use crate::env::SkillId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    /// A combatant reference was required but the entity no longer exists.
    #[error("combatant {0} not found")]
    CombatantNotFound(EntityId),

    /// The deferred-damage arena is out of slots.
    #[error("deferred-damage ticket arena exhausted")]
    TicketArenaFull,

    /// A second handler was registered for the same skill id.
    #[error("skill {0:?} already has a formula handler")]
    DuplicateHandler(SkillId),
}
