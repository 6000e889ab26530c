//! Deterministic combat resolution for the map server.
//!
//! `battle-core` owns the full life of one attack: target eligibility, the
//! hit roll, per-channel damage formulas, the mitigation pipeline, the
//! defensive status gates, deferred commit and the side effects that ride on
//! a landed hit. Everything is pure over [`combatant::Combatant`] snapshots
//! plus a handful of oracle traits; the surrounding server supplies entity
//! storage, timers, skill metadata and randomness.
pub mod combatant;
pub mod config;
pub mod damage;
pub mod eligibility;
pub mod env;
pub mod error;
pub mod gate;
pub mod hit;
pub mod mitigation;
pub mod registry;
pub mod schedule;
pub mod side_effects;

pub use combatant::{
    Combatant, CombatantFlags, CombatantKind, DefenseElement, Element, EntityId, MapId, ModeFlags,
    Position, Race, ResourceMeter, SizeClass, StatusEffect, StatusEffects, StatusKind, Tick,
};
pub use config::{BattleConfig, BattlefieldRates, MapFlags, RulesetMode};
pub use damage::{
    AttackChannel, AttackFlags, AttackRequest, BattleEngine, DamageResult, DamageTag,
};
pub use eligibility::{EligibilityContext, Relation, RelationMask, TargetVerdict};
pub use env::{
    BattleEvent, CombatScheduler, CombatantStore, EventSink, NullEventSink, NullSkillOracle,
    PcgRng, RangeClass, RngOracle, RollStream, SkillFlags, SkillId, SkillInfo, SkillOracle,
    SpatialOracle,
};
pub use error::BattleError;
pub use gate::{GateContext, GateOutcome};
pub use hit::{HitContext, HitResolution};
pub use mitigation::ElementTable;
pub use registry::{
    DefaultHandler, DefenseBehavior, HitRateAdjust, MagicBase, SkillContext, SkillHandler,
    SkillRegistry,
};
pub use schedule::{DamageScheduler, DamageTicket, TicketId};
pub use side_effects::{AutocastProc, CommitContext, CommitOutcome, ReflectedHit, commit};
