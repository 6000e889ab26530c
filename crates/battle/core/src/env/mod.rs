//! External interfaces: deterministic RNG, skill metadata, spatial queries,
//! the timer wheel and the presentation sink.

pub mod rng;
pub mod skills;
pub mod world;

pub use rng::{PcgRng, RngOracle, RollStream, compute_seed};
pub use skills::{NullSkillOracle, RangeClass, SkillFlags, SkillId, SkillInfo, SkillOracle};
pub use world::{
    BattleEvent, CombatScheduler, CombatantStore, EventSink, NullEventSink, SpatialOracle,
};
