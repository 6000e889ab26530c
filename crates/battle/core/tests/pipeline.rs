//! End-to-end resolutions through the engine: eligibility, hit roll, the
//! channel formula, mitigation, the status gate and deferred commit.

use std::collections::HashMap;

use battle_core::side_effects::{self, CommitContext};
use battle_core::{
    AttackChannel, AttackRequest, BattleConfig, BattleEngine, Combatant, CombatantKind,
    CombatScheduler, CombatantStore, DamageScheduler, DamageTag, DamageTicket, DefaultHandler,
    ElementTable, EntityId, MapId, NullEventSink, PcgRng, Position, ResourceMeter, RngOracle,
    RollStream, SkillContext, SkillFlags, SkillHandler, SkillId, SkillInfo, SkillOracle,
    SkillRegistry, StatusEffect, StatusKind, Tick, TicketId,
};

/// Oracle answering from a fixed catalog; unknown ids get defaults.
struct Catalog(HashMap<SkillId, SkillInfo>);

impl Catalog {
    fn empty() -> Self {
        Self(HashMap::new())
    }

    fn with(mut self, skill: SkillId, info: SkillInfo) -> Self {
        self.0.insert(skill, info);
        self
    }
}

impl SkillOracle for Catalog {
    fn info(&self, skill: SkillId, _level: i32) -> SkillInfo {
        self.0.get(&skill).copied().unwrap_or_default()
    }
}

/// Constant oracle forcing one side of every roll.
struct FixedRng(u32);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

struct World(HashMap<EntityId, Combatant>);

impl CombatantStore for World {
    fn get(&self, id: EntityId) -> Option<&Combatant> {
        self.0.get(&id)
    }
    fn get_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.0.get_mut(&id)
    }
}

struct RecordingTimer(Vec<(Tick, TicketId)>);

impl CombatScheduler for RecordingTimer {
    fn schedule(&mut self, at: Tick, ticket: TicketId) {
        self.0.push((at, ticket));
    }
}

/// A swordsman whose weapon samples a constant 120 (dex caps the minimum at
/// the weapon attack).
fn swordsman() -> Combatant {
    let mut c = Combatant::new(EntityId(1), CombatantKind::Player);
    c.hp = ResourceMeter::full(500);
    c.stats.dexterity = 120;
    if let battle_core::combatant::AttackStats::Equipped { main, .. } = &mut c.attack {
        main.atk = 120;
    }
    c.hit = 100;
    c.map = MapId(1);
    c.pos = Position::new(10, 10);
    c
}

/// A training dummy with the given percent hard defense.
fn dummy(def: i32) -> Combatant {
    let mut c = Combatant::new(EntityId(2), CombatantKind::Monster);
    c.hp = ResourceMeter::full(1000);
    c.def_ = def;
    c.map = MapId(1);
    c.pos = Position::new(11, 10);
    c
}

fn engine<'a>(
    config: &'a BattleConfig,
    elements: &'a ElementTable,
    registry: &'a SkillRegistry,
    skills: &'a dyn SkillOracle,
    rng: &'a dyn RngOracle,
) -> BattleEngine<'a> {
    BattleEngine {
        config,
        elements,
        registry,
        skills,
        rng,
        game_seed: 0xBAD5EED,
    }
}

#[test]
fn plain_attack_through_percent_defense() {
    let config = BattleConfig::default();
    let elements = ElementTable::neutral();
    let registry = SkillRegistry::new();
    let skills = Catalog::empty();
    let rng = FixedRng(0);
    let engine = engine(&config, &elements, &registry, &skills, &rng);

    let attacker = swordsman();
    let mut target = dummy(50);
    let result = engine.resolve(&attacker, &mut target, &AttackRequest::plain(1));

    // 120 weapon attack through 50 percent hard defense.
    assert_eq!(result.tag, DamageTag::Normal);
    assert_eq!(result.damage, 60);
    assert_eq!(result.damage2, 0);
    assert_eq!(result.div, 1);
}

#[test]
fn same_nonce_replays_bit_for_bit() {
    let config = BattleConfig::default();
    let elements = ElementTable::neutral();
    let registry = SkillRegistry::new();
    let skills = Catalog::empty();
    let rng = PcgRng;
    let engine = engine(&config, &elements, &registry, &skills, &rng);

    let mut attacker = swordsman();
    attacker.stats.dexterity = 90;
    attacker.critical = 200;
    let target = dummy(30);

    let req = AttackRequest::plain(77);
    let a = engine.resolve(&attacker, &mut target.clone(), &req);
    let b = engine.resolve(&attacker, &mut target.clone(), &req);
    assert_eq!(a.damage, b.damage);
    assert_eq!(a.tag, b.tag);
}

#[test]
fn handler_ratio_scales_before_defense() {
    struct Smite;
    impl SkillHandler for Smite {
        fn weapon_ratio(&self, ctx: &SkillContext<'_>) -> i32 {
            100 + 30 * ctx.level
        }
    }

    let config = BattleConfig::default();
    let elements = ElementTable::neutral();
    let mut registry = SkillRegistry::new();
    registry.register(SkillId(5), Box::new(Smite)).unwrap();
    let skills = Catalog::empty().with(
        SkillId(5),
        SkillInfo {
            flags: SkillFlags::GUARANTEED_HIT,
            ..SkillInfo::default()
        },
    );
    let rng = FixedRng(0);
    let engine = engine(&config, &elements, &registry, &skills, &rng);

    let attacker = swordsman();
    let mut target = dummy(50);
    let req = AttackRequest::skill(SkillId(5), 3, AttackChannel::Weapon, 1);
    let result = engine.resolve(&attacker, &mut target, &req);

    // 120 * 190% = 228, then the 50 percent defense halves it.
    assert_eq!(result.damage, 114);
}

#[test]
fn overflowing_barrier_blocks_and_expires() {
    let config = BattleConfig::default();
    let elements = ElementTable::neutral();
    let registry = SkillRegistry::new();
    let skills = Catalog::empty();
    let rng = FixedRng(0);
    let engine = engine(&config, &elements, &registry, &skills, &rng);

    let attacker = swordsman();
    let mut target = dummy(0);
    target.statuses.apply(
        StatusEffect::new(StatusKind::Kyrie, 10, Tick::new(10_000))
            .with_power(30)
            .with_charges(10),
    );

    let result = engine.resolve(&attacker, &mut target, &AttackRequest::plain(1));
    assert_eq!(result.tag, DamageTag::Blocked);
    assert_eq!(result.total(), 0);
    // The barrier burned with the hit and was swept out.
    assert!(!target.statuses.has(StatusKind::Kyrie));
}

#[test]
fn high_roll_misses() {
    let config = BattleConfig::default();
    let elements = ElementTable::neutral();
    let registry = SkillRegistry::new();
    let skills = Catalog::empty();
    let rng = FixedRng(99);
    let engine = engine(&config, &elements, &registry, &skills, &rng);

    let attacker = swordsman();
    let mut target = dummy(0);
    let result = engine.resolve(&attacker, &mut target, &AttackRequest::plain(1));
    assert_eq!(result.tag, DamageTag::Miss);
    assert_eq!(result.total(), 0);
    assert!(!result.connected());
}

#[test]
fn multi_hit_skill_floors_at_hit_count() {
    let config = BattleConfig {
        skill_min_damage: true,
        ..BattleConfig::default()
    };
    let elements = ElementTable::neutral();
    let registry = SkillRegistry::new();
    let skills = Catalog::empty().with(
        SkillId(9),
        SkillInfo {
            hits: 3,
            flags: SkillFlags::GUARANTEED_HIT,
            ..SkillInfo::default()
        },
    );
    let rng = FixedRng(0);
    let engine = engine(&config, &elements, &registry, &skills, &rng);

    let attacker = swordsman();
    let mut target = dummy(99);
    let req = AttackRequest::skill(SkillId(9), 1, AttackChannel::Weapon, 1);
    let result = engine.resolve(&attacker, &mut target, &req);

    // 120 through 99 percent defense leaves 1; three hits floor it to 3.
    assert_eq!(result.div, 3);
    assert_eq!(result.total(), 3);
}

#[test]
fn deferred_ticket_commits_after_the_motion() {
    let config = BattleConfig::default();
    let elements = ElementTable::neutral();
    let registry = SkillRegistry::new();
    let skills = Catalog::empty();
    let rng = FixedRng(0);
    let engine = engine(&config, &elements, &registry, &skills, &rng);

    let attacker = swordsman();
    let mut target = dummy(50);
    let result = engine.resolve(&attacker, &mut target, &AttackRequest::plain(1));
    assert_eq!(result.total(), 60);

    let mut timer = RecordingTimer(Vec::new());
    let mut sched = DamageScheduler::with_capacity(16);
    let now = Tick::new(5_000);
    let id = sched
        .schedule(
            DamageTicket {
                attacker: attacker.id,
                target: target.id,
                result,
                skill: SkillId::BASIC_ATTACK,
                level: 0,
                skill_flags: SkillFlags::empty(),
                map: target.map,
                origin: target.pos,
            },
            result.amotion,
            now,
            &config,
            &mut timer,
        )
        .unwrap();
    assert_eq!(timer.0, vec![(now + attacker.amotion as u64, id)]);

    let mut world = World(
        [(attacker.id, attacker), (target.id, target)]
            .into_iter()
            .collect(),
    );
    let ticket = sched.fire(id, &world, &config).expect("target still live");

    let rolls = RollStream::new(&rng, 0xBAD5EED, 1, ticket.attacker);
    let ctx = CommitContext {
        handler: &DefaultHandler,
        skills: &skills,
        skill: ticket.skill,
        level: ticket.level,
        rolls: &rolls,
        now: now + 500,
    };
    let mut attacker = world.0.remove(&ticket.attacker).expect("attacker exists");
    let target = world.0.get_mut(&ticket.target).expect("target exists");
    let outcome =
        side_effects::commit(&mut attacker, target, &ticket.result, &ctx, &mut NullEventSink);
    assert_eq!(outcome.dealt, 60);
    assert_eq!(target.hp.current, 940);
}

#[test]
fn endure_keeps_the_target_planted() {
    let config = BattleConfig::default();
    let elements = ElementTable::neutral();
    let registry = SkillRegistry::new();
    let skills = Catalog::empty().with(
        SkillId(11),
        SkillInfo {
            blow_count: 2,
            flags: SkillFlags::GUARANTEED_HIT,
            ..SkillInfo::default()
        },
    );
    let rng = FixedRng(0);
    let engine = engine(&config, &elements, &registry, &skills, &rng);

    let attacker = swordsman();
    let mut target = dummy(0);
    target
        .statuses
        .apply(StatusEffect::new(StatusKind::Endure, 1, Tick::new(10_000)));

    let req = AttackRequest::skill(SkillId(11), 1, AttackChannel::Weapon, 1);
    let result = engine.resolve(&attacker, &mut target, &req);
    assert_eq!(result.tag, DamageTag::Endure);
    assert_eq!(result.blow, 2);

    let rolls = RollStream::new(&rng, 0, 1, EntityId(1));
    let ctx = CommitContext {
        handler: &DefaultHandler,
        skills: &skills,
        skill: SkillId(11),
        level: 1,
        rolls: &rolls,
        now: Tick::new(100),
    };
    let mut attacker = attacker;
    let outcome =
        side_effects::commit(&mut attacker, &mut target, &result, &ctx, &mut NullEventSink);
    assert!(outcome.dealt > 0);
    assert_eq!(outcome.knockback, 0);
}
