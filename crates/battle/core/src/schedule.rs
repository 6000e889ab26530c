//! Deferred damage.
//!
//! Damage is computed immediately but commits after the attack motion; an
//! arbitrary amount of game time passes in between, so every ticket is
//! re-validated when it fires. Stale tickets (dead, departed or escaped
//! targets) are dropped silently; one documented class of skills redirects
//! a stale ticket to the caster instead.

use tracing::debug;

use crate::combatant::{EntityId, MapId, Position, Tick};
use crate::config::BattleConfig;
use crate::damage::DamageResult;
use crate::env::{CombatScheduler, CombatantStore, SkillFlags, SkillId};
use crate::error::BattleError;

/// Opaque handle to a pending ticket, passed through the timer wheel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TicketId(pub u32);

/// Everything needed to commit one resolved attack later.
#[derive(Clone, Debug)]
pub struct DamageTicket {
    pub attacker: EntityId,
    pub target: EntityId,
    pub result: DamageResult,
    pub skill: SkillId,
    pub level: i32,
    pub skill_flags: SkillFlags,
    /// Target map and position at computation time, for the escape check.
    pub map: MapId,
    pub origin: Position,
}

/// Slot arena for in-flight tickets. Slots are reused through a free list;
/// the id a caller holds is only valid until the ticket fires.
pub struct DamageScheduler {
    slots: Vec<Option<DamageTicket>>,
    free: Vec<u32>,
    capacity: usize,
}

impl DamageScheduler {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            capacity,
        }
    }

    /// Stores the ticket and books the timer callback. `delay` is the
    /// attack-motion delay in ticks, scaled by the deployment rate.
    pub fn schedule(
        &mut self,
        ticket: DamageTicket,
        delay: u32,
        now: Tick,
        config: &BattleConfig,
        timer: &mut dyn CombatScheduler,
    ) -> Result<TicketId, BattleError> {
        let id = self.insert(ticket)?;
        let scaled = delay as u64 * config.damage_delay_rate.max(0) as u64 / 100;
        timer.schedule(now + scaled, id);
        Ok(id)
    }

    fn insert(&mut self, ticket: DamageTicket) -> Result<TicketId, BattleError> {
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(ticket);
            return Ok(TicketId(index));
        }
        if self.slots.len() >= self.capacity {
            return Err(BattleError::TicketArenaFull);
        }
        self.slots.push(Some(ticket));
        Ok(TicketId(self.slots.len() as u32 - 1))
    }

    /// Takes the ticket for `id` and re-validates it against the live
    /// world. Returns the ticket to commit, or `None` for stale tickets.
    ///
    /// Stale means: the target no longer exists, is dead, changed maps, or
    /// walked beyond the configured escape distance. A stale ticket whose
    /// skill carries the self-redirect flag comes back aimed at the
    /// attacker instead, provided the attacker itself is still standing.
    pub fn fire(
        &mut self,
        id: TicketId,
        world: &dyn CombatantStore,
        config: &BattleConfig,
    ) -> Option<DamageTicket> {
        let slot = self.slots.get_mut(id.0 as usize)?;
        let ticket = slot.take()?;
        self.free.push(id.0);

        if self.target_is_live(&ticket, config, world) {
            return Some(ticket);
        }

        if ticket.skill_flags.contains(SkillFlags::SELF_REDIRECT) {
            if let Some(attacker) = world.get(ticket.attacker) {
                if !attacker.is_dead() {
                    let mut redirected = ticket;
                    redirected.target = redirected.attacker;
                    return Some(redirected);
                }
            }
        }

        debug!(
            attacker = %ticket.attacker,
            target = %ticket.target,
            "deferred damage ticket went stale, dropped"
        );
        None
    }

    fn target_is_live(
        &self,
        ticket: &DamageTicket,
        config: &BattleConfig,
        world: &dyn CombatantStore,
    ) -> bool {
        let Some(target) = world.get(ticket.target) else {
            return false;
        };
        !target.is_dead()
            && target.map == ticket.map
            && target.pos.distance(ticket.origin) <= config.delay_escape_distance
    }

    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
