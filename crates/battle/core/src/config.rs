//! Battle configuration: the flat table of named tunables loaded once at
//! process start and injected by reference into every pipeline stage.

/// Ruleset mode selecting between the two formula decompositions of the
/// reference game. This is a deployment-level choice, not a per-call branch:
/// stages read it once per resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RulesetMode {
    /// Legacy percentage-defense model and single-step elemental rounding.
    #[default]
    PreRenewal,
    /// Rational defense curve, decrease-only elemental fix, base-1000
    /// card-fix precision.
    Renewal,
}

/// Battlefield damage rates for one encounter type, percent per channel and
/// range category. 100 = unmodified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattlefieldRates {
    pub weapon_short: i32,
    pub weapon_long: i32,
    pub magic: i32,
    pub misc: i32,
}

impl Default for BattlefieldRates {
    fn default() -> Self {
        Self {
            weapon_short: 100,
            weapon_long: 100,
            magic: 100,
            misc: 100,
        }
    }
}

/// Defense-interpretation override: 0 keeps the percentage model, a positive
/// value switches to `damage - def * n` subtraction.
pub type DefenseType = i32;

/// Flat tunables table. Field names follow the deployment config file keys.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    pub mode: RulesetMode,

    // ===== hit resolution =====
    /// Final hit-rate clamp band, percent.
    pub min_hitrate: i32,
    pub max_hitrate: i32,
    /// Monsters roll perfect dodge too when enabled.
    pub enemy_perfect_flee: bool,

    // ===== evasion/defense crowd penalties =====
    /// 0 disables; 1 = percent reduction per extra attacker; 2 = flat.
    pub agi_penalty_type: i32,
    /// Attackers beyond this count trigger the penalty.
    pub agi_penalty_count: i32,
    pub agi_penalty_num: i32,
    pub vit_penalty_type: i32,
    pub vit_penalty_count: i32,
    pub vit_penalty_num: i32,

    // ===== defense interpretation =====
    pub player_defense_type: DefenseType,
    pub monster_defense_type: DefenseType,
    pub magic_defense_type: DefenseType,

    // ===== card fix =====
    /// Fold off-hand card bonuses into the main-hand chain.
    pub left_cardfix_to_right: bool,

    // ===== damage floors =====
    /// Multi-hit skills never total below their hit count.
    pub skill_min_damage: bool,

    // ===== battlefield-wide scaling =====
    pub gvg_rates: BattlefieldRates,
    pub battleground_rates: BattlefieldRates,
    pub pvp_rates: BattlefieldRates,

    // ===== magic-barrier tuning =====
    /// When nonzero, magic-nullify gear only reduces damage by this percent
    /// on PvP/GvG ground instead of nullifying everywhere.
    pub magic_barrier_pvp_only: i32,

    // ===== misc toggles =====
    /// Open-world hostility between players, everywhere.
    pub pk_mode: bool,
    /// PK-server rule: players below this level cannot be forced hostile.
    pub pk_min_level: i32,
    /// Percent scale on the animation delay before damage commits.
    pub damage_delay_rate: i32,
    /// Grant the elemental fix twice to cross-channel hybrid skills.
    pub hybrid_double_element: bool,
    /// Escape distance beyond which a deferred ticket is considered stale.
    pub delay_escape_distance: i32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            mode: RulesetMode::PreRenewal,
            min_hitrate: 5,
            max_hitrate: 95,
            enemy_perfect_flee: false,
            agi_penalty_type: 0,
            agi_penalty_count: 3,
            agi_penalty_num: 0,
            vit_penalty_type: 0,
            vit_penalty_count: 3,
            vit_penalty_num: 0,
            player_defense_type: 0,
            monster_defense_type: 0,
            magic_defense_type: 0,
            left_cardfix_to_right: false,
            skill_min_damage: false,
            gvg_rates: BattlefieldRates {
                weapon_short: 80,
                weapon_long: 80,
                magic: 60,
                misc: 80,
            },
            battleground_rates: BattlefieldRates::default(),
            pvp_rates: BattlefieldRates::default(),
            magic_barrier_pvp_only: 0,
            pk_mode: false,
            pk_min_level: 55,
            damage_delay_rate: 100,
            hybrid_double_element: false,
            delay_escape_distance: 10,
        }
    }
}

/// Per-map flags the caller resolves before entering the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapFlags {
    pub pvp: bool,
    /// Open PvP ignores party grouping.
    pub pvp_no_party: bool,
    pub pvp_no_guild: bool,
    pub gvg: bool,
    pub gvg_no_party: bool,
    pub battleground: bool,
}

impl MapFlags {
    /// Battlefield rate table applying to this map, if any.
    pub fn rates<'a>(&self, config: &'a BattleConfig) -> Option<&'a BattlefieldRates> {
        if self.gvg {
            Some(&config.gvg_rates)
        } else if self.battleground {
            Some(&config.battleground_rates)
        } else if self.pvp {
            Some(&config.pvp_rates)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gvg_takes_priority_over_pvp() {
        let config = BattleConfig::default();
        let flags = MapFlags {
            pvp: true,
            gvg: true,
            ..MapFlags::default()
        };
        let rates = flags.rates(&config).unwrap();
        assert_eq!(rates.magic, config.gvg_rates.magic);
    }

    #[test]
    fn plain_map_has_no_rates() {
        let config = BattleConfig::default();
        assert!(MapFlags::default().rates(&config).is_none());
    }
}
