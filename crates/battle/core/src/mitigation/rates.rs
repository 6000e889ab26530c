//! Final floors and battlefield-wide rate scaling.

use crate::config::{BattleConfig, BattlefieldRates, MapFlags};
use crate::damage::AttackChannel;
use crate::env::RangeClass;

use super::floor_div;

/// Sentinel hit count meaning "triple attack": floors at 3, not 255.
const TRIPLE_SENTINEL: i32 = 255;

/// Multi-hit floor: with `skill_min_damage` enabled, a connecting multi-hit
/// attack never totals below its hit count.
pub fn hit_count_floor(damage: i64, div: i32, enabled: bool) -> i64 {
    if !enabled || damage <= 0 {
        return damage;
    }
    let floor = if div == TRIPLE_SENTINEL { 3 } else { div.max(1) } as i64;
    damage.max(floor)
}

fn rate_for(rates: &BattlefieldRates, channel: AttackChannel, range: RangeClass) -> i32 {
    match channel {
        AttackChannel::Weapon => match range {
            RangeClass::Short => rates.weapon_short,
            RangeClass::Long => rates.weapon_long,
        },
        AttackChannel::Magic => rates.magic,
        AttackChannel::Misc => rates.misc,
    }
}

/// Battlefield rate scaling, the last stage of the pipeline. Positive damage
/// never scales below 1, so siege tuning cannot nullify a connecting hit.
pub fn battlefield_scale(
    damage: i64,
    map: MapFlags,
    config: &BattleConfig,
    channel: AttackChannel,
    range: RangeClass,
) -> i64 {
    let Some(rates) = map.rates(config) else {
        return damage;
    };
    let pct = rate_for(rates, channel, range);
    if pct == 100 || damage <= 0 {
        return damage;
    }
    floor_div(damage * pct as i64, 100).max(1)
}
