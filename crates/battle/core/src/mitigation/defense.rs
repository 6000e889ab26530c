//! Defense reduction.
//!
//! The legacy model treats hard defense as a straight percentage and soft
//! defense as a subtraction with a vitality-derived random bonus. The
//! renewal model runs hard defense through the rational curve
//! `(4000+def)/(4000+10*def)`, where `def == -400` is the degenerate pole
//! and is clamped to its nearest safe neighbor. A per-type config override
//! can replace the percentage model with flat `def * n` subtraction.

use crate::config::{DefenseType, RulesetMode};

use super::floor_div;

/// Inputs of one defense reduction.
#[derive(Clone, Copy, Debug)]
pub struct DefenseParams {
    /// Hard defense (equipment-side).
    pub hard: i32,
    /// Soft defense (stat-side), already crowd-penalized by the caller.
    pub soft: i32,
    /// 0 keeps the mode's model; positive switches to `damage - hard*n`.
    pub override_type: DefenseType,
    pub mode: RulesetMode,
}

/// Upper bound of the random soft-defense bonus granted by vitality.
pub fn vit_bonus_max(vit: i32) -> i32 {
    ((vit / 20) * (vit / 20) - 1).max(0)
}

/// Applies defense to `damage`. `vit_roll` is the caller-sampled bonus in
/// `0..=vit_bonus_max`, so the stage itself stays deterministic.
pub fn apply(damage: i64, params: DefenseParams, vit_roll: i32) -> i64 {
    if params.override_type > 0 {
        return damage
            - params.hard as i64 * params.override_type as i64
            - params.soft as i64
            - vit_roll as i64;
    }
    match params.mode {
        RulesetMode::PreRenewal => {
            floor_div(damage * (100 - params.hard as i64), 100)
                - floor_div(params.soft as i64 * 8, 10)
                - vit_roll as i64
        }
        RulesetMode::Renewal => {
            let hard = if params.hard == -400 { -399 } else { params.hard } as i64;
            floor_div(damage * (4000 + hard), 4000 + 10 * hard) - params.soft as i64
        }
    }
}

/// Defense-ratio attacks scale *with* defense instead of being reduced:
/// `damage * (hard + soft) / 100`, applied in place of this stage.
pub fn def_ratio_boost(damage: i64, hard: i32, soft: i32) -> i64 {
    floor_div(damage * (hard as i64 + soft as i64), 100)
}
