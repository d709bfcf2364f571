//! Timed per-enemy modifiers.
//!
//! Effects never merge: two slows of 0.5 both apply, for a net 0.25.

use rampart_core::components::{StatusEffect, StatusEffects};

pub fn apply(effects: &mut StatusEffects, effect: StatusEffect) {
    effects.effects.push(effect);
}

/// Count every effect down by `dt`, dropping the ones that ran out.
pub fn tick(effects: &mut StatusEffects, dt: f64) {
    for effect in &mut effects.effects {
        match effect {
            StatusEffect::Slow { remaining_secs, .. } => *remaining_secs -= dt,
        }
    }
    effects.effects.retain(|effect| match effect {
        StatusEffect::Slow { remaining_secs, .. } => *remaining_secs > 0.0,
    });
}

/// Product of every active speed multiplier (1.0 when unaffected).
pub fn speed_multiplier(effects: &StatusEffects) -> f64 {
    effects
        .effects
        .iter()
        .map(|effect| match effect {
            StatusEffect::Slow { multiplier, .. } => *multiplier,
        })
        .product()
}
