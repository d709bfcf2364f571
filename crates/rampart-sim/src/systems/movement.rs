//! Path-following system.
//!
//! Moves every live enemy toward its next waypoint at
//! `base_speed × Π(slow multipliers) × 60 × dt`, then counts its effects down.

use glam::DVec2;
use hecs::World;

use rampart_core::components::{Enemy, StatusEffects};
use rampart_core::constants::{ENEMY_SPEED_SCALE, WAYPOINT_ARRIVAL_RADIUS};
use rampart_core::types::Position;

use crate::path::Path;
use crate::systems::status_effects;

pub fn run(world: &mut World, path: &Path, dt: f64) {
    for (_entity, (pos, enemy, effects)) in
        world.query_mut::<(&mut Position, &mut Enemy, &mut StatusEffects)>()
    {
        if enemy.is_dead || enemy.reached_end {
            continue;
        }
        step(pos, enemy, effects, path, dt);
        status_effects::tick(effects, dt);
    }
}

fn step(pos: &mut Position, enemy: &mut Enemy, effects: &StatusEffects, path: &Path, dt: f64) {
    let Some(next) = path.next_waypoint(enemy.path_index) else {
        enemy.reached_end = true;
        return;
    };

    let to_next = DVec2::from(next) - DVec2::from(*pos);
    let distance = to_next.length();
    if distance < WAYPOINT_ARRIVAL_RADIUS {
        enemy.path_index += 1;
        return;
    }

    let speed = enemy.base_speed * status_effects::speed_multiplier(effects);
    // Never overshoot the waypoint.
    let travel = (speed * ENEMY_SPEED_SCALE * dt).min(distance);
    *pos = (DVec2::from(*pos) + to_next / distance * travel).into();
}
