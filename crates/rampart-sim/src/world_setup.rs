//! Entity spawn factories.
//!
//! Creates enemy and tower entities with the component bundles the systems
//! expect.

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;

use rampart_core::components::*;
use rampart_core::config::{EconomyConfig, EnemySpec, GameConfig, TowerSpec};
use rampart_core::types::Position;

/// Pick an enemy archetype uniformly from the catalog.
pub fn pick_enemy<'a>(config: &'a GameConfig, rng: &mut impl Rng) -> Option<&'a EnemySpec> {
    config.enemies.choose(rng)
}

/// Spawn an enemy at the path start, health and reward scaled by the wave
/// multiplier (floored).
pub fn spawn_enemy(
    world: &mut World,
    spec: &EnemySpec,
    start: Position,
    multiplier: f64,
) -> Entity {
    let health = ((spec.health as f64 * multiplier).floor() as u32).max(1);
    let reward = (spec.reward as f64 * multiplier).floor() as u32;

    world.spawn((
        start,
        Enemy {
            kind: spec.kind,
            path_index: 0,
            health,
            max_health: health,
            base_speed: spec.speed,
            reward,
            is_dead: false,
            reached_end: false,
        },
        StatusEffects::default(),
    ))
}

/// Spawn a level-1 tower at `position` (a cell centre).
pub fn spawn_tower(
    world: &mut World,
    spec: &TowerSpec,
    position: Position,
    economy: &EconomyConfig,
) -> Entity {
    world.spawn((
        position,
        Tower {
            kind: spec.kind,
            level: 1,
            base_cost: spec.cost,
            damage: spec.damage,
            range: spec.range,
            fire_rate: spec.fire_rate,
            sell_value: economy.initial_sell_value(spec.cost),
            last_shot_ms: None,
            target: None,
            kills: 0,
        },
    ))
}
