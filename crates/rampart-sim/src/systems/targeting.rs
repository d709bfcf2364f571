//! Tower targeting and firing.
//!
//! Every tower re-picks its target each tick: the live enemy in range that is
//! furthest along the path, first found on ties. A tower with a target fires
//! once its cooldown of `1000 / fire_rate` ms has elapsed.

use hecs::World;

use rampart_core::components::{Enemy, Tower};
use rampart_core::events::GameEvent;
use rampart_core::types::{EnemyId, Position};

use crate::handles::{enemy_id, tower_id};
use crate::pool::Pool;
use crate::projectile::Projectile;

/// A live enemy as seen by the towers this tick.
#[derive(Debug, Clone, Copy)]
pub struct TargetCandidate {
    pub id: EnemyId,
    pub position: Position,
    pub path_index: usize,
}

pub fn run(
    world: &mut World,
    projectiles: &mut Pool<Projectile>,
    now_ms: f64,
    candidates: &mut Vec<TargetCandidate>,
    events: &mut Vec<GameEvent>,
) {
    candidates.clear();
    for (entity, (pos, enemy)) in world.query::<(&Position, &Enemy)>().iter() {
        if !enemy.is_dead {
            candidates.push(TargetCandidate {
                id: enemy_id(entity),
                position: *pos,
                path_index: enemy.path_index,
            });
        }
    }

    for (entity, (pos, tower)) in world.query_mut::<(&Position, &mut Tower)>() {
        tower.target = acquire_target(pos, tower.range, candidates.as_slice());
        let Some(target) = tower.target else {
            continue;
        };
        if !cooldown_ready(tower, now_ms) {
            continue;
        }

        let damage = tower.damage.floor() as u32;
        let (_, projectile) = projectiles.acquire();
        projectile.launch(*pos, target, damage, tower.kind);
        tower.last_shot_ms = Some(now_ms);
        events.push(GameEvent::TowerFired {
            tower: tower_id(entity),
            target,
        });
    }
}

/// Furthest-progressed candidate within `range` of `origin`.
pub fn acquire_target(
    origin: &Position,
    range: f64,
    candidates: &[TargetCandidate],
) -> Option<EnemyId> {
    let mut best: Option<&TargetCandidate> = None;
    for candidate in candidates {
        if origin.range_to(&candidate.position) > range {
            continue;
        }
        // Strictly greater: the first one found keeps a tie.
        if best.map_or(true, |b| candidate.path_index > b.path_index) {
            best = Some(candidate);
        }
    }
    best.map(|candidate| candidate.id)
}

/// Whether the tower's cooldown has elapsed. A tower that never fired is
/// ready.
pub fn cooldown_ready(tower: &Tower, now_ms: f64) -> bool {
    match tower.last_shot_ms {
        None => true,
        Some(last) => now_ms - last >= 1000.0 / tower.fire_rate,
    }
}
