//! Cleanup system: removes enemies that died or reached the end of the path,
//! applying the reward or the life loss exactly once per enemy.

use hecs::{Entity, World};
use tracing::debug;

use rampart_core::components::{Enemy, Tower};
use rampart_core::constants::KILL_SCORE_FACTOR;
use rampart_core::events::GameEvent;
use rampart_core::types::{EnemyId, TowerId};

use crate::economy::MatchStats;
use crate::handles::{enemy_id, tower_id};

/// Remove flagged enemies. Uses a pre-allocated buffer to avoid per-tick
/// allocation.
pub fn run(
    world: &mut World,
    stats: &mut MatchStats,
    events: &mut Vec<GameEvent>,
    despawn_buffer: &mut Vec<Entity>,
) {
    despawn_buffer.clear();
    for (entity, enemy) in world.query_mut::<&Enemy>() {
        if enemy.is_dead || enemy.reached_end {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let (is_dead, reward) = match world.get::<&Enemy>(entity) {
            Ok(enemy) => (enemy.is_dead, enemy.reward),
            Err(_) => continue,
        };
        let id = enemy_id(entity);

        // A kill takes precedence over a leak flagged on the same tick.
        if is_dead {
            stats.earn(reward);
            stats.add_score(reward as u64 * KILL_SCORE_FACTOR);
            let credited = credit_kill(world, id);
            debug!(enemy = id.0, reward, ?credited, "enemy killed");
            events.push(GameEvent::EnemyKilled {
                enemy: id,
                reward,
                credited,
            });
        } else {
            let lives_remaining = stats.lose_life();
            debug!(enemy = id.0, lives_remaining, "enemy leaked");
            events.push(GameEvent::EnemyLeaked {
                enemy: id,
                lives_remaining,
            });
        }
        let _ = world.despawn(entity);
    }
}

/// Credit the first tower still targeting `enemy` and clear its target.
///
/// A tower that retargeted before the lethal hit landed gets nothing.
pub fn credit_kill(world: &mut World, enemy: EnemyId) -> Option<TowerId> {
    for (entity, tower) in world.query_mut::<&mut Tower>() {
        if tower.target == Some(enemy) {
            tower.kills += 1;
            tower.target = None;
            return Some(tower_id(entity));
        }
    }
    None
}
