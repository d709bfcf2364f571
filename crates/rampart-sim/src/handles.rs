//! Conversions between hecs entities and the opaque ids handed to callers.
//!
//! Ids carry the entity's generation, so resolving a handle to a removed
//! entity yields an entity the world no longer contains rather than a
//! stranger that reused the slot.

use hecs::Entity;

use rampart_core::types::{EnemyId, TowerId};

pub fn enemy_id(entity: Entity) -> EnemyId {
    EnemyId(entity.to_bits().get())
}

pub fn tower_id(entity: Entity) -> TowerId {
    TowerId(entity.to_bits().get())
}

pub fn enemy_entity(id: EnemyId) -> Option<Entity> {
    Entity::from_bits(id.0)
}

pub fn tower_entity(id: TowerId) -> Option<Entity> {
    Entity::from_bits(id.0)
}
