//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only)
//! plus whatever engine-owned state they need passed in explicitly. Order is
//! fixed by `SimulationEngine::run_systems`.

pub mod cleanup;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod status_effects;
pub mod targeting;
pub mod wave_spawner;
