//! Simulation engine for RAMPART.
//!
//! Owns the hecs ECS world, runs systems once per host frame,
//! and produces GameStateSnapshots for rendering and UI collaborators.

pub mod clock;
pub mod economy;
pub mod engine;
pub mod grid;
pub mod handles;
pub mod path;
pub mod pool;
pub mod projectile;
pub mod systems;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use rampart_core as core;

#[cfg(test)]
mod tests;
