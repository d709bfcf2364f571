//! Simulation constants.
//!
//! These are physical properties of the simulation rather than balance
//! tuning; everything a designer retunes lives in [`crate::config`].

// --- Clock ---

/// Largest raw frame delta accepted by one tick (seconds). Longer frames, e.g.
/// from a backgrounded host, are truncated to this.
pub const MAX_TICK_DELTA_SECS: f64 = 0.05;

/// Fastest selectable game speed.
pub const MAX_SPEED_MULTIPLIER: u8 = 3;

// --- Enemy movement ---

/// Catalog enemy speeds are expressed per 1/60 s frame.
pub const ENEMY_SPEED_SCALE: f64 = 60.0;

/// Distance at which an enemy counts as having reached its next waypoint.
pub const WAYPOINT_ARRIVAL_RADIUS: f64 = 5.0;

// --- Projectiles ---

/// Projectile travel speed (px/s), identical for every tower type.
pub const PROJECTILE_SPEED: f64 = 400.0;

/// Remaining distance below which a projectile resolves its hit.
pub const PROJECTILE_HIT_RADIUS: f64 = 8.0;

// --- Selection ---

/// Radius around a tower centre that selects it for upgrade or sale.
pub const TOWER_SELECTION_RADIUS: f64 = 25.0;

// --- Path generation ---

/// Probability of a row step after each path column.
pub const PATH_TURN_CHANCE: f64 = 0.3;

/// Trailing columns kept straight so the exit is readable.
pub const PATH_STRAIGHT_TAIL_COLS: usize = 5;

// --- Scoring ---

/// Score per gold of enemy reward on a kill.
pub const KILL_SCORE_FACTOR: u64 = 10;

/// Score per gold of wave-completion bonus.
pub const WAVE_BONUS_SCORE_FACTOR: u64 = 5;
