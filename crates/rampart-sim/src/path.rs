//! The route enemies follow: an immutable ordered list of waypoints.

use rand::Rng;

use rampart_core::config::FieldConfig;
use rampart_core::constants::{PATH_STRAIGHT_TAIL_COLS, PATH_TURN_CHANCE};
use rampart_core::error::ConfigError;
use rampart_core::types::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    waypoints: Vec<Position>,
}

impl Path {
    /// Build a path from explicit waypoints. At least two are required.
    pub fn new(waypoints: Vec<Position>) -> Result<Self, ConfigError> {
        if waypoints.len() < 2 {
            return Err(ConfigError::Invalid(format!(
                "a path needs at least 2 waypoints, got {}",
                waypoints.len()
            )));
        }
        Ok(Self { waypoints })
    }

    /// Route one waypoint per column across the field, left to right.
    ///
    /// Starts on the middle row. After each column, except the last few, the
    /// row may drift by one, never onto the outermost rows.
    pub fn generate(field: &FieldConfig, rng: &mut impl Rng) -> Self {
        let cs = field.cell_size;
        let mut row = field.rows / 2;
        let mut waypoints = Vec::with_capacity(field.cols);

        for col in 0..field.cols {
            waypoints.push(Position::new(
                col as f64 * cs + cs / 2.0,
                row as f64 * cs + cs / 2.0,
            ));

            if col + PATH_STRAIGHT_TAIL_COLS < field.cols && rng.gen::<f64>() < PATH_TURN_CHANCE {
                let up = rng.gen::<f64>() < 0.5;
                let next = if up {
                    row.checked_sub(1)
                } else {
                    Some(row + 1)
                };
                if let Some(next) = next {
                    if next >= 1 && next < field.rows.saturating_sub(1) {
                        row = next;
                    }
                }
            }
        }

        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Position] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Where enemies enter the field.
    pub fn start(&self) -> Position {
        self.waypoints.first().copied().unwrap_or_default()
    }

    /// The waypoint an enemy at `index` travels toward, or `None` once it
    /// stands on the last one.
    pub fn next_waypoint(&self, index: usize) -> Option<Position> {
        self.waypoints.get(index + 1).copied()
    }
}
