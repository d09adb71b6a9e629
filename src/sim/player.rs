//! Player token
//!
//! Movement is edge-triggered by nav-switch events and clamped at the
//! matrix boundary, except that wrap-around is allowed along the axis
//! matching the current wall phase so a gap can always be approached from
//! either side.

use crate::consts::{GRID_COLS, GRID_ROWS};
use crate::sim::grid::Phase;

/// A single directional input edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

/// The player token position plus its blink-visual state
#[derive(Debug, Clone)]
pub struct Player {
    pub row: u8,
    pub col: u8,
    /// Cosmetic; toggled at a fixed rate so the player reads differently
    /// from the solid walls
    pub blink_on: bool,
}

impl Player {
    /// Player starts centre-bottom of the matrix
    pub fn spawn() -> Self {
        Self {
            row: GRID_ROWS - 1,
            col: GRID_COLS / 2,
            blink_on: false,
        }
    }

    /// Apply one directional edge. Boundary behavior depends on the phase:
    /// east/west wrap only while walls are horizontal, north/south wrap
    /// only while walls are vertical; otherwise movement clamps.
    pub fn step(&mut self, dir: Direction, phase: Phase) {
        match dir {
            Direction::East => {
                if self.col < GRID_COLS - 1 {
                    self.col += 1;
                } else if phase == Phase::Horizontal {
                    self.col = 0;
                }
            }
            Direction::West => {
                if self.col > 0 {
                    self.col -= 1;
                } else if phase == Phase::Horizontal {
                    self.col = GRID_COLS - 1;
                }
            }
            Direction::North => {
                if self.row > 0 {
                    self.row -= 1;
                } else if phase == Phase::Vertical {
                    self.row = GRID_ROWS - 1;
                }
            }
            Direction::South => {
                if self.row < GRID_ROWS - 1 {
                    self.row += 1;
                } else if phase == Phase::Vertical {
                    self.row = 0;
                }
            }
        }
    }

    pub fn toggle_blink(&mut self) {
        self.blink_on = !self.blink_on;
    }
}
