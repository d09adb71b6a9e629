//! Platform grid and phase engine
//!
//! The wall bitmap is kept as one `u8` bitmask per column (bit index =
//! row), so the collision test and the per-column render query are both a
//! single mask operation. Walls spawn at the leading edge with a gap and
//! are shifted toward the player's side one cell at a time.

use rand::Rng;

use crate::consts::{GRID_COLS, GRID_ROWS, ROW_MASK};
use crate::tuning::Tuning;

/// Current travel axis for walls; also gates player wrap-around
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Walls are rows falling from the top edge downward
    Horizontal,
    /// Walls are columns sweeping from the left edge rightward
    Vertical,
}

impl Phase {
    pub fn flipped(self) -> Self {
        match self {
            Phase::Horizontal => Phase::Vertical,
            Phase::Vertical => Phase::Horizontal,
        }
    }
}

/// The wall bitmap
#[derive(Debug, Clone, Default)]
pub struct PlatformGrid {
    /// One occupancy mask per column, bit index = row
    columns: [u8; GRID_COLS as usize],
}

impl PlatformGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a wall at the leading edge of the current phase, gap position
    /// chosen uniformly at random
    pub fn spawn(&mut self, phase: Phase, rng: &mut impl Rng) {
        match phase {
            Phase::Horizontal => {
                let gap_col = rng.random_range(0..GRID_COLS as u32) as u8;
                self.spawn_horizontal(gap_col);
            }
            Phase::Vertical => {
                let gap_row = rng.random_range(0..GRID_ROWS as u32) as u8;
                self.spawn_vertical(gap_row);
            }
        }
    }

    /// Fill the top row except for one gap column
    pub fn spawn_horizontal(&mut self, gap_col: u8) {
        for (col, bits) in self.columns.iter_mut().enumerate() {
            *bits = (*bits & !1) | u8::from(col as u8 != gap_col);
        }
    }

    /// Fill the left column except for two adjacent gap rows (wrapping).
    /// Vertical walls cross the short axis faster, so they get the wider
    /// gap: `gap_row` and its successor mod the row count.
    pub fn spawn_vertical(&mut self, gap_row: u8) {
        let second_gap = (gap_row + 1) % GRID_ROWS;
        self.columns[0] = ROW_MASK & !((1 << gap_row) | (1 << second_gap));
    }

    /// Translate every wall one cell toward the player's side, discarding
    /// the trailing edge and clearing the vacated leading edge
    pub fn shift(&mut self, phase: Phase) {
        match phase {
            Phase::Horizontal => {
                for bits in &mut self.columns {
                    *bits = (*bits << 1) & ROW_MASK;
                }
            }
            Phase::Vertical => {
                self.columns.rotate_right(1);
                self.columns[0] = 0;
            }
        }
    }

    /// Occupancy mask for one column, for rendering and collision
    pub fn column_pattern(&self, col: u8) -> u8 {
        self.columns[col as usize]
    }

    /// True when the given cell holds a piece of wall
    pub fn collides(&self, row: u8, col: u8) -> bool {
        self.column_pattern(col) & (1 << row) != 0
    }

    pub fn clear(&mut self) {
        self.columns = [0; GRID_COLS as usize];
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(|&bits| bits == 0)
    }
}

/// Wall pacing for the current session, raised at every phase changeover
#[derive(Debug, Clone)]
pub struct Difficulty {
    /// Wall shift rate, shifts per minute
    pub shift_per_minute: u32,
    /// Wall creation rate, walls per minute
    pub create_per_minute: u32,
}

impl Difficulty {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            shift_per_minute: tuning.initial_shift_per_minute,
            create_per_minute: tuning.initial_create_per_minute,
        }
    }

    /// Bump both rates by their configured increments, clamped to their
    /// configured maxima; this is the only way difficulty escalates
    pub fn raise(&mut self, tuning: &Tuning) {
        self.shift_per_minute =
            (self.shift_per_minute + tuning.shift_increase).min(tuning.max_shift_per_minute);
        self.create_per_minute =
            (self.create_per_minute + tuning.create_increase).min(tuning.max_create_per_minute);
    }

    /// Effective shift rate for a phase; vertical walls are slowed by the
    /// balance divisor (truncating, floored at 1)
    pub fn shift_rate(&self, phase: Phase, tuning: &Tuning) -> u32 {
        match phase {
            Phase::Horizontal => self.shift_per_minute,
            Phase::Vertical => {
                ((f64::from(self.shift_per_minute) / tuning.vertical_shift_divisor) as u32).max(1)
            }
        }
    }

    /// Effective creation rate for a phase
    pub fn create_rate(&self, phase: Phase, tuning: &Tuning) -> u32 {
        match phase {
            Phase::Horizontal => self.create_per_minute,
            Phase::Vertical => {
                ((f64::from(self.create_per_minute) / tuning.vertical_create_divisor) as u32).max(1)
            }
        }
    }
}
