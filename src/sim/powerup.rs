//! Powerup lifecycle
//!
//! At most one powerup exists at a time, enforced by the state enum:
//! either none is on the board, one is visible somewhere, or the player is
//! holding one. Using a held powerup clears the wall grid and flashes the
//! whole screen (handled by the state machine, not here).

use rand::Rng;

use crate::consts::{GRID_COLS, GRID_ROWS, POWERUP_DUTY_STATES};

/// Where the single powerup is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerupState {
    /// No powerup on the board or in hand
    Absent,
    /// On the board, collectable, indicator modulated by `duty`
    Visible { row: u8, col: u8, duty: u8 },
    /// Collected, waiting for the action button
    Held,
}

impl PowerupState {
    /// Place a fresh powerup at a uniformly random cell
    pub fn spawn(rng: &mut impl Rng) -> Self {
        PowerupState::Visible {
            row: rng.random_range(0..GRID_ROWS as u32) as u8,
            col: rng.random_range(0..GRID_COLS as u32) as u8,
            duty: 0,
        }
    }

    /// Advance the indicator duty cycle one step (visible powerups only)
    pub fn advance_duty(&mut self) {
        if let PowerupState::Visible { duty, .. } = self {
            *duty = (*duty + 1) % POWERUP_DUTY_STATES;
        }
    }

    /// The indicator LED is lit in exactly one duty state, so it shows
    /// much dimmer than the player or the walls
    pub fn indicator_lit(&self) -> bool {
        matches!(self, PowerupState::Visible { duty: 0, .. })
    }

    pub fn is_held(&self) -> bool {
        matches!(self, PowerupState::Held)
    }

    /// True when a visible powerup occupies the given cell
    pub fn is_visible_at(&self, row: u8, col: u8) -> bool {
        matches!(self, PowerupState::Visible { row: r, col: c, .. } if *r == row && *c == col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_within_grid() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            if let PowerupState::Visible { row, col, duty } = PowerupState::spawn(&mut rng) {
                assert!(row < GRID_ROWS);
                assert!(col < GRID_COLS);
                assert_eq!(duty, 0);
            } else {
                panic!("spawn must produce a visible powerup");
            }
        }
    }

    #[test]
    fn test_duty_cycle_wraps() {
        let mut p = PowerupState::Visible {
            row: 1,
            col: 1,
            duty: 0,
        };
        assert!(p.indicator_lit());
        for _ in 0..POWERUP_DUTY_STATES - 1 {
            p.advance_duty();
            assert!(!p.indicator_lit());
        }
        p.advance_duty();
        assert!(p.indicator_lit());
    }

    #[test]
    fn test_duty_only_advances_while_visible() {
        let mut held = PowerupState::Held;
        held.advance_duty();
        assert_eq!(held, PowerupState::Held);
    }

    #[test]
    fn test_visible_at() {
        let p = PowerupState::Visible {
            row: 3,
            col: 2,
            duty: 5,
        };
        assert!(p.is_visible_at(3, 2));
        assert!(!p.is_visible_at(3, 1));
        assert!(!PowerupState::Held.is_visible_at(3, 2));
        assert!(!PowerupState::Absent.is_visible_at(3, 2));
    }
}
