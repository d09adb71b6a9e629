//! Data-driven game balance
//!
//! Every rate, duration and increment the simulation uses lives here so a
//! build can be rebalanced from a JSON file without recompiling. Grid
//! geometry is deliberately not tunable.

use serde::{Deserialize, Serialize};

/// Balance parameters for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Hardware tick rate in Hz; every other rate is divided out of this
    pub tick_rate: u32,
    /// Input sampling rate in Hz (button + nav switch edges)
    pub input_poll_hz: u32,
    /// Display refresh rate in Hz (one column painted per refresh)
    pub display_hz: u32,

    /// How long the final score stays on the frozen board, in seconds
    pub game_over_wait_secs: u32,

    /// Phase changeover window length, in tenths of a second
    pub changeover_duration_tenths: u32,
    /// How often a phase changeover begins (windows per minute)
    pub phase_switches_per_minute: u32,

    /// Wall shift rate at game start (shifts per minute)
    pub initial_shift_per_minute: u32,
    /// Wall creation rate at game start (walls per minute)
    pub initial_create_per_minute: u32,
    /// Hard ceiling on the shift rate
    pub max_shift_per_minute: u32,
    /// Hard ceiling on the creation rate
    pub max_create_per_minute: u32,
    /// Added to the shift rate at every changeover
    pub shift_increase: u32,
    /// Added to the creation rate at every changeover
    pub create_increase: u32,

    /// Vertical walls travel a shorter axis, so the shift rate is divided
    /// by this factor to keep the two phases comparably hard
    pub vertical_shift_divisor: f64,
    /// Same balancing idea applied to the creation rate
    pub vertical_create_divisor: f64,

    /// Powerup spawn rate (new powerups per minute)
    pub powerups_per_minute: u32,
    /// Full-screen flash length when a powerup is used, in seconds
    pub flash_secs: u32,

    /// Player indicator blink rate in Hz
    pub player_blink_hz: u32,
    /// Powerup duty-cycle stepping rate in Hz
    pub powerup_duty_hz: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate: 500,
            input_poll_hz: 50,
            display_hz: 500,
            game_over_wait_secs: 2,
            changeover_duration_tenths: 35,
            phase_switches_per_minute: 3,
            initial_shift_per_minute: 90,
            initial_create_per_minute: 30,
            max_shift_per_minute: 180,
            max_create_per_minute: 50,
            shift_increase: 10,
            create_increase: 3,
            vertical_shift_divisor: 1.2,
            vertical_create_divisor: 1.5,
            powerups_per_minute: 3,
            flash_secs: 1,
            player_blink_hz: 8,
            powerup_duty_hz: 500,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults on any error
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {path}");
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {path}: {e}; using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read tuning file {path}: {e}; using defaults");
                Self::default()
            }
        }
    }

    /// Game-over wait converted to ticks
    pub fn game_over_wait_ticks(&self) -> u32 {
        self.game_over_wait_secs * self.tick_rate
    }

    /// Changeover window converted to ticks
    pub fn changeover_ticks(&self) -> u32 {
        (self.tick_rate * self.changeover_duration_tenths / 10).max(1)
    }

    /// Powerup flash converted to ticks
    pub fn flash_ticks(&self) -> u32 {
        (self.flash_secs * self.tick_rate).max(1)
    }
}
