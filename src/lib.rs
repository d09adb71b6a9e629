//! Gap Runner - a fixed-tick LED-matrix dodge game
//!
//! A player token dodges procedurally generated walls (rows or columns with
//! one deliberate gap) that march across a 7x5 LED matrix at an increasing
//! rate. Everything is driven by a single periodic tick, rate-divided in
//! software into the various logical event rates.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rate dividers, grid, state machine)
//! - `platform`: Host abstraction (tick source, input, display, text)
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Matrix rows (the reference hardware is a 7x5 LED matrix)
    pub const GRID_ROWS: u8 = 7;
    /// Matrix columns
    pub const GRID_COLS: u8 = 5;
    /// All-rows-occupied column bitmask (bit index = row)
    pub const ROW_MASK: u8 = (1 << GRID_ROWS) - 1;

    /// Ticks to wait after boot before the start button is honored,
    /// so electrical noise during power-on can't start a game
    pub const BOOT_SETTLE_TICKS: u32 = 255;

    /// Length of the powerup indicator duty cycle; the LED is lit in
    /// exactly one of these states, making it clearly dimmer than walls
    pub const POWERUP_DUTY_STATES: u8 = 31;

    /// Default run seed. Fixed on purpose: two boots replay identical
    /// wall sequences, matching the reference hardware's behavior.
    pub const DEFAULT_SEED: u64 = 1;
}
