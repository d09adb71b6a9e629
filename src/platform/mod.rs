//! Host abstraction layer
//!
//! The simulation core never touches hardware. A host supplies:
//! - a [`TickSource`] delivering the fixed-rate tick
//! - an [`InputAdapter`] with a polled snapshot of input edges
//! - a [`RenderAdapter`] painting one matrix column per refresh
//! - a [`TextInterface`] for the attract and game-over messages
//!
//! [`SleepTicker`] is a ready-made tick source for hosts with an OS clock.

use std::time::{Duration, Instant};

use crate::sim::tick::InputSnapshot;

/// Blocking fixed-rate tick delivery
pub trait TickSource {
    /// Block until the next tick is due. Returning `false` asks the
    /// scheduler loop to end (hardware never does; a terminal host quits
    /// on demand).
    fn wait_for_next_tick(&mut self) -> bool;
}

/// Polled edge-event input. The core calls [`InputAdapter::poll`] only
/// when the input rate divider fires; edges must latch between polls.
pub trait InputAdapter {
    fn poll(&mut self) -> InputSnapshot;
}

/// One special-indicator row forced on or off while its column is painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOverride {
    pub row: u8,
    pub on: bool,
}

/// What to light for one column of the current refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPaint {
    /// Light every pixel (powerup screen flash)
    Flood,
    /// Wall bits (bit index = row) plus at most one override per
    /// special indicator
    Pattern {
        bits: u8,
        player: Option<RowOverride>,
        powerup: Option<RowOverride>,
    },
}

/// Column-multiplexed display. Columns arrive round-robin, one per
/// refresh cycle.
pub trait RenderAdapter {
    fn paint_column(&mut self, col: u8, paint: ColumnPaint);

    /// Status LED asserted while the player is holding a powerup
    fn set_held_indicator(&mut self, held: bool);
}

/// Scrolling-text front end for the attract and game-over screens
pub trait TextInterface {
    fn show_welcome(&mut self);
    fn show_game_over(&mut self, score: u32);
    fn clear(&mut self);
    /// Advance the scroll; called once per tick while text is showing
    fn update(&mut self);
}

/// [`TickSource`] pacing off the OS monotonic clock
pub struct SleepTicker {
    period: Duration,
    next: Instant,
}

impl SleepTicker {
    pub fn new(tick_rate: u32) -> Self {
        let period = Duration::from_secs(1) / tick_rate.max(1);
        Self {
            period,
            next: Instant::now() + period,
        }
    }
}

impl TickSource for SleepTicker {
    fn wait_for_next_tick(&mut self) -> bool {
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
        } else if now - self.next > self.period * 32 {
            // host stalled badly; resync instead of replaying the backlog
            self.next = now;
        }
        self.next += self.period;
        true
    }
}
