//! World aggregate and the game state machine
//!
//! Everything the tick mutates lives in one owned [`World`]: grid, player,
//! powerup, difficulty, score, the explicit state machines and every rate
//! divider. Restarting a game is a single [`World::reset`], not a sweep of
//! scattered statics. The RNG stream deliberately survives resets, so a
//! replay is deterministic over the life of the process, not per game.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::sim::grid::{Difficulty, Phase, PlatformGrid};
use crate::sim::pacer::{RateDivider, ticks_for_per_minute, ticks_per_event};
use crate::sim::player::Player;
use crate::sim::powerup::PowerupState;
use crate::tuning::Tuning;

/// Top-level game mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Scrolling text, waiting for the start button
    Attract,
    /// Simulation active
    Playing,
    /// Collision happened; board frozen while the countdown runs
    GameOver { ticks_left: u32 },
}

/// Phase-changeover window state; wall creation is suppressed while
/// `Switching`, and the flip itself happens when the window expires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Changeover {
    Idle,
    Switching { ticks_left: u32 },
}

/// Full-screen flash fired by powerup use
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Off,
    On { ticks_left: u32 },
}

/// All mutable game state, owned as a single aggregate
#[derive(Debug)]
pub struct World {
    pub tuning: Tuning,
    pub mode: Mode,

    pub grid: PlatformGrid,
    pub phase: Phase,
    pub player: Player,
    pub powerup: PowerupState,
    pub difficulty: Difficulty,
    pub score: u32,
    pub changeover: Changeover,
    pub flash: Flash,

    /// Run seed, kept for logging and replay
    pub seed: u64,
    pub rng: Pcg32,

    /// Ticks since boot, saturating at the settle threshold; the start
    /// button is ignored until it gets there
    pub settle: u32,
    /// Round-robin display cursor
    pub render_col: u8,

    // One divider per independently paced subsystem
    pub input_div: RateDivider,
    pub display_div: RateDivider,
    pub shift_div: RateDivider,
    pub create_div: RateDivider,
    pub phase_switch_div: RateDivider,
    pub powerup_spawn_div: RateDivider,
    pub blink_div: RateDivider,
    pub duty_div: RateDivider,
}

impl World {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tick_rate = tuning.tick_rate;
        let difficulty = Difficulty::new(&tuning);
        let phase = Phase::Horizontal;
        Self {
            mode: Mode::Attract,
            grid: PlatformGrid::new(),
            phase,
            player: Player::spawn(),
            powerup: PowerupState::Absent,
            score: 0,
            changeover: Changeover::Idle,
            flash: Flash::Off,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settle: 0,
            render_col: 0,
            input_div: RateDivider::new(ticks_per_event(tick_rate, tuning.input_poll_hz)),
            display_div: RateDivider::new(ticks_per_event(tick_rate, tuning.display_hz)),
            shift_div: RateDivider::new(ticks_for_per_minute(
                tick_rate,
                difficulty.shift_rate(phase, &tuning),
            )),
            create_div: RateDivider::new(ticks_for_per_minute(
                tick_rate,
                difficulty.create_rate(phase, &tuning),
            )),
            phase_switch_div: RateDivider::new(ticks_for_per_minute(
                tick_rate,
                tuning.phase_switches_per_minute,
            )),
            powerup_spawn_div: RateDivider::new(ticks_for_per_minute(
                tick_rate,
                tuning.powerups_per_minute,
            )),
            blink_div: RateDivider::new(ticks_per_event(tick_rate, tuning.player_blink_hz)),
            duty_div: RateDivider::new(ticks_per_event(tick_rate, tuning.powerup_duty_hz)),
            difficulty,
            tuning,
        }
    }

    /// Restore the board to its initial configuration for a new game.
    /// The RNG stream and the boot-settle counter are left alone.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.phase = Phase::Horizontal;
        self.player = Player::spawn();
        self.powerup = PowerupState::Absent;
        self.difficulty = Difficulty::new(&self.tuning);
        self.score = 0;
        self.changeover = Changeover::Idle;
        self.flash = Flash::Off;
        self.render_col = 0;
        self.shift_div.reset();
        self.create_div.reset();
        self.phase_switch_div.reset();
        self.powerup_spawn_div.reset();
        self.blink_div.reset();
        self.duty_div.reset();
    }

    /// True once the boot settle delay has elapsed
    pub fn settled(&self) -> bool {
        self.settle >= crate::consts::BOOT_SETTLE_TICKS
    }
}
