//! The cooperative scheduler
//!
//! One call to [`tick`] per hardware tick advances everything: input is
//! sampled through its rate divider, the mode machine dispatches, and the
//! playing-mode subsystems (walls, changeover, player, powerup) each run
//! when their own divider fires. Strictly single-threaded and
//! non-preemptive; every timeout is counted in ticks, never wall clock.

use crate::consts::{BOOT_SETTLE_TICKS, GRID_COLS};
use crate::platform::{
    ColumnPaint, InputAdapter, RenderAdapter, RowOverride, TextInterface, TickSource,
};
use crate::sim::pacer::ticks_for_per_minute;
use crate::sim::player::Direction;
use crate::sim::powerup::PowerupState;
use crate::sim::state::{Changeover, Flash, Mode, World};

/// Edge events captured by one input poll. Everything is an edge, not a
/// level: a field is true only on the poll that observed the press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
    /// Powerup action button
    pub action: bool,
    /// Start button
    pub start: bool,
}

/// The blocking scheduler loop: wait for a tick, run the tick body,
/// until the tick source asks to stop
pub fn run<T, F>(world: &mut World, ticker: &mut T, io: &mut F)
where
    T: TickSource,
    F: InputAdapter + RenderAdapter + TextInterface,
{
    io.show_welcome();
    log::info!(
        "scheduler running at {} Hz, seed {}",
        world.tuning.tick_rate,
        world.seed
    );
    while ticker.wait_for_next_tick() {
        tick(world, io);
    }
    log::info!("tick source stopped, shutting down");
}

/// One hardware tick
pub fn tick<F>(world: &mut World, io: &mut F)
where
    F: InputAdapter + RenderAdapter + TextInterface,
{
    if world.settle < BOOT_SETTLE_TICKS {
        world.settle += 1;
    }

    let input = if world.input_div.tick() {
        io.poll()
    } else {
        InputSnapshot::default()
    };

    match world.mode {
        Mode::Attract => {
            io.update();
            // start is ignored until the boot settle delay has elapsed,
            // so power-on noise can't trigger a game
            if input.start && world.settled() {
                world.reset();
                io.clear();
                io.set_held_indicator(false);
                world.mode = Mode::Playing;
                log::info!("game started");
            }
            return;
        }
        Mode::GameOver { ticks_left } => {
            let remaining = ticks_left.saturating_sub(1);
            if remaining == 0 {
                io.show_game_over(world.score);
                io.set_held_indicator(false);
                log::info!("showing final score {}", world.score);
                world.reset();
                world.mode = Mode::Attract;
                return;
            }
            world.mode = Mode::GameOver {
                ticks_left: remaining,
            };
        }
        Mode::Playing => {
            if world.grid.collides(world.player.row, world.player.col) {
                world.mode = Mode::GameOver {
                    ticks_left: world.tuning.game_over_wait_ticks(),
                };
                log::info!(
                    "collision at ({}, {}), game over with score {}",
                    world.player.row,
                    world.player.col,
                    world.score
                );
            } else {
                advance_walls(world);
                advance_changeover(world);
                move_player(world, &input);
                advance_powerup(world, &input, io);
            }
        }
    }

    // Cosmetic state and the display run in Playing and GameOver alike;
    // the frozen game-over board keeps blinking under the countdown.
    if world.blink_div.tick() {
        world.player.toggle_blink();
    }
    if world.duty_div.tick() {
        world.powerup.advance_duty();
    }
    if world.display_div.tick() {
        compose_display(world, io);
    }
}

/// Shift standing walls and spawn new ones at the current difficulty.
/// Thresholds are recomputed every tick so a difficulty raise or a phase
/// flip takes effect at the next comparison.
fn advance_walls(world: &mut World) {
    let tick_rate = world.tuning.tick_rate;
    world.shift_div.set_threshold(ticks_for_per_minute(
        tick_rate,
        world.difficulty.shift_rate(world.phase, &world.tuning),
    ));
    if world.shift_div.tick() {
        world.grid.shift(world.phase);
    }

    world.create_div.set_threshold(ticks_for_per_minute(
        tick_rate,
        world.difficulty.create_rate(world.phase, &world.tuning),
    ));
    if world.flash != Flash::Off {
        // the cleared board stays safe for a full period after a flash
        world.create_div.reset();
    } else if world.changeover != Changeover::Idle {
        // creation is gated through the window but the count keeps
        // running, so the first wall of the new phase comes due as soon
        // as the window closes
        world.create_div.tick_gated();
    } else if world.create_div.tick() {
        world.grid.spawn(world.phase, &mut world.rng);
        world.score += 1;
        log::trace!("wall spawned, score {}", world.score);
    }
}

/// Open changeover windows at the fixed cadence and close expired ones:
/// clear the board, flip the phase, raise the difficulty
fn advance_changeover(world: &mut World) {
    if world.phase_switch_div.tick() && world.changeover == Changeover::Idle {
        world.changeover = Changeover::Switching {
            ticks_left: world.tuning.changeover_ticks(),
        };
        // spawn pacing restarts at window entry and accumulates through
        // the window (see advance_walls)
        world.create_div.reset();
        log::debug!("phase changeover window opened");
    }

    let expired = match &mut world.changeover {
        Changeover::Switching { ticks_left } => {
            *ticks_left -= 1;
            *ticks_left == 0
        }
        Changeover::Idle => false,
    };
    if expired {
        world.changeover = Changeover::Idle;
        world.grid.clear();
        world.phase = world.phase.flipped();
        world.difficulty.raise(&world.tuning);
        log::debug!(
            "phase now {:?}, difficulty {}/{} per minute",
            world.phase,
            world.difficulty.shift_per_minute,
            world.difficulty.create_per_minute
        );
    }
}

/// Apply at most one directional edge from the sampled snapshot
fn move_player(world: &mut World, input: &InputSnapshot) {
    let dir = if input.east {
        Some(Direction::East)
    } else if input.west {
        Some(Direction::West)
    } else if input.north {
        Some(Direction::North)
    } else if input.south {
        Some(Direction::South)
    } else {
        None
    };
    if let Some(dir) = dir {
        world.player.step(dir, world.phase);
    }
}

/// Powerup lifecycle: collect on coincidence, use on the action edge,
/// spawn at the fixed rate while nothing is held, run the screen flash
fn advance_powerup<F: RenderAdapter>(world: &mut World, input: &InputSnapshot, io: &mut F) {
    if world.powerup.is_visible_at(world.player.row, world.player.col) {
        world.powerup = PowerupState::Held;
        io.set_held_indicator(true);
        log::debug!("powerup collected");
    }

    if input.action && world.powerup.is_held() {
        world.powerup = PowerupState::Absent;
        io.set_held_indicator(false);
        world.grid.clear();
        world.flash = Flash::On {
            ticks_left: world.tuning.flash_ticks(),
        };
        log::debug!("powerup used, board cleared");
    }

    // a visible-but-uncollected powerup gets relocated; a held one blocks
    // new spawns entirely
    if world.powerup_spawn_div.tick() && !world.powerup.is_held() {
        world.powerup = PowerupState::spawn(&mut world.rng);
        log::debug!("powerup spawned");
    }

    let flash_done = match &mut world.flash {
        Flash::On { ticks_left } => {
            *ticks_left -= 1;
            *ticks_left == 0
        }
        Flash::Off => false,
    };
    if flash_done {
        world.flash = Flash::Off;
    }
}

/// Emit one column of the round-robin refresh. A flash floods the column;
/// otherwise the wall bits go out with the player and powerup indicator
/// rows overridden when their column is the one being painted.
fn compose_display<F: RenderAdapter>(world: &mut World, io: &mut F) {
    let col = world.render_col;
    let paint = match world.flash {
        Flash::On { .. } => ColumnPaint::Flood,
        Flash::Off => {
            let player = (world.player.col == col).then_some(RowOverride {
                row: world.player.row,
                on: world.player.blink_on,
            });
            let powerup = match world.powerup {
                PowerupState::Visible { row, col: pcol, .. } if pcol == col => Some(RowOverride {
                    row,
                    on: world.powerup.indicator_lit(),
                }),
                _ => None,
            };
            ColumnPaint::Pattern {
                bits: world.grid.column_pattern(col),
                player,
                powerup,
            }
        }
    };
    io.paint_column(col, paint);
    world.render_col = (world.render_col + 1) % GRID_COLS;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::GRID_ROWS;
    use crate::sim::grid::Phase;
    use crate::tuning::Tuning;
    use std::collections::VecDeque;

    /// Records adapter traffic and serves scripted input snapshots
    #[derive(Default)]
    struct TestIo {
        queued: VecDeque<InputSnapshot>,
        fallback: InputSnapshot,
        held: bool,
        paints: Vec<(u8, ColumnPaint)>,
        messages: Vec<String>,
    }

    impl InputAdapter for TestIo {
        fn poll(&mut self) -> InputSnapshot {
            self.queued.pop_front().unwrap_or(self.fallback)
        }
    }

    impl RenderAdapter for TestIo {
        fn paint_column(&mut self, col: u8, paint: ColumnPaint) {
            self.paints.push((col, paint));
        }

        fn set_held_indicator(&mut self, held: bool) {
            self.held = held;
        }
    }

    impl TextInterface for TestIo {
        fn show_welcome(&mut self) {
            self.messages.push("welcome".into());
        }

        fn show_game_over(&mut self, score: u32) {
            self.messages.push(format!("game over {score}"));
        }

        fn clear(&mut self) {
            self.messages.push("clear".into());
        }

        fn update(&mut self) {}
    }

    fn new_world() -> World {
        World::new(Tuning::default(), 1)
    }

    /// Hold the start button until the world enters Playing
    fn start_game(world: &mut World, io: &mut TestIo) {
        io.fallback.start = true;
        for _ in 0..BOOT_SETTLE_TICKS + 50 {
            tick(world, io);
            if world.mode == Mode::Playing {
                break;
            }
        }
        io.fallback.start = false;
        assert_eq!(world.mode, Mode::Playing);
    }

    fn run_ticks(world: &mut World, io: &mut TestIo, n: u32) {
        for _ in 0..n {
            tick(world, io);
        }
    }

    #[test]
    fn test_start_ignored_until_settled() {
        let mut world = new_world();
        let mut io = TestIo {
            fallback: InputSnapshot {
                start: true,
                ..Default::default()
            },
            ..Default::default()
        };
        run_ticks(&mut world, &mut io, 100);
        assert_eq!(world.mode, Mode::Attract);
        run_ticks(&mut world, &mut io, BOOT_SETTLE_TICKS);
        assert_eq!(world.mode, Mode::Playing);
    }

    #[test]
    fn test_attract_does_not_advance_simulation() {
        let mut world = new_world();
        let mut io = TestIo::default();
        world.grid.spawn_horizontal(0);
        let before: Vec<u8> = (0..GRID_COLS).map(|c| world.grid.column_pattern(c)).collect();
        run_ticks(&mut world, &mut io, 2000);
        let after: Vec<u8> = (0..GRID_COLS).map(|c| world.grid.column_pattern(c)).collect();
        assert_eq!(before, after);
        assert_eq!(world.score, 0);
    }

    #[test]
    fn test_collision_enters_game_over_next_tick() {
        let mut world = new_world();
        let mut io = TestIo::default();
        start_game(&mut world, &mut io);

        // park a wall on the player's cell
        world.grid.spawn_horizontal(0);
        for _ in 0..GRID_ROWS - 1 {
            world.grid.shift(Phase::Horizontal);
        }
        assert!(world.grid.collides(world.player.row, world.player.col));

        tick(&mut world, &mut io);
        assert!(matches!(world.mode, Mode::GameOver { .. }));
    }

    #[test]
    fn test_game_over_countdown_returns_to_attract() {
        let mut world = new_world();
        let mut io = TestIo::default();
        world.score = 17;
        world.mode = Mode::GameOver { ticks_left: 3 };
        run_ticks(&mut world, &mut io, 2);
        assert!(matches!(world.mode, Mode::GameOver { ticks_left: 1 }));
        tick(&mut world, &mut io);
        assert_eq!(world.mode, Mode::Attract);
        assert!(io.messages.contains(&"game over 17".to_string()));
    }

    #[test]
    fn test_score_increments_once_per_spawn() {
        let mut world = new_world();
        let mut io = TestIo::default();
        start_game(&mut world, &mut io);

        // 30 walls/minute at 500 Hz is one spawn per 1000 ticks
        run_ticks(&mut world, &mut io, 999);
        assert_eq!(world.score, 0);
        tick(&mut world, &mut io);
        assert_eq!(world.score, 1);
        assert!(!world.grid.is_empty());
    }

    #[test]
    fn test_changeover_suppresses_creation_then_escalates() {
        let mut world = new_world();
        let mut io = TestIo::default();
        start_game(&mut world, &mut io);

        world.changeover = Changeover::Switching { ticks_left: 2000 };
        run_ticks(&mut world, &mut io, 1999);
        assert_eq!(world.score, 0);
        assert!(world.grid.is_empty());
        assert_eq!(world.phase, Phase::Horizontal);

        // window expires: board cleared, phase flipped, rates raised
        tick(&mut world, &mut io);
        assert_eq!(world.changeover, Changeover::Idle);
        assert_eq!(world.phase, Phase::Vertical);
        assert_eq!(world.difficulty.shift_per_minute, 100);
        assert_eq!(world.difficulty.create_per_minute, 33);

        // creation came due during the window, so the first wall of the
        // new phase lands on the very next tick
        tick(&mut world, &mut io);
        assert_eq!(world.score, 1);
        assert!(!world.grid.is_empty());
    }

    #[test]
    fn test_first_wall_after_short_changeover_waits_out_the_period() {
        // a window shorter than the creation period must not spawn early
        let tuning = Tuning {
            changeover_duration_tenths: 10,
            ..Default::default()
        };
        let mut world = World::new(tuning, 1);
        let mut io = TestIo::default();
        start_game(&mut world, &mut io);

        world.changeover = Changeover::Switching { ticks_left: 500 };
        world.create_div.reset();
        run_ticks(&mut world, &mut io, 500);
        assert_eq!(world.changeover, Changeover::Idle);
        assert_eq!(world.score, 0);

        // 500 gated ticks carry over; 22/minute is a 1363-tick period
        run_ticks(&mut world, &mut io, 862);
        assert_eq!(world.score, 0);
        tick(&mut world, &mut io);
        assert_eq!(world.score, 1);
    }

    #[test]
    fn test_powerup_collect_use_and_flash() {
        let mut world = new_world();
        let mut io = TestIo::default();
        start_game(&mut world, &mut io);

        world.powerup = PowerupState::Visible {
            row: world.player.row,
            col: world.player.col,
            duty: 0,
        };
        world.grid.spawn_horizontal(0);
        tick(&mut world, &mut io);
        assert!(world.powerup.is_held());
        assert!(io.held);

        io.fallback.action = true;
        let poll_period = world.input_div.threshold();
        run_ticks(&mut world, &mut io, poll_period);
        io.fallback.action = false;
        assert_eq!(world.powerup, PowerupState::Absent);
        assert!(!io.held);
        assert!(world.grid.is_empty());
        assert!(matches!(world.flash, Flash::On { .. }));

        // flash runs its configured duration, then ends
        let flash_ticks = world.tuning.flash_ticks();
        run_ticks(&mut world, &mut io, flash_ticks);
        assert_eq!(world.flash, Flash::Off);
    }

    #[test]
    fn test_no_spawn_while_powerup_held() {
        // crank the spawn rate so several periods fit well before any
        // wall can reach the player
        let tuning = Tuning {
            powerups_per_minute: 600,
            ..Default::default()
        };
        let mut world = World::new(tuning, 1);
        let mut io = TestIo::default();
        start_game(&mut world, &mut io);

        world.powerup = PowerupState::Held;
        run_ticks(&mut world, &mut io, 200);
        assert!(world.powerup.is_held());

        // once the hold ends, the next period spawns one
        world.powerup = PowerupState::Absent;
        run_ticks(&mut world, &mut io, 50);
        assert!(matches!(world.powerup, PowerupState::Visible { .. }));
    }

    #[test]
    fn test_display_round_robin_and_player_override() {
        let mut world = new_world();
        let mut io = TestIo::default();
        start_game(&mut world, &mut io);
        io.paints.clear();

        run_ticks(&mut world, &mut io, GRID_COLS as u32 + 1);
        let cols: Vec<u8> = io.paints.iter().map(|(c, _)| *c).collect();
        assert_eq!(cols, vec![0, 1, 2, 3, 4, 0]);

        let player_col = world.player.col;
        for (col, paint) in &io.paints {
            match paint {
                ColumnPaint::Pattern { player, .. } => {
                    assert_eq!(player.is_some(), *col == player_col);
                }
                ColumnPaint::Flood => panic!("no flash expected"),
            }
        }
    }

    #[test]
    fn test_flash_floods_every_column() {
        let mut world = new_world();
        let mut io = TestIo::default();
        start_game(&mut world, &mut io);
        world.flash = Flash::On { ticks_left: 100 };
        io.paints.clear();

        run_ticks(&mut world, &mut io, GRID_COLS as u32);
        assert!(io.paints.iter().all(|(_, p)| *p == ColumnPaint::Flood));
    }

    #[test]
    fn test_determinism_with_identical_inputs() {
        let script = [
            InputSnapshot {
                east: true,
                ..Default::default()
            },
            InputSnapshot {
                north: true,
                ..Default::default()
            },
            InputSnapshot::default(),
            InputSnapshot {
                west: true,
                ..Default::default()
            },
        ];

        let mut results = Vec::new();
        for _ in 0..2 {
            let mut world = World::new(Tuning::default(), 4242);
            let mut io = TestIo::default();
            start_game(&mut world, &mut io);
            io.queued = script.iter().copied().cycle().take(200).collect();
            run_ticks(&mut world, &mut io, 30000);
            let patterns: Vec<u8> = (0..GRID_COLS).map(|c| world.grid.column_pattern(c)).collect();
            results.push((
                world.score,
                world.player.row,
                world.player.col,
                world.phase,
                patterns,
            ));
        }
        assert_eq!(results[0], results[1]);
    }
}
