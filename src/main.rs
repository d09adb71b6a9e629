//! Gap Runner terminal host
//!
//! Implements the platform contracts on top of a crossterm raw-mode
//! terminal: the 7x5 matrix is drawn as character cells, the nav switch is
//! the arrow keys, space is the action button, enter starts a game and `q`
//! quits. The simulation still runs at the full configured tick rate; only
//! terminal flushes are throttled to a human refresh rate.

use std::cell::Cell;
use std::io::{self, Stdout, Write, stdout};
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::Print,
    terminal,
};

use gap_runner::Tuning;
use gap_runner::consts::{DEFAULT_SEED, GRID_COLS, GRID_ROWS};
use gap_runner::platform::{
    ColumnPaint, InputAdapter, RenderAdapter, SleepTicker, TextInterface, TickSource,
};
use gap_runner::sim::{InputSnapshot, World, run};

/// Terminal flush cadence; the sim paints columns far faster than a
/// terminal can usefully redraw
const FLUSH_INTERVAL: Duration = Duration::from_millis(33);

/// Attract-mode marquee advances one character per this many ticks
const SCROLL_TICKS_PER_STEP: u32 = 33;

/// Visible width of the marquee window, in characters
const MARQUEE_WIDTH: usize = 24;

const EMPTY_PAINT: ColumnPaint = ColumnPaint::Pattern {
    bits: 0,
    player: None,
    powerup: None,
};

/// Tick source that also honors the host quit flag
struct HostTicker {
    inner: SleepTicker,
    quit: Rc<Cell<bool>>,
}

impl TickSource for HostTicker {
    fn wait_for_next_tick(&mut self) -> bool {
        if self.quit.get() {
            return false;
        }
        self.inner.wait_for_next_tick()
    }
}

/// Raw-mode terminal implementing input, render and text contracts
struct Terminal {
    out: Stdout,
    quit: Rc<Cell<bool>>,
    columns: [ColumnPaint; GRID_COLS as usize],
    held: bool,
    message: Option<String>,
    scroll: usize,
    scroll_ticks: u32,
    last_flush: Instant,
}

impl Terminal {
    fn new(quit: Rc<Cell<bool>>) -> io::Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        Ok(Self {
            out,
            quit,
            columns: [EMPTY_PAINT; GRID_COLS as usize],
            held: false,
            message: None,
            scroll: 0,
            scroll_ticks: 0,
            last_flush: Instant::now(),
        })
    }

    fn restore(&mut self) -> io::Result<()> {
        execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Two-character glyph for one cell of one column paint
    fn cell(&self, paint: &ColumnPaint, row: u8) -> &'static str {
        match paint {
            ColumnPaint::Flood => "██",
            ColumnPaint::Pattern {
                bits,
                player,
                powerup,
            } => {
                // indicator overrides force the row state at paint time
                if let Some(p) = player {
                    if p.row == row {
                        return if p.on { "()" } else { "  " };
                    }
                }
                if let Some(p) = powerup {
                    if p.row == row {
                        return if p.on { "<>" } else { "  " };
                    }
                }
                if bits & (1 << row) != 0 { "██" } else { "  " }
            }
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        queue!(self.out, cursor::MoveTo(0, 0))?;
        let border = "+".to_string() + &"-".repeat(GRID_COLS as usize * 2) + "+";
        queue!(self.out, Print(&border), cursor::MoveToNextLine(1))?;
        for row in 0..GRID_ROWS {
            queue!(self.out, Print("|"))?;
            for col in 0..GRID_COLS {
                let glyph = self.cell(&self.columns[col as usize], row);
                queue!(self.out, Print(glyph))?;
            }
            queue!(self.out, Print("|"), cursor::MoveToNextLine(1))?;
        }
        queue!(self.out, Print(&border), cursor::MoveToNextLine(1))?;

        let status = if self.held { "powerup ready [space]" } else { "" };
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(status),
            cursor::MoveToNextLine(1)
        )?;

        let marquee = self.marquee_window();
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(marquee),
            cursor::MoveToNextLine(1),
            Print("arrows: move   enter: start   q: quit")
        )?;
        self.out.flush()
    }

    /// Current window of the scrolling message, empty when cleared
    fn marquee_window(&self) -> String {
        let Some(message) = &self.message else {
            return String::new();
        };
        // pad so the text scrolls fully in from the right and out the left
        let padded = format!("{:width$}{message}", "", width = MARQUEE_WIDTH);
        let chars: Vec<char> = padded.chars().collect();
        let start = self.scroll % chars.len();
        (0..MARQUEE_WIDTH)
            .map(|i| chars[(start + i) % chars.len()])
            .collect()
    }

    fn flush_if_due(&mut self) {
        if self.last_flush.elapsed() >= FLUSH_INTERVAL {
            self.last_flush = Instant::now();
            if let Err(e) = self.draw() {
                log::warn!("terminal draw failed: {e}");
            }
        }
    }
}

impl InputAdapter for Terminal {
    fn poll(&mut self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        while event::poll(Duration::ZERO).unwrap_or(false) {
            let Ok(Event::Key(key)) = event::read() else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Up => snapshot.north = true,
                KeyCode::Down => snapshot.south = true,
                KeyCode::Left => snapshot.west = true,
                KeyCode::Right => snapshot.east = true,
                KeyCode::Char(' ') => snapshot.action = true,
                KeyCode::Enter => snapshot.start = true,
                KeyCode::Char('q') | KeyCode::Esc => self.quit.set(true),
                _ => {}
            }
        }
        snapshot
    }
}

impl RenderAdapter for Terminal {
    fn paint_column(&mut self, col: u8, paint: ColumnPaint) {
        self.columns[col as usize] = paint;
        // flush once per completed refresh sweep, rate limited
        if col == GRID_COLS - 1 {
            self.flush_if_due();
        }
    }

    fn set_held_indicator(&mut self, held: bool) {
        self.held = held;
    }
}

impl TextInterface for Terminal {
    fn show_welcome(&mut self) {
        self.message = Some("Welcome to Gap Runner. Press enter to start.".into());
        self.scroll = 0;
    }

    fn show_game_over(&mut self, score: u32) {
        self.message = Some(format!("GAME OVER. SCORE: {score}. Enter restarts."));
        self.scroll = 0;
    }

    fn clear(&mut self) {
        self.message = None;
        self.columns = [EMPTY_PAINT; GRID_COLS as usize];
    }

    fn update(&mut self) {
        self.scroll_ticks += 1;
        if self.scroll_ticks >= SCROLL_TICKS_PER_STEP {
            self.scroll_ticks = 0;
            self.scroll += 1;
        }
        self.flush_if_due();
    }
}

fn main() -> io::Result<()> {
    env_logger::init();

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load(&path),
        None => Tuning::default(),
    };
    let seed = std::env::var("GAP_RUNNER_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);

    let mut world = World::new(tuning.clone(), seed);
    let quit = Rc::new(Cell::new(false));
    let mut ticker = HostTicker {
        inner: SleepTicker::new(tuning.tick_rate),
        quit: Rc::clone(&quit),
    };
    let mut term = Terminal::new(quit)?;

    run(&mut world, &mut ticker, &mut term);

    term.restore()
}
