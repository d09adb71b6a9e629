//! Deterministic simulation core
//!
//! All gameplay logic lives here. This module must stay pure and
//! deterministic:
//! - Fixed tick rate only, divided in software per subsystem
//! - Seeded RNG only
//! - No rendering or platform dependencies beyond the adapter traits

pub mod grid;
pub mod pacer;
pub mod player;
pub mod powerup;
pub mod state;
pub mod tick;

pub use grid::{Difficulty, Phase, PlatformGrid};
pub use pacer::{RateDivider, ticks_for_per_minute, ticks_per_event};
pub use player::{Direction, Player};
pub use powerup::PowerupState;
pub use state::{Changeover, Flash, Mode, World};
pub use tick::{InputSnapshot, run, tick};
