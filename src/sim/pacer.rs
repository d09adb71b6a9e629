//! Software rate division of the hardware tick
//!
//! One fixed tick rate drives every subsystem; each subsystem owns a
//! [`RateDivider`] that fires at its own lower logical rate. On fire the
//! accumulator resets to zero rather than subtracting the threshold, so
//! remainder ticks are discarded and the effective period is the ceiling
//! of the ideal one. The resulting slow drift is accepted behavior.

/// Accumulate-and-reset counter turning the tick rate into a lower rate
#[derive(Debug, Clone)]
pub struct RateDivider {
    accumulated: u32,
    threshold: u32,
}

impl RateDivider {
    /// Divider firing once every `threshold` ticks (floored at 1)
    pub fn new(threshold: u32) -> Self {
        Self {
            accumulated: 0,
            threshold: threshold.max(1),
        }
    }

    /// Count one tick; true exactly when the divider fires
    pub fn tick(&mut self) -> bool {
        self.accumulated += 1;
        if self.accumulated >= self.threshold {
            self.accumulated = 0;
            true
        } else {
            false
        }
    }

    /// Count one tick while the event itself is gated off. The count keeps
    /// growing past the threshold, so an event that came due during the
    /// gate fires on the first ordinary [`RateDivider::tick`] afterwards.
    pub fn tick_gated(&mut self) {
        self.accumulated += 1;
    }

    /// Recompute the period between fires (difficulty ramp); takes effect
    /// on the next comparison, floored at 1 so the divider can never stall
    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold.max(1);
    }

    /// Restart the current period from zero
    pub fn reset(&mut self) {
        self.accumulated = 0;
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

/// Ticks between events for a rate given in events per second
pub fn ticks_per_event(tick_rate: u32, hz: u32) -> u32 {
    (tick_rate / hz.max(1)).max(1)
}

/// Ticks between events for a rate given in events per minute
pub fn ticks_for_per_minute(tick_rate: u32, per_minute: u32) -> u32 {
    (tick_rate * 60 / per_minute.max(1)).max(1)
}
