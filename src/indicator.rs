//! Status indicator - blinks at the period of the current connection state.
//!
//! The indicator runs on its own timer. Each cycle it drives the next
//! level and then re-arms with whatever period the connection state
//! dictates at that moment; a state change never cuts a running cycle.

use crate::connection::{ConnectionCell, IndicatorPeriod};

#[derive(Debug, Default)]
pub struct Indicator {
    lit: bool,
}

impl Indicator {
    /// Starts dark; the first [`step`](Self::step) drives the output low.
    pub const fn new() -> Self {
        Self { lit: false }
    }

    /// Level to drive for this cycle. Alternates on every call.
    pub fn step(&mut self) -> bool {
        let level = self.lit;
        self.lit = !self.lit;
        level
    }

    /// Period to re-arm the timer with after this cycle.
    pub fn next_period(&self, connection: &ConnectionCell) -> IndicatorPeriod {
        connection.indicator_period()
    }
}
