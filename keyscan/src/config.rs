use keyscan_types::Tick;

use crate::{ACTIVE_POLL_TICKS, DEBOUNCE_TICKS, SETTLE_US, STANDBY_SETTLE_MS};

/// Init-time configuration of a [`Matrix`](crate::matrix::Matrix).
///
/// The defaults come from the `[scanner]` table of the `keyboard.toml` the
/// crate was built with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixConfig {
    /// Minimum interval since a key's last opposite transition before a new
    /// transition of that key is accepted, in ticks
    pub debounce_ticks: Tick,
    /// Longest single sleep while a key is held, in ticks
    pub active_poll_ticks: Tick,
    /// Time between selecting a row and reading the columns, in microseconds
    pub settle_us: u32,
    /// Time between the two "all keys released" checks before standby, in milliseconds
    pub standby_settle_ms: u32,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            debounce_ticks: DEBOUNCE_TICKS,
            active_poll_ticks: ACTIVE_POLL_TICKS,
            settle_us: SETTLE_US,
            standby_settle_ms: STANDBY_SETTLE_MS,
        }
    }
}

impl MatrixConfig {
    pub fn with_debounce_ticks(mut self, debounce_ticks: Tick) -> Self {
        self.debounce_ticks = debounce_ticks;
        self
    }

    pub fn with_active_poll_ticks(mut self, active_poll_ticks: Tick) -> Self {
        // A zero-tick sleep would turn the active wait into a busy loop
        self.active_poll_ticks = active_poll_ticks.max(1);
        self
    }
}
