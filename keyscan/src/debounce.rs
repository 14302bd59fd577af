//! Per-key time-window debouncing.
//!
//! A transition of a key is accepted only when more than the debounce window
//! has passed since that key's last accepted transition in the opposite
//! direction. The scanner compares each raw sample against the last accepted
//! state, not against the previous raw sample, so a bounce that flips the
//! level back and forth inside the window never produces an event and never
//! restarts the window.

use keyscan_types::{Tick, elapsed};

/// Debounce state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceState {
    /// The transition is accepted
    Debounced,
    /// The window since the opposite transition hasn't elapsed yet
    InProgress,
}

pub struct Debouncer<const ROW: usize, const COL: usize> {
    /// Tick of each key's last accepted press
    keydown: [[Option<Tick>; COL]; ROW],
    /// Tick of each key's last accepted release
    keyup: [[Option<Tick>; COL]; ROW],
    window: Tick,
}

impl<const ROW: usize, const COL: usize> Debouncer<ROW, COL> {
    pub fn new(window: Tick) -> Self {
        Debouncer {
            keydown: [[None; COL]; ROW],
            keyup: [[None; COL]; ROW],
            window,
        }
    }

    pub fn window(&self) -> Tick {
        self.window
    }

    /// Forget every recorded transition.
    pub fn reset(&mut self) {
        self.keydown = [[None; COL]; ROW];
        self.keyup = [[None; COL]; ROW];
    }

    /// Decide whether a raw level change of the key at `(row, col)` to
    /// `pressed` is accepted at `now`, and record it if it is.
    pub fn detect_change(&mut self, row: usize, col: usize, pressed: bool, now: Tick) -> DebounceState {
        let window = self.window;
        let (opposite, slot) = if pressed {
            (self.keyup[row][col], &mut self.keydown[row][col])
        } else {
            (self.keydown[row][col], &mut self.keyup[row][col])
        };

        // A key that never moved the other way has nothing to settle from
        let settled = opposite.is_none_or(|since| elapsed(now, since) > window);
        if !settled {
            return DebounceState::InProgress;
        }

        *slot = Some(now);
        DebounceState::Debounced
    }

    pub fn keydown_time(&self, row: usize, col: usize) -> Option<Tick> {
        self.keydown[row][col]
    }

    pub fn keyup_time(&self, row: usize, col: usize) -> Option<Tick> {
        self.keyup[row][col]
    }
}
