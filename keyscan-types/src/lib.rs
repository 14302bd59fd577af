//! Types shared between the keyscan matrix scanner and its consumers.
#![cfg_attr(not(test), no_std)]

pub mod event;
pub mod tick;

pub use event::{KeyEvent, MAX_KEYS, key_index};
pub use tick::{TICK_HZ, Tick, elapsed, ms_to_ticks, ticks_to_ms};
