//! # keyscan
//!
//! Debounced scanner for diode-less or diode-isolated keyboard matrices
//! wired with active-low rows and pulled-up, active-low columns.
//!
//! The [`Matrix`] samples the keys through a [`MatrixDriver`], filters contact
//! bounce per key and queues one [`KeyEvent`] byte per accepted transition.
//! Between scans it sleeps through the [`Platform`], waking early on the
//! column interrupt signalled through an [`InterruptFlag`].
//!
//! ## Feature flags
#![doc = document_features::document_features!()]
#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("The `defmt` and `log` features are mutually exclusive");

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

// Build-time constants generated from `keyboard.toml`. `MATRIX_ROWS` and
// `MATRIX_COLS` are the size of its `[matrix]` table, 0 when there is none.
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod config;
pub mod debounce;
pub mod driver;
pub mod interrupt;
pub mod matrix;
pub mod platform;
pub mod queue;

pub use config::MatrixConfig;
pub use driver::{EdgeInterrupt, GpioMatrixDriver, MatrixDriver};
pub use interrupt::InterruptFlag;
pub use keyscan_types::{KeyEvent, MAX_KEYS, TICK_HZ, Tick, elapsed, key_index, ms_to_ticks, ticks_to_ms};
pub use matrix::Matrix;
pub use platform::Platform;
pub use queue::EventQueue;
