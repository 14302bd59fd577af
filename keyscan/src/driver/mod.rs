//! Row/column pin access.

pub mod gpio;

pub use gpio::{EdgeInterrupt, GpioMatrixDriver};

/// Pin-level access to a `ROW` x `COL` key matrix.
///
/// The matrix is active-low: a selected row is driven low, columns are pulled
/// up, and a pressed key pulls its column low through the selected row.
pub trait MatrixDriver<const ROW: usize, const COL: usize> {
    /// Drive every row high (unselected), pull every column up and attach the
    /// shared column interrupt handler.
    fn init(&mut self);

    /// Disarm and detach the interrupt and unselect every row.
    ///
    /// The pins keep their modes: embedded-hal has no way to turn an output
    /// back into a floating input. Drivers that own the pins hand them back
    /// to the HAL for that, see [`GpioMatrixDriver::release`].
    fn deinit(&mut self);

    /// Drive row `row` low.
    fn select_row(&mut self, row: usize);

    /// Drive row `row` high.
    fn unselect_row(&mut self, row: usize);

    fn select_all_rows(&mut self) {
        for row in 0..ROW {
            self.select_row(row);
        }
    }

    fn unselect_all_rows(&mut self) {
        for row in 0..ROW {
            self.unselect_row(row);
        }
    }

    /// Sample every column once. Bit `c` is set when column `c` reads low.
    fn read_columns(&mut self) -> u32;

    /// Arm the edge interrupt of every column.
    fn enable_interrupt(&mut self);

    /// Disarm the edge interrupt of every column.
    fn disable_interrupt(&mut self);
}
