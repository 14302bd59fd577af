use embedded_hal::digital::{InputPin, OutputPin};

use super::MatrixDriver;

/// The edge interrupt shared by all column pins.
///
/// The board binds this to its GPIO interrupt controller. The installed
/// handler must do nothing but [`InterruptFlag::signal`](crate::InterruptFlag::signal).
/// Use whichever edge sense reports a column changing level while the rows
/// are selected: toggle sense, or falling edge when only presses should wake.
pub trait EdgeInterrupt {
    /// Install the handler on every column pin.
    fn attach(&mut self) {}

    /// Remove the handler from every column pin.
    fn detach(&mut self) {}

    /// Arm the interrupt.
    fn enable(&mut self);

    /// Disarm the interrupt.
    fn disable(&mut self);
}

/// Column input of an active-low matrix.
trait ActiveIn {
    fn is_active(&mut self) -> bool;
}

impl<In: InputPin> ActiveIn for In {
    fn is_active(&mut self) -> bool {
        self.is_low().ok().unwrap_or_default()
    }
}

/// Row output of an active-low matrix.
trait ActiveOut {
    fn activate(&mut self);
    fn deactivate(&mut self);
}

impl<Out: OutputPin> ActiveOut for Out {
    fn activate(&mut self) {
        self.set_low().ok();
    }

    fn deactivate(&mut self) {
        self.set_high().ok();
    }
}

/// [`MatrixDriver`] over embedded-hal pins.
///
/// Row pins must be push-pull outputs and column pins inputs with pull-ups,
/// configured by the HAL when the pins are created. Pin errors read as "not
/// pressed".
pub struct GpioMatrixDriver<In: InputPin, Out: OutputPin, Irq: EdgeInterrupt, const ROW: usize, const COL: usize> {
    /// Row pins of the pcb matrix, are always output pins
    row_pins: [Out; ROW],
    /// Column pins of the pcb matrix, are always input pins
    col_pins: [In; COL],
    /// Shared column interrupt
    irq: Irq,
}

impl<In: InputPin, Out: OutputPin, Irq: EdgeInterrupt, const ROW: usize, const COL: usize>
    GpioMatrixDriver<In, Out, Irq, ROW, COL>
{
    /// Create a driver from row and column pins.
    pub fn new(row_pins: [Out; ROW], col_pins: [In; COL], irq: Irq) -> Self {
        GpioMatrixDriver {
            row_pins,
            col_pins,
            irq,
        }
    }

    /// Give the pins and the interrupt back, so that the HAL can return them
    /// to their reset state.
    pub fn release(self) -> ([Out; ROW], [In; COL], Irq) {
        (self.row_pins, self.col_pins, self.irq)
    }
}

impl<In: InputPin, Out: OutputPin, Irq: EdgeInterrupt, const ROW: usize, const COL: usize> MatrixDriver<ROW, COL>
    for GpioMatrixDriver<In, Out, Irq, ROW, COL>
{
    fn init(&mut self) {
        for row_pin in self.row_pins.iter_mut() {
            row_pin.deactivate();
        }
        self.irq.attach();
    }

    fn deinit(&mut self) {
        self.irq.disable();
        self.irq.detach();
        for row_pin in self.row_pins.iter_mut() {
            row_pin.deactivate();
        }
    }

    fn select_row(&mut self, row: usize) {
        if let Some(row_pin) = self.row_pins.get_mut(row) {
            row_pin.activate();
        }
    }

    fn unselect_row(&mut self, row: usize) {
        if let Some(row_pin) = self.row_pins.get_mut(row) {
            row_pin.deactivate();
        }
    }

    fn read_columns(&mut self) -> u32 {
        self.col_pins
            .iter_mut()
            .enumerate()
            .fold(0, |cols, (col, pin)| if pin.is_active() { cols | 1 << col } else { cols })
    }

    fn enable_interrupt(&mut self) {
        self.irq.enable();
    }

    fn disable_interrupt(&mut self) {
        self.irq.disable();
    }
}
