use keyscan_types::{KeyEvent, MAX_KEYS, Tick, elapsed, key_index};

use crate::{EVENT_QUEUE_SIZE, MATRIX_COLS, MATRIX_ROWS};
use crate::config::MatrixConfig;
use crate::debounce::{DebounceState, Debouncer};
use crate::driver::MatrixDriver;
use crate::interrupt::InterruptFlag;
use crate::platform::Platform;
use crate::queue::EventQueue;

/// Keyboard matrix scanner.
///
/// The matrix owns the pin driver and the platform, keeps the raw and the
/// debounced state of every key, and appends every accepted transition to an
/// event queue that the application drains with [`Matrix::pop`].
///
/// [`Matrix::scan`] samples the matrix once and never blocks. [`Matrix::wait`]
/// scans, then sleeps between scans until something happens or the timeout
/// runs out: while a key is held it wakes every few ticks, while nothing is
/// held it arms the column interrupt and sleeps through the whole timeout.
pub struct Matrix<'a, D: MatrixDriver<ROW, COL>, P: Platform, const ROW: usize, const COL: usize> {
    /// Row/column pins
    driver: D,
    /// Tick counter, sleep and power control
    platform: P,
    /// Raised by the column interrupt handler
    irq: &'a InterruptFlag,
    config: MatrixConfig,
    debouncer: Debouncer<ROW, COL>,
    /// Columns read as pressed in the last scan, per row
    raw: [u32; ROW],
    /// Columns whose reported state is pressed, per row
    debounced: [u32; ROW],
    /// Union of `raw` and `debounced` over all rows
    active: u32,
    queue: EventQueue<EVENT_QUEUE_SIZE>,
    initialized: bool,
}

impl<'a, D: MatrixDriver<ROW, COL>, P: Platform, const ROW: usize, const COL: usize> Matrix<'a, D, P, ROW, COL> {
    const COL_MASK: u32 = {
        assert!(ROW > 0, "matrix needs at least one row");
        assert!(COL > 0 && COL <= 32, "matrix columns must fit in a u32");
        assert!(ROW * COL <= MAX_KEYS, "key index must fit in 7 bits");
        assert!(
            MATRIX_ROWS == 0 || (MATRIX_ROWS == ROW && MATRIX_COLS == COL),
            "matrix size differs from the [matrix] table of keyboard.toml"
        );
        if COL == 32 { u32::MAX } else { (1 << COL) - 1 }
    };

    /// Create a matrix. The pins are left untouched until [`Matrix::init`].
    pub fn new(driver: D, platform: P, irq: &'a InterruptFlag, config: MatrixConfig) -> Self {
        let _ = Self::COL_MASK;
        Matrix {
            driver,
            platform,
            irq,
            debouncer: Debouncer::new(config.debounce_ticks),
            config,
            raw: [0; ROW],
            debounced: [0; ROW],
            active: 0,
            queue: EventQueue::new(),
            initialized: false,
        }
    }

    /// Configure the pins and clear all key state and queued events.
    ///
    /// Initializing twice deinitializes the stale state first.
    pub fn init(&mut self) {
        if self.initialized {
            warn!("Matrix is already initialized, reinitializing");
            self.driver.deinit();
        }
        self.driver.init();
        self.raw = [0; ROW];
        self.debounced = [0; ROW];
        self.active = 0;
        self.debouncer.reset();
        self.queue.clear();
        self.irq.clear();
        self.initialized = true;
        debug!("Matrix {}x{} initialized, debounce {} ticks", ROW, COL, self.config.debounce_ticks);
    }

    /// Disarm the column interrupt and unselect every row. Queued events
    /// stay readable.
    ///
    /// Returning the pins to their floating reset state is up to the HAL,
    /// after [`Matrix::release`] hands the driver back.
    pub fn deinit(&mut self) {
        if !self.initialized {
            return;
        }
        self.driver.deinit();
        self.initialized = false;
        debug!("Matrix deinitialized");
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Deinitialize and hand back the driver and the platform.
    pub fn release(mut self) -> (D, P) {
        self.deinit();
        (self.driver, self.platform)
    }

    /// Sample every row once, debounce and queue the accepted transitions.
    ///
    /// Returns the number of unread events.
    pub fn scan(&mut self) -> usize {
        if !self.initialized {
            warn!("Scan on an uninitialized matrix");
            return self.depth();
        }

        let now = self.platform.now();
        let mut active = 0;
        for row in 0..ROW {
            // Select the row, wait for the change to propagate, then sample
            self.driver.select_row(row);
            self.platform.delay_us(self.config.settle_us);
            let cols = self.driver.read_columns() & Self::COL_MASK;
            self.driver.unselect_row(row);
            self.raw[row] = cols;

            // Compare against the accepted state, not the previous sample
            let mut changed = cols ^ self.debounced[row];
            while changed != 0 {
                let col = changed.trailing_zeros() as usize;
                changed &= changed - 1;

                let pressed = cols & (1 << col) != 0;
                let key = key_index(row, col, COL);
                match self.debouncer.detect_change(row, col, pressed, now) {
                    DebounceState::Debounced => {
                        self.debounced[row] ^= 1 << col;
                        let event = if pressed {
                            KeyEvent::press(key)
                        } else {
                            KeyEvent::release(key)
                        };
                        debug!("Key {} {} at tick {}", key, if pressed { "down" } else { "up" }, now);
                        self.queue.push(event);
                    }
                    DebounceState::InProgress => {
                        trace!("Key {} bounce rejected at tick {}", key, now);
                    }
                }
            }
            active |= cols | self.debounced[row];
        }
        self.active = active;

        self.depth()
    }

    /// Wait up to `timeout` ticks for key activity, sleeping as much as
    /// possible, and return the number of unread events.
    ///
    /// A zero timeout is a plain [`Matrix::scan`].
    pub fn wait(&mut self, timeout: Tick) -> usize {
        if timeout == 0 {
            return self.scan();
        }
        if !self.initialized {
            warn!("Wait on an uninitialized matrix");
            return self.depth();
        }

        let start = self.platform.now();
        if self.active != 0 {
            self.wait_active(start, timeout)
        } else {
            self.wait_idle(start, timeout)
        }
    }

    /// At least one key is down: rescan every few ticks.
    ///
    /// Rows with a pressed key stay unselected while sleeping, otherwise the
    /// held key would pin its column low and mask edges from other rows.
    fn wait_active(&mut self, start: Tick, timeout: Tick) -> usize {
        loop {
            let produced = self.queue.produced();
            let depth = self.scan();
            if self.queue.produced() != produced {
                return depth;
            }

            let spent = elapsed(self.platform.now(), start);
            if spent >= timeout {
                return depth;
            }
            if self.active == 0 {
                // Only a rejected bounce kept us here, nothing is held anymore
                return self.wait_idle(start, timeout);
            }

            for row in 0..ROW {
                if self.raw[row] == 0 {
                    self.driver.select_row(row);
                }
            }
            let step = (timeout - spent).min(self.config.active_poll_ticks);
            let fired = self.sleep_on_columns(step);
            self.driver.unselect_all_rows();
            trace!("Active wait woke up, column interrupt: {}", fired);
        }
    }

    /// Nothing is down: arm the column interrupt and sleep through the whole
    /// remaining timeout, scanning only if a column turned out to be asserted.
    fn wait_idle(&mut self, start: Tick, timeout: Tick) -> usize {
        self.driver.select_all_rows();
        self.platform.delay_us(self.config.settle_us);
        let asserted = self.driver.read_columns() & Self::COL_MASK != 0;

        let mut fired = false;
        if !asserted {
            self.irq.clear();
            self.driver.enable_interrupt();
            loop {
                let spent = elapsed(self.platform.now(), start);
                if spent >= timeout || self.irq.is_set() {
                    break;
                }
                // Anything but a column edge or the timer expiring sends us back to sleep
                self.platform.sleep(timeout - spent);
            }
            self.driver.disable_interrupt();
            fired = self.irq.is_set();
        }
        self.driver.unselect_all_rows();

        if asserted || fired {
            trace!("Idle wait woke up, asserted: {}, column interrupt: {}", asserted, fired);
            self.scan()
        } else {
            self.depth()
        }
    }

    /// Sleep at most `ticks` with the column interrupt armed on the currently
    /// selected rows. Returns whether a column interrupt fired.
    fn sleep_on_columns(&mut self, ticks: Tick) -> bool {
        self.irq.clear();
        self.driver.enable_interrupt();
        self.platform.sleep(ticks);
        self.driver.disable_interrupt();
        self.irq.is_set()
    }

    /// Wait until every key is released, arm the column interrupt and power
    /// the core down.
    ///
    /// All rows stay selected so that any key press raises the wake-up edge.
    /// The system restarts from reset, so on hardware this never returns.
    pub fn standby(&mut self) {
        if !self.initialized {
            warn!("Standby on an uninitialized matrix");
            return;
        }

        info!("Waiting for all keys to be released before standby");
        self.driver.select_all_rows();
        loop {
            self.platform.delay_us(self.config.settle_us);
            if self.driver.read_columns() & Self::COL_MASK == 0 {
                // Contacts may still chatter while the key comes up, check again later
                self.platform.delay_ms(self.config.standby_settle_ms);
                if self.driver.read_columns() & Self::COL_MASK == 0 {
                    break;
                }
            } else {
                self.platform.delay_ms(1);
            }
        }

        self.irq.clear();
        self.driver.enable_interrupt();
        info!("Entering standby");
        self.platform.power_off();
    }

    /// Remove and return the oldest unread event.
    pub fn pop(&mut self) -> Option<KeyEvent> {
        self.queue.pop()
    }

    /// The unread event `offset` places after the oldest one.
    pub fn peek(&self, offset: usize) -> Option<KeyEvent> {
        self.queue.peek(offset)
    }

    /// Number of unread events.
    pub fn depth(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Unread events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = KeyEvent> + '_ {
        self.queue.iter()
    }

    /// Number of events lost because the queue was full.
    pub fn overflows(&self) -> u32 {
        self.queue.overflows()
    }

    /// Tick of the last accepted press of `key`.
    pub fn keydown_time(&self, key: u8) -> Option<Tick> {
        let (row, col) = Self::position(key)?;
        self.debouncer.keydown_time(row, col)
    }

    /// Tick of the last accepted release of `key`.
    pub fn keyup_time(&self, key: u8) -> Option<Tick> {
        let (row, col) = Self::position(key)?;
        self.debouncer.keyup_time(row, col)
    }

    /// Debounced state of `key`.
    pub fn is_pressed(&self, key: u8) -> bool {
        Self::position(key).is_some_and(|(row, col)| self.debounced[row] & (1 << col) != 0)
    }

    /// Whether the last scan saw any key raw-pressed or debounced-pressed.
    pub fn is_active(&self) -> bool {
        self.active != 0
    }

    /// Columns read as pressed on `row` in the last scan.
    pub fn raw(&self, row: usize) -> u32 {
        self.raw.get(row).copied().unwrap_or_default()
    }

    /// Columns reported as pressed on `row`.
    pub fn debounced(&self, row: usize) -> u32 {
        self.debounced.get(row).copied().unwrap_or_default()
    }

    /// Current tick.
    pub fn now(&self) -> Tick {
        self.platform.now()
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    pub const fn rows(&self) -> usize {
        ROW
    }

    pub const fn cols(&self) -> usize {
        COL
    }

    pub const fn keys(&self) -> usize {
        ROW * COL
    }

    fn position(key: u8) -> Option<(usize, usize)> {
        let key = key as usize;
        (key < ROW * COL).then_some((key / COL, key % COL))
    }
}
