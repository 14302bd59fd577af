#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use keyscan::{InterruptFlag, Matrix, MatrixConfig, MatrixDriver, Platform, Tick};

pub const ROW: usize = 8;
pub const COL: usize = 8;

/// Length of a tick in nanoseconds, rounded up.
const TICK_NS: u64 = 976_563;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// A simulated 8x8 keyboard: the key contacts, the row selection and the
/// clock, shared between the fake driver and the fake platform.
#[derive(Default)]
pub struct Sim {
    pub now: Tick,
    /// Sub-tick time spent in busy waits
    pub ns: u64,
    /// Closed contacts, one column mask per row
    pub contacts: [u32; ROW],
    /// Rows currently driven low
    pub selected: u32,
    /// Column interrupt armed
    pub armed: bool,
    /// Contact changes still to happen: (tick, row, col, closed)
    pub schedule: Vec<(Tick, usize, usize, bool)>,
    /// Ticks at which a sleep ends early without any column edge
    pub spurious: Vec<Tick>,
    /// Ticks at which the armed column interrupt fires with no contact change
    pub glitches: Vec<Tick>,
    /// Requested duration of every `Platform::sleep` call
    pub sleeps: Vec<Tick>,
    pub reads: usize,
    pub inits: usize,
    pub deinits: usize,
    pub powered_off: bool,
    /// Row selection and interrupt arming at the moment of `power_off`
    pub standby_rows: u32,
    pub standby_armed: bool,
}

impl Sim {
    /// Column levels as seen through the selected rows.
    pub fn visible_columns(&self) -> u32 {
        (0..ROW)
            .filter(|row| self.selected & (1 << row) != 0)
            .fold(0, |cols, row| cols | self.contacts[row])
    }

    fn apply_due_changes(&mut self) {
        let now = self.now;
        let mut due: Vec<_> = self.schedule.iter().copied().filter(|&(at, ..)| at <= now).collect();
        due.sort_by_key(|&(at, ..)| at);
        self.schedule.retain(|&(at, ..)| at > now);
        for (_, row, col, closed) in due {
            if closed {
                self.contacts[row] |= 1 << col;
            } else {
                self.contacts[row] &= !(1 << col);
            }
        }
    }

    /// Advance the clock by one tick. Returns whether a column edge happened
    /// while the interrupt was armed.
    fn tick(&mut self) -> bool {
        let before = self.visible_columns();
        self.now = self.now.wrapping_add(1);
        self.apply_due_changes();
        // Columns are active low, a newly closed contact is a falling edge
        self.armed && self.visible_columns() & !before != 0
    }
}

pub type SharedSim = Rc<RefCell<Sim>>;

pub fn new_sim() -> SharedSim {
    Rc::new(RefCell::new(Sim::default()))
}

/// Close the contact of `key` right now.
pub fn press(sim: &SharedSim, key: u8) {
    let mut sim = sim.borrow_mut();
    sim.contacts[key as usize / COL] |= 1 << (key as usize % COL);
}

/// Open the contact of `key` right now.
pub fn release(sim: &SharedSim, key: u8) {
    let mut sim = sim.borrow_mut();
    sim.contacts[key as usize / COL] &= !(1 << (key as usize % COL));
}

/// Change the contact of `key` once the clock reaches `at`.
pub fn schedule(sim: &SharedSim, at: Tick, key: u8, closed: bool) {
    sim.borrow_mut()
        .schedule
        .push((at, key as usize / COL, key as usize % COL, closed));
}

/// Move the clock to `at`, applying every contact change on the way.
pub fn set_time(sim: &SharedSim, at: Tick) {
    let mut sim = sim.borrow_mut();
    sim.now = at;
    sim.ns = 0;
    sim.apply_due_changes();
}

pub struct FakeDriver {
    sim: SharedSim,
}

impl MatrixDriver<ROW, COL> for FakeDriver {
    fn init(&mut self) {
        let mut sim = self.sim.borrow_mut();
        sim.selected = 0;
        sim.armed = false;
        sim.inits += 1;
    }

    fn deinit(&mut self) {
        let mut sim = self.sim.borrow_mut();
        sim.selected = 0;
        sim.armed = false;
        sim.deinits += 1;
    }

    fn select_row(&mut self, row: usize) {
        self.sim.borrow_mut().selected |= 1 << row;
    }

    fn unselect_row(&mut self, row: usize) {
        self.sim.borrow_mut().selected &= !(1 << row);
    }

    fn read_columns(&mut self) -> u32 {
        let mut sim = self.sim.borrow_mut();
        sim.reads += 1;
        sim.visible_columns()
    }

    fn enable_interrupt(&mut self) {
        self.sim.borrow_mut().armed = true;
    }

    fn disable_interrupt(&mut self) {
        self.sim.borrow_mut().armed = false;
    }
}

pub struct FakePlatform<'a> {
    sim: SharedSim,
    irq: &'a InterruptFlag,
}

impl DelayNs for FakePlatform<'_> {
    fn delay_ns(&mut self, ns: u32) {
        let mut sim = self.sim.borrow_mut();
        sim.ns += ns as u64;
        while sim.ns >= TICK_NS {
            sim.ns -= TICK_NS;
            if sim.tick() {
                self.irq.signal();
            }
        }
    }
}

impl Platform for FakePlatform<'_> {
    fn now(&self) -> Tick {
        self.sim.borrow().now
    }

    fn sleep(&mut self, ticks: Tick) {
        let mut sim = self.sim.borrow_mut();
        sim.sleeps.push(ticks);
        sim.ns = 0;
        for _ in 0..ticks {
            if sim.tick() {
                self.irq.signal();
                return;
            }
            let now = sim.now;
            if let Some(index) = sim.glitches.iter().position(|&at| at == now) {
                sim.glitches.remove(index);
                if sim.armed {
                    self.irq.signal();
                    return;
                }
            }
            if let Some(index) = sim.spurious.iter().position(|&at| at == now) {
                sim.spurious.remove(index);
                return;
            }
        }
    }

    fn power_off(&mut self) {
        let mut sim = self.sim.borrow_mut();
        sim.powered_off = true;
        sim.standby_rows = sim.selected;
        sim.standby_armed = sim.armed;
    }
}

pub type TestMatrix<'a> = Matrix<'a, FakeDriver, FakePlatform<'a>, ROW, COL>;

/// An initialized 8x8 matrix over a fresh simulation, debounce window of 5
/// ticks.
pub fn create_test_matrix(irq: &InterruptFlag) -> (TestMatrix<'_>, SharedSim) {
    create_test_matrix_with_config(irq, MatrixConfig::default().with_debounce_ticks(5))
}

pub fn create_test_matrix_with_config(irq: &InterruptFlag, config: MatrixConfig) -> (TestMatrix<'_>, SharedSim) {
    let sim = new_sim();
    let driver = FakeDriver { sim: sim.clone() };
    let platform = FakePlatform { sim: sim.clone(), irq };
    let mut matrix = Matrix::new(driver, platform, irq, config);
    matrix.init();
    (matrix, sim)
}

/// Pop every queued event as raw bytes.
pub fn drain(matrix: &mut TestMatrix<'_>) -> Vec<u8> {
    core::iter::from_fn(|| matrix.pop()).map(|event| event.as_byte()).collect()
}
