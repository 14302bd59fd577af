use embedded_hal::delay::DelayNs;
use keyscan_types::Tick;

/// Everything the scanner needs from the chip besides the matrix pins: a tick
/// counter, a sleep primitive and the power switch.
///
/// Short busy waits (row settle, standby re-check) go through [`DelayNs`].
pub trait Platform: DelayNs {
    /// Current value of the monotonic tick counter, running at
    /// [`TICK_HZ`](keyscan_types::TICK_HZ).
    fn now(&self) -> Tick;

    /// Put the core to sleep until an enabled interrupt fires or `ticks`
    /// elapse. Returning early is allowed, callers re-check the clock.
    fn sleep(&mut self, ticks: Tick);

    /// Cut power to the core domain. Only a reset, triggered by an armed wake
    /// source, brings the system back, so on hardware this never returns.
    fn power_off(&mut self);
}
