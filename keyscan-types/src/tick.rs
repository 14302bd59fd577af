//! Scanner time base.
//!
//! All scanner timing is expressed in ticks of a free-running counter. The
//! counter wraps, so every comparison goes through [`elapsed`], which is
//! well-defined across the wrap as long as the measured interval is shorter
//! than `u32::MAX` ticks.

/// A reading of the monotonic tick counter.
pub type Tick = u32;

/// Rate of the tick counter.
pub const TICK_HZ: u32 = 1024;

/// Convert milliseconds to ticks, rounding down.
pub const fn ms_to_ticks(ms: u32) -> Tick {
    (ms as u64 * TICK_HZ as u64 / 1000) as Tick
}

/// Convert ticks to milliseconds, rounding down.
pub const fn ticks_to_ms(ticks: Tick) -> u32 {
    (ticks as u64 * 1000 / TICK_HZ as u64) as u32
}

/// Ticks elapsed from `since` to `now`.
#[inline]
pub const fn elapsed(now: Tick, since: Tick) -> Tick {
    now.wrapping_sub(since)
}
