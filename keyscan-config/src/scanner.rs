// Scanner constants

use serde::{Deserialize as SerdeDeserialize, de};
use serde_derive::Deserialize;
use serde_inline_default::serde_inline_default;

/// The `[scanner]` table: timing and buffer sizing of the matrix scanner.
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScannerConstantsConfig {
    /// Minimum interval between opposite transitions of one key, in ticks (1/1024 s)
    #[serde_inline_default(5)]
    pub debounce_ticks: u32,
    /// Capacity of the event queue, must be a power of two
    #[serde_inline_default(64)]
    #[serde(deserialize_with = "check_event_queue_size")]
    pub event_queue_size: usize,
    /// Longest single sleep while a key is held, in ticks
    #[serde_inline_default(4)]
    #[serde(deserialize_with = "check_active_poll_ticks")]
    pub active_poll_ticks: u32,
    /// Row settle time before reading the columns, in microseconds
    #[serde_inline_default(1)]
    pub settle_us: u32,
    /// Interval between the two "all released" checks before standby, in ms
    #[serde_inline_default(10)]
    pub standby_settle_ms: u32,
}

fn check_event_queue_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value: usize = SerdeDeserialize::deserialize(deserializer)?;
    if !value.is_power_of_two() || !(2..=1024).contains(&value) {
        return Err(de::Error::custom(format!(
            "event_queue_size must be a power of two between 2 and 1024, got {value}"
        )));
    }
    Ok(value)
}

fn check_active_poll_ticks<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: de::Deserializer<'de>,
{
    let value: u32 = SerdeDeserialize::deserialize(deserializer)?;
    if !(1..=4).contains(&value) {
        return Err(de::Error::custom(format!(
            "active_poll_ticks must be between 1 and 4, got {value}"
        )));
    }
    Ok(value)
}

/// This separate Default impl is needed when `[scanner]` section is not set in keyboard.toml
impl Default for ScannerConstantsConfig {
    fn default() -> Self {
        Self {
            debounce_ticks: 5,
            event_queue_size: 64,
            active_poll_ticks: 4,
            settle_us: 1,
            standby_settle_ms: 10,
        }
    }
}
