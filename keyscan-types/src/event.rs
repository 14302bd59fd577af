//! Key transition events.
//!
//! An event is a single byte: the low 7 bits carry the key index
//! (`row * cols + col`), the high bit is set for a release and clear for a
//! press.

/// Number of key indices an event byte can carry.
pub const MAX_KEYS: usize = 128;

const RELEASE: u8 = 0x80;
const KEY_MASK: u8 = 0x7F;

/// Key index of the key at `(row, col)` in a matrix with `cols` columns.
pub const fn key_index(row: usize, col: usize, cols: usize) -> u8 {
    (row * cols + col) as u8
}

/// A debounced key transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct KeyEvent(u8);

impl KeyEvent {
    /// Key `key` went down.
    pub const fn press(key: u8) -> Self {
        KeyEvent(key & KEY_MASK)
    }

    /// Key `key` went up.
    pub const fn release(key: u8) -> Self {
        KeyEvent(RELEASE | (key & KEY_MASK))
    }

    pub const fn from_byte(byte: u8) -> Self {
        KeyEvent(byte)
    }

    pub const fn as_byte(self) -> u8 {
        self.0
    }

    /// Key index, `row * cols + col`.
    pub const fn key(self) -> u8 {
        self.0 & KEY_MASK
    }

    pub const fn is_press(self) -> bool {
        self.0 & RELEASE == 0
    }

    pub const fn is_release(self) -> bool {
        !self.is_press()
    }

    /// Row of the key in a matrix with `cols` columns.
    pub const fn row(self, cols: usize) -> usize {
        self.key() as usize / cols
    }

    /// Column of the key in a matrix with `cols` columns.
    pub const fn col(self, cols: usize) -> usize {
        self.key() as usize % cols
    }
}

impl From<u8> for KeyEvent {
    fn from(byte: u8) -> Self {
        KeyEvent::from_byte(byte)
    }
}

impl From<KeyEvent> for u8 {
    fn from(event: KeyEvent) -> Self {
        event.as_byte()
    }
}
