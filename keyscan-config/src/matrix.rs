// Matrix pin assignment

use serde_derive::Deserialize;

/// The `[matrix]` table: which pins drive rows and which pins sense columns.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MatrixConfig {
    pub row_pins: Vec<String>,
    pub col_pins: Vec<String>,
}

impl MatrixConfig {
    pub fn rows(&self) -> usize {
        self.row_pins.len()
    }

    pub fn cols(&self) -> usize {
        self.col_pins.len()
    }
}
