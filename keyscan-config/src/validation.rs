// Validation of the parts of keyboard.toml that serde cannot check field by field

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::matrix::MatrixConfig;

/// Largest column count, one bit per column in a 32-bit row word.
pub const MAX_COLS: usize = 32;
/// Largest key count, the event byte carries a 7-bit key index.
pub const MAX_KEYS: usize = 128;

pub struct Validator;

impl Validator {
    /// Validate all configuration
    pub fn validate_all(config: &crate::KeyboardTomlConfig) -> ConfigResult<()> {
        if let Some(matrix) = &config.matrix {
            Self::validate_matrix(matrix)?;
        }
        Ok(())
    }

    /// Validate the pin assignment of the matrix
    pub fn validate_matrix(matrix: &MatrixConfig) -> ConfigResult<()> {
        if matrix.row_pins.is_empty() {
            return Err(ConfigError::Validation {
                field: "matrix.row_pins".into(),
                message: "at least one row pin is required".into(),
            });
        }
        if matrix.col_pins.is_empty() {
            return Err(ConfigError::Validation {
                field: "matrix.col_pins".into(),
                message: "at least one column pin is required".into(),
            });
        }
        if matrix.cols() > MAX_COLS {
            return Err(ConfigError::InvalidValue {
                field: "matrix.col_pins".into(),
                value: matrix.cols().to_string(),
                expected: format!("at most {MAX_COLS} columns"),
            });
        }
        if matrix.rows() * matrix.cols() > MAX_KEYS {
            return Err(ConfigError::InvalidValue {
                field: "matrix".into(),
                value: format!("{}x{}", matrix.rows(), matrix.cols()),
                expected: format!("at most {MAX_KEYS} keys"),
            });
        }

        let mut seen = HashSet::new();
        for pin in matrix.row_pins.iter().chain(matrix.col_pins.iter()) {
            if !seen.insert(pin.as_str()) {
                return Err(ConfigError::Validation {
                    field: "matrix".into(),
                    message: format!("pin {pin} is assigned more than once"),
                });
            }
        }
        Ok(())
    }
}
