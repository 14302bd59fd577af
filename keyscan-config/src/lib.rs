//! Parsing and validation of the scanner sections of `keyboard.toml`.
//!
//! ```toml
//! [matrix]
//! row_pins = ["P0_05", "P0_06", "P0_07", "P0_08", "P1_09", "P1_08", "P0_12", "P0_11"]
//! col_pins = ["P0_19", "P0_20", "P0_21", "P0_22", "P0_23", "P0_24", "P0_25", "P0_26"]
//!
//! [scanner]
//! debounce_ticks = 5
//! event_queue_size = 64
//! ```

use std::path::Path;

use serde_derive::Deserialize;

pub mod error;
pub mod matrix;
pub mod scanner;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use matrix::MatrixConfig;
pub use scanner::ScannerConstantsConfig;
pub use validation::Validator;

/// Configurations of the scanner, read from `keyboard.toml`.
///
/// Tables that belong to other tools are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct KeyboardTomlConfig {
    /// Pin assignment
    pub matrix: Option<MatrixConfig>,
    /// Scanner timing and sizing
    #[serde(default)]
    pub scanner: ScannerConstantsConfig,
}

impl KeyboardTomlConfig {
    /// Parse and validate a configuration from a string. `origin` names the
    /// source in error messages.
    pub fn parse(content: &str, origin: &str) -> ConfigResult<Self> {
        let config: KeyboardTomlConfig = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
            path: origin.to_string(),
            message: e.message().to_string(),
        })?;
        Validator::validate_all(&config)?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Rows and columns of the `[matrix]` table, `(0, 0)` when there is none.
    pub fn matrix_size(&self) -> (usize, usize) {
        self.matrix.as_ref().map_or((0, 0), |matrix| (matrix.rows(), matrix.cols()))
    }
}
