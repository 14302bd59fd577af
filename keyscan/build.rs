use std::path::Path;
use std::{env, fs};

use const_gen::*;
use keyscan_config::{KeyboardTomlConfig, ScannerConstantsConfig};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=KEYBOARD_TOML_PATH");

    // Read keyboard.toml if it's present
    let user_config = if let Ok(toml_path) = env::var("KEYBOARD_TOML_PATH") {
        println!("cargo:rerun-if-changed={toml_path}");
        KeyboardTomlConfig::load(&toml_path)
    } else {
        KeyboardTomlConfig::parse("", "<default>")
    };
    let user_config = match user_config {
        Ok(config) => config,
        Err(e) => panic!("❌ Parse `keyboard.toml` error: {e}"),
    };

    let (rows, cols) = user_config.matrix_size();
    let constants = [get_constants_str(user_config.scanner), get_matrix_size_str(rows, cols)].join("\n");

    // Write to constants.rs file
    let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
    let dest_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&dest_path, constants).expect("Failed to write constants.rs file");
}

fn get_constants_str(constants: ScannerConstantsConfig) -> String {
    [
        const_declaration!(pub(crate) DEBOUNCE_TICKS = constants.debounce_ticks),
        const_declaration!(pub(crate) EVENT_QUEUE_SIZE = constants.event_queue_size),
        const_declaration!(pub(crate) ACTIVE_POLL_TICKS = constants.active_poll_ticks),
        const_declaration!(pub(crate) SETTLE_US = constants.settle_us),
        const_declaration!(pub(crate) STANDBY_SETTLE_MS = constants.standby_settle_ms),
    ]
    .join("\n")
}

fn get_matrix_size_str(rows: usize, cols: usize) -> String {
    [
        const_declaration!(pub MATRIX_ROWS = rows),
        const_declaration!(pub MATRIX_COLS = cols),
    ]
    .join("\n")
}
