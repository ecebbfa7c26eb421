//! Command-line interface definitions and helpers.
//!
//! This module contains all CLI argument parsing, enums, and subcommand handlers.

mod args;
mod commands;
mod enums;

pub use args::{Args, Command, ConfigAction};
pub use commands::{
    convert, describe, encode_json, handle_config_action, init_config, normalize_json,
    preview_options, read_input, run, write_cfg, CliError,
};
pub use enums::CharacterSet;
