//! Configuration for the `msxconv` command line
//!
//! Provides types, discovery and loading for `msxconv.toml`.

pub mod loader;
pub mod schema;

pub use loader::{
    default_config, find_config, find_config_from, load_config, merge_cli_overrides, CliOverrides,
    ConfigError, CONFIG_FILE_NAME,
};
pub use schema::*;
