//! Config options of the CKB transaction assembler.
//!
//! Everything has a default, so an empty TOML document is a valid mainnet
//! configuration. Devnets must spell out their system scripts.
mod app_config;
mod configs;


pub use app_config::{AssemblerConfig, ConfigError};
pub use configs::*;
