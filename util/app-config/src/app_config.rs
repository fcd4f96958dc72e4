//! # Assembler config
//!
//! Because of the limitation of the toml library, nested config structs must
//! stay at the tail of a struct to keep it serializable, see
//! https://docs.rs/toml/0.5.0/toml/ser/index.html

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    ChequeConfig, MIN_CHEQUE_CELL_CAPACITY, MIN_UDT_CELL_CAPACITY, NetworkType, ScriptsConfig,
};

const DEFAULT_FEE_RATE: u64 = 1_000;
const DEFAULT_SEARCH_PAGE_SIZE: u32 = 100;

/// Errors raised while loading a config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file can not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The content is not a valid config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field holds a value the assembler can't work with.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// Keep nested tables after plain values, see the module doc.
/// Top level config of the transaction assembler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssemblerConfig {
    /// The chain to build transactions for.
    #[serde(default)]
    pub network: NetworkType,
    /// Fee rate, in shannons per 1000 bytes.
    #[serde(default = "default_fee_rate")]
    pub fee_rate: u64,
    /// How many cells one search page asks for.
    #[serde(default = "default_search_page_size")]
    pub search_page_size: u32,
    /// Cheque related capacities.
    #[serde(default)]
    pub cheque: ChequeConfig,
    /// System script deployment, overrides the network preset.
    #[serde(default)]
    pub scripts: Option<ScriptsConfig>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        AssemblerConfig {
            network: NetworkType::default(),
            fee_rate: default_fee_rate(),
            search_page_size: default_search_page_size(),
            cheque: ChequeConfig::default(),
            scripts: None,
        }
    }
}

impl AssemblerConfig {
    /// Parses and validates a TOML document.
    pub fn load_from_slice(slice: &[u8]) -> Result<Self, ConfigError> {
        let config: AssemblerConfig = toml::from_slice(slice)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read(path)?;
        Self::load_from_slice(&content)
    }

    /// Checks values serde can't.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_page_size == 0 {
            return Err(ConfigError::Invalid(
                "search_page_size should be greater than 0".to_owned(),
            ));
        }
        if self.cheque.cell_capacity < MIN_CHEQUE_CELL_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "cheque.cell_capacity should be at least {MIN_CHEQUE_CELL_CAPACITY}"
            )));
        }
        if self.cheque.udt_cell_capacity < MIN_UDT_CELL_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "cheque.udt_cell_capacity should be at least {MIN_UDT_CELL_CAPACITY}"
            )));
        }
        if self.scripts.is_none() && self.network == NetworkType::Dev {
            return Err(ConfigError::Invalid(
                "scripts must be configured for the dev network".to_owned(),
            ));
        }
        Ok(())
    }

    /// The effective system scripts: the explicit `scripts` table if present,
    /// the network preset otherwise.
    pub fn scripts(&self) -> Result<ScriptsConfig, ConfigError> {
        self.scripts
            .clone()
            .or_else(|| ScriptsConfig::for_network(self.network))
            .ok_or_else(|| {
                ConfigError::Invalid(format!("no system scripts known for {}", self.network))
            })
    }
}

const fn default_fee_rate() -> u64 {
    DEFAULT_FEE_RATE
}

const fn default_search_page_size() -> u32 {
    DEFAULT_SEARCH_PAGE_SIZE
}
