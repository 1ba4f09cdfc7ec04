//! Service configuration from environment variables.

use rps_token::{Address, AddressParseError};
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("CUSTODY_ADDRESS is invalid: {0}")]
    InvalidCustody(#[from] AddressParseError),

    #[error("CUSTODY_ADDRESS is required when TOKEN_RPC_URL is set")]
    MissingCustody,

    #[error("{name} must be true/false/1/0, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    /// Token node to settle against; in-memory tokens when unset
    pub token_rpc_url: Option<String>,
    /// Custody account of the escrow
    pub custody: Option<Address>,
    /// Manually advanced clock, driven by `/api/system/tick`
    pub simulated_clock: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            token_rpc_url: None,
            custody: None,
            simulated_clock: false,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let token_rpc_url = lookup("TOKEN_RPC_URL").filter(|url| !url.trim().is_empty());

        let custody = lookup("CUSTODY_ADDRESS")
            .map(|raw| raw.trim().parse::<Address>())
            .transpose()?;
        if token_rpc_url.is_some() && custody.is_none() {
            return Err(ConfigError::MissingCustody);
        }

        let simulated_clock = match lookup("SIMULATED_CLOCK") {
            Some(raw) => parse_flag("SIMULATED_CLOCK", raw)?,
            None => false,
        };

        Ok(Self {
            port,
            token_rpc_url,
            custody,
            simulated_clock,
        })
    }
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { name, value }),
    }
}
