use std::env;

use crate::{IsolationLevel, TxOptions};

pub const ISOLATION_LEVEL_VAR: &str = "TX_ISOLATION_LEVEL";
pub const READ_ONLY_VAR: &str = "TX_READ_ONLY";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Transaction defaults applied by [`SqlTransactionManager::from_config`].
///
/// [`SqlTransactionManager::from_config`]: crate::SqlTransactionManager::from_config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionConfig {
    pub default_options: TxOptions,
}

impl TransactionConfig {
    /// Load from the process environment.
    ///
    /// Loading a `.env` file, if wanted, is up to the application and has to
    /// happen before this is called.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Missing or blank keys keep the
    /// driver defaults.
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let isolation = value(ISOLATION_LEVEL_VAR)
            .map(|raw| {
                raw.parse::<IsolationLevel>().map_err(|_| ConfigError::InvalidValue {
                    key: ISOLATION_LEVEL_VAR,
                    value: raw,
                })
            })
            .transpose()?;

        let read_only = match value(READ_ONLY_VAR) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                key: READ_ONLY_VAR,
                value: raw,
            })?,
            None => false,
        };

        Ok(Self {
            default_options: TxOptions { isolation, read_only },
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
