use std::env;
use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::analysis::signals::DEFAULT_STOP_LOSS_MARKER;
use crate::analysis::PairingPolicy;
use crate::experiment::client::{DEFAULT_SIGNALS_LIMIT, DEFAULT_TIMEOUT_SECS};

const DEFAULT_MISSED_TVL_THRESHOLD: i64 = 1_000;
const DEFAULT_MISSED_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("no data source: set EXPERIMENT_DATA_DIR / --data-dir, --trades, or EXPERIMENT_API_URL with EXPERIMENT_ID")]
    NoSource,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Remote source
    pub api_url: Option<String>,
    pub experiment_id: Option<String>,
    pub request_timeout_secs: u64,
    pub signals_limit: u32,

    // Local source
    pub data_dir: Option<PathBuf>,
    pub trades_file: Option<PathBuf>,
    pub tokens_file: Option<PathBuf>,
    pub signals_file: Option<PathBuf>,
    pub portfolio_file: Option<PathBuf>,

    // Analysis
    pub pairing_policy: PairingPolicy,
    pub stop_loss_marker: String,
    pub missed_tvl_threshold: Decimal,
    pub missed_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            experiment_id: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            signals_limit: DEFAULT_SIGNALS_LIMIT,
            data_dir: None,
            trades_file: None,
            tokens_file: None,
            signals_file: None,
            portfolio_file: None,
            pairing_policy: PairingPolicy::default(),
            stop_loss_marker: DEFAULT_STOP_LOSS_MARKER.into(),
            missed_tvl_threshold: Decimal::from(DEFAULT_MISSED_TVL_THRESHOLD),
            missed_limit: DEFAULT_MISSED_LIMIT,
        }
    }
}

/// Where the dataset comes from, resolved from the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    Remote {
        api_url: String,
        experiment_id: String,
    },
    Directory(PathBuf),
    Files {
        trades: PathBuf,
        tokens: Option<PathBuf>,
        signals: Option<PathBuf>,
        portfolio: Option<PathBuf>,
    },
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Ok(Self {
            api_url: var("EXPERIMENT_API_URL"),
            experiment_id: var("EXPERIMENT_ID"),
            request_timeout_secs: parse_or(
                "REQUEST_TIMEOUT_SECS",
                var("REQUEST_TIMEOUT_SECS"),
                defaults.request_timeout_secs,
            )?,
            signals_limit: parse_or("SIGNALS_LIMIT", var("SIGNALS_LIMIT"), defaults.signals_limit)?,
            data_dir: var("EXPERIMENT_DATA_DIR").map(PathBuf::from),
            trades_file: None,
            tokens_file: None,
            signals_file: None,
            portfolio_file: None,
            pairing_policy: var("PAIRING_POLICY")
                .map(|v| PairingPolicy::from_str(&v))
                .unwrap_or(defaults.pairing_policy),
            stop_loss_marker: var("STOP_LOSS_MARKER").unwrap_or(defaults.stop_loss_marker),
            missed_tvl_threshold: parse_or(
                "MISSED_TVL_THRESHOLD",
                var("MISSED_TVL_THRESHOLD"),
                defaults.missed_tvl_threshold,
            )?,
            missed_limit: parse_or("MISSED_LIMIT", var("MISSED_LIMIT"), defaults.missed_limit)?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Explicit files win over a data directory, which wins over the API.
    pub fn source(&self) -> Result<SourceSelection, ConfigError> {
        if let Some(trades) = &self.trades_file {
            return Ok(SourceSelection::Files {
                trades: trades.clone(),
                tokens: self.tokens_file.clone(),
                signals: self.signals_file.clone(),
                portfolio: self.portfolio_file.clone(),
            });
        }
        if let Some(dir) = &self.data_dir {
            return Ok(SourceSelection::Directory(dir.clone()));
        }
        match (&self.api_url, &self.experiment_id) {
            (Some(api_url), Some(experiment_id)) => Ok(SourceSelection::Remote {
                api_url: api_url.clone(),
                experiment_id: experiment_id.clone(),
            }),
            _ => Err(ConfigError::NoSource),
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { name, value: v }),
        None => Ok(default),
    }
}
