use std::future::Future;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use super::client::ExperimentClient;
use super::types::{Dataset, PortfolioResponse, SignalsResponse, TokensResponse, TradesResponse};
use super::SourceError;

pub const TOKENS_FILE: &str = "tokens.json";
pub const TRADES_FILE: &str = "trades.json";
pub const SIGNALS_FILE: &str = "signals.json";
pub const PORTFOLIO_FILE: &str = "portfolio.json";

/// Something that can produce a [`Dataset`] for one analysis run.
pub trait DataProvider {
    /// Human-readable origin, used in logs and report headers.
    fn describe(&self) -> String;

    fn load(&self) -> impl Future<Output = Result<Dataset, SourceError>> + Send;
}

// ---------------------------------------------------------------------------
// Local JSON files
// ---------------------------------------------------------------------------

/// JSON dumps on disk. The trades file is required; the others are read
/// when configured.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub trades: PathBuf,
    pub tokens: Option<PathBuf>,
    pub signals: Option<PathBuf>,
    pub portfolio: Option<PathBuf>,
}

impl FileSource {
    pub fn new(trades: impl Into<PathBuf>) -> Self {
        Self {
            trades: trades.into(),
            tokens: None,
            signals: None,
            portfolio: None,
        }
    }

    /// Use the conventional file names inside `dir`. Optional files that do
    /// not exist are skipped; `trades.json` must exist when loading.
    pub fn from_dir(dir: &Path) -> Self {
        let optional = |name: &str| {
            let path = dir.join(name);
            path.is_file().then_some(path)
        };
        Self {
            trades: dir.join(TRADES_FILE),
            tokens: optional(TOKENS_FILE),
            signals: optional(SIGNALS_FILE),
            portfolio: optional(PORTFOLIO_FILE),
        }
    }

    pub fn with_tokens(mut self, path: impl Into<PathBuf>) -> Self {
        self.tokens = Some(path.into());
        self
    }

    pub fn with_signals(mut self, path: impl Into<PathBuf>) -> Self {
        self.signals = Some(path.into());
        self
    }

    pub fn with_portfolio(mut self, path: impl Into<PathBuf>) -> Self {
        self.portfolio = Some(path.into());
        self
    }
}

impl DataProvider for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.trades.display())
    }

    async fn load(&self) -> Result<Dataset, SourceError> {
        let trades: TradesResponse = read_json(&self.trades).await?;
        let tokens: TokensResponse = read_optional(self.tokens.as_deref()).await?;
        let signals: SignalsResponse = read_optional(self.signals.as_deref()).await?;
        let portfolio: PortfolioResponse = read_optional(self.portfolio.as_deref()).await?;

        tracing::info!(
            trades = trades.data.len(),
            tokens = tokens.data.len(),
            signals = signals.signals.len(),
            "Loaded experiment dump from disk"
        );

        Ok(Dataset {
            tokens: tokens.data,
            trades: trades.data,
            signals: signals.signals,
            portfolio: portfolio.snapshots,
        })
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SourceError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&raw).map_err(|source| SourceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

async fn read_optional<T: DeserializeOwned + Default>(
    path: Option<&Path>,
) -> Result<T, SourceError> {
    match path {
        Some(path) => read_json(path).await,
        None => Ok(T::default()),
    }
}

// ---------------------------------------------------------------------------
// Experiment API
// ---------------------------------------------------------------------------

/// Live experiment API. A failing endpoint is logged and treated as empty.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: ExperimentClient,
}

impl RemoteSource {
    pub fn new(client: ExperimentClient) -> Self {
        Self { client }
    }
}

impl DataProvider for RemoteSource {
    fn describe(&self) -> String {
        format!("experiment {}", self.client.experiment_id())
    }

    async fn load(&self) -> Result<Dataset, SourceError> {
        let tokens = or_empty("tokens", self.client.get_tokens().await);
        let trades = or_empty("trades", self.client.get_trades().await);
        let signals = or_empty("signals", self.client.get_signals().await);
        let portfolio = or_empty("portfolio", self.client.get_portfolio().await);

        tracing::info!(
            experiment = %self.client.experiment_id(),
            trades = trades.data.len(),
            tokens = tokens.data.len(),
            signals = signals.signals.len(),
            "Fetched experiment data"
        );

        Ok(Dataset {
            tokens: tokens.data,
            trades: trades.data,
            signals: signals.signals,
            portfolio: portfolio.snapshots,
        })
    }
}

fn or_empty<T: Default, E: std::fmt::Display>(resource: &str, result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, resource, "Experiment API request failed, using empty result");
        T::default()
    })
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// A dataset already in memory, e.g. a test fixture.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    dataset: Dataset,
}

impl InMemorySource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl DataProvider for InMemorySource {
    fn describe(&self) -> String {
        "in-memory dataset".into()
    }

    async fn load(&self) -> Result<Dataset, SourceError> {
        Ok(self.dataset.clone())
    }
}
