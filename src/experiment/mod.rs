pub mod client;
pub mod provider;
pub mod types;

pub use client::{ClientError, ExperimentClient};
pub use provider::{DataProvider, FileSource, InMemorySource, RemoteSource};
pub use types::{Dataset, PortfolioResponse, SignalsResponse, TokensResponse, TradesResponse};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}
