use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{PortfolioResponse, SignalsResponse, TokensResponse, TradesResponse};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SIGNALS_LIMIT: u32 = 500;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Client for `GET /api/experiment/{id}/...` on the experiment dashboard.
#[derive(Debug, Clone)]
pub struct ExperimentClient {
    http: Client,
    base_url: String,
    experiment_id: String,
    signals_limit: u32,
}

impl ExperimentClient {
    pub fn new(
        base_url: &str,
        experiment_id: &str,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url, experiment_id))
    }

    pub fn with_client(http: Client, base_url: &str, experiment_id: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            experiment_id: experiment_id.to_string(),
            signals_limit: DEFAULT_SIGNALS_LIMIT,
        }
    }

    pub fn signals_limit(mut self, limit: u32) -> Self {
        self.signals_limit = limit;
        self
    }

    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    pub fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/api/experiment/{}/{}",
            self.base_url, self.experiment_id, resource
        )
    }

    pub async fn get_tokens(&self) -> Result<TokensResponse, ClientError> {
        self.get_json("tokens", self.endpoint("tokens")).await
    }

    pub async fn get_trades(&self) -> Result<TradesResponse, ClientError> {
        self.get_json("trades", self.endpoint("trades")).await
    }

    pub async fn get_signals(&self) -> Result<SignalsResponse, ClientError> {
        let url = format!("{}?limit={}", self.endpoint("signals"), self.signals_limit);
        self.get_json("signals", url).await
    }

    pub async fn get_portfolio(&self) -> Result<PortfolioResponse, ClientError> {
        self.get_json("portfolio", self.endpoint("portfolio")).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        url: String,
    ) -> Result<T, ClientError> {
        tracing::debug!(%url, "GET experiment resource");
        let resp = self.http.get(&url).send().await?.error_for_status()?;

        let body = resp.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::Unexpected(format!("{resource}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client =
            ExperimentClient::with_client(Client::new(), "http://localhost:3010/", "exp-1");
        assert_eq!(
            client.endpoint("trades"),
            "http://localhost:3010/api/experiment/exp-1/trades"
        );
    }
}
