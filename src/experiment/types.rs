use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Signal, TokenSnapshot, TradeRecord};

// ---------------------------------------------------------------------------
// Response envelopes (experiment API and its JSON dumps)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TokensResponse {
    #[serde(default)]
    pub data: Vec<TokenSnapshot>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TradesResponse {
    #[serde(default)]
    pub data: Vec<TradeRecord>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SignalsResponse {
    #[serde(default)]
    pub signals: Vec<Signal>,
}

/// Portfolio snapshots are only counted, so they stay untyped.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PortfolioResponse {
    #[serde(default)]
    pub snapshots: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

/// Everything one analysis run reads.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub tokens: Vec<TokenSnapshot>,
    pub trades: Vec<TradeRecord>,
    pub signals: Vec<Signal>,
    pub portfolio: Vec<Value>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
            && self.trades.is_empty()
            && self.signals.is_empty()
            && self.portfolio.is_empty()
    }
}
