use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{lenient_decimal, metadata_decimal, null_as_default, TradeDirection};
use crate::analysis::AnalysisError;

/// A single executed order as dumped by the experiment API (`trades.data[]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_address: String,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trade_direction: TradeDirection,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub unit_price: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub input_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub output_amount: Option<Decimal>,
    #[serde(default)]
    pub executed_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
}

impl TradeRecord {
    pub fn is_buy(&self) -> bool {
        self.trade_direction == TradeDirection::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.trade_direction == TradeDirection::Sell
    }

    /// Symbol for display, falling back to the address.
    pub fn symbol(&self) -> &str {
        self.token_symbol
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.token_address)
    }

    /// Execution time, falling back to the creation time when the order
    /// has no execution timestamp.
    pub fn timestamp(&self) -> Result<DateTime<Utc>, AnalysisError> {
        let (field, raw) = match (&self.executed_at, &self.created_at) {
            (Some(executed), _) => ("executed_at", executed),
            (None, Some(created)) => ("created_at", created),
            (None, None) => {
                return Err(AnalysisError::MissingTimestamp {
                    token_address: self.token_address.clone(),
                })
            }
        };
        parse_timestamp(raw).map_err(|source| AnalysisError::InvalidTimestamp {
            field,
            value: raw.clone(),
            source,
        })
    }

    /// `profitPercent` from the metadata (present on sells).
    pub fn profit_percent(&self) -> Option<Decimal> {
        metadata_decimal(&self.metadata, "profitPercent")
    }

    /// `holdDuration` in seconds from the metadata (present on sells).
    pub fn hold_duration_secs(&self) -> Option<Decimal> {
        metadata_decimal(&self.metadata, "holdDuration")
    }

    /// Entry price recorded by the strategy, else the fill price.
    pub fn entry_price(&self) -> Option<Decimal> {
        metadata_decimal(&self.metadata, "buyPrice").or(self.unit_price)
    }
}

/// Parse an ISO-8601 timestamp. Zone-less values are read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(e) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| e),
    }
}
