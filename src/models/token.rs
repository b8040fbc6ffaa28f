use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trade::parse_timestamp;
use super::{lenient_decimal, lenient_i64, null_as_default};

/// Point-in-time token data from the monitor (`tokens.data[]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub token_address: String,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub discovered_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub raw_api_data: RawApiData,
}

/// Upstream market data attached to a token.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawApiData {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub tvl: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub fdv: Option<Decimal>,
    #[serde(default)]
    pub issue_platform: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub launch_at: Option<i64>,
}

impl TokenSnapshot {
    pub fn symbol(&self) -> &str {
        self.token_symbol
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.token_address)
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    pub fn issue_platform(&self) -> Option<&str> {
        self.raw_api_data
            .issue_platform
            .as_deref()
            .filter(|s| !s.is_empty())
    }

    pub fn platform(&self) -> &str {
        self.issue_platform().unwrap_or("unknown")
    }

    /// Launch time from `launch_at` epoch seconds; 0 means unknown.
    pub fn launch_time(&self) -> Option<DateTime<Utc>> {
        let secs = self.raw_api_data.launch_at.filter(|s| *s > 0)?;
        DateTime::from_timestamp(secs, 0)
    }

    /// `discovered_at` parsed, `None` when absent or malformed.
    pub fn discovery_time(&self) -> Option<DateTime<Utc>> {
        self.discovered_at
            .as_deref()
            .and_then(|raw| parse_timestamp(raw).ok())
    }

    /// TVL when known and strictly positive.
    pub fn positive_tvl(&self) -> Option<Decimal> {
        self.raw_api_data.tvl.filter(|v| *v > Decimal::ZERO)
    }

    /// FDV when known and strictly positive.
    pub fn positive_fdv(&self) -> Option<Decimal> {
        self.raw_api_data.fdv.filter(|v| *v > Decimal::ZERO)
    }
}

/// Current token snapshots keyed by address. When an address appears more
/// than once the last snapshot wins.
#[derive(Debug, Default)]
pub struct TokenIndex<'a> {
    by_address: HashMap<&'a str, &'a TokenSnapshot>,
}

impl<'a> TokenIndex<'a> {
    pub fn new(tokens: &'a [TokenSnapshot]) -> Self {
        let by_address = tokens
            .iter()
            .map(|t| (t.token_address.as_str(), t))
            .collect();
        Self { by_address }
    }

    pub fn get(&self, address: &str) -> Option<&'a TokenSnapshot> {
        self.by_address.get(address).copied()
    }
}
