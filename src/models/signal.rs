use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{metadata_decimal, null_as_default};

/// A strategy signal (`signals.signals[]`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signal {
    #[serde(default)]
    pub token_address: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Signal {
    pub fn is_sell(&self) -> bool {
        self.action.trim().eq_ignore_ascii_case("sell")
    }

    pub fn reason(&self) -> &str {
        self.reason.as_deref().unwrap_or("unknown")
    }

    pub fn profit_percent(&self) -> Option<Decimal> {
        metadata_decimal(&self.metadata, "profitPercent")
    }

    pub fn hold_duration_secs(&self) -> Option<Decimal> {
        metadata_decimal(&self.metadata, "holdDuration")
    }
}
