pub mod pair;
pub mod signal;
pub mod token;
pub mod trade;

pub use pair::TradePair;
pub use signal::Signal;
pub use token::{RawApiData, TokenIndex, TokenSnapshot};
pub use trade::TradeRecord;

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// TradeDirection
// ---------------------------------------------------------------------------

/// Trade side. Parsed case-insensitively; anything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    Buy,
    Sell,
    #[default]
    Other,
}

impl TradeDirection {
    pub fn from_api_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "buy" => TradeDirection::Buy,
            "sell" => TradeDirection::Sell,
            _ => TradeDirection::Other,
        }
    }
}

impl<'de> Deserialize<'de> for TradeDirection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(TradeDirection::from_api_str)
            .unwrap_or_default())
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeDirection::Buy => write!(f, "buy"),
            TradeDirection::Sell => write!(f, "sell"),
            TradeDirection::Other => write!(f, "other"),
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient field parsing
// ---------------------------------------------------------------------------

/// Interpret a loosely-typed JSON value as a decimal.
///
/// Numbers and numeric strings (plain or scientific notation) yield `Some`.
/// `null`, empty strings, the string `"null"`, booleans, containers and
/// anything non-numeric yield `None`. Zero is kept as `Some(0)`.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => decimal_from_str(&n.to_string()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
                return None;
            }
            decimal_from_str(trimmed)
        }
        _ => None,
    }
}

fn decimal_from_str(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Look up `key` in a metadata map and parse it as a decimal.
pub fn metadata_decimal(metadata: &serde_json::Map<String, Value>, key: &str) -> Option<Decimal> {
    metadata.get(key).and_then(parse_decimal)
}

/// serde helper: numeric field that may arrive as a number, a string, or null.
pub(crate) fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_decimal))
}

/// serde helper: integer field that may arrive as a number, a string, or null.
pub(crate) fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// serde helper: treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
