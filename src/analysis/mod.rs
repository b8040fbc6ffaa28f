pub mod outcome;
pub mod pairing;
pub mod signals;
pub mod stats;
pub mod tokens;

pub use outcome::{aggregate_outcomes, OutcomeSummary, ProfitBand, ProfitHistogram};
pub use pairing::{pair_trades, PairingPolicy, PairingResult};
pub use signals::{analyze_signals, SignalAnalysis, StopLossStats};
pub use stats::{Distribution, ExtentStats};
pub use tokens::{analyze_tokens, compare_traded_vs_monitored, missed_opportunities, TokenAnalysis};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("trade for {token_address} has neither executed_at nor created_at")]
    MissingTimestamp { token_address: String },

    #[error("invalid {field} timestamp {value:?}: {source}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
