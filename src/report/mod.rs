pub mod format;
pub mod text;

pub use text::{write_full, write_tokens, write_trades};

use rust_decimal::Decimal;

use crate::analysis::tokens::{traded_addresses, MissedOpportunity, TradedComparison};
use crate::analysis::{
    aggregate_outcomes, analyze_signals, analyze_tokens, compare_traded_vs_monitored,
    missed_opportunities, pair_trades, AnalysisError, OutcomeSummary, PairingPolicy,
    PairingResult, SignalAnalysis, TokenAnalysis,
};
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::experiment::{DataProvider, Dataset};
use crate::models::TokenIndex;

/// Analysis knobs taken from the configuration.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub pairing_policy: PairingPolicy,
    pub stop_loss_marker: String,
    pub missed_tvl_threshold: Decimal,
    pub missed_limit: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ReportSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            pairing_policy: config.pairing_policy,
            stop_loss_marker: config.stop_loss_marker.clone(),
            missed_tvl_threshold: config.missed_tvl_threshold,
            missed_limit: config.missed_limit,
        }
    }
}

/// Every section a report can print.
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub source: String,
    pub pairing_policy: PairingPolicy,
    pub trade_count: usize,
    pub pairing: PairingResult,
    /// `None` when no buy could be matched to a sell.
    pub outcome: Option<OutcomeSummary>,
    pub tokens: TokenAnalysis,
    pub comparison: TradedComparison,
    pub missed: Vec<MissedOpportunity>,
    pub missed_tvl_threshold: Decimal,
    pub signals: SignalAnalysis,
    pub portfolio_snapshots: usize,
}

pub fn build_report(
    source: &str,
    dataset: &Dataset,
    settings: &ReportSettings,
) -> Result<ExperimentReport, AnalysisError> {
    let index = TokenIndex::new(&dataset.tokens);
    let pairing = pair_trades(&dataset.trades, &index, settings.pairing_policy)?;
    let outcome = aggregate_outcomes(&pairing.pairs);

    let traded = traded_addresses(&pairing.pairs);
    let comparison = compare_traded_vs_monitored(&dataset.tokens, &traded);
    let missed = missed_opportunities(
        &dataset.tokens,
        &traded,
        settings.missed_tvl_threshold,
        settings.missed_limit,
    );

    tracing::info!(
        pairs = pairing.pairs.len(),
        unmatched_buys = pairing.unmatched_buys,
        policy = %settings.pairing_policy,
        "Trades paired"
    );

    Ok(ExperimentReport {
        source: source.to_string(),
        pairing_policy: settings.pairing_policy,
        trade_count: dataset.trades.len(),
        outcome,
        tokens: analyze_tokens(&dataset.tokens),
        comparison,
        missed,
        missed_tvl_threshold: settings.missed_tvl_threshold,
        signals: analyze_signals(&dataset.signals, &settings.stop_loss_marker),
        portfolio_snapshots: dataset.portfolio.len(),
        pairing,
    })
}

/// Load a dataset from `provider` and analyse it.
pub async fn load_report<P: DataProvider>(
    provider: &P,
    settings: &ReportSettings,
) -> Result<ExperimentReport, AppError> {
    let source = provider.describe();
    let dataset = provider.load().await?;
    if dataset.is_empty() {
        tracing::warn!(source = %source, "Data source returned no records");
    }
    Ok(build_report(&source, &dataset, settings)?)
}
