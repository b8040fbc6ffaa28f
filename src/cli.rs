use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::analysis::PairingPolicy;
use crate::config::AppConfig;

#[derive(Debug, Parser)]
#[command(
    name = "trade-analysis",
    about = "Pair experiment trades and report outcomes",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding trades.json and optionally tokens.json, signals.json, portfolio.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Trades dump (overrides --data-dir)
    #[arg(long, global = true)]
    pub trades: Option<PathBuf>,

    /// Tokens dump, used with --trades
    #[arg(long, global = true)]
    pub tokens: Option<PathBuf>,

    /// Signals dump, used with --trades
    #[arg(long, global = true)]
    pub signals: Option<PathBuf>,

    /// Portfolio snapshots dump, used with --trades
    #[arg(long, global = true)]
    pub portfolio: Option<PathBuf>,

    /// Experiment API base URL, e.g. http://localhost:3010
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Experiment id for the API
    #[arg(long, global = true)]
    pub experiment: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Pairing policy: fifo or first-match
    #[arg(long, global = true)]
    pub pairing: Option<String>,

    /// Reason substring marking a stop-loss sell
    #[arg(long, global = true)]
    pub stop_loss_marker: Option<String>,

    /// TVL above which an untraded token is listed as missed
    #[arg(long, global = true)]
    pub min_tvl: Option<Decimal>,

    /// Maximum number of missed tokens to list
    #[arg(long, global = true)]
    pub missed_limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Full report: tokens, trades, signals (default)
    Report,
    /// Trade performance only
    Trades,
    /// Token overview only
    Tokens,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Report)
    }

    /// Flags win over values read from the environment.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if self.trades.is_some() {
            config.trades_file = self.trades.clone();
            config.tokens_file = self.tokens.clone();
            config.signals_file = self.signals.clone();
            config.portfolio_file = self.portfolio.clone();
        }
        if let Some(url) = &self.api_url {
            config.api_url = Some(url.clone());
        }
        if let Some(id) = &self.experiment {
            config.experiment_id = Some(id.clone());
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(policy) = &self.pairing {
            config.pairing_policy = PairingPolicy::from_str(policy);
        }
        if let Some(marker) = &self.stop_loss_marker {
            config.stop_loss_marker = marker.clone();
        }
        if let Some(min_tvl) = self.min_tvl {
            config.missed_tvl_threshold = min_tvl;
        }
        if let Some(limit) = self.missed_limit {
            config.missed_limit = limit;
        }
    }
}
