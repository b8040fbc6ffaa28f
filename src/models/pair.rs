use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// One buy matched to one later sell of the same token.
#[derive(Debug, Clone, Serialize)]
pub struct TradePair {
    pub token_address: String,
    pub symbol: String,
    pub buy_price: Option<Decimal>,
    pub sell_price: Option<Decimal>,
    /// `profitPercent` of the sell, passed through unchanged.
    pub profit_percent: Option<Decimal>,
    /// `holdDuration` of the sell, in seconds.
    pub hold_duration_secs: Option<Decimal>,
    pub bought_at: DateTime<Utc>,
    pub sold_at: DateTime<Utc>,
    /// Amount spent on the buy.
    pub input_amount: Option<Decimal>,
    /// Amount received from the sell.
    pub output_amount: Option<Decimal>,
    /// Current TVL of the token (not the TVL at trade time).
    pub tvl: Option<Decimal>,
    pub fdv: Option<Decimal>,
    pub platform: Option<String>,
    pub launched_at: Option<DateTime<Utc>>,
    /// When the monitor first saw the token.
    pub discovered_at: Option<DateTime<Utc>>,
}

impl TradePair {
    /// Profit percent with an absent value counted as breakeven.
    pub fn profit(&self) -> Decimal {
        self.profit_percent.unwrap_or(Decimal::ZERO)
    }

    pub fn is_win(&self) -> bool {
        self.profit() > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.profit() < Decimal::ZERO
    }

    /// Sell proceeds minus buy cost, when both amounts are known and the
    /// difference fits in a Decimal.
    pub fn net_pnl(&self) -> Option<Decimal> {
        self.output_amount?.checked_sub(self.input_amount?)
    }

    /// Raw price move from buy to sell, in percent.
    pub fn price_change_pct(&self) -> Option<Decimal> {
        let buy = self.buy_price.filter(|p| *p > Decimal::ZERO)?;
        let sell = self.sell_price?;
        sell.checked_sub(buy)?
            .checked_div(buy)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }

    pub fn positive_tvl(&self) -> Option<Decimal> {
        self.tvl.filter(|v| *v > Decimal::ZERO)
    }

    pub fn hold_minutes(&self) -> Option<Decimal> {
        self.hold_duration_secs.map(|s| s / Decimal::from(60))
    }

    pub fn hold_hours(&self) -> Option<Decimal> {
        self.hold_duration_secs.map(|s| s / Decimal::from(3600))
    }
}
