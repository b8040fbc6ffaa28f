use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use super::stats::{mean, ratio_or_zero, Distribution, ExtentStats};
use crate::models::TradePair;

// ---------------------------------------------------------------------------
// Profit bands
// ---------------------------------------------------------------------------

/// Fixed profit-percent bands, checked top-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProfitBand {
    /// profit > 50
    Above50,
    /// 20 < profit <= 50
    Gain20To50,
    /// 0 < profit <= 20
    Gain0To20,
    /// -20 < profit <= 0
    Loss0To20,
    /// profit <= -20
    LossOver20,
}

impl ProfitBand {
    pub const ALL: [ProfitBand; 5] = [
        ProfitBand::Above50,
        ProfitBand::Gain20To50,
        ProfitBand::Gain0To20,
        ProfitBand::Loss0To20,
        ProfitBand::LossOver20,
    ];

    pub fn classify(profit: Decimal) -> Self {
        if profit > Decimal::from(50) {
            ProfitBand::Above50
        } else if profit > Decimal::from(20) {
            ProfitBand::Gain20To50
        } else if profit > Decimal::ZERO {
            ProfitBand::Gain0To20
        } else if profit > Decimal::from(-20) {
            ProfitBand::Loss0To20
        } else {
            ProfitBand::LossOver20
        }
    }

    fn index(self) -> usize {
        match self {
            ProfitBand::Above50 => 0,
            ProfitBand::Gain20To50 => 1,
            ProfitBand::Gain0To20 => 2,
            ProfitBand::Loss0To20 => 3,
            ProfitBand::LossOver20 => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfitBand::Above50 => "gain > 50%",
            ProfitBand::Gain20To50 => "gain 20-50%",
            ProfitBand::Gain0To20 => "gain 0-20%",
            ProfitBand::Loss0To20 => "loss 0-20%",
            ProfitBand::LossOver20 => "loss > 20%",
        }
    }
}

impl fmt::Display for ProfitBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfitHistogram {
    counts: [usize; 5],
    total: usize,
}

impl ProfitHistogram {
    pub fn from_profits<I>(profits: I) -> Self
    where
        I: IntoIterator<Item = Decimal>,
    {
        let mut histogram = Self::default();
        for profit in profits {
            histogram.counts[ProfitBand::classify(profit).index()] += 1;
            histogram.total += 1;
        }
        histogram
    }

    pub fn count(&self, band: ProfitBand) -> usize {
        self.counts[band.index()]
    }

    /// Share of the sample in `band`, 0 for an empty histogram.
    pub fn fraction(&self, band: ProfitBand) -> Decimal {
        ratio_or_zero(
            Decimal::from(self.count(band) as i64),
            Decimal::from(self.total as i64),
        )
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfitBand, usize)> + '_ {
        ProfitBand::ALL
            .into_iter()
            .map(move |band| (band, self.count(band)))
    }
}

// ---------------------------------------------------------------------------
// Outcome summary
// ---------------------------------------------------------------------------

/// Mean price move of falling and rising pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceChangeStats {
    pub mean_decline_pct: Option<Decimal>,
    pub mean_rise_pct: Option<Decimal>,
}

/// Money in and out over pairs with both amounts known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CapitalSummary {
    pub pairs: usize,
    pub invested: Decimal,
    pub proceeds: Decimal,
    pub net_pnl: Decimal,
    /// Net PnL over invested, in percent; 0 when nothing was invested.
    pub return_pct: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub total: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub win_rate: Decimal,
    pub loss_rate: Decimal,
    /// wins / losses, or 0 when there are no losses.
    pub win_loss_ratio: Decimal,
    /// Profit percent over all pairs; a missing value counts as 0.
    pub profit: ExtentStats,
    /// Hold duration in seconds over pairs that report one.
    pub hold_secs: Option<ExtentStats>,
    pub win_mean_hold_secs: Option<Decimal>,
    pub loss_mean_hold_secs: Option<Decimal>,
    pub tvl: Option<Distribution>,
    pub fdv: Option<Distribution>,
    /// Positive TVL of winning pairs' tokens.
    pub win_tvl: Option<ExtentStats>,
    /// Positive TVL of losing pairs' tokens.
    pub loss_tvl: Option<ExtentStats>,
    /// Pairs whose token has no positive TVL.
    pub no_tvl_pairs: usize,
    pub histogram: ProfitHistogram,
    pub best: TradePair,
    pub worst: TradePair,
    pub price_change: PriceChangeStats,
    pub capital: CapitalSummary,
}

impl OutcomeSummary {
    pub fn hold_minutes(&self) -> Option<ExtentStats> {
        self.hold_secs.map(|h| h.scaled(Decimal::from(60)))
    }

    pub fn hold_hours(&self) -> Option<ExtentStats> {
        self.hold_secs.map(|h| h.scaled(Decimal::from(3600)))
    }
}

/// Summarise matched pairs. Returns `None` when there are no pairs.
pub fn aggregate_outcomes(pairs: &[TradePair]) -> Option<OutcomeSummary> {
    let profit = ExtentStats::from_values(pairs.iter().map(TradePair::profit))?;
    let best = pairs.iter().find(|p| p.profit() == profit.max)?.clone();
    let worst = pairs.iter().find(|p| p.profit() == profit.min)?.clone();

    let total = pairs.len();
    let wins = pairs.iter().filter(|p| p.is_win()).count();
    let losses = pairs.iter().filter(|p| p.is_loss()).count();
    let total_dec = Decimal::from(total as i64);

    Some(OutcomeSummary {
        total,
        wins,
        losses,
        breakeven: total - wins - losses,
        win_rate: Decimal::from(wins as i64) / total_dec,
        loss_rate: Decimal::from(losses as i64) / total_dec,
        win_loss_ratio: ratio_or_zero(Decimal::from(wins as i64), Decimal::from(losses as i64)),
        profit,
        hold_secs: ExtentStats::from_values(pairs.iter().filter_map(|p| p.hold_duration_secs)),
        win_mean_hold_secs: mean_hold(pairs.iter().filter(|p| p.is_win())),
        loss_mean_hold_secs: mean_hold(pairs.iter().filter(|p| p.is_loss())),
        tvl: Distribution::of_positive(pairs.iter().filter_map(|p| p.tvl)),
        fdv: Distribution::of_positive(pairs.iter().filter_map(|p| p.fdv)),
        win_tvl: ExtentStats::from_values(
            pairs.iter().filter(|p| p.is_win()).filter_map(TradePair::positive_tvl),
        ),
        loss_tvl: ExtentStats::from_values(
            pairs.iter().filter(|p| p.is_loss()).filter_map(TradePair::positive_tvl),
        ),
        no_tvl_pairs: pairs.iter().filter(|p| p.positive_tvl().is_none()).count(),
        histogram: ProfitHistogram::from_profits(pairs.iter().map(TradePair::profit)),
        best,
        worst,
        price_change: price_change(pairs),
        capital: capital(pairs),
    })
}

fn mean_hold<'a>(pairs: impl Iterator<Item = &'a TradePair>) -> Option<Decimal> {
    let holds: Vec<Decimal> = pairs.filter_map(|p| p.hold_duration_secs).collect();
    mean(&holds)
}

fn price_change(pairs: &[TradePair]) -> PriceChangeStats {
    let changes: Vec<Decimal> = pairs.iter().filter_map(TradePair::price_change_pct).collect();
    let declines: Vec<Decimal> = changes.iter().copied().filter(|c| *c < Decimal::ZERO).collect();
    let rises: Vec<Decimal> = changes.iter().copied().filter(|c| *c > Decimal::ZERO).collect();

    PriceChangeStats {
        mean_decline_pct: mean(&declines),
        mean_rise_pct: mean(&rises),
    }
}

fn capital(pairs: &[TradePair]) -> CapitalSummary {
    let mut summary = CapitalSummary::default();
    for pair in pairs {
        let (Some(input), Some(output)) = (pair.input_amount, pair.output_amount) else {
            continue;
        };
        let Some((invested, proceeds, net_pnl)) = add_amounts(&summary, pair, input, output) else {
            tracing::warn!(
                token = %pair.token_address,
                "Capital totals out of range, pair left out"
            );
            continue;
        };
        summary.pairs += 1;
        summary.invested = invested;
        summary.proceeds = proceeds;
        summary.net_pnl = net_pnl;
    }
    summary.return_pct = ratio_or_zero(summary.net_pnl, summary.invested)
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO);
    summary
}

fn add_amounts(
    summary: &CapitalSummary,
    pair: &TradePair,
    input: Decimal,
    output: Decimal,
) -> Option<(Decimal, Decimal, Decimal)> {
    Some((
        summary.invested.checked_add(input)?,
        summary.proceeds.checked_add(output)?,
        summary.net_pnl.checked_add(pair.net_pnl()?)?,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
