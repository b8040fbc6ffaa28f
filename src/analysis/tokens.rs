use std::collections::{BTreeMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use super::stats::{mean, median, Distribution};
use crate::models::{TokenSnapshot, TradePair};

/// Overview of every monitored token.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenAnalysis {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub tvl: Option<Distribution>,
    pub fdv: Option<Distribution>,
}

pub fn analyze_tokens(tokens: &[TokenSnapshot]) -> TokenAnalysis {
    let mut by_status = BTreeMap::new();
    for token in tokens {
        *by_status.entry(token.status().to_string()).or_insert(0) += 1;
    }

    TokenAnalysis {
        total: tokens.len(),
        by_status,
        tvl: Distribution::of_positive(tokens.iter().filter_map(|t| t.raw_api_data.tvl)),
        fdv: Distribution::of_positive(tokens.iter().filter_map(|t| t.raw_api_data.fdv)),
    }
}

/// Addresses that appear in at least one matched pair.
pub fn traded_addresses(pairs: &[TradePair]) -> HashSet<&str> {
    pairs.iter().map(|p| p.token_address.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Traded vs monitored-only
// ---------------------------------------------------------------------------

/// TVL/FDV summary for a group of tokens, over positive values only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupMetrics {
    pub count: usize,
    pub mean_tvl: Option<Decimal>,
    pub median_tvl: Option<Decimal>,
    pub mean_fdv: Option<Decimal>,
    pub median_fdv: Option<Decimal>,
}

impl GroupMetrics {
    fn from_tokens(tokens: &[&TokenSnapshot]) -> Self {
        let tvls: Vec<Decimal> = tokens.iter().filter_map(|t| t.positive_tvl()).collect();
        let fdvs: Vec<Decimal> = tokens.iter().filter_map(|t| t.positive_fdv()).collect();
        Self {
            count: tokens.len(),
            mean_tvl: mean(&tvls),
            median_tvl: median(tvls),
            mean_fdv: mean(&fdvs),
            median_fdv: median(fdvs),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TradedComparison {
    pub traded: GroupMetrics,
    pub monitored_only: GroupMetrics,
}

pub fn compare_traded_vs_monitored(
    tokens: &[TokenSnapshot],
    traded: &HashSet<&str>,
) -> TradedComparison {
    let (traded_tokens, monitored): (Vec<&TokenSnapshot>, Vec<&TokenSnapshot>) = tokens
        .iter()
        .partition(|t| traded.contains(t.token_address.as_str()));

    TradedComparison {
        traded: GroupMetrics::from_tokens(&traded_tokens),
        monitored_only: GroupMetrics::from_tokens(&monitored),
    }
}

// ---------------------------------------------------------------------------
// Missed opportunities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissedOpportunity {
    pub token_address: String,
    pub symbol: String,
    pub tvl: Decimal,
    pub fdv: Option<Decimal>,
    pub platform: String,
}

/// Untraded tokens with TVL above `min_tvl`, largest first, at most `limit`.
pub fn missed_opportunities(
    tokens: &[TokenSnapshot],
    traded: &HashSet<&str>,
    min_tvl: Decimal,
    limit: usize,
) -> Vec<MissedOpportunity> {
    let mut missed: Vec<MissedOpportunity> = tokens
        .iter()
        .filter(|t| !traded.contains(t.token_address.as_str()))
        .filter_map(|t| {
            let tvl = t.positive_tvl().filter(|v| *v > min_tvl)?;
            Some(MissedOpportunity {
                token_address: t.token_address.clone(),
                symbol: t.symbol().to_string(),
                tvl,
                fdv: t.positive_fdv(),
                platform: t.platform().to_string(),
            })
        })
        .collect();

    missed.sort_by(|a, b| b.tvl.cmp(&a.tvl));
    missed.truncate(limit);
    missed
}
