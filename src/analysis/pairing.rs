use std::collections::{HashMap, VecDeque};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AnalysisError;
use crate::models::{TokenIndex, TokenSnapshot, TradePair, TradeRecord};

/// How buys are matched to sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairingPolicy {
    /// Sells are sorted per token and consumed at most once, oldest first.
    #[default]
    Fifo,
    /// Each buy takes the first later sell in file order. Sells can be
    /// reused, and unsorted input can pick a sell that is not the next one.
    /// Kept so older reports can be reproduced.
    FirstMatch,
}

impl PairingPolicy {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().replace('_', "-").as_str() {
            "first-match" | "legacy" => PairingPolicy::FirstMatch,
            _ => PairingPolicy::Fifo,
        }
    }
}

impl fmt::Display for PairingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingPolicy::Fifo => write!(f, "fifo"),
            PairingPolicy::FirstMatch => write!(f, "first-match"),
        }
    }
}

/// Output of a pairing pass.
#[derive(Debug, Clone, Default)]
pub struct PairingResult {
    /// Matched pairs, in the order their buys appear in the input.
    pub pairs: Vec<TradePair>,
    pub buy_count: usize,
    pub sell_count: usize,
    /// Buys with no later sell for the same token.
    pub unmatched_buys: usize,
}

/// A trade with its resolved timestamp and input position.
struct Timed<'a> {
    trade: &'a TradeRecord,
    at: DateTime<Utc>,
    seq: usize,
}

/// Match buys to later sells of the same token address.
///
/// Unmatched buys are left out of the result without an error. Fails only
/// when a buy or sell carries a missing or unparseable timestamp.
pub fn pair_trades(
    trades: &[TradeRecord],
    tokens: &TokenIndex<'_>,
    policy: PairingPolicy,
) -> Result<PairingResult, AnalysisError> {
    let mut buys = Vec::new();
    let mut sells = Vec::new();

    for (seq, trade) in trades.iter().enumerate() {
        let bucket = if trade.is_buy() {
            &mut buys
        } else if trade.is_sell() {
            &mut sells
        } else {
            continue;
        };
        bucket.push(Timed {
            trade,
            at: trade.timestamp()?,
            seq,
        });
    }

    let matched = match policy {
        PairingPolicy::Fifo => match_fifo(&buys, &sells),
        PairingPolicy::FirstMatch => match_first(&buys, &sells),
    };

    let unmatched_buys = buys.len() - matched.len();
    if unmatched_buys > 0 {
        tracing::debug!(
            unmatched = unmatched_buys,
            policy = %policy,
            "Buys without a later sell were left out"
        );
    }

    let pairs = matched
        .into_iter()
        .map(|(buy, sell)| build_pair(buy, sell, tokens))
        .collect();

    Ok(PairingResult {
        pairs,
        buy_count: buys.len(),
        sell_count: sells.len(),
        unmatched_buys,
    })
}

fn match_fifo<'t, 'a>(
    buys: &'t [Timed<'a>],
    sells: &'t [Timed<'a>],
) -> Vec<(&'t Timed<'a>, &'t Timed<'a>)> {
    let mut queues: HashMap<&str, Vec<&Timed<'a>>> = HashMap::new();
    for sell in sells {
        queues
            .entry(sell.trade.token_address.as_str())
            .or_default()
            .push(sell);
    }
    let mut queues: HashMap<&str, VecDeque<&Timed<'a>>> = queues
        .into_iter()
        .map(|(addr, mut group)| {
            group.sort_by_key(|s| (s.at, s.seq));
            (addr, VecDeque::from(group))
        })
        .collect();

    let mut ordered: Vec<&Timed<'a>> = buys.iter().collect();
    ordered.sort_by_key(|b| (b.at, b.seq));

    let mut matched = Vec::with_capacity(ordered.len());
    for buy in ordered {
        let Some(queue) = queues.get_mut(buy.trade.token_address.as_str()) else {
            continue;
        };
        // Buys are visited oldest first, so a sell at or before this buy
        // can never close a later one either.
        while queue.front().is_some_and(|s| s.at <= buy.at) {
            queue.pop_front();
        }
        if let Some(sell) = queue.pop_front() {
            matched.push((buy, sell));
        }
    }

    matched.sort_by_key(|(buy, _)| buy.seq);
    matched
}

fn match_first<'t, 'a>(
    buys: &'t [Timed<'a>],
    sells: &'t [Timed<'a>],
) -> Vec<(&'t Timed<'a>, &'t Timed<'a>)> {
    buys.iter()
        .filter_map(|buy| {
            sells
                .iter()
                .find(|s| s.trade.token_address == buy.trade.token_address && s.at > buy.at)
                .map(|sell| (buy, sell))
        })
        .collect()
}

fn build_pair(buy: &Timed<'_>, sell: &Timed<'_>, tokens: &TokenIndex<'_>) -> TradePair {
    let token = tokens.get(&buy.trade.token_address);

    TradePair {
        token_address: buy.trade.token_address.clone(),
        symbol: buy.trade.symbol().to_string(),
        buy_price: buy.trade.entry_price(),
        sell_price: sell.trade.unit_price,
        profit_percent: sell.trade.profit_percent(),
        hold_duration_secs: sell.trade.hold_duration_secs(),
        bought_at: buy.at,
        sold_at: sell.at,
        input_amount: buy.trade.input_amount,
        output_amount: sell.trade.output_amount,
        tvl: token.and_then(|t| t.raw_api_data.tvl),
        fdv: token.and_then(|t| t.raw_api_data.fdv),
        platform: token.and_then(|t| t.issue_platform()).map(String::from),
        launched_at: token.and_then(TokenSnapshot::launch_time),
        discovered_at: token.and_then(TokenSnapshot::discovery_time),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
