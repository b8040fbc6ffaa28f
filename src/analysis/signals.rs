use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::stats::{median, ExtentStats};
use crate::models::Signal;

/// Reason substring that identifies the stop-loss exit strategy.
pub const DEFAULT_STOP_LOSS_MARKER: &str = "#6";

#[derive(Debug, Clone, Default, Serialize)]
pub struct SignalAnalysis {
    pub total: usize,
    pub sell_count: usize,
    pub sell_by_reason: BTreeMap<String, usize>,
    pub stop_loss: StopLossStats,
}

/// Stop-loss trigger behavior. Profit and hold statistics cover only the
/// triggers that report the corresponding value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StopLossStats {
    pub marker: String,
    pub count: usize,
    pub profit: Option<ExtentStats>,
    pub median_profit: Option<Decimal>,
    pub hold_secs: Option<ExtentStats>,
}

impl StopLossStats {
    pub fn hold_minutes(&self) -> Option<ExtentStats> {
        self.hold_secs.map(|h| h.scaled(Decimal::from(60)))
    }

    pub fn hold_hours(&self) -> Option<ExtentStats> {
        self.hold_secs.map(|h| h.scaled(Decimal::from(3600)))
    }
}

/// Break sell signals down by reason and measure stop-loss triggers, i.e.
/// sells whose reason contains `stop_loss_marker`.
pub fn analyze_signals(signals: &[Signal], stop_loss_marker: &str) -> SignalAnalysis {
    let sells: Vec<&Signal> = signals.iter().filter(|s| s.is_sell()).collect();

    let mut sell_by_reason = BTreeMap::new();
    for signal in &sells {
        *sell_by_reason.entry(signal.reason().to_string()).or_insert(0) += 1;
    }

    let stop_losses: Vec<&Signal> = sells
        .iter()
        .copied()
        .filter(|s| {
            s.reason
                .as_deref()
                .is_some_and(|r| r.contains(stop_loss_marker))
        })
        .collect();

    let profits: Vec<Decimal> = stop_losses.iter().filter_map(|s| s.profit_percent()).collect();
    let holds: Vec<Decimal> = stop_losses
        .iter()
        .filter_map(|s| s.hold_duration_secs())
        .collect();

    tracing::debug!(
        sells = sells.len(),
        stop_losses = stop_losses.len(),
        marker = stop_loss_marker,
        "Signals analysed"
    );

    SignalAnalysis {
        total: signals.len(),
        sell_count: sells.len(),
        sell_by_reason,
        stop_loss: StopLossStats {
            marker: stop_loss_marker.to_string(),
            count: stop_losses.len(),
            median_profit: median(profits.iter().copied()),
            profit: ExtentStats::from_values(profits),
            hold_secs: ExtentStats::from_values(holds),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signal(action: &str, reason: Option<&str>, metadata: serde_json::Value) -> Signal {
        Signal {
            action: action.into(),
            reason: reason.map(String::from),
            metadata: metadata.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sell_reasons_and_stop_loss() {
        let signals = vec![
            signal("buy", Some("early return"), json!({})),
            signal(
                "sell",
                Some("sell strategy #6: stop loss"),
                json!({ "profitPercent": -40, "holdDuration": 300 }),
            ),
            signal(
                "sell",
                Some("sell strategy #6: stop loss"),
                json!({ "profitPercent": "-20", "holdDuration": 120 }),
            ),
            signal(
                "sell",
                Some("sell strategy #6: stop loss"),
                json!({ "profitPercent": "bad" }),
            ),
            signal("sell", Some("take profit #1"), json!({ "profitPercent": 30 })),
            signal("SELL", None, json!({})),
        ];

        let analysis = analyze_signals(&signals, DEFAULT_STOP_LOSS_MARKER);
        assert_eq!(analysis.total, 6);
        assert_eq!(analysis.sell_count, 5);
        assert_eq!(analysis.sell_by_reason.get("sell strategy #6: stop loss"), Some(&3));
        assert_eq!(analysis.sell_by_reason.get("unknown"), Some(&1));

        let sl = &analysis.stop_loss;
        assert_eq!(sl.count, 3);
        let profit = sl.profit.unwrap();
        assert_eq!(profit.count, 2);
        assert_eq!(profit.mean, Decimal::from(-30));
        assert_eq!(profit.min, Decimal::from(-40));
        assert_eq!(profit.max, Decimal::from(-20));
        assert_eq!(sl.median_profit, Some(Decimal::from(-30)));

        let minutes = sl.hold_minutes().unwrap();
        assert_eq!(minutes.min, Decimal::from(2));
        assert_eq!(minutes.max, Decimal::from(5));
    }

    #[test]
    fn test_no_stop_losses() {
        let signals = vec![signal("sell", Some("take profit"), json!({}))];
        let analysis = analyze_signals(&signals, "#6");
        assert_eq!(analysis.stop_loss.count, 0);
        assert!(analysis.stop_loss.profit.is_none());
        assert!(analysis.stop_loss.hold_secs.is_none());
        assert!(analysis.stop_loss.median_profit.is_none());
    }

    #[test]
    fn test_custom_marker() {
        let signals = vec![signal("sell", Some("trailing stop"), json!({ "profitPercent": -5 }))];
        let analysis = analyze_signals(&signals, "trailing");
        assert_eq!(analysis.stop_loss.count, 1);
        assert_eq!(analysis.stop_loss.marker, "trailing");
    }
}
