use std::path::Path;

use serde_json::{json, Value};

use trade_analysis::experiment::Dataset;

/// Monitored token row as the experiment API returns it.
#[allow(dead_code)]
pub fn token_json(address: &str, symbol: &str, status: &str, tvl: Value, fdv: Value) -> Value {
    json!({
        "token_address": address,
        "token_symbol": symbol,
        "status": status,
        "discovered_at": "2025-01-20T09:00:00Z",
        "raw_api_data": {
            "tvl": tvl,
            "fdv": fdv,
            "issue_platform": "pump",
            "launch_at": 1737363600
        }
    })
}

/// Buy fill: `input` quote spent at `price`.
#[allow(dead_code)]
pub fn buy_json(address: &str, symbol: &str, at: &str, price: &str, input: &str) -> Value {
    json!({
        "id": format!("buy-{address}-{at}"),
        "token_address": address,
        "token_symbol": symbol,
        "trade_direction": "buy",
        "unit_price": price,
        "input_amount": input,
        "output_amount": "1000000",
        "executed_at": at,
        "created_at": at,
        "metadata": {}
    })
}

/// Sell fill carrying the strategy's profit and hold in its metadata.
#[allow(dead_code)]
pub fn sell_json(
    address: &str,
    symbol: &str,
    at: &str,
    price: &str,
    output: &str,
    profit_percent: f64,
    hold_secs: i64,
) -> Value {
    json!({
        "id": format!("sell-{address}-{at}"),
        "token_address": address,
        "token_symbol": symbol,
        "trade_direction": "sell",
        "unit_price": price,
        "input_amount": "1000000",
        "output_amount": output,
        "executed_at": at,
        "created_at": at,
        "metadata": {
            "profitPercent": profit_percent,
            "holdDuration": hold_secs,
            "buyPrice": "0.0001"
        }
    })
}

#[allow(dead_code)]
pub fn signal_json(action: &str, reason: &str, profit_percent: f64, hold_secs: i64) -> Value {
    json!({
        "token_address": "AAA",
        "token_symbol": "AAA",
        "action": action,
        "reason": reason,
        "metadata": { "profitPercent": profit_percent, "holdDuration": hold_secs },
        "created_at": "2025-01-20T10:00:00Z"
    })
}

#[allow(dead_code)]
pub fn tokens_doc() -> Value {
    json!({
        "data": [
            token_json("AAA", "AAA", "bought", json!("5000"), json!("50000")),
            token_json("BBB", "BBB", "exited", json!(20000), json!(200000)),
            token_json("CCC", "CCC", "monitoring", json!("3000"), json!("30000")),
            token_json("DDD", "DDD", "monitoring", json!("1500.5"), json!(null)),
            token_json("EEE", "EEE", "monitoring", json!("200"), json!("2000")),
            token_json("FFF", "FFF", "bad_holder", json!(null), json!(null))
        ]
    })
}

/// AAA: one losing round trip. BBB: one win plus a still-open buy.
#[allow(dead_code)]
pub fn trades_doc() -> Value {
    json!({
        "data": [
            buy_json("AAA", "AAA", "2025-01-20T10:00:00Z", "0.0001", "100"),
            sell_json("AAA", "AAA", "2025-01-20T10:10:00Z", "0.00005", "50", -50.0, 600),
            buy_json("BBB", "BBB", "2025-01-20T11:00:00Z", "0.0002", "200"),
            sell_json("BBB", "BBB", "2025-01-20T11:30:00Z", "0.0003", "300", 50.0, 1800),
            buy_json("BBB", "BBB", "2025-01-20T12:00:00Z", "0.0003", "100")
        ]
    })
}

#[allow(dead_code)]
pub fn signals_doc() -> Value {
    json!({
        "signals": [
            signal_json("SELL", "#6 stop loss -40%", -40.0, 300),
            signal_json("sell", "#6 stop loss -60%", -60.0, 900),
            signal_json("sell", "#2 take profit", 80.0, 1200),
            signal_json("buy", "entry", 0.0, 0)
        ]
    })
}

#[allow(dead_code)]
pub fn portfolio_doc() -> Value {
    json!({ "snapshots": [ { "total_value": "1000" }, { "total_value": "950" } ] })
}

#[allow(dead_code)]
pub fn write_json(path: &Path, value: &Value) {
    std::fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// Write the standard experiment dump into `dir`.
#[allow(dead_code)]
pub fn write_dump(dir: &Path) {
    write_json(&dir.join("tokens.json"), &tokens_doc());
    write_json(&dir.join("trades.json"), &trades_doc());
    write_json(&dir.join("signals.json"), &signals_doc());
    write_json(&dir.join("portfolio.json"), &portfolio_doc());
}

/// The standard dump decoded straight into a dataset.
#[allow(dead_code)]
pub fn dataset() -> Dataset {
    Dataset {
        tokens: serde_json::from_value(tokens_doc()["data"].clone()).unwrap(),
        trades: serde_json::from_value(trades_doc()["data"].clone()).unwrap(),
        signals: serde_json::from_value(signals_doc()["signals"].clone()).unwrap(),
        portfolio: serde_json::from_value(portfolio_doc()["snapshots"].clone()).unwrap(),
    }
}
