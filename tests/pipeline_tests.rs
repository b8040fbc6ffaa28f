mod common;

use rust_decimal::Decimal;
use serde_json::json;

use trade_analysis::analysis::{AnalysisError, PairingPolicy};
use trade_analysis::errors::AppError;
use trade_analysis::experiment::{Dataset, FileSource, InMemorySource, SourceError};
use trade_analysis::models::TokenSnapshot;
use trade_analysis::report::{self, build_report, load_report, ReportSettings};

fn render(report: &report::ExperimentReport) -> String {
    let mut buf = Vec::new();
    report::write_full(&mut buf, report).unwrap();
    String::from_utf8(buf).unwrap()
}

#[tokio::test]
async fn test_dump_directory_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    common::write_dump(dir.path());

    let source = FileSource::from_dir(dir.path());
    let report = load_report(&source, &ReportSettings::default()).await.unwrap();

    assert_eq!(report.trade_count, 5);
    assert_eq!(report.pairing.buy_count, 3);
    assert_eq!(report.pairing.sell_count, 2);
    assert_eq!(report.pairing.unmatched_buys, 1);
    assert_eq!(report.pairing.pairs.len(), 2);
    assert_eq!(report.pairing.pairs[0].symbol, "AAA");
    assert_eq!(report.pairing.pairs[1].symbol, "BBB");
    assert_eq!(report.pairing.pairs[1].tvl, Some(Decimal::from(20_000)));

    let outcome = report.outcome.as_ref().unwrap();
    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.wins, 1);
    assert_eq!(outcome.losses, 1);
    assert_eq!(outcome.breakeven, 0);
    assert_eq!(outcome.win_rate, Decimal::new(5, 1));
    assert_eq!(outcome.win_loss_ratio, Decimal::ONE);
    assert_eq!(outcome.profit.mean, Decimal::ZERO);
    assert_eq!(outcome.hold_minutes().unwrap().mean, Decimal::from(20));
    assert_eq!(outcome.best.symbol, "BBB");
    assert_eq!(outcome.worst.symbol, "AAA");
    assert_eq!(outcome.capital.invested, Decimal::from(300));
    assert_eq!(outcome.capital.net_pnl, Decimal::from(50));
    assert_eq!(outcome.capital.return_pct.round_dp(2), Decimal::new(1667, 2));

    assert_eq!(report.tokens.total, 6);
    assert_eq!(report.tokens.by_status.get("monitoring"), Some(&3));
    assert_eq!(report.tokens.tvl.as_ref().unwrap().count, 5);
    assert_eq!(report.comparison.traded.count, 2);
    assert_eq!(report.comparison.monitored_only.count, 4);
    assert_eq!(report.comparison.traded.mean_tvl, Some(Decimal::from(12_500)));

    let missed: Vec<&str> = report.missed.iter().map(|m| m.symbol.as_str()).collect();
    assert_eq!(missed, vec!["CCC", "DDD"]);

    assert_eq!(report.signals.total, 4);
    assert_eq!(report.signals.sell_count, 3);
    assert_eq!(report.signals.stop_loss.count, 2);
    assert_eq!(report.signals.stop_loss.median_profit, Some(Decimal::from(-50)));
    assert_eq!(report.portfolio_snapshots, 2);
}

#[tokio::test]
async fn test_full_report_renders_every_section() {
    let report = load_report(
        &InMemorySource::new(common::dataset()),
        &ReportSettings::default(),
    )
    .await
    .unwrap();
    let text = render(&report);

    assert!(text.contains("source: in-memory dataset"));
    assert!(text.contains("Total tokens: 6"));
    assert!(text.contains("Matched pairs: 2 (pairing: fifo, unmatched buys: 1)"));
    assert!(text.contains("Wins:      1 (50.0%)"));
    assert!(text.contains("[Profit distribution]"));
    assert!(text.contains("[Trade details]"));
    assert!(text.contains("[Capital]"));
    assert!(text.contains("[Token features by outcome]"));
    assert!(text.contains("Winning trades: 1, with TVL: 1 (mean $20,000.00, max $20,000.00)"));
    assert!(text.contains("Losing trades: 1, with TVL: 1 (mean $5,000.00, max $5,000.00)"));
    assert!(text.contains("2025-01-20 09:00"));
    assert!(text.contains("pump"));
    assert!(text.ends_with("Analysis complete\n"));
}

#[tokio::test]
async fn test_trades_and_tokens_reports() {
    let report = load_report(
        &InMemorySource::new(common::dataset()),
        &ReportSettings::default(),
    )
    .await
    .unwrap();

    let mut trades = Vec::new();
    report::write_trades(&mut trades, &report).unwrap();
    let trades = String::from_utf8(trades).unwrap();
    assert!(trades.contains("Experiment trade performance"));
    assert!(trades.contains("[Best and worst trades]"));
    assert!(!trades.contains("[Token overview]"));

    let mut tokens = Vec::new();
    report::write_tokens(&mut tokens, &report).unwrap();
    let tokens = String::from_utf8(tokens).unwrap();
    assert!(tokens.contains("Experiment token overview"));
    assert!(tokens.contains("[Token overview]"));
    assert!(!tokens.contains("[Trade details]"));
}

#[tokio::test]
async fn test_explicit_files_without_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let trades = dir.path().join("fills.json");
    common::write_json(&trades, &common::trades_doc());

    let report = load_report(&FileSource::new(&trades), &ReportSettings::default())
        .await
        .unwrap();

    assert_eq!(report.pairing.pairs.len(), 2);
    assert!(report.pairing.pairs.iter().all(|p| p.tvl.is_none()));
    let outcome = report.outcome.unwrap();
    assert_eq!(outcome.no_tvl_pairs, 2);
    assert!(outcome.tvl.is_none());
    assert_eq!(report.tokens.total, 0);
    assert!(report.missed.is_empty());
    assert_eq!(report.signals.total, 0);
}

#[tokio::test]
async fn test_explicit_files_with_portfolio_and_upper_case_sides() {
    let dir = tempfile::tempdir().unwrap();
    let mut trades = common::trades_doc();
    for trade in trades["data"].as_array_mut().unwrap() {
        let side = trade["trade_direction"].as_str().unwrap().to_uppercase();
        trade["trade_direction"] = json!(side);
    }
    let trades_path = dir.path().join("fills.json");
    let portfolio_path = dir.path().join("snapshots.json");
    common::write_json(&trades_path, &trades);
    common::write_json(&portfolio_path, &common::portfolio_doc());

    let source = FileSource::new(&trades_path).with_portfolio(&portfolio_path);
    let report = load_report(&source, &ReportSettings::default()).await.unwrap();

    assert_eq!(report.pairing.buy_count, 3);
    assert_eq!(report.pairing.sell_count, 2);
    assert_eq!(report.pairing.pairs.len(), 2);
    assert_eq!(report.portfolio_snapshots, 2);
}

#[test]
fn test_huge_token_metrics_do_not_abort_the_report() {
    let mut dataset = common::dataset();
    let huge: Vec<TokenSnapshot> = ["XXX", "YYY", "ZZZ"]
        .iter()
        .map(|addr| {
            serde_json::from_value(common::token_json(
                addr,
                addr,
                "monitoring",
                json!("70000000000000000000000000000"),
                json!("70000000000000000000000000000"),
            ))
            .unwrap()
        })
        .collect();
    dataset.tokens.extend(huge);

    let report = build_report("fixture", &dataset, &ReportSettings::default()).unwrap();
    let tvl = report.tokens.tvl.as_ref().unwrap();
    assert_eq!(tvl.count, 8);
    assert_eq!(tvl.max, Decimal::from_scientific("7e28").unwrap());
    assert!(report.comparison.monitored_only.mean_tvl.is_some());
    assert!(render(&report).contains("Analysis complete"));
}

#[tokio::test]
async fn test_missing_trades_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_report(&FileSource::from_dir(dir.path()), &ReportSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Source(SourceError::Read { .. })));
}

#[tokio::test]
async fn test_malformed_json_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("trades.json"), "{ \"data\": [").unwrap();
    let err = load_report(&FileSource::from_dir(dir.path()), &ReportSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Source(SourceError::Parse { .. })));
}

#[test]
fn test_sell_before_buy_is_never_paired() {
    let dataset = Dataset {
        trades: serde_json::from_value(json!([
            common::sell_json("AAA", "AAA", "2025-01-20T09:00:00Z", "0.0002", "200", 100.0, 60),
            common::buy_json("AAA", "AAA", "2025-01-20T10:00:00Z", "0.0001", "100"),
        ]))
        .unwrap(),
        ..Default::default()
    };

    let report = build_report("fixture", &dataset, &ReportSettings::default()).unwrap();
    assert!(report.pairing.pairs.is_empty());
    assert_eq!(report.pairing.unmatched_buys, 1);
    assert!(report.outcome.is_none());
    assert!(render(&report).contains("No matched trades, nothing to summarise."));
}

#[test]
fn test_first_match_policy_is_selectable() {
    let settings = ReportSettings {
        pairing_policy: PairingPolicy::FirstMatch,
        ..Default::default()
    };
    let report = build_report("fixture", &common::dataset(), &settings).unwrap();
    assert_eq!(report.pairing_policy, PairingPolicy::FirstMatch);
    assert_eq!(report.pairing.pairs.len(), 2);
    assert!(render(&report).contains("pairing: first-match"));
}

#[test]
fn test_missed_threshold_and_limit() {
    let settings = ReportSettings {
        missed_tvl_threshold: Decimal::from(100),
        missed_limit: 2,
        ..Default::default()
    };
    let report = build_report("fixture", &common::dataset(), &settings).unwrap();
    let missed: Vec<&str> = report.missed.iter().map(|m| m.symbol.as_str()).collect();
    assert_eq!(missed, vec!["CCC", "DDD"]);
}

#[test]
fn test_custom_stop_loss_marker() {
    let settings = ReportSettings {
        stop_loss_marker: "take profit".into(),
        ..Default::default()
    };
    let report = build_report("fixture", &common::dataset(), &settings).unwrap();
    assert_eq!(report.signals.stop_loss.count, 1);
    assert_eq!(report.signals.stop_loss.marker, "take profit");
}

#[test]
fn test_bad_timestamp_surfaces_as_analysis_error() {
    let mut buy = common::buy_json("AAA", "AAA", "2025-01-20T10:00:00Z", "0.0001", "100");
    buy["executed_at"] = json!("yesterday");
    buy["created_at"] = json!(null);
    let dataset = Dataset {
        trades: serde_json::from_value(json!([buy])).unwrap(),
        ..Default::default()
    };

    let err = build_report("fixture", &dataset, &ReportSettings::default()).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidTimestamp { .. }));
}
