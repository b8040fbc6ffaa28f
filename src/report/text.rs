//! Plain-text rendering of an [`ExperimentReport`].

use std::io::{self, Write};

use rust_decimal::Decimal;

use super::format::{
    clip, fixed, money, opt_fixed, opt_money, opt_time, rate, sci, signed, NA,
};
use super::ExperimentReport;
use crate::analysis::stats::{Distribution, ExtentStats};
use crate::analysis::tokens::GroupMetrics;
use crate::analysis::OutcomeSummary;

const WIDTH: usize = 100;

/// Every section: tokens, trades, signals, comparison, missed opportunities.
pub fn write_full<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    header(w, "Experiment trade analysis", report)?;
    token_overview(w, report)?;
    trade_outcomes(w, report)?;
    if let Some(outcome) = &report.outcome {
        profit_histogram(w, outcome)?;
        trade_table(w, report)?;
        token_features(w, report)?;
        capital(w, outcome)?;
        price_movement(w, outcome)?;
    }
    sell_signals(w, report)?;
    comparison(w, report)?;
    missed(w, report)?;
    footer(w)
}

/// Trade-only report: outcomes, per-pair detail, capital.
pub fn write_trades<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    header(w, "Experiment trade performance", report)?;
    trade_table(w, report)?;
    trade_outcomes(w, report)?;
    if let Some(outcome) = &report.outcome {
        best_and_worst(w, outcome)?;
        capital(w, outcome)?;
        profit_histogram(w, outcome)?;
    }
    footer(w)
}

/// Token-only report: monitored token universe.
pub fn write_tokens<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    header(w, "Experiment token overview", report)?;
    token_overview(w, report)?;
    comparison(w, report)?;
    missed(w, report)?;
    footer(w)
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn header<W: Write>(w: &mut W, title: &str, report: &ExperimentReport) -> io::Result<()> {
    writeln!(w, "{}", "=".repeat(WIDTH))?;
    writeln!(w, "{title:^WIDTH$}")?;
    writeln!(w, "{:^WIDTH$}", format!("source: {}", report.source))?;
    writeln!(w, "{}", "=".repeat(WIDTH))
}

fn footer<W: Write>(w: &mut W) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "{}", "=".repeat(WIDTH))?;
    writeln!(w, "Analysis complete")
}

fn section<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    writeln!(w)?;
    writeln!(w, "[{title}]")?;
    writeln!(w, "{}", "-".repeat(WIDTH))
}

fn token_overview<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    let tokens = &report.tokens;
    section(w, "Token overview")?;
    writeln!(w, "Total tokens: {}", tokens.total)?;
    if report.portfolio_snapshots > 0 {
        writeln!(w, "Portfolio snapshots: {}", report.portfolio_snapshots)?;
    }
    writeln!(w, "By status:")?;
    for (status, count) in &tokens.by_status {
        writeln!(w, "  - {status}: {count}")?;
    }

    writeln!(w)?;
    writeln!(w, "TVL (tokens with TVL data):")?;
    distribution(w, tokens.tvl.as_ref())?;
    writeln!(w)?;
    writeln!(w, "FDV (tokens with FDV data):")?;
    distribution(w, tokens.fdv.as_ref())
}

fn distribution<W: Write>(w: &mut W, dist: Option<&Distribution>) -> io::Result<()> {
    let Some(d) = dist else {
        return writeln!(w, "  - no data");
    };
    writeln!(w, "  - count:  {}", d.count)?;
    writeln!(w, "  - min:    {}", money(d.min))?;
    writeln!(w, "  - p25:    {}", opt_money(d.p25))?;
    writeln!(w, "  - median: {}", money(d.median))?;
    writeln!(w, "  - p75:    {}", opt_money(d.p75))?;
    writeln!(w, "  - max:    {}", money(d.max))?;
    writeln!(w, "  - mean:   {}", money(d.mean))
}

fn trade_outcomes<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    let pairing = &report.pairing;
    section(w, "Trade outcomes")?;
    writeln!(
        w,
        "Trades: {} (buys {}, sells {})",
        report.trade_count, pairing.buy_count, pairing.sell_count
    )?;
    writeln!(
        w,
        "Matched pairs: {} (pairing: {}, unmatched buys: {})",
        pairing.pairs.len(),
        report.pairing_policy,
        pairing.unmatched_buys
    )?;

    let Some(o) = &report.outcome else {
        return writeln!(w, "No matched trades, nothing to summarise.");
    };

    writeln!(w)?;
    writeln!(w, "Wins:      {} ({})", o.wins, rate(o.win_rate))?;
    writeln!(w, "Losses:    {} ({})", o.losses, rate(o.loss_rate))?;
    writeln!(w, "Breakeven: {}", o.breakeven)?;
    writeln!(w, "Mean profit:  {}%", signed(o.profit.mean, 2))?;
    writeln!(w, "Best trade:   {}%", signed(o.profit.max, 2))?;
    writeln!(w, "Worst trade:  {}%", signed(o.profit.min, 2))?;
    writeln!(w, "Win/loss ratio: {}", fixed(o.win_loss_ratio, 2))?;

    writeln!(w)?;
    match (&o.hold_secs, o.hold_minutes(), o.hold_hours()) {
        (Some(secs), Some(mins), Some(hours)) => {
            writeln!(w, "Hold time ({} pairs reporting):", secs.count)?;
            writeln!(
                w,
                "  - mean: {} s ({} min, {} h)",
                fixed(secs.mean, 0),
                fixed(mins.mean, 2),
                fixed(hours.mean, 2)
            )?;
            writeln!(w, "  - min:  {} s ({} min)", fixed(secs.min, 0), fixed(mins.min, 2))?;
            writeln!(
                w,
                "  - max:  {} s ({} min, {} h)",
                fixed(secs.max, 0),
                fixed(mins.max, 2),
                fixed(hours.max, 2)
            )?;
        }
        _ => writeln!(w, "Hold time: no data")?,
    }
    let minutes = |v: Option<Decimal>| opt_fixed(v.map(|s| s / Decimal::from(60)), 2);
    writeln!(w, "  - winning trades mean: {} min", minutes(o.win_mean_hold_secs))?;
    writeln!(w, "  - losing trades mean:  {} min", minutes(o.loss_mean_hold_secs))?;

    writeln!(w)?;
    writeln!(w, "Traded tokens with TVL data: {}", o.tvl.as_ref().map_or(0, |d| d.count))?;
    if let Some(tvl) = &o.tvl {
        writeln!(
            w,
            "  - TVL range {} - {}, median {}",
            money(tvl.min),
            money(tvl.max),
            money(tvl.median)
        )?;
    }
    writeln!(w, "Pairs whose token has no TVL: {}", o.no_tvl_pairs)
}

fn profit_histogram<W: Write>(w: &mut W, o: &OutcomeSummary) -> io::Result<()> {
    section(w, "Profit distribution")?;
    for (band, count) in o.histogram.iter() {
        writeln!(
            w,
            "{:<14} {:>4} ({})",
            band.label(),
            count,
            rate(o.histogram.fraction(band))
        )?;
    }
    Ok(())
}

fn trade_table<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    section(w, "Trade details")?;
    if report.pairing.pairs.is_empty() {
        return writeln!(w, "No matched trades.");
    }
    writeln!(
        w,
        "{:<15} {:<10} {:<10} {:<9} {:<9} {:<16} {:<16} {:<12} {:<16}",
        "Token", "Buy price", "Sell price", "Profit %", "Hold min", "TVL", "FDV", "Platform",
        "Launched"
    )?;
    for p in &report.pairing.pairs {
        writeln!(
            w,
            "{:<15} {:<10} {:<10} {:<9} {:<9} {:<16} {:<16} {:<12} {:<16}",
            clip(&p.symbol, 15),
            sci(p.buy_price),
            sci(p.sell_price),
            p.profit_percent.map(|v| signed(v, 2)).unwrap_or_else(|| NA.into()),
            opt_fixed(p.hold_minutes(), 2),
            opt_money(p.tvl),
            opt_money(p.fdv),
            clip(p.platform.as_deref().unwrap_or(NA), 12),
            opt_time(p.launched_at),
        )?;
    }
    Ok(())
}

fn token_features<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    section(w, "Token features by outcome")?;
    if let Some(o) = &report.outcome {
        group_tvl(w, "Winning", o.wins, o.win_tvl.as_ref())?;
        group_tvl(w, "Losing", o.losses, o.loss_tvl.as_ref())?;
    }

    writeln!(w)?;
    writeln!(
        w,
        "{:<15} {:<8} {:>16} {:>16} {:<12} {:<16} {:<16}",
        "Token", "Outcome", "TVL", "FDV", "Platform", "Launched", "Discovered"
    )?;
    for p in &report.pairing.pairs {
        let outcome = if p.is_win() {
            "win"
        } else if p.is_loss() {
            "loss"
        } else {
            "even"
        };
        writeln!(
            w,
            "{:<15} {:<8} {:>16} {:>16} {:<12} {:<16} {:<16}",
            clip(&p.symbol, 15),
            outcome,
            opt_money(p.tvl),
            opt_money(p.fdv),
            clip(p.platform.as_deref().unwrap_or(NA), 12),
            opt_time(p.launched_at),
            opt_time(p.discovered_at),
        )?;
    }
    Ok(())
}

fn group_tvl<W: Write>(
    w: &mut W,
    label: &str,
    trades: usize,
    tvl: Option<&ExtentStats>,
) -> io::Result<()> {
    match tvl {
        Some(t) => writeln!(
            w,
            "{label} trades: {trades}, with TVL: {} (mean {}, max {})",
            t.count,
            money(t.mean),
            money(t.max)
        ),
        None => writeln!(w, "{label} trades: {trades}, with TVL: 0"),
    }
}

fn best_and_worst<W: Write>(w: &mut W, o: &OutcomeSummary) -> io::Result<()> {
    section(w, "Best and worst trades")?;
    for (label, p) in [("Best", &o.best), ("Worst", &o.worst)] {
        writeln!(w, "{label}: {}", p.symbol)?;
        writeln!(w, "  buy price:  {}", sci(p.buy_price))?;
        writeln!(w, "  sell price: {}", sci(p.sell_price))?;
        writeln!(w, "  profit:     {}%", signed(p.profit(), 2))?;
        writeln!(w, "  hold:       {} h", opt_fixed(p.hold_hours(), 2))?;
    }
    Ok(())
}

fn capital<W: Write>(w: &mut W, o: &OutcomeSummary) -> io::Result<()> {
    let c = &o.capital;
    section(w, "Capital")?;
    if c.pairs == 0 {
        return writeln!(w, "No pairs with both input and output amounts.");
    }
    writeln!(w, "Pairs with amounts: {}", c.pairs)?;
    writeln!(w, "Invested:  {}", fixed(c.invested, 8))?;
    writeln!(w, "Proceeds:  {}", fixed(c.proceeds, 8))?;
    writeln!(w, "Net PnL:   {}", signed(c.net_pnl, 8))?;
    writeln!(w, "Return:    {}%", signed(c.return_pct, 2))
}

fn price_movement<W: Write>(w: &mut W, o: &OutcomeSummary) -> io::Result<()> {
    section(w, "Price movement (sell vs buy)")?;
    writeln!(w, "Mean decline: {}%", opt_fixed(o.price_change.mean_decline_pct, 2))?;
    writeln!(w, "Mean rise:    {}%", opt_fixed(o.price_change.mean_rise_pct, 2))
}

fn sell_signals<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    let signals = &report.signals;
    section(w, "Sell signals")?;
    writeln!(w, "Signals: {}, sells: {}", signals.total, signals.sell_count)?;
    for (reason, count) in &signals.sell_by_reason {
        writeln!(w, "  - {reason}: {count}")?;
    }

    let sl = &signals.stop_loss;
    writeln!(w)?;
    writeln!(w, "Stop-loss triggers (reason contains {:?}): {}", sl.marker, sl.count)?;
    if let Some(profit) = &sl.profit {
        writeln!(w, "  - mean profit:   {}%", fixed(profit.mean, 2))?;
        writeln!(w, "  - median profit: {}%", opt_fixed(sl.median_profit, 2))?;
        writeln!(w, "  - worst:         {}%", fixed(profit.min, 2))?;
        writeln!(w, "  - mildest:       {}%", fixed(profit.max, 2))?;
    }
    if let (Some(mins), Some(hours)) = (sl.hold_minutes(), sl.hold_hours()) {
        hold_line(w, "mean", &mins, &hours, |s| s.mean)?;
        hold_line(w, "min", &mins, &hours, |s| s.min)?;
        hold_line(w, "max", &mins, &hours, |s| s.max)?;
    }
    Ok(())
}

fn hold_line<W: Write>(
    w: &mut W,
    label: &str,
    mins: &ExtentStats,
    hours: &ExtentStats,
    pick: impl Fn(&ExtentStats) -> Decimal,
) -> io::Result<()> {
    writeln!(
        w,
        "  - {label} hold: {} min ({} h)",
        fixed(pick(mins), 2),
        fixed(pick(hours), 2)
    )
}

fn comparison<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    section(w, "Traded vs monitored-only tokens")?;
    group(w, "Traded", &report.comparison.traded)?;
    group(w, "Monitored only", &report.comparison.monitored_only)
}

fn group<W: Write>(w: &mut W, label: &str, g: &GroupMetrics) -> io::Result<()> {
    writeln!(w, "{label} ({} tokens):", g.count)?;
    writeln!(w, "  - mean TVL:   {}", opt_money(g.mean_tvl))?;
    writeln!(w, "  - median TVL: {}", opt_money(g.median_tvl))?;
    writeln!(w, "  - mean FDV:   {}", opt_money(g.mean_fdv))?;
    writeln!(w, "  - median FDV: {}", opt_money(g.median_fdv))
}

fn missed<W: Write>(w: &mut W, report: &ExperimentReport) -> io::Result<()> {
    section(
        w,
        &format!(
            "Untraded tokens with TVL above {}",
            money(report.missed_tvl_threshold)
        ),
    )?;
    if report.missed.is_empty() {
        return writeln!(w, "None.");
    }
    writeln!(w, "{:<20} {:>18} {:>18} {:<15}", "Token", "TVL", "FDV", "Platform")?;
    for m in &report.missed {
        writeln!(
            w,
            "{:<20} {:>18} {:>18} {:<15}",
            clip(&m.symbol, 20),
            money(m.tvl),
            opt_money(m.fdv),
            m.platform
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::Dataset;
    use crate::report::{build_report, ReportSettings};

    fn render<F>(write: F) -> String
    where
        F: Fn(&mut Vec<u8>, &ExperimentReport) -> io::Result<()>,
    {
        let report =
            build_report("empty", &Dataset::default(), &ReportSettings::default()).unwrap();
        let mut buf = Vec::new();
        write(&mut buf, &report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_empty_dataset_renders_no_data() {
        let text = render(|w, r| write_full(w, r));
        assert!(text.contains("Total tokens: 0"));
        assert!(text.contains("  - no data"));
        assert!(text.contains("No matched trades, nothing to summarise."));
        assert!(text.contains("Stop-loss triggers (reason contains \"#6\"): 0"));
        assert!(!text.contains("[Capital]"));
    }

    #[test]
    fn test_trades_report_without_pairs() {
        let text = render(|w, r| write_trades(w, r));
        assert!(text.contains("No matched trades."));
        assert!(text.contains("Matched pairs: 0 (pairing: fifo, unmatched buys: 0)"));
    }

    #[test]
    fn test_tokens_report_threshold_heading() {
        let text = render(|w, r| write_tokens(w, r));
        assert!(text.contains("[Untraded tokens with TVL above $1,000.00]"));
        assert!(text.contains("None."));
    }
}
