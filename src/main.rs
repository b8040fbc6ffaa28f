use std::io::{self, Write};

use clap::Parser;

use trade_analysis::cli::{Cli, Command};
use trade_analysis::config::{AppConfig, SourceSelection};
use trade_analysis::experiment::{ExperimentClient, FileSource, RemoteSource};
use trade_analysis::report::{self, load_report, ReportSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    cli.apply_to(&mut config);
    let settings = ReportSettings::from(&config);

    let report = match config.source()? {
        SourceSelection::Remote {
            api_url,
            experiment_id,
        } => {
            tracing::info!(%api_url, %experiment_id, "Fetching experiment data");
            let client = ExperimentClient::new(&api_url, &experiment_id, config.request_timeout())?
                .signals_limit(config.signals_limit);
            load_report(&RemoteSource::new(client), &settings).await?
        }
        SourceSelection::Directory(dir) => {
            tracing::info!(dir = %dir.display(), "Reading experiment dump");
            load_report(&FileSource::from_dir(&dir), &settings).await?
        }
        SourceSelection::Files {
            trades,
            tokens,
            signals,
            portfolio,
        } => {
            let mut source = FileSource::new(trades);
            if let Some(tokens) = tokens {
                source = source.with_tokens(tokens);
            }
            if let Some(signals) = signals {
                source = source.with_signals(signals);
            }
            if let Some(portfolio) = portfolio {
                source = source.with_portfolio(portfolio);
            }
            load_report(&source, &settings).await?
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command() {
        Command::Report => report::write_full(&mut out, &report)?,
        Command::Trades => report::write_trades(&mut out, &report)?,
        Command::Tokens => report::write_tokens(&mut out, &report)?,
    }
    out.flush()?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // stdout carries the report, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}
