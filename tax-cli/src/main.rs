use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{debug, info};

use tax_cli::config::{AppConfig, Overrides};
use tax_cli::{app, display, interactive, logging};
use tax_core::CalculationSession;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Marginal income tax calculator.
///
/// Looks up the bracket schedule for the requested tax year from the
/// configured provider and prints the tax owed per band.
#[derive(Debug, Parser)]
#[command(name = "tax-calculator", version, about)]
struct Cli {
    /// Annual income, e.g. `100000` or `$100,000`.
    #[arg(long)]
    income: Option<String>,

    /// Tax year whose schedule is applied.
    #[arg(long)]
    year: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Prompt for income and tax year repeatedly.
    #[arg(long, short)]
    interactive: bool,

    /// List the tax years the provider can serve and exit.
    #[arg(long)]
    list_years: bool,

    /// Schedule backend (`memory`, `csv` or `http`).
    #[arg(long)]
    backend: Option<String>,

    /// Backend source: `builtin`, a CSV path or a base URL.
    #[arg(long)]
    source: Option<String>,

    /// Timeout for one schedule request, in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level or filter directive; overrides `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    config.apply(Overrides {
        backend: cli.backend,
        source: cli.source,
        timeout_secs: cli.timeout_secs,
        log_level: cli.log_level,
    });

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;
    info!(backend = %config.provider.backend, "starting tax calculator");

    let registry = app::build_registry();
    let provider = app::open_provider(&registry, &config.provider).await?;

    if cli.list_years {
        let years = app::list_years(&*provider).await?;
        print!("{}", display::render_years(&years));
        return Ok(());
    }

    if cli.interactive {
        debug!("entering interactive mode");
        let session = CalculationSession::new(provider);
        return interactive::run(&session, BufReader::new(tokio::io::stdin()), io::stdout()).await;
    }

    let income = cli.income.unwrap_or_default();
    let year = cli.year.unwrap_or_default();
    let result = app::calculate_once(provider, &income, &year)
        .await
        .context("Calculation failed")?;

    if cli.json {
        println!("{}", display::render_json(&result)?);
    } else {
        print!("{}", display::render_result(&result));
    }

    Ok(())
}
