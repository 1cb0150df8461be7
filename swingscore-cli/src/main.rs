//! SwingScore CLI: screening, news scoring and risk levels from the command line.
//!
//! Commands:
//! - `screen`: run the full pipeline over a universe of tickers
//! - `news`: score news text for one ticker and show the certainty breakdown
//! - `risk`: compute ATR-based levels and ratchet a trailing stop

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use swingscore_core::news::NewsCertaintyScorer;
use swingscore_core::{RiskLevelCalculator, ScreenConfig, TrailingStop};
use swingscore_runner::{
    export_json, load_inputs, write_report, LoadOptions, ScreenReport, Screener, SkippedTicker,
    Universe,
};
use tracing::{info, Level};

#[derive(Parser)]
#[command(
    name = "swingscore",
    about = "SwingScore CLI: swing-trade screening from price action and news"
)]
struct Cli {
    /// More log output (debug level).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen a universe and report picks.
    Screen(ScreenArgs),
    /// Score news text for a single ticker.
    News {
        /// Ticker the text belongs to.
        #[arg(long)]
        ticker: String,

        /// One or more text snippets.
        #[arg(required = true)]
        text: Vec<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Compute stop, targets and trailing stop from entry price and ATR.
    Risk {
        #[arg(long)]
        entry: f64,

        /// 20-bar average true range.
        #[arg(long)]
        atr: f64,

        /// Latest close, to ratchet the trailing stop.
        #[arg(long)]
        close: Option<f64>,

        /// Trailing stop from the previous evaluation. Defaults to the initial level.
        #[arg(long, requires = "close")]
        previous_stop: Option<f64>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct ScreenArgs {
    /// Universe TOML (sector → tickers).
    #[arg(long, conflicts_with = "tickers")]
    universe: Option<PathBuf>,

    /// Comma-separated tickers instead of a universe file.
    #[arg(long, value_delimiter = ',')]
    tickers: Vec<String>,

    /// Directory of <TICKER>.csv price files.
    #[arg(long, default_value = "data/prices")]
    prices_dir: PathBuf,

    /// Directory of <TICKER>.txt news files.
    #[arg(long, default_value = "data/news")]
    news_dir: PathBuf,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Generate synthetic prices for tickers without a price file.
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Bars per synthetic ticker.
    #[arg(long, default_value_t = 250)]
    synthetic_bars: usize,

    /// Evaluate tickers one at a time instead of in parallel.
    #[arg(long, default_value_t = false)]
    sequential: bool,

    /// Write results to this file (CSV, or JSON with --json).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Emit JSON instead of CSV / the summary table.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Screen(args) => run_screen(args),
        Commands::News {
            ticker,
            text,
            config,
        } => run_news(&ticker, &text, config.as_deref()),
        Commands::Risk {
            entry,
            atr,
            close,
            previous_stop,
            config,
        } => run_risk(entry, atr, close, previous_stop, config.as_deref()),
    }
}

/// Logs go to stderr so JSON on stdout stays machine-readable.
fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ScreenConfig> {
    match path {
        Some(p) => ScreenConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(ScreenConfig::default()),
    }
}

// ─── screen ─────────────────────────────────────────────────────────

fn run_screen(args: ScreenArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let universe = match (&args.universe, args.tickers.is_empty()) {
        (Some(path), _) => Universe::from_file(path)
            .with_context(|| format!("failed to load universe {}", path.display()))?,
        (None, false) => Universe::from_tickers(args.tickers.iter().cloned()),
        (None, true) => bail!("provide --universe FILE or --tickers A,B,..."),
    };
    let tickers = universe.all_tickers();
    if tickers.is_empty() {
        bail!("universe contains no tickers");
    }

    let placeholder = config
        .news
        .synthetic_markers
        .first()
        .cloned()
        .unwrap_or_else(|| swingscore_core::news::DEFAULT_SYNTHETIC_MARKER.to_string());
    let opts = LoadOptions {
        prices_dir: args.prices_dir.clone(),
        news_dir: args.news_dir.clone(),
        synthetic: args.synthetic,
        synthetic_bars: args.synthetic_bars,
        news_placeholder: placeholder,
    };

    info!(tickers = tickers.len(), "loading inputs");
    let (inputs, load_skips) = load_inputs(&tickers, &opts);

    let screener = Screener::new(config);
    info!(fingerprint = screener.fingerprint(), "config");
    let mut report = screener.screen(&inputs, !args.sequential);
    let mut skipped = load_skips;
    skipped.append(&mut report.skipped);
    report.skipped = skipped;

    match (&args.output, args.json) {
        (Some(path), json) => {
            write_report(path, &report, json)?;
            println!("Results written to: {}", path.display());
            print_summary(&report, &universe);
        }
        (None, true) => println!("{}", export_json(&report)?),
        (None, false) => {
            print_table(&report);
            print_summary(&report, &universe);
        }
    }
    Ok(())
}

fn print_table(report: &ScreenReport) {
    println!(
        "{:<12} {:>9} {:>6} {:>5} {:>6} {:<12} {:>5} {:>9} {:>9} {:>4}",
        "Ticker", "Close", "Alpha", "RVOL", "Cert", "Catalyst", "Gates", "Stop", "Target1", "Pick"
    );
    println!("{}", "-".repeat(88));
    let mut rows: Vec<_> = report.rows.iter().collect();
    rows.sort_by(|a, b| b.alpha.total_cmp(&a.alpha));
    for r in rows {
        let gates = [r.gate_alpha, r.gate_volume, r.gate_trend, r.gate_setup]
            .iter()
            .filter(|g| **g)
            .count();
        println!(
            "{:<12} {:>9.2} {:>6.1} {:>5.2} {:>6.1} {:<12} {:>3}/4 {:>9} {:>9} {:>4}",
            r.ticker,
            r.close,
            r.alpha,
            r.relative_volume,
            r.certainty,
            r.catalyst_type.as_str(),
            gates,
            r.stop_loss.map_or("-".to_string(), |v| format!("{v:.2}")),
            r.take_profit_1.map_or("-".to_string(), |v| format!("{v:.2}")),
            if r.final_pick { "YES" } else { "" },
        );
    }
}

fn print_summary(report: &ScreenReport, universe: &Universe) {
    println!();
    println!(
        "Screened: {}  Skipped: {}  Picks: {} ({:.1}%)",
        report.rows.len(),
        report.skipped.len(),
        report.pick_count(),
        report.pass_rate() * 100.0
    );
    for r in report.picks() {
        println!(
            "  pick {:<12} {:<14} alpha {:>5.1}  entry {:>9.2}  stop {:>9}",
            r.ticker,
            universe.sector_of(&r.ticker).unwrap_or("-"),
            r.alpha,
            r.close,
            r.stop_loss.map_or("-".to_string(), |v| format!("{v:.2}")),
        );
    }
    for SkippedTicker { ticker, reason } in &report.skipped {
        println!("  skipped {ticker}: {reason}");
    }
    println!("Config fingerprint: {}", report.config_fingerprint);
}

// ─── news ───────────────────────────────────────────────────────────

fn run_news(ticker: &str, text: &[String], config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let scorer = NewsCertaintyScorer::new(config.news);
    let assessment = scorer.assess(text, ticker);
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "metrics": assessment.metrics,
            "breakdown": assessment.breakdown,
        }))
        .context("failed to serialize news assessment")?
    );
    Ok(())
}

// ─── risk ───────────────────────────────────────────────────────────

fn run_risk(
    entry: f64,
    atr: f64,
    close: Option<f64>,
    previous_stop: Option<f64>,
    config: Option<&Path>,
) -> Result<()> {
    let config = load_config(config)?;
    let calc = RiskLevelCalculator::new(config.risk);
    let levels = calc.compute(entry, atr)?;

    let ratcheted = close.map(|c| {
        let mut stop = match previous_stop {
            Some(prev) => TrailingStop::new(prev, calc.config().trailing_multiple),
            None => calc.trailing_stop(&levels),
        };
        stop.update(c, atr)
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "levels": levels,
            "tradeable": levels.is_tradeable(),
            "target_1_exit_fraction": calc.config().target_1_exit_fraction,
            "target_2_exit_fraction": calc.config().target_2_exit_fraction,
            "ratcheted_trailing_stop": ratcheted,
        }))
        .context("failed to serialize risk levels")?
    );
    Ok(())
}
