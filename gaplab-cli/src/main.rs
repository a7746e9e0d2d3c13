//! GapLab CLI — backtest and scan commands.
//!
//! Commands:
//! - `backtest` — replay the FVG signal pipeline over a 1-minute CSV (or a
//!   seeded synthetic series) and save the result JSON
//! - `scan` — resample a 1-minute CSV and report the current gap state and
//!   entry decision, the way a live poll of the pipeline would

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gaplab_core::domain::Timeframe;
use gaplab_core::strategy::FvgStrategy;
use gaplab_runner::{
    load_csv, resample, run_backtest, synthetic_series, BacktestConfig, BacktestResult,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gaplab", about = "GapLab CLI — fair value gap signal pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the signal pipeline over historical 1-minute candles.
    Backtest {
        /// Path to a 1-minute OHLCV CSV (timestamp_ms,open,high,low,close,volume).
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Use a seeded synthetic series instead of a CSV.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Seed for the synthetic series.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Number of synthetic 1-minute candles.
        #[arg(long, default_value_t = 50_000)]
        bars: usize,

        /// Starting price for the synthetic series.
        #[arg(long, default_value_t = 50_000.0)]
        start_price: f64,

        /// Path to a TOML config file. Defaults built in when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for result JSON.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Resample a 1-minute CSV and report the current gap state and entry decision.
    Scan {
        /// Path to a 1-minute OHLCV CSV.
        #[arg(long)]
        csv: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Backtest {
            csv,
            synthetic,
            seed,
            bars,
            start_price,
            config,
            output_dir,
        } => run_backtest_cmd(csv, synthetic, seed, bars, start_price, config, output_dir),
        Commands::Scan { csv } => run_scan(&csv),
    }
}

fn run_backtest_cmd(
    csv: Option<PathBuf>,
    synthetic: bool,
    seed: u64,
    bars: usize,
    start_price: f64,
    config_path: Option<PathBuf>,
    output_dir: PathBuf,
) -> Result<()> {
    if csv.is_some() && synthetic {
        bail!("--csv and --synthetic are mutually exclusive");
    }

    let config = match config_path {
        Some(path) => BacktestConfig::from_toml_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => BacktestConfig::default(),
    };

    let base = match csv {
        Some(path) => {
            load_csv(&path).with_context(|| format!("loading candles from {}", path.display()))?
        }
        None => {
            if !synthetic {
                bail!("one of --csv or --synthetic is required");
            }
            synthetic_series(seed, bars, start_price)
        }
    };
    if base.is_empty() {
        bail!("no candles to replay");
    }

    let result = run_backtest(&config, &base)?;
    print_summary(&result, base.len());

    let path = result.save_json(&output_dir)?;
    println!("Result saved to: {}", path.display());

    Ok(())
}

fn run_scan(csv: &Path) -> Result<()> {
    let base = load_csv(csv).with_context(|| format!("loading candles from {}", csv.display()))?;

    let series_10m = resample(&base, Timeframe::M10)?.tail(200);
    let series_5m = resample(&base, Timeframe::M5)?.tail(200);
    let series_30m = resample(&base, Timeframe::M30)?.tail(100);

    let mut strategy = FvgStrategy::default();
    let signal = strategy.process(&series_10m, &series_5m, Some(&series_30m))?;

    println!();
    println!("=== Scan: {} ===", csv.display());
    println!(
        "Windows:        {} x10m, {} x5m, {} x30m",
        series_10m.len(),
        series_5m.len(),
        series_30m.len()
    );

    let active = strategy.tracker().active();
    println!("Active gaps:    {}", active.len());
    for gap in active {
        let side = if gap.is_bullish { "bullish" } else { "bearish" };
        println!(
            "  {side:>7} [{:.2}, {:.2}] since {}",
            gap.low, gap.high, gap.timestamp
        );
    }

    match signal {
        Some(signal) => {
            println!();
            println!("--- Entry ---");
            println!("Direction:      {:?}", signal.direction);
            println!("Entry:          {:.2}", signal.entry);
            println!("Stop loss:      {:.2}", signal.stop_loss);
            println!("Take profit:    {:.2}", signal.take_profit);
            if let Some(dev_line) = signal.dev_line {
                println!("Dev line:       {dev_line:.2}");
            }
        }
        None => println!("No entry on the latest candle."),
    }
    println!();

    Ok(())
}

fn print_summary(result: &BacktestResult, base_len: usize) {
    println!();
    println!("=== Backtest Result ===");
    println!("Run:            {}", result.run_id);
    println!("Symbol:         {}", result.symbol);
    println!("Base candles:   {base_len}");
    println!("Trades:         {}", result.metrics.trade_count);
    println!();
    println!("--- Performance ---");
    println!("Total Return:   {:.2}%", result.metrics.total_return * 100.0);
    println!("Max Drawdown:   {:.2}%", result.metrics.max_drawdown * 100.0);
    println!("Win Rate:       {:.1}%", result.metrics.win_rate * 100.0);
    println!("Profit Factor:  {:.2}", result.metrics.profit_factor);
    println!("Avg Trade:      {:.3}%", result.metrics.avg_return_pct * 100.0);
    if let Some(open) = &result.open_signal {
        println!();
        println!(
            "Open signal at end of replay: entry {:.2}, stop {:.2}, target {:.2}",
            open.entry, open.stop_loss, open.take_profit
        );
    }
    println!();
}
