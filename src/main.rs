use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use dca_compare::telemetry::init_tracing;
use dca_compare::{read_price_csv, simulate, Frequency, PriceSeries, SimulationReport};

#[derive(Debug, Parser)]
#[command(name = "dca-compare", version, about = "Compare daily, weekly and monthly dollar-cost averaging")]
struct Cli {
    /// tracing filter directive (RUST_LOG overrides)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate all three cadences over a local price CSV (Date,Open,Close)
    Simulate {
        /// Path to the price CSV file
        #[arg(long)]
        csv: PathBuf,

        /// Nominal amount invested per period
        #[arg(long)]
        amount: f64,

        /// Nominal frequency: daily, weekly or monthly
        #[arg(long, default_value = "monthly")]
        frequency: Frequency,

        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// First date to exclude (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, false)?;

    match cli.command {
        Command::Simulate {
            csv,
            amount,
            frequency,
            start,
            end,
            json,
        } => run_simulate(csv, amount, frequency, start, end, json),
    }
}

fn run_simulate(
    csv: PathBuf,
    amount: f64,
    frequency: Frequency,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let bars = read_price_csv(&csv)
        .with_context(|| format!("Failed to load prices from {}", csv.display()))?;

    let series: PriceSeries = bars
        .into_iter()
        .filter(|bar| start.map_or(true, |s| bar.date >= s))
        .filter(|bar| end.map_or(true, |e| bar.date < e))
        .collect();

    info!(bars = series.len(), %frequency, amount, "running simulation");

    let report = simulate(&series, amount, frequency).context("Simulation failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&csv, series.len(), amount, frequency, &report);
    }

    Ok(())
}

fn print_report(
    csv: &Path,
    bars: usize,
    amount: f64,
    frequency: Frequency,
    report: &SimulationReport,
) {
    println!("💵 DCA Comparison - {}", csv.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{} trading days, ${:.2} {}", bars, amount, frequency);
    println!();
    println!(
        "{:<10} {:>8} {:>14} {:>14} {:>10}",
        "Cadence", "Buys", "Invested", "Profit/Loss", "Return"
    );

    for cadence in Frequency::ALL {
        let result = report.get(cadence);
        println!(
            "{:<10} {:>8} {:>14.2} {:>14.2} {:>9.2}%",
            cadence.label(),
            result.contributions,
            result.total_invested,
            result.profit_loss,
            result.return_pct()
        );
    }

    if bars > 0 {
        println!();
        println!("✓ Best cadence: {}", report.best().label());
    }
}
