//! SMC Lab CLI — market-structure analysis from CSV candle files.
//!
//! Commands:
//! - `analyze` — run the pipeline over one CSV and print or save the report
//! - `batch` — analyze several CSVs (in parallel by default) and save artifacts
//! - `config` — print the default TOML configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use smclab_core::{Pipeline, TrendLineProfile};
use smclab_runner::data_loader::symbol_from_path;
use smclab_runner::{
    analyze_file, export_json, run_batch, save_artifacts, AnalysisReport, LoadOptions,
    RunnerConfig, SymbolInput,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "smclab",
    about = "SMC Lab CLI — smart-money market-structure analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single CSV file of candles.
    Analyze {
        /// CSV with header timestamp,open,high,low,close,volume.
        csv: PathBuf,

        /// Symbol name for the report. Defaults to the file stem.
        #[arg(long)]
        symbol: Option<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trend-line profile: standard or advanced. Overrides the config file.
        #[arg(long)]
        profile: Option<TrendLineProfile>,

        /// Analyze only the last N candles. Overrides the config file.
        #[arg(long)]
        limit: Option<usize>,

        /// Directory for report.json and CSV artifacts. Prints JSON to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Analyze several CSV files and save one artifact directory per symbol.
    Batch {
        /// CSV files; each file stem becomes the symbol name.
        #[arg(required = true)]
        csvs: Vec<PathBuf>,

        /// Output directory for per-symbol artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Trend-line profile: standard or advanced. Overrides the config file.
        #[arg(long)]
        profile: Option<TrendLineProfile>,

        /// Analyze only the last N candles of each file.
        #[arg(long)]
        limit: Option<usize>,

        /// Analyze files one after another instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
    /// Print the default configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            csv,
            symbol,
            config,
            profile,
            limit,
            output,
        } => {
            let config = load_config(config.as_deref(), profile, limit)?;
            run_analyze(&csv, symbol, &config, output.as_deref())
        }
        Commands::Batch {
            csvs,
            output_dir,
            config,
            profile,
            limit,
            sequential,
        } => {
            let mut config = load_config(config.as_deref(), profile, limit)?;
            if sequential {
                config.batch.parallel = false;
            }
            run_batch_cmd(csvs, &config, &output_dir)
        }
        Commands::Config => {
            print!("{}", RunnerConfig::default().to_toml()?);
            Ok(())
        }
    }
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(
    path: Option<&Path>,
    profile: Option<TrendLineProfile>,
    limit: Option<usize>,
) -> Result<RunnerConfig> {
    let mut config = match path {
        Some(path) => RunnerConfig::from_file(path)?,
        None => RunnerConfig::default(),
    };
    if profile.is_some() {
        config.profile = profile;
    }
    if limit.is_some() {
        config.limit = limit;
    }
    config.validate()?;
    Ok(config)
}

fn run_analyze(
    csv: &Path,
    symbol: Option<String>,
    config: &RunnerConfig,
    output: Option<&Path>,
) -> Result<()> {
    let symbol = symbol.unwrap_or_else(|| symbol_from_path(csv));
    let pipeline = Pipeline::new(config.pipeline_config()?)?;
    let opts = LoadOptions {
        limit: config.limit,
    };
    let report = analyze_file(&symbol, csv, &pipeline, &opts)
        .with_context(|| format!("failed to analyze {}", csv.display()))?;

    match output {
        Some(dir) => {
            print_summary(&report);
            let run_dir = save_artifacts(&report, dir)?;
            println!("Artifacts saved to: {}", run_dir.display());
        }
        None => println!("{}", export_json(&report)?),
    }
    Ok(())
}

fn run_batch_cmd(csvs: Vec<PathBuf>, config: &RunnerConfig, output_dir: &Path) -> Result<()> {
    let inputs: Vec<SymbolInput> = csvs.into_iter().map(SymbolInput::from_path).collect();
    let batch = run_batch(&inputs, config)?;

    for report in &batch.reports {
        print_summary(report);
        save_artifacts(report, output_dir)?;
    }
    println!(
        "{} symbol(s) analyzed, artifacts in {}",
        batch.reports.len(),
        output_dir.display()
    );

    if !batch.all_succeeded() {
        for failure in &batch.failures {
            eprintln!("Error for {}: {}", failure.symbol, failure.error);
        }
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    let s = &report.summary;
    let price = report
        .result
        .current_price
        .map(|p| format!("{p:.4}"))
        .unwrap_or_else(|| "-".into());

    println!();
    println!("{} ({} candles, last price {price})", report.symbol, s.candle_count);
    println!("{}", "-".repeat(48));
    println!("{:<24} {:>10} {:>10}", "", "bullish", "bearish");
    println!(
        "{:<24} {:>10} {:>10}",
        "Swing points (hi/lo)", s.swing_highs, s.swing_lows
    );
    println!(
        "{:<24} {:>10} {:>10}",
        "Structure breaks", s.bullish_breaks, s.bearish_breaks
    );
    println!(
        "{:<24} {:>10} {:>10}",
        "Order blocks", s.bullish_order_blocks, s.bearish_order_blocks
    );
    println!(
        "{:<24} {:>10} {:>10}",
        "Trend lines (sup/res)", s.support_lines, s.resistance_lines
    );
    println!("Signals: {} ({} active)", s.signals, s.active_signals);
    for signal in report.result.active_signals() {
        println!(
            "  {:?} entry {:.4} stop {:.4} target {:.4} (risk {:.2}%, reward {:.2}%)",
            signal.direction,
            signal.entry_price,
            signal.stop_loss,
            signal.take_profit,
            signal.risk_pct,
            signal.reward_pct
        );
    }
}
