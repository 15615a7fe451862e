//! agari-validator CLI
//!
//! Replays Tenhou MJAI logs, scores a sample of winning hands with the
//! `agari` executable and reports where it disagrees with the log.

use std::path::PathBuf;
use std::time::Duration;

use agari_validator::report::{describe, export_mismatches};
use agari_validator::{AgariCli, Status, ValidatorConfig, validate_samples};
use anyhow::Result;
use clap::Parser;

#[derive(Parser)]
#[command(name = "agari-validator")]
#[command(about = "Validate Agari scoring engine against Tenhou historical data", long_about = None)]
struct Cli {
    /// Path to Tenhou data directory containing mjson files
    data_dir: PathBuf,

    /// Path to agari executable
    #[arg(short = 'a', long = "agari", default_value = "agari")]
    agari: PathBuf,

    /// Number of winning hands to validate
    #[arg(short = 'n', long, default_value_t = 100)]
    samples: usize,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print detailed progress
    #[arg(short, long)]
    verbose: bool,

    /// Export mismatches to a JSON file for analysis
    #[arg(long)]
    export_mismatches: Option<PathBuf>,

    /// Worker threads for log extraction (default: number of CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Seconds to wait for one agari run
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

impl From<Cli> for ValidatorConfig {
    fn from(cli: Cli) -> Self {
        Self {
            data_dir: cli.data_dir,
            agari_path: cli.agari,
            num_samples: cli.samples,
            seed: cli.seed,
            num_threads: cli.threads,
            engine_timeout: Duration::from_secs(cli.timeout_secs),
            verbose: cli.verbose,
            export_mismatches: cli.export_mismatches,
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    let config = ValidatorConfig::from(Cli::parse());

    let default_filter = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let engine = AgariCli::new(&config.agari_path, config.engine_timeout);
    let report = validate_samples(&config, &engine)?;
    if report.files_found == 0 {
        println!("No log files found in {}", config.data_dir.display());
        return Ok(());
    }

    let total = report.results.len();
    for (i, result) in report.results.iter().enumerate() {
        if config.verbose || result.status() != Status::Match {
            println!("\n{}", describe(i, total, result));
        }
    }
    println!("\n{}", report.summary);

    if let Some(path) = &config.export_mismatches
        && !report.results.is_empty()
    {
        let n = export_mismatches(&report.results, path)?;
        println!("Exported {} mismatches to {}", n, path.display());
    }
    Ok(())
}
