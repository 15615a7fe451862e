//! Validation of the `agari` scoring engine against real game logs.
//!
//! Pipeline: [`discovery`] finds logs, [`sampling`] orders them, [`batch`]
//! replays them through `mjai_replay` until enough valid winning hands are
//! collected, [`notation`] and [`runner`] score each hand with the engine,
//! and [`compare`] / [`report`] judge and summarise the results.

pub mod batch;
pub mod compare;
pub mod config;
pub mod discovery;
pub mod notation;
pub mod report;
pub mod runner;
pub mod sampling;
pub mod source;

use log::info;

pub use batch::{BatchExtractor, BatchOutcome};
pub use compare::{Status, ValidationResult};
pub use config::ValidatorConfig;
pub use report::Summary;
pub use runner::{AgariCli, EngineOutput, ScoringEngine};
pub use source::SourcedWin;

/// Everything a validation run produced.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files_found: usize,
    pub extraction: BatchStats,
    pub results: Vec<ValidationResult>,
    pub summary: Summary,
}

/// Extraction counters without the hands themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub valid_wins: usize,
    pub invalid_wins: usize,
    pub skipped_lines: usize,
}

/// Runs discovery, extraction, sampling and scoring with `engine`.
///
/// An empty data directory is not an error; the report is simply empty.
pub fn validate_samples<E: ScoringEngine + ?Sized>(
    config: &ValidatorConfig,
    engine: &E,
) -> anyhow::Result<RunReport> {
    info!("Finding log files in {}...", config.data_dir.display());
    let mut files = discovery::find_log_files(&config.data_dir, &config.extension);
    info!("Found {} log files", files.len());
    if files.is_empty() {
        return Ok(RunReport::default());
    }
    sampling::shuffle_files(&mut files, config.seed);

    let extractor =
        BatchExtractor::new(config.num_threads, config.rule)?.verbose(config.verbose);
    info!(
        "Extracting winning hands (target: {}, threads: {})...",
        config.num_samples,
        extractor.num_threads()
    );
    let outcome = extractor.extract(&files, config.num_samples);
    let extraction = BatchStats {
        files_processed: outcome.files_processed,
        files_failed: outcome.files_failed,
        valid_wins: outcome.wins.len(),
        invalid_wins: outcome.invalid_wins,
        skipped_lines: outcome.skipped_lines,
    };

    let wins = sampling::sample(outcome.wins, config.num_samples, config.seed);
    info!("Validating {} winning hands...", wins.len());
    let results = extractor.score_all(wins, engine);
    let summary = Summary::from_results(outcome.files_processed, &results);

    Ok(RunReport {
        files_found: files.len(),
        extraction,
        results,
        summary,
    })
}
