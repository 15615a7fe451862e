//! Parallel win extraction with rayon.
//!
//! Files are parsed a chunk at a time on a dedicated rayon ThreadPool; the
//! chunk results are then folded in file order, so the outcome does not
//! depend on the thread count.

use std::path::{Path, PathBuf};

use log::{info, warn};
use mjai_replay::ReplayRule;
use rayon::prelude::*;

use crate::compare::{ValidationResult, validate};
use crate::runner::ScoringEngine;
use crate::source::{FileStats, SourcedWin, parse_file};

/// Totals for one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// Valid winning hands, in file order.
    pub wins: Vec<SourcedWin>,
    /// Files consumed before the target was reached (failures included).
    pub files_processed: usize,
    pub files_failed: usize,
    /// Winning hands dropped by the validity check.
    pub invalid_wins: usize,
    pub skipped_lines: usize,
}

pub struct BatchExtractor {
    pool: rayon::ThreadPool,
    rule: ReplayRule,
    verbose: bool,
}

impl BatchExtractor {
    pub fn new(num_threads: Option<usize>, rule: ReplayRule) -> anyhow::Result<Self> {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build thread pool: {}", e))?;
        Ok(Self {
            pool,
            rule,
            verbose: false,
        })
    }

    /// Logs every file at info level instead of only the totals.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Replays `files` in order until at least `target` valid winning hands
    /// have been collected or the files run out.
    pub fn extract(&self, files: &[PathBuf], target: usize) -> BatchOutcome {
        let mut out = BatchOutcome::default();
        if target == 0 {
            return out;
        }
        let chunk = self.num_threads().max(1);
        let rule = self.rule;

        'chunks: for paths in files.chunks(chunk) {
            let parsed: Vec<_> = self.pool.install(|| {
                paths
                    .par_iter()
                    .map(|p| (p, parse_file(p, rule)))
                    .collect()
            });

            for (path, result) in parsed {
                out.files_processed += 1;
                match result {
                    Ok((wins, stats)) => self.absorb(&mut out, path, wins, stats),
                    Err(e) => {
                        out.files_failed += 1;
                        warn!("Error parsing {}: {:#}", path.display(), e);
                    }
                }
                if out.wins.len() >= target {
                    break 'chunks;
                }
            }
        }

        info!(
            "Processed {} files, extracted {} valid winning hands",
            out.files_processed,
            out.wins.len()
        );
        out
    }

    /// Scores every hand on the pool. Results keep the input order.
    pub fn score_all<E: ScoringEngine + ?Sized>(
        &self,
        wins: Vec<SourcedWin>,
        engine: &E,
    ) -> Vec<ValidationResult> {
        self.pool
            .install(|| wins.into_par_iter().map(|w| validate(w, engine)).collect())
    }

    fn absorb(
        &self,
        out: &mut BatchOutcome,
        path: &Path,
        wins: Vec<SourcedWin>,
        stats: FileStats,
    ) {
        let before = out.wins.len();
        out.skipped_lines += stats.skipped_lines;
        for win in wins {
            if win.record.is_valid() {
                out.wins.push(win);
            } else {
                out.invalid_wins += 1;
            }
        }
        if self.verbose {
            info!(
                "  [{}] {}: {} valid (total: {})",
                out.files_processed,
                path.display(),
                out.wins.len() - before,
                out.wins.len()
            );
        }
    }
}
