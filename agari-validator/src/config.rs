use std::path::PathBuf;
use std::time::Duration;

use mjai_replay::ReplayRule;
use serde::{Deserialize, Serialize};

/// Settings for one validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Directory searched recursively for logs.
    pub data_dir: PathBuf,
    /// Scoring engine executable.
    pub agari_path: PathBuf,
    /// Target number of winning hands to validate.
    pub num_samples: usize,
    /// Seed for the file shuffle and the final sample. None = OS entropy.
    pub seed: Option<u64>,
    /// Threads in the extraction pool. None = rayon default (num CPUs).
    pub num_threads: Option<usize>,
    pub engine_timeout: Duration,
    pub verbose: bool,
    pub export_mismatches: Option<PathBuf>,
    /// Log file extension, without the dot.
    pub extension: String,
    pub rule: ReplayRule,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            agari_path: PathBuf::from("agari"),
            num_samples: 100,
            seed: None,
            num_threads: None,
            engine_timeout: Duration::from_secs(10),
            verbose: false,
            export_mismatches: None,
            extension: "mjson".to_string(),
            rule: ReplayRule::default(),
        }
    }
}
