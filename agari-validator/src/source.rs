//! Log file access and line-by-line replay.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use flate2::read::MultiGzDecoder;
use log::debug;
use mjai_replay::{ReplayRule, RoundEventHandler, RoundStateMachine, WinRecord, decode_line};
use serde::Serialize;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A winning hand together with the log it came from.
#[derive(Debug, Clone, Serialize)]
pub struct SourcedWin {
    pub record: WinRecord,
    pub source: PathBuf,
}

/// Per-file counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    pub lines: usize,
    pub events: usize,
    /// Lines that failed to decode and were dropped.
    pub skipped_lines: usize,
    pub wins: usize,
}

/// Opens a log, decompressing it when it starts with the gzip magic bytes.
pub fn open_log(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    let mut magic = [0u8; 2];
    let sniffed = {
        let mut f = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut n = 0;
        while n < magic.len() {
            match f.read(&mut magic[n..])? {
                0 => break,
                k => n += k,
            }
        }
        n
    };

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    if sniffed == GZIP_MAGIC.len() && magic == GZIP_MAGIC {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Replays every line of `reader` through one state machine.
///
/// Lines that fail to decode are logged and skipped; a read failure ends
/// the replay with an error.
pub fn replay_reader<R: BufRead>(
    reader: R,
    rule: ReplayRule,
    source: &Path,
) -> anyhow::Result<(Vec<SourcedWin>, FileStats)> {
    let mut machine = RoundStateMachine::new(rule);
    let mut stats = FileStats::default();
    let mut wins = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", source.display()))?;
        stats.lines += 1;
        let event = match decode_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                debug!("{}:{}: {}", source.display(), lineno + 1, e);
                stats.skipped_lines += 1;
                continue;
            }
        };
        stats.events += 1;
        if let Some(record) = machine.apply(&event) {
            wins.push(SourcedWin {
                record,
                source: source.to_path_buf(),
            });
        }
    }

    stats.wins = wins.len();
    Ok((wins, stats))
}

/// Opens and replays one log file.
pub fn parse_file(path: &Path, rule: ReplayRule) -> anyhow::Result<(Vec<SourcedWin>, FileStats)> {
    let reader = open_log(path)?;
    replay_reader(reader, rule, path)
}
