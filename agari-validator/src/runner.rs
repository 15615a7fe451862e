//! Scoring engine adapter.
//!
//! [`AgariCli`] runs the `agari` executable once per hand and scrapes fu,
//! han and points from its text output.

use std::io::{ErrorKind, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

/// Return code reported when the engine did not finish in time.
pub const TIMEOUT_CODE: i32 = -1;
/// Return code reported when the executable does not exist.
pub const NOT_FOUND_CODE: i32 = -2;
/// Return code reported when the process could not be started or waited
/// on, or was ended by a signal.
pub const ABNORMAL_CODE: i32 = -3;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

const LIMIT_NAMES: [&str; 5] = ["mangan", "haneman", "baiman", "sanbaiman", "yakuman"];

/// What the engine said about one hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Captured stdout followed by stderr, or a short diagnostic.
    pub output: String,
    pub return_code: i32,
    pub fu: Option<u32>,
    pub han: Option<u32>,
    pub points: Option<i32>,
}

impl EngineOutput {
    pub fn failed(return_code: i32, output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            return_code,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.return_code != 0
    }
}

/// Anything that can score a hand given its engine arguments.
pub trait ScoringEngine: Sync {
    fn score(&self, args: &[String]) -> EngineOutput;
}

/// Runs the `agari` command-line scorer.
#[derive(Debug, Clone)]
pub struct AgariCli {
    pub path: PathBuf,
    pub timeout: Duration,
}

impl AgariCli {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    /// Waits for `child` up to the timeout. `None` means it was killed.
    fn wait_with_timeout(&self, child: &mut Child) -> std::io::Result<Option<i32>> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status.code().unwrap_or(ABNORMAL_CODE)));
            }
            if Instant::now() >= deadline {
                child.kill()?;
                child.wait()?;
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut p) = pipe {
            let _ = p.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).into_owned()
    })
}

impl ScoringEngine for AgariCli {
    fn score(&self, args: &[String]) -> EngineOutput {
        let spawned = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();
        let mut child = match spawned {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return EngineOutput::failed(
                    NOT_FOUND_CODE,
                    format!("Agari not found at: {}", self.path.display()),
                );
            }
            Err(e) => return EngineOutput::failed(ABNORMAL_CODE, e.to_string()),
        };

        // Read both pipes while waiting so a chatty engine cannot block.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let code = match self.wait_with_timeout(&mut child) {
            Ok(Some(code)) => code,
            Ok(None) => {
                debug!("agari timed out after {:?}: {:?}", self.timeout, args);
                return EngineOutput::failed(TIMEOUT_CODE, "TIMEOUT");
            }
            Err(e) => return EngineOutput::failed(ABNORMAL_CODE, e.to_string()),
        };
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        let mut out = EngineOutput {
            output: format!("{}{}", stdout, stderr),
            return_code: code,
            ..Default::default()
        };
        if code == 0 {
            parse_output(&stdout, &mut out);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Output scraping
// ---------------------------------------------------------------------------

/// Digits immediately before byte offset `end`, skipping whitespace.
fn number_before(line: &str, end: usize) -> Option<&str> {
    let head = line[..end].trim_end();
    let digits = head.len()
        - head
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .len();
    (digits > 0).then(|| &head[head.len() - digits..])
}

/// First `<number><spaces><keyword>` in `lower`, like `30 fu`.
fn number_then_keyword(lower: &str, keyword: &str) -> Option<i64> {
    lower
        .match_indices(keyword)
        .find_map(|(idx, _)| number_before(lower, idx))
        .and_then(|d| d.parse().ok())
}

/// First `<limit name>[: ]+<number>`, like `Mangan: 8000`.
fn limit_points(lower: &str) -> Option<i64> {
    LIMIT_NAMES.iter().find_map(|name| {
        lower.match_indices(name).find_map(|(idx, _)| {
            let rest = &lower[idx + name.len()..];
            let tail = rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace());
            if tail.len() == rest.len() {
                return None;
            }
            let end = tail
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(tail.len());
            tail[..end].parse().ok()
        })
    })
}

/// Fills fu, han and points from the engine's text output. Later lines
/// overwrite earlier ones; a limit-hand line overrides plain points on the
/// same line.
pub fn parse_output(text: &str, out: &mut EngineOutput) {
    for line in text.lines() {
        let lower = line.to_ascii_lowercase();
        if let Some(fu) = number_then_keyword(&lower, "fu") {
            out.fu = u32::try_from(fu).ok();
        }
        if let Some(han) = number_then_keyword(&lower, "han") {
            out.han = u32::try_from(han).ok();
        }
        if let Some(points) = number_then_keyword(&lower, "point") {
            out.points = i32::try_from(points).ok();
        }
        if let Some(points) = limit_points(&lower) {
            out.points = i32::try_from(points).ok();
        }
    }
}
