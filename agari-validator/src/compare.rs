//! Engine result versus logged score.

use std::fmt;

use mjai_replay::WinRecord;

use crate::notation::agari_args;
use crate::runner::{EngineOutput, ScoringEngine};
use crate::source::SourcedWin;

/// Points the log attributes to repeat sticks.
pub const REPEAT_BONUS: i32 = 300;
/// Points per riichi stick collected by the winner.
pub const POT_STICK: i32 = 1000;
/// Allowed distance between engine and logged points.
pub const POINT_TOLERANCE: i32 = 300;

const STRUCTURE_ERROR_TEXT: &str = "no valid winning structure";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Match,
    Mismatch,
    /// The engine failed for another reason (timeout, missing, crash).
    Error,
    /// The engine rejected the hand shape; usually a hand-tracking problem
    /// on the replay side rather than a scoring bug.
    StructureError,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Match => "OK",
            Status::Mismatch => "MISMATCH",
            Status::Error => "ERROR",
            Status::StructureError => "STRUCT_ERR",
        })
    }
}

/// Logged points with the repeat and pot bonuses taken out.
pub fn expected_base_points(record: &WinRecord) -> i32 {
    let ctx = record.context();
    record.points_won()
        - REPEAT_BONUS * i32::from(ctx.repeat_count)
        - POT_STICK * ctx.pot_count as i32
}

/// Whether `engine_points` agrees with the log. Without engine points or a
/// positive base there is nothing to compare and the hand counts as a match.
pub fn points_agree(record: &WinRecord, engine_points: Option<i32>) -> bool {
    let base = expected_base_points(record);
    match engine_points {
        Some(p) if base > 0 => {
            (p - base).abs() <= POINT_TOLERANCE
                || (p - record.points_won()).abs() <= POINT_TOLERANCE
        }
        _ => true,
    }
}

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub win: SourcedWin,
    pub args: Vec<String>,
    pub engine: EngineOutput,
    pub points_match: bool,
}

impl ValidationResult {
    pub fn is_error(&self) -> bool {
        self.engine.is_error()
    }

    pub fn is_structure_error(&self) -> bool {
        self.is_error()
            && self
                .engine
                .output
                .to_lowercase()
                .contains(STRUCTURE_ERROR_TEXT)
    }

    pub fn status(&self) -> Status {
        if self.is_structure_error() {
            Status::StructureError
        } else if self.is_error() {
            Status::Error
        } else if self.points_match {
            Status::Match
        } else {
            Status::Mismatch
        }
    }
}

/// Scores one hand and compares the result with the log.
pub fn validate<E: ScoringEngine + ?Sized>(win: SourcedWin, engine: &E) -> ValidationResult {
    let args = agari_args(&win.record);
    let engine_out = engine.score(&args);
    let points_match = !engine_out.is_error() && points_agree(&win.record, engine_out.points);
    ValidationResult {
        win,
        args,
        engine: engine_out,
        points_match,
    }
}
