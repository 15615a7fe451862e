//! Counters, printable summary and mismatch export.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::compare::{Status, ValidationResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub files_processed: usize,
    pub total: usize,
    pub matches: usize,
    pub mismatches: usize,
    /// Engine failures other than structure errors.
    pub errors: usize,
    pub structure_errors: usize,
}

impl Summary {
    pub fn record(&mut self, status: Status) {
        self.total += 1;
        match status {
            Status::Match => self.matches += 1,
            Status::Mismatch => self.mismatches += 1,
            Status::Error => self.errors += 1,
            Status::StructureError => self.structure_errors += 1,
        }
    }

    pub fn from_results(files_processed: usize, results: &[ValidationResult]) -> Self {
        let mut s = Self {
            files_processed,
            ..Default::default()
        };
        for r in results {
            s.record(r.status());
        }
        s
    }

    /// Share of validated hands, in percent.
    pub fn percent(&self, n: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * n as f64 / self.total as f64
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{}", rule)?;
        writeln!(f, "VALIDATION SUMMARY")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Files processed: {}", self.files_processed)?;
        writeln!(f, "Total validated: {}", self.total)?;
        if self.total > 0 {
            for (label, n) in [
                ("Matches:        ", self.matches),
                ("Mismatches:     ", self.mismatches),
                ("Errors:         ", self.errors),
            ] {
                writeln!(f, "{} {} ({:.1}%)", label, n, self.percent(n))?;
            }
            if self.structure_errors > 0 {
                writeln!(
                    f,
                    "  (struct errs): {} (replay hand-tracking problems)",
                    self.structure_errors
                )?;
            }
        }
        Ok(())
    }
}

/// Multi-line description of one result, as printed for failures.
pub fn describe(index: usize, total: usize, result: &ValidationResult) -> String {
    let r = &result.win.record;
    let ctx = r.context();
    let cond = r.conditions();
    let mut s = format!("[{}/{}] {}\n", index + 1, total, result.status());
    s += &format!("  Command: agari {}\n", result.args.join(" "));
    s += &format!("  Tenhou: {} pts (deltas: {:?})\n", r.points_won(), r.deltas());
    s += &format!(
        "  Context: {}{}, honba={}, kyotaku={}\n",
        ctx.round_wind.to_mjai(),
        ctx.round_number,
        ctx.repeat_count,
        ctx.pot_count
    );
    s += &format!(
        "  Win: {}, riichi={}, ippatsu={}\n",
        if r.is_tsumo() { "tsumo" } else { "ron" },
        cond.riichi,
        cond.ippatsu
    );
    if result.is_error() {
        let head: String = result.engine.output.chars().take(300).collect();
        s += &format!("  Error:  {}", head);
    } else {
        let show = |v: Option<String>| v.unwrap_or_else(|| "None".to_string());
        s += &format!(
            "  Agari:  {} fu, {} han, {} pts",
            show(result.engine.fu.map(|v| v.to_string())),
            show(result.engine.han.map(|v| v.to_string())),
            show(result.engine.points.map(|v| v.to_string())),
        );
    }
    s
}

#[derive(Debug, Clone, Serialize)]
pub struct MismatchContext {
    /// MJAI wind letter.
    pub bakaze: &'static str,
    pub kyoku: u8,
    pub honba: u8,
    pub kyotaku: u32,
    pub is_tsumo: bool,
    pub is_riichi: bool,
}

/// One exported mismatch.
#[derive(Debug, Clone, Serialize)]
pub struct MismatchEntry {
    pub agari_args: Vec<String>,
    pub tenhou_points: i32,
    pub tenhou_deltas: [i32; 4],
    pub agari_fu: Option<u32>,
    pub agari_han: Option<u32>,
    pub agari_points: Option<i32>,
    pub context: MismatchContext,
    pub source_file: String,
}

impl MismatchEntry {
    pub fn from_result(result: &ValidationResult) -> Self {
        let r = &result.win.record;
        let ctx = r.context();
        Self {
            agari_args: result.args.clone(),
            tenhou_points: r.points_won(),
            tenhou_deltas: *r.deltas(),
            agari_fu: result.engine.fu,
            agari_han: result.engine.han,
            agari_points: result.engine.points,
            context: MismatchContext {
                bakaze: ctx.round_wind.to_mjai(),
                kyoku: ctx.round_number,
                honba: ctx.repeat_count,
                kyotaku: ctx.pot_count,
                is_tsumo: r.is_tsumo(),
                is_riichi: r.conditions().riichi,
            },
            source_file: result.win.source.display().to_string(),
        }
    }
}

/// Scored hands whose points disagree with the log.
pub fn mismatches(results: &[ValidationResult]) -> Vec<MismatchEntry> {
    results
        .iter()
        .filter(|r| r.status() == Status::Mismatch)
        .map(MismatchEntry::from_result)
        .collect()
}

/// Writes the mismatches as a pretty-printed JSON array. Returns how many
/// were written.
pub fn export_mismatches(results: &[ValidationResult], path: &Path) -> anyhow::Result<usize> {
    let entries = mismatches(results);
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &entries)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_percentages() {
        let mut s = Summary::default();
        for st in [
            Status::Match,
            Status::Match,
            Status::Match,
            Status::Mismatch,
            Status::StructureError,
        ] {
            s.record(st);
        }
        assert_eq!(s.total, 5);
        assert_eq!(s.matches, 3);
        assert_eq!(s.errors, 0);
        assert_eq!(s.structure_errors, 1);
        assert!((s.percent(s.matches) - 60.0).abs() < 1e-9);

        let text = s.to_string();
        assert!(text.contains("VALIDATION SUMMARY"));
        assert!(text.contains("Matches:         3 (60.0%)"));
        assert!(text.contains("(struct errs): 1"));
    }

    #[test]
    fn empty_summary() {
        let s = Summary::default();
        assert_eq!(s.percent(0), 0.0);
        assert!(!s.to_string().contains("Matches"));
    }
}
