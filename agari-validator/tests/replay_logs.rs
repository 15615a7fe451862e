//! End-to-end replay tests over hand-written MJAI logs.
//!
//! One four-round game exercising riichi with ippatsu, a hidden winner,
//! an exhaustive draw and a robbed kan, read from plain and gzip files and
//! pushed through the whole validation pipeline with a stub engine.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use agari_validator::compare::expected_base_points;
use agari_validator::notation::agari_args;
use agari_validator::report::export_mismatches;
use agari_validator::source::parse_file;
use agari_validator::{EngineOutput, ScoringEngine, Status, ValidatorConfig, validate_samples};
use mjai_replay::ReplayRule;

const GAME: &str = r#"{"type":"start_game","names":["A","B","C","D"]}
{"type":"start_kyoku","bakaze":"E","kyoku":1,"honba":0,"kyotaku":0,"oya":0,"dora_marker":"7p","tehais":[["?","?","?","?","?","?","?","?","?","?","?","?","?"],["?","?","?","?","?","?","?","?","?","?","?","?","?"],["2m","3m","4m","6p","7p","8p","3s","4s","5s","E","E","9m","9m"],["?","?","?","?","?","?","?","?","?","?","?","?","?"]]}
{"type":"tsumo","actor":0,"pai":"?"}
{"type":"dahai","actor":0,"pai":"N","tsumogiri":true}
{"type":"tsumo","actor":1,"pai":"?"}
{"type":"dahai","actor":1,"pai":"N","tsumogiri":true}
{"type":"tsumo","actor":2,"pai":"N"}
{"type":"dahai","actor":2,"pai":"N","tsumogiri":true}
{"type":"tsumo","actor":3,"pai":"?"}
{"type":"dahai","actor":3,"pai":"S","tsumogiri":true}
{"type":"tsumo","actor":0,"pai":"?"}
{"type":"dahai","actor":0,"pai":"S","tsumogiri":true}
{"type":"tsumo","actor":1,"pai":"?"}
{"type":"dahai","actor":1,"pai":"S","tsumogiri":true}
{"type":"tsumo","actor":2,"pai":"1s"}
{"type":"reach","actor":2}
{"type":"dahai","actor":2,"pai":"1s","tsumogiri":true}
{"type":"reach_accepted","actor":2,"deltas":[0,0,-1000,0],"scores":[25000,25000,24000,25000]}
{"type":"tsumo","actor":3,"pai":"?"}
{"type":"dahai","actor":3,"pai":"W","tsumogiri":false}
{"type":"tsumo","actor":0,"pai":"?"}
{"type":"dahai","actor":0,"pai":"9m","tsumogiri":false}
{"type":"hora","actor":2,"target":0,"pai":"9m","uradora_markers":["3p"],"deltas":[-2600,0,3600,0],"scores":[22400,25000,27600,25000]}
{"type":"end_kyoku"}
{"type":"start_kyoku","bakaze":"E","kyoku":2,"honba":0,"kyotaku":0,"oya":1,"dora_marker":"S","tehais":[["?"],["?"],["?"],["?"]]}
{"type":"tsumo","actor":1,"pai":"?"}
{"type":"hora","actor":1,"target":1,"pai":"C","deltas":[-16000,48000,-16000,-16000]}
{"type":"end_kyoku"}
this line is not json
{"type":"start_kyoku","bakaze":"E","kyoku":2,"honba":1,"kyotaku":0,"oya":1,"dora_marker":"4s","tehais":[["?"],["?"],["?"],["?"]]}
{"type":"tsumo","actor":1,"pai":"?"}
{"type":"dahai","actor":1,"pai":"1p","tsumogiri":true}
{"type":"ryukyoku","reason":"fanpai","deltas":[0,0,0,0]}
{"type":"end_kyoku"}
{"type":"start_kyoku","bakaze":"E","kyoku":3,"honba":1,"kyoutaku":1,"oya":2,"dora_marker":"1z","tehais":[["1p","2p","3p","4p","5p","6p","7p","8p","9p","3m","4m","S","S"],["?"],["?"],["?"]]}
{"type":"tsumo","actor":2,"pai":"?"}
{"type":"dahai","actor":2,"pai":"5m","tsumogiri":false}
{"type":"pon","actor":3,"target":2,"pai":"5m","consumed":["5m","5mr"]}
{"type":"dahai","actor":3,"pai":"N","tsumogiri":false}
{"type":"tsumo","actor":0,"pai":"W"}
{"type":"dahai","actor":0,"pai":"W","tsumogiri":true}
{"type":"tsumo","actor":1,"pai":"?"}
{"type":"dahai","actor":1,"pai":"P","tsumogiri":true}
{"type":"tsumo","actor":2,"pai":"?"}
{"type":"dahai","actor":2,"pai":"F","tsumogiri":true}
{"type":"tsumo","actor":3,"pai":"?"}
{"type":"kakan","actor":3,"pai":"5m","consumed":["5m","5m","5mr"]}
{"type":"hora","actor":0,"target":3,"pai":"5m","deltas":[5200,0,0,-4200]}
{"type":"end_kyoku"}
{"type":"end_game","scores":[27600,-23000,11600,20800]}
"#;

fn write_plain(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, GAME).unwrap();
    path
}

fn write_gzip(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut enc =
        flate2::write::GzEncoder::new(File::create(&path).unwrap(), flate2::Compression::best());
    enc.write_all(GAME.as_bytes()).unwrap();
    enc.finish().unwrap();
    path
}

/// Pretends to be `agari`: right for riichi hands, wrong for everything else.
struct RiichiOnlyEngine;

impl ScoringEngine for RiichiOnlyEngine {
    fn score(&self, args: &[String]) -> EngineOutput {
        let points = if args.iter().any(|a| a == "-r") { 2600 } else { 1000 };
        EngineOutput {
            output: format!("30 fu, 2 han\n{} points\n", points),
            return_code: 0,
            fu: Some(30),
            han: Some(2),
            points: Some(points),
        }
    }
}

// ---------------------------------------------------------------------------
// File replay
// ---------------------------------------------------------------------------

#[test]
fn game_log_yields_every_win() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_plain(dir.path(), "game.mjson");
    let (wins, stats) = parse_file(&path, ReplayRule::default()).unwrap();

    assert_eq!(stats.wins, 3);
    assert_eq!(stats.skipped_lines, 1);
    assert_eq!(wins.len(), 3);
    assert!(wins.iter().all(|w| w.source == path));

    let riichi = &wins[0].record;
    assert!(riichi.is_valid());
    assert_eq!(riichi.winner(), 2);
    assert_eq!(riichi.discarder(), Some(0));
    assert!(riichi.conditions().riichi);
    assert!(riichi.conditions().ippatsu);
    assert!(!riichi.conditions().double_riichi);
    assert_eq!(riichi.context().pot_count, 1);
    assert_eq!(expected_base_points(riichi), 2600);
    assert_eq!(
        agari_args(riichi),
        vec![
            "234999m678p345s11z", "-w", "9m", "-r", "--ippatsu", "--round", "e", "--seat", "w",
            "-d", "7p", "--ura", "3p",
        ]
    );

    // Seat 1's tiles were never shown.
    assert!(!wins[1].record.is_valid());

    let robbed = &wins[2].record;
    assert!(robbed.is_valid());
    assert!(robbed.conditions().chankan);
    assert_eq!(robbed.context().repeat_count, 1);
    assert_eq!(expected_base_points(robbed), 3900);
    let args = agari_args(robbed);
    assert_eq!(args[0], "345m123456789p22z");
    assert!(args.contains(&"--chankan".to_string()));
    assert!(!args.contains(&"-o".to_string()));
}

#[test]
fn gzip_and_plain_logs_agree() {
    let dir = tempfile::tempdir().unwrap();
    let plain = write_plain(dir.path(), "a.mjson");
    let gz = write_gzip(dir.path(), "b.mjson");
    let (a, sa) = parse_file(&plain, ReplayRule::default()).unwrap();
    let (b, sb) = parse_file(&gz, ReplayRule::default()).unwrap();
    assert_eq!(sa, sb);
    let records = |v: &[agari_validator::SourcedWin]| {
        v.iter().map(|w| w.record.clone()).collect::<Vec<_>>()
    };
    assert_eq!(records(&a), records(&b));
}

// ---------------------------------------------------------------------------
// Full pipeline
// ---------------------------------------------------------------------------

#[test]
fn pipeline_scores_and_exports_mismatches() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("2012");
    std::fs::create_dir_all(&logs).unwrap();
    write_plain(&logs, "game.mjson");
    std::fs::write(logs.join("README.txt"), "not a log").unwrap();

    let export = dir.path().join("mismatches.json");
    let config = ValidatorConfig {
        data_dir: dir.path().to_path_buf(),
        num_samples: 10,
        seed: Some(3),
        num_threads: Some(2),
        export_mismatches: Some(export.clone()),
        ..Default::default()
    };

    let report = validate_samples(&config, &RiichiOnlyEngine).unwrap();
    assert_eq!(report.files_found, 1);
    assert_eq!(report.extraction.files_processed, 1);
    assert_eq!(report.extraction.valid_wins, 2);
    assert_eq!(report.extraction.invalid_wins, 1);
    assert_eq!(report.summary.total, 2);
    assert_eq!(report.summary.matches, 1);
    assert_eq!(report.summary.mismatches, 1);

    let n = export_mismatches(&report.results, &export).unwrap();
    assert_eq!(n, 1);
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export).unwrap()).unwrap();
    let entry = &json[0];
    assert_eq!(entry["tenhou_points"], 5200);
    assert_eq!(entry["agari_points"], 1000);
    assert_eq!(entry["context"]["bakaze"], "E");
    assert_eq!(entry["context"]["kyoku"], 3);
    assert_eq!(entry["context"]["honba"], 1);
    assert_eq!(entry["context"]["kyotaku"], 1);
    assert_eq!(entry["context"]["is_tsumo"], false);
    assert!(entry["source_file"].as_str().unwrap().ends_with("game.mjson"));
    assert!(
        entry["agari_args"]
            .as_array()
            .unwrap()
            .iter()
            .any(|a| a == "--chankan")
    );
}

#[test]
fn pipeline_samples_down_deterministically() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..4 {
        write_gzip(dir.path(), &format!("{i}.mjson"));
    }
    let config = ValidatorConfig {
        data_dir: dir.path().to_path_buf(),
        num_samples: 3,
        seed: Some(11),
        num_threads: Some(3),
        ..Default::default()
    };

    let a = validate_samples(&config, &RiichiOnlyEngine).unwrap();
    let b = validate_samples(&config, &RiichiOnlyEngine).unwrap();
    assert_eq!(a.results.len(), 3);
    let keys = |r: &agari_validator::RunReport| {
        r.results
            .iter()
            .map(|v| (v.win.source.clone(), v.args.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&a), keys(&b));
    assert_eq!(a.summary, b.summary);
    assert!(
        a.results
            .iter()
            .all(|r| matches!(r.status(), Status::Match | Status::Mismatch))
    );
}

#[test]
fn empty_directory_gives_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = ValidatorConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let report = validate_samples(&config, &RiichiOnlyEngine).unwrap();
    assert_eq!(report.files_found, 0);
    assert!(report.results.is_empty());
}
