use std::io::Cursor;
use std::path::Path;

use agari_validator::notation::agari_args;
use agari_validator::source::replay_reader;
use criterion::{Criterion, criterion_group, criterion_main};
use mjai_replay::{ReplayRule, decode_line};

const ROUND: &str = r#"{"type":"start_kyoku","bakaze":"E","kyoku":1,"honba":0,"kyotaku":0,"oya":0,"dora_marker":"7p","tehais":[["1m","2m","3m","4m","5m","6m","7m","8m","9m","1p","2p","3p","5s"],["?"],["?"],["?"]]}
{"type":"tsumo","actor":0,"pai":"9p"}
{"type":"dahai","actor":0,"pai":"9p","tsumogiri":true}
{"type":"tsumo","actor":1,"pai":"?"}
{"type":"dahai","actor":1,"pai":"N","tsumogiri":true}
{"type":"tsumo","actor":2,"pai":"?"}
{"type":"dahai","actor":2,"pai":"N","tsumogiri":true}
{"type":"tsumo","actor":3,"pai":"?"}
{"type":"dahai","actor":3,"pai":"N","tsumogiri":true}
{"type":"tsumo","actor":0,"pai":"5s"}
{"type":"hora","actor":0,"target":0,"pai":"5s","deltas":[12000,-4000,-4000,-4000]}
{"type":"end_kyoku"}
"#;

fn game_log(rounds: usize) -> String {
    let mut log = String::from("{\"type\":\"start_game\"}\n");
    for _ in 0..rounds {
        log.push_str(ROUND);
    }
    log.push_str("{\"type\":\"end_game\"}\n");
    log
}

fn bench_decode(c: &mut Criterion) {
    let lines: Vec<&str> = ROUND.lines().collect();
    c.bench_function("decode_round_lines", |b| {
        b.iter(|| lines.iter().filter_map(|l| decode_line(l).ok()).count());
    });
}

fn bench_replay_game(c: &mut Criterion) {
    let log = game_log(12);
    c.bench_function("replay_12_round_game", |b| {
        b.iter(|| {
            let (wins, _) =
                replay_reader(Cursor::new(log.as_bytes()), ReplayRule::default(), Path::new("bench"))
                    .unwrap();
            wins.len()
        });
    });
}

fn bench_notation(c: &mut Criterion) {
    let (wins, _) =
        replay_reader(Cursor::new(ROUND.as_bytes()), ReplayRule::default(), Path::new("bench"))
            .unwrap();
    let record = wins[0].record.clone();
    c.bench_function("agari_args_1000x", |b| {
        b.iter(|| {
            for _ in 0..1000 {
                agari_args(&record);
            }
        });
    });
}

criterion_group!(benches, bench_decode, bench_replay_game, bench_notation);
criterion_main!(benches);
