//! Command-line encoding of a winning hand for the `agari` scoring engine.
//!
//! Tiles use the short notation: `1m`-`9m`, `1p`-`9p`, `1s`-`9s`, honors
//! `1z`-`7z` (E S W N P F C) and `0m`/`0p`/`0s` for red fives. A hand is
//! written grouped by suit, e.g. `123m456p11z`.

use mjai_replay::{Meld, MeldKind, Suit, Tile, WinRecord, Wind};

const SUIT_ORDER: [Suit; 4] = [Suit::Manzu, Suit::Pinzu, Suit::Souzu, Suit::Jihai];

fn rank_digit(tile: Tile, aka: bool) -> Option<char> {
    let tile = if aka { tile } else { tile.deaka() };
    tile.rank().and_then(|r| char::from_digit(u32::from(r), 10))
}

/// Single tile in short notation, `?` for the unknown sentinel.
pub fn short_tile(tile: Tile, aka: bool) -> String {
    match (rank_digit(tile, aka), tile.suit()) {
        (Some(d), Some(s)) => format!("{}{}", d, s.letter()),
        _ => "?".to_string(),
    }
}

/// Tiles grouped by suit in `m p s z` order, ranks ascending with a red
/// five after the other ranks of its suit.
pub fn hand_string(tiles: &[Tile], aka: bool) -> String {
    let mut out = String::new();
    for suit in SUIT_ORDER {
        let mut digits: Vec<char> = tiles
            .iter()
            .filter(|t| t.suit() == Some(suit))
            .filter_map(|&t| rank_digit(t, aka))
            .collect();
        if digits.is_empty() {
            continue;
        }
        digits.sort_by_key(|&d| (d == '0', d));
        out.extend(digits);
        out.push(suit.letter());
    }
    out
}

fn meld_string(meld: &Meld, aka: bool) -> String {
    let tiles = hand_string(&meld.tiles(), aka);
    match meld.kind {
        MeldKind::ClosedKan => format!("[{}]", tiles),
        _ => format!("({})", tiles),
    }
}

fn wind_letter(wind: Wind) -> String {
    wind.to_mjai().to_ascii_lowercase()
}

fn tile_list(tiles: &[Tile], aka: bool) -> String {
    tiles
        .iter()
        .map(|&t| short_tile(t, aka))
        .collect::<Vec<_>>()
        .join(",")
}

/// Full argument vector for one winning hand (without the program name).
///
/// The first argument is the complete hand: closed tiles plus the winning
/// tile, then each meld as `(..)`, or `[..]` for a closed kan.
pub fn agari_args(record: &WinRecord) -> Vec<String> {
    let aka = record.aka_enabled();
    let cond = record.conditions();

    let mut all = record.closed_hand().to_vec();
    all.extend(record.winning_tile());
    let mut hand = hand_string(&all, aka);
    for meld in record.melds() {
        hand.push_str(&meld_string(meld, aka));
    }

    let mut args = vec![hand];
    if let Some(w) = record.winning_tile() {
        args.push("-w".to_string());
        args.push(short_tile(w, aka));
    }
    if record.is_tsumo() {
        args.push("-t".to_string());
    }
    // A riichi hand is closed; an open meld alongside one is a tracking
    // error and the flag is left off.
    if record.is_open() && !cond.riichi {
        args.push("-o".to_string());
    }
    if cond.double_riichi {
        args.push("--double-riichi".to_string());
    } else if cond.riichi {
        args.push("-r".to_string());
    }
    if cond.ippatsu {
        args.push("--ippatsu".to_string());
    }

    args.push("--round".to_string());
    args.push(wind_letter(record.context().round_wind));
    args.push("--seat".to_string());
    args.push(wind_letter(record.seat_wind()));

    if !record.dora_indicators().is_empty() {
        args.push("-d".to_string());
        args.push(tile_list(record.dora_indicators(), aka));
    }
    if cond.riichi && !record.hidden_dora_indicators().is_empty() {
        args.push("--ura".to_string());
        args.push(tile_list(record.hidden_dora_indicators(), aka));
    }

    let flags = [
        (cond.rinshan, "--rinshan"),
        (cond.chankan, "--chankan"),
        (cond.haitei, "--last-tile"),
        (cond.tenhou, "--tenhou"),
        (cond.chiihou, "--chiihou"),
    ];
    args.extend(
        flags
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, flag)| flag.to_string()),
    );
    args
}
