//! MJAI JSON-lines decoding.
//!
//! [`MjaiEvent`] mirrors the wire format loosely (optional fields, the
//! aliases seen in converted Tenhou logs); [`MjaiEvent::into_event`] checks
//! it and produces a typed [`Event`].

use serde::{Deserialize, Serialize};

use crate::errors::{ReplayError, ReplayResult};
use crate::event::{Event, NUM_SEATS, RoundContext, Seat, StartingHand, Wind};
use crate::tile::{Tile, parse_tiles};

fn default_true() -> bool {
    true
}

fn default_kyoku() -> u8 {
    1
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(tag = "type")]
pub enum MjaiEvent {
    #[serde(rename = "start_game")]
    StartGame {
        #[serde(default = "default_true")]
        aka_flag: bool,
        names: Option<Vec<String>>,
    },
    #[serde(rename = "start_kyoku")]
    StartKyoku {
        bakaze: Option<String>,
        #[serde(default = "default_kyoku")]
        kyoku: u8,
        #[serde(default)]
        honba: u8,
        #[serde(default, alias = "kyoutaku")]
        kyotaku: u32,
        #[serde(default)]
        oya: usize,
        dora_marker: Option<String>,
        #[serde(default)]
        tehais: Vec<Vec<String>>,
    },
    #[serde(rename = "tsumo")]
    Tsumo { actor: usize, pai: Option<String> },
    #[serde(rename = "dahai")]
    Dahai {
        actor: usize,
        pai: String,
        #[serde(default)]
        tsumogiri: bool,
    },
    #[serde(rename = "chi")]
    Chi {
        actor: usize,
        target: usize,
        pai: String,
        consumed: Vec<String>,
    },
    #[serde(rename = "pon")]
    Pon {
        actor: usize,
        target: usize,
        pai: String,
        consumed: Vec<String>,
    },
    #[serde(rename = "daiminkan", alias = "kan")]
    Daiminkan {
        actor: usize,
        target: usize,
        pai: String,
        consumed: Vec<String>,
    },
    #[serde(rename = "ankan")]
    Ankan { actor: usize, consumed: Vec<String> },
    #[serde(rename = "kakan")]
    Kakan {
        actor: usize,
        pai: String,
        #[serde(default)]
        consumed: Vec<String>,
    },
    #[serde(rename = "dora")]
    Dora { dora_marker: String },
    #[serde(rename = "reach")]
    Reach { actor: usize },
    #[serde(rename = "reach_accepted")]
    ReachAccepted { actor: usize },
    #[serde(rename = "hora")]
    Hora {
        actor: usize,
        target: Option<usize>,
        pai: Option<String>,
        #[serde(alias = "uradora_markers")]
        ura_markers: Option<Vec<String>>,
        #[serde(alias = "delta")]
        deltas: Option<Vec<i32>>,
    },
    #[serde(rename = "ryukyoku")]
    Ryukyoku {
        #[serde(alias = "delta")]
        deltas: Option<Vec<i32>>,
    },
    #[serde(rename = "end_kyoku")]
    EndKyoku,
    #[serde(rename = "end_game")]
    EndGame,
    #[serde(other)]
    Other,
}

fn seat(kind: &str, field: &str, value: usize) -> ReplayResult<Seat> {
    if value < NUM_SEATS {
        Ok(value)
    } else {
        Err(ReplayError::invalid_event(
            kind,
            format!("{} {} is not a seat", field, value),
        ))
    }
}

fn deltas_array(kind: &str, deltas: Option<Vec<i32>>) -> ReplayResult<[i32; NUM_SEATS]> {
    match deltas {
        None => Ok([0; NUM_SEATS]),
        Some(v) => <[i32; NUM_SEATS]>::try_from(v.as_slice()).map_err(|_| {
            ReplayError::invalid_event(kind, format!("expected 4 deltas, got {}", v.len()))
        }),
    }
}

impl MjaiEvent {
    /// Validates seats and tiles and builds the typed event. `Ok(None)`
    /// for records the replay has no use for.
    pub fn into_event(self) -> ReplayResult<Option<Event>> {
        let event = match self {
            MjaiEvent::StartGame { aka_flag, .. } => Event::GameStart {
                aka_enabled: aka_flag,
            },
            MjaiEvent::StartKyoku {
                bakaze,
                kyoku,
                honba,
                kyotaku,
                oya,
                dora_marker,
                tehais,
            } => {
                let context = RoundContext {
                    round_wind: bakaze.as_deref().map(Wind::from_mjai).unwrap_or_default(),
                    round_number: kyoku,
                    repeat_count: honba,
                    pot_count: kyotaku,
                    dealer: seat("start_kyoku", "oya", oya)?,
                };
                let mut hands: [StartingHand; NUM_SEATS] =
                    std::array::from_fn(|_| StartingHand::Hidden);
                for (i, hand) in tehais.iter().take(NUM_SEATS).enumerate() {
                    hands[i] = StartingHand::from_tiles(parse_tiles(hand)?);
                }
                let first_dora = dora_marker.as_deref().map(Tile::parse).transpose()?;
                Event::RoundStart {
                    context,
                    hands,
                    first_dora,
                }
            }
            MjaiEvent::Tsumo { actor, pai } => Event::Draw {
                seat: seat("tsumo", "actor", actor)?,
                tile: pai.as_deref().map(Tile::parse).transpose()?.unwrap_or(Tile::UNKNOWN),
            },
            MjaiEvent::Dahai { actor, pai, .. } => Event::Discard {
                seat: seat("dahai", "actor", actor)?,
                tile: Tile::parse(&pai)?,
            },
            MjaiEvent::Chi {
                actor,
                target,
                pai,
                consumed,
            } => Event::Chi {
                seat: seat("chi", "actor", actor)?,
                target: seat("chi", "target", target)?,
                called: Tile::parse(&pai)?,
                consumed: parse_tiles(&consumed)?,
            },
            MjaiEvent::Pon {
                actor,
                target,
                pai,
                consumed,
            } => Event::Pon {
                seat: seat("pon", "actor", actor)?,
                target: seat("pon", "target", target)?,
                called: Tile::parse(&pai)?,
                consumed: parse_tiles(&consumed)?,
            },
            MjaiEvent::Daiminkan {
                actor,
                target,
                pai,
                consumed,
            } => Event::OpenKan {
                seat: seat("daiminkan", "actor", actor)?,
                target: seat("daiminkan", "target", target)?,
                called: Tile::parse(&pai)?,
                consumed: parse_tiles(&consumed)?,
            },
            MjaiEvent::Ankan { actor, consumed } => Event::ClosedKan {
                seat: seat("ankan", "actor", actor)?,
                consumed: parse_tiles(&consumed)?,
            },
            MjaiEvent::Kakan { actor, pai, .. } => Event::UpgradeKan {
                seat: seat("kakan", "actor", actor)?,
                added: Tile::parse(&pai)?,
            },
            MjaiEvent::Dora { dora_marker } => Event::DoraReveal {
                tile: Tile::parse(&dora_marker)?,
            },
            MjaiEvent::Reach { actor } => Event::RiichiDeclare {
                seat: seat("reach", "actor", actor)?,
            },
            MjaiEvent::ReachAccepted { actor } => Event::RiichiAccepted {
                seat: seat("reach_accepted", "actor", actor)?,
            },
            MjaiEvent::Hora {
                actor,
                target,
                pai,
                ura_markers,
                deltas,
            } => {
                let actor = seat("hora", "actor", actor)?;
                let tile = match pai.as_deref() {
                    None | Some("") => None,
                    Some(s) => Some(Tile::parse(s)?),
                };
                let hidden_dora = ura_markers.as_deref().map(parse_tiles).transpose()?;
                Event::Win {
                    seat: actor,
                    counterpart: seat("hora", "target", target.unwrap_or(actor))?,
                    tile,
                    deltas: deltas_array("hora", deltas)?,
                    hidden_dora,
                }
            }
            MjaiEvent::Ryukyoku { .. } => Event::RoundDraw,
            MjaiEvent::EndKyoku => Event::RoundEnd,
            MjaiEvent::EndGame => Event::GameEnd,
            MjaiEvent::Other => return Ok(None),
        };
        Ok(Some(event))
    }
}

/// Decodes one log line. Blank lines and unrecognised record types give
/// `Ok(None)`; malformed JSON or fields give an error and the line should
/// be skipped.
pub fn decode_line(line: &str) -> ReplayResult<Option<Event>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let raw: MjaiEvent = serde_json::from_str(line)?;
    raw.into_event()
}
