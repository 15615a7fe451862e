//! Typed replay events.
//!
//! One [`Event`] per decoded log line. Every variant carries exactly the
//! fields its transition needs; consumers match exhaustively.

use serde::{Deserialize, Serialize};

use crate::tile::Tile;

/// Number of seats at the table.
pub const NUM_SEATS: usize = 4;

/// Seat index, 0-3.
pub type Seat = usize;

/// Wind of a round or of a seat relative to the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Wind {
    #[default]
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl From<u8> for Wind {
    fn from(val: u8) -> Self {
        match val % 4 {
            0 => Wind::East,
            1 => Wind::South,
            2 => Wind::West,
            _ => Wind::North,
        }
    }
}

impl Wind {
    /// Parses the MJAI wind letter; anything unrecognised is East.
    pub fn from_mjai(s: &str) -> Self {
        match s {
            "S" => Wind::South,
            "W" => Wind::West,
            "N" => Wind::North,
            _ => Wind::East,
        }
    }

    pub const fn to_mjai(self) -> &'static str {
        match self {
            Wind::East => "E",
            Wind::South => "S",
            Wind::West => "W",
            Wind::North => "N",
        }
    }
}

/// Round-scoped facts fixed at round start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundContext {
    pub round_wind: Wind,
    /// 1-based round number within the wind.
    pub round_number: u8,
    /// Repeat counter (honba).
    pub repeat_count: u8,
    /// Riichi sticks on the table (kyotaku).
    pub pot_count: u32,
    pub dealer: Seat,
}

impl Default for RoundContext {
    fn default() -> Self {
        Self {
            round_wind: Wind::East,
            round_number: 1,
            repeat_count: 0,
            pot_count: 0,
            dealer: 0,
        }
    }
}

impl RoundContext {
    /// Seat wind of `seat`: East for the dealer, then counter-clockwise.
    pub fn seat_wind(&self, seat: Seat) -> Wind {
        Wind::from(((seat + NUM_SEATS - self.dealer % NUM_SEATS) % NUM_SEATS) as u8)
    }

    #[inline]
    pub fn is_dealer(&self, seat: Seat) -> bool {
        seat == self.dealer
    }
}

/// A seat's starting hand as reported by the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartingHand {
    Known(Vec<Tile>),
    /// The log hides this seat's hand entirely.
    Hidden,
}

impl StartingHand {
    /// Classifies a reported hand: empty, or led by an unknown tile, means
    /// the whole hand is hidden.
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        match tiles.first() {
            Some(first) if first.is_known() => StartingHand::Known(tiles),
            _ => StartingHand::Hidden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    GameStart {
        aka_enabled: bool,
    },
    RoundStart {
        context: RoundContext,
        hands: [StartingHand; NUM_SEATS],
        first_dora: Option<Tile>,
    },
    /// A wall draw. `tile` is the sentinel when hidden.
    Draw {
        seat: Seat,
        tile: Tile,
    },
    Discard {
        seat: Seat,
        tile: Tile,
    },
    Chi {
        seat: Seat,
        target: Seat,
        called: Tile,
        consumed: Vec<Tile>,
    },
    Pon {
        seat: Seat,
        target: Seat,
        called: Tile,
        consumed: Vec<Tile>,
    },
    /// Daiminkan: a quad called off a discard.
    OpenKan {
        seat: Seat,
        target: Seat,
        called: Tile,
        consumed: Vec<Tile>,
    },
    /// Ankan.
    ClosedKan {
        seat: Seat,
        consumed: Vec<Tile>,
    },
    /// Kakan: a tile added to an existing pon.
    UpgradeKan {
        seat: Seat,
        added: Tile,
    },
    DoraReveal {
        tile: Tile,
    },
    RiichiDeclare {
        seat: Seat,
    },
    RiichiAccepted {
        seat: Seat,
    },
    Win {
        seat: Seat,
        /// The discarder, or `seat` itself for a self-draw.
        counterpart: Seat,
        tile: Option<Tile>,
        deltas: [i32; NUM_SEATS],
        hidden_dora: Option<Vec<Tile>>,
    },
    /// Exhaustive or abortive draw.
    RoundDraw,
    RoundEnd,
    GameEnd,
}

impl Event {
    /// Short MJAI-style name, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::GameStart { .. } => "start_game",
            Event::RoundStart { .. } => "start_kyoku",
            Event::Draw { .. } => "tsumo",
            Event::Discard { .. } => "dahai",
            Event::Chi { .. } => "chi",
            Event::Pon { .. } => "pon",
            Event::OpenKan { .. } => "daiminkan",
            Event::ClosedKan { .. } => "ankan",
            Event::UpgradeKan { .. } => "kakan",
            Event::DoraReveal { .. } => "dora",
            Event::RiichiDeclare { .. } => "reach",
            Event::RiichiAccepted { .. } => "reach_accepted",
            Event::Win { .. } => "hora",
            Event::RoundDraw => "ryukyoku",
            Event::RoundEnd => "end_kyoku",
            Event::GameEnd => "end_game",
        }
    }

    /// True for the events that keep a robbed-kan window alive for one
    /// more step: the upgrade that opens it, the win that consumes it and
    /// the dora flip that may sit between them.
    pub fn preserves_robbed_kan_window(&self) -> bool {
        matches!(
            self,
            Event::UpgradeKan { .. } | Event::Win { .. } | Event::DoraReveal { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_wind_rotates_from_dealer() {
        let ctx = RoundContext {
            dealer: 2,
            ..Default::default()
        };
        assert_eq!(ctx.seat_wind(2), Wind::East);
        assert_eq!(ctx.seat_wind(3), Wind::South);
        assert_eq!(ctx.seat_wind(0), Wind::West);
        assert_eq!(ctx.seat_wind(1), Wind::North);
    }

    #[test]
    fn hidden_starting_hand() {
        assert_eq!(StartingHand::from_tiles(vec![]), StartingHand::Hidden);
        assert_eq!(
            StartingHand::from_tiles(vec![Tile::UNKNOWN, Tile::UNKNOWN]),
            StartingHand::Hidden
        );
        let e = Tile::parse("E").unwrap();
        assert_eq!(
            StartingHand::from_tiles(vec![e]),
            StartingHand::Known(vec![e])
        );
    }

    #[test]
    fn wind_letters() {
        assert_eq!(Wind::from_mjai("S"), Wind::South);
        assert_eq!(Wind::from_mjai("?"), Wind::East);
        assert_eq!(Wind::North.to_mjai(), "N");
    }
}
