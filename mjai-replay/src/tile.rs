//! Tile identifiers as they appear in MJAI logs.
//!
//! A [`Tile`] is one of the 34 tile kinds, one of the three red fives, or
//! the [`Tile::UNKNOWN`] sentinel used by logs recorded from another
//! player's perspective. Equality is exact: a red five and a plain five are
//! different tiles. [`Tile::same_kind`] is the looser identity used when
//! matching an added tile against an existing triplet.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ReplayError, ReplayResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Total number of distinct tile kinds (0-33).
pub const NUM_TILE_TYPES: u8 = 34;

/// Number of tiles per suited category (1-9).
pub const NUM_SUIT_TILES: u8 = 9;

pub const MANZU_START: u8 = 0;
pub const PINZU_START: u8 = 9;
pub const SOUZU_START: u8 = 18;
pub const JIHAI_START: u8 = 27;

/// Extended indices for the red fives.
pub const AKA_MANZU: u8 = 34;
pub const AKA_PINZU: u8 = 35;
pub const AKA_SOUZU: u8 = 36;

const UNKNOWN_ID: u8 = 37;

/// MJAI names indexed by extended id (0-36).
const TILE_NAMES: [&str; 37] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", "1p", "2p", "3p", "4p", "5p", "6p", "7p",
    "8p", "9p", "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", "E", "S", "W", "N", "P", "F",
    "C", "5mr", "5pr", "5sr",
];

const HONOR_LETTERS: [char; 7] = ['E', 'S', 'W', 'N', 'P', 'F', 'C'];

// ---------------------------------------------------------------------------
// Suit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    Manzu = 0,
    Pinzu = 1,
    Souzu = 2,
    Jihai = 3,
}

impl Suit {
    #[inline]
    pub const fn start(self) -> u8 {
        match self {
            Suit::Manzu => MANZU_START,
            Suit::Pinzu => PINZU_START,
            Suit::Souzu => SOUZU_START,
            Suit::Jihai => JIHAI_START,
        }
    }

    /// Suffix letter in the short notation (`m`, `p`, `s`, `z`).
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            Suit::Manzu => 'm',
            Suit::Pinzu => 'p',
            Suit::Souzu => 's',
            Suit::Jihai => 'z',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c {
            'm' => Some(Suit::Manzu),
            'p' => Some(Suit::Pinzu),
            's' => Some(Suit::Souzu),
            'z' => Some(Suit::Jihai),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// A concrete tile identifier or the unknown sentinel.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(u8);

impl Tile {
    /// A tile hidden from the log's point of view (`?`).
    pub const UNKNOWN: Tile = Tile(UNKNOWN_ID);

    /// Creates a tile from its extended id (0-33 kinds, 34-36 red fives).
    #[inline]
    pub const fn new(id: u8) -> Option<Self> {
        if id < UNKNOWN_ID { Some(Tile(id)) } else { None }
    }

    /// Suited tile from a suit and a rank, where rank 0 is the red five.
    pub const fn suited(suit: Suit, rank: u8) -> Option<Self> {
        let aka = match suit {
            Suit::Manzu => AKA_MANZU,
            Suit::Pinzu => AKA_PINZU,
            Suit::Souzu => AKA_SOUZU,
            Suit::Jihai => return None,
        };
        match rank {
            0 => Some(Tile(aka)),
            1..=9 => Some(Tile(suit.start() + rank - 1)),
            _ => None,
        }
    }

    /// Honor tile by rank: 1-4 winds (E S W N), 5-7 dragons (P F C).
    pub const fn honor(rank: u8) -> Option<Self> {
        match rank {
            1..=7 => Some(Tile(JIHAI_START + rank - 1)),
            _ => None,
        }
    }

    /// Raw extended id (0-36), or 37 for the unknown sentinel.
    #[inline]
    pub const fn id(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_unknown(self) -> bool {
        self.0 == UNKNOWN_ID
    }

    #[inline]
    pub const fn is_known(self) -> bool {
        !self.is_unknown()
    }

    #[inline]
    pub const fn is_aka(self) -> bool {
        matches!(self.0, AKA_MANZU | AKA_PINZU | AKA_SOUZU)
    }

    /// The plain tile of the same kind: red fives become plain fives,
    /// everything else (including the sentinel) passes through.
    #[inline]
    pub const fn deaka(self) -> Tile {
        match self.0 {
            AKA_MANZU => Tile(4),
            AKA_PINZU => Tile(13),
            AKA_SOUZU => Tile(22),
            _ => self,
        }
    }

    /// Tile-identity equivalence: a red five matches the plain five of its
    /// suit. The unknown sentinel matches nothing, not even itself.
    #[inline]
    pub const fn same_kind(self, other: Tile) -> bool {
        if self.is_unknown() || other.is_unknown() {
            return false;
        }
        self.deaka().0 == other.deaka().0
    }

    /// Tile kind index (0-33) with the red marking removed.
    #[inline]
    pub const fn kind(self) -> Option<u8> {
        if self.is_unknown() { None } else { Some(self.deaka().0) }
    }

    pub const fn suit(self) -> Option<Suit> {
        match self.kind() {
            Some(0..9) => Some(Suit::Manzu),
            Some(9..18) => Some(Suit::Pinzu),
            Some(18..27) => Some(Suit::Souzu),
            Some(_) => Some(Suit::Jihai),
            None => None,
        }
    }

    /// Rank within the suit: 1-9 for suited tiles with 0 for a red five,
    /// 1-7 for honors.
    pub const fn rank(self) -> Option<u8> {
        if self.is_aka() {
            return Some(0);
        }
        match self.kind() {
            Some(k) if k < JIHAI_START => Some(k % NUM_SUIT_TILES + 1),
            Some(k) => Some(k - JIHAI_START + 1),
            None => None,
        }
    }

    /// MJAI notation (`1m`, `5pr`, `E`, `?`).
    pub fn to_mjai(self) -> &'static str {
        TILE_NAMES.get(self.0 as usize).copied().unwrap_or("?")
    }

    /// Parses either notation: MJAI (`5mr`, `E`, `C`) or the short form
    /// (`0m`, `1z`). `?` and the empty string are the unknown sentinel.
    pub fn parse(text: &str) -> ReplayResult<Tile> {
        let s = text.trim();
        if s.is_empty() || s.starts_with('?') {
            return Ok(Tile::UNKNOWN);
        }

        let mut chars = s.chars();
        let first = chars.next();
        let second = chars.next();
        let third = chars.next();
        let rest = chars.next();

        let parsed = match (first, second, third, rest) {
            (Some(c), None, None, None) => HONOR_LETTERS
                .iter()
                .position(|&h| h == c)
                .and_then(|i| Tile::honor(i as u8 + 1)),
            (Some(d), Some(suit), None, None) => match (d.to_digit(10), Suit::from_letter(suit)) {
                (Some(rank), Some(Suit::Jihai)) => Tile::honor(rank as u8),
                (Some(rank), Some(suit)) => Tile::suited(suit, rank as u8),
                _ => None,
            },
            (Some('5'), Some(suit), Some('r'), None) => match Suit::from_letter(suit) {
                Some(Suit::Jihai) | None => None,
                Some(suit) => Tile::suited(suit, 0),
            },
            _ => None,
        };

        parsed.ok_or_else(|| ReplayError::Parse {
            input: text.to_string(),
            message: "not a tile identifier".to_string(),
        })
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({}={})", self.0, self.to_mjai())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_mjai())
    }
}

impl std::str::FromStr for Tile {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tile::parse(s)
    }
}

impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_mjai())
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Tile::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Parses a list of tile strings, failing on the first bad entry.
pub fn parse_tiles<S: AsRef<str>>(items: &[S]) -> ReplayResult<Vec<Tile>> {
    items.iter().map(|s| Tile::parse(s.as_ref())).collect()
}
