//! Winning-hand reconstruction.
//!
//! [`WinEventBuilder`] reads the current [`RoundState`] and derives the
//! hand, the timing conditions and the bonus indicators for one win. It
//! never mutates anything; the state machine closes its windows after the
//! record has been built.

use std::fmt;

use serde::Serialize;

use crate::event::{NUM_SEATS, RoundContext, Seat, Wind};
use crate::meld::{Meld, MeldLedger};
use crate::state::RoundState;
use crate::tile::Tile;

/// Tiles in a complete hand without quads.
pub const BASE_HAND_TILES: usize = 14;

/// The win as announced by the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinClaim {
    pub seat: Seat,
    /// The discarder, or `seat` itself for a self-draw.
    pub counterpart: Seat,
    pub tile: Option<Tile>,
    pub deltas: [i32; NUM_SEATS],
    /// Ura dora of this win only; empty when the log gives none.
    pub hidden_dora: Vec<Tile>,
}

impl WinClaim {
    #[inline]
    pub fn is_tsumo(&self) -> bool {
        self.seat == self.counterpart
    }
}

/// Situational conditions that depend on the round's history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WinConditions {
    pub riichi: bool,
    pub double_riichi: bool,
    pub ippatsu: bool,
    /// Win on a kan replacement draw.
    pub rinshan: bool,
    /// Ron on a tile added to another seat's pon.
    pub chankan: bool,
    /// Win on the last live-wall draw.
    pub haitei: bool,
    /// Dealer self-draw before any interruption.
    pub tenhou: bool,
    /// Non-dealer self-draw before any interruption.
    pub chiihou: bool,
}

/// Why a [`WinRecord`] cannot be handed to a scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidity {
    /// Some of the winner's tiles were hidden during the round.
    HiddenHand,
    /// The closed hand or winning tile holds the unknown sentinel.
    UnknownTile,
    MissingWinningTile,
    /// Closed tiles, winning tile and melds do not add up to a full hand.
    TileCount { expected: usize, actual: usize },
}

impl fmt::Display for Invalidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invalidity::HiddenHand => f.write_str("winner's hand was not fully visible"),
            Invalidity::UnknownTile => f.write_str("hand contains an unknown tile"),
            Invalidity::MissingWinningTile => f.write_str("winning tile could not be resolved"),
            Invalidity::TileCount { expected, actual } => {
                write!(f, "tile count {} does not match expected {}", actual, expected)
            }
        }
    }
}

impl std::error::Error for Invalidity {}

/// Immutable description of one winning hand and its context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinRecord {
    winner: Seat,
    discarder: Option<Seat>,
    closed_hand: Vec<Tile>,
    winning_tile: Option<Tile>,
    melds: MeldLedger,
    is_tsumo: bool,
    context: RoundContext,
    conditions: WinConditions,
    dora_indicators: Vec<Tile>,
    hidden_dora_indicators: Vec<Tile>,
    deltas: [i32; NUM_SEATS],
    full_visibility: bool,
    aka_enabled: bool,
}

impl WinRecord {
    pub fn winner(&self) -> Seat {
        self.winner
    }

    /// None for a self-draw.
    pub fn discarder(&self) -> Option<Seat> {
        self.discarder
    }

    /// Concealed tiles, never including the winning tile.
    pub fn closed_hand(&self) -> &[Tile] {
        &self.closed_hand
    }

    pub fn winning_tile(&self) -> Option<Tile> {
        self.winning_tile
    }

    pub fn melds(&self) -> &[Meld] {
        self.melds.as_slice()
    }

    pub fn is_tsumo(&self) -> bool {
        self.is_tsumo
    }

    pub fn context(&self) -> &RoundContext {
        &self.context
    }

    pub fn conditions(&self) -> &WinConditions {
        &self.conditions
    }

    pub fn dora_indicators(&self) -> &[Tile] {
        &self.dora_indicators
    }

    pub fn hidden_dora_indicators(&self) -> &[Tile] {
        &self.hidden_dora_indicators
    }

    pub fn deltas(&self) -> &[i32; NUM_SEATS] {
        &self.deltas
    }

    pub fn has_full_visibility(&self) -> bool {
        self.full_visibility
    }

    pub fn aka_enabled(&self) -> bool {
        self.aka_enabled
    }

    /// Points the winner gained, bonuses included.
    pub fn points_won(&self) -> i32 {
        self.deltas[self.winner]
    }

    pub fn seat_wind(&self) -> Wind {
        self.context.seat_wind(self.winner)
    }

    pub fn is_dealer(&self) -> bool {
        self.context.is_dealer(self.winner)
    }

    /// Any called meld other than a closed kan opens the hand.
    pub fn is_open(&self) -> bool {
        self.melds.is_open()
    }

    pub fn kan_count(&self) -> usize {
        self.melds.kan_count()
    }

    /// Checks visibility, sentinel tiles and the tile-count reconciliation
    /// `closed + 1 + melds == 14 + kans`.
    pub fn validate(&self) -> Result<(), Invalidity> {
        if !self.full_visibility {
            return Err(Invalidity::HiddenHand);
        }
        if self.closed_hand.iter().any(|t| t.is_unknown()) {
            return Err(Invalidity::UnknownTile);
        }
        match self.winning_tile {
            None => return Err(Invalidity::MissingWinningTile),
            Some(t) if t.is_unknown() => return Err(Invalidity::UnknownTile),
            Some(_) => {}
        }

        let actual = self.closed_hand.len() + 1 + self.melds.tile_count();
        let expected = BASE_HAND_TILES + self.kan_count();
        if actual != expected {
            return Err(Invalidity::TileCount { expected, actual });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Derives a [`WinRecord`] from the replay state at the moment of a win.
pub struct WinEventBuilder<'a> {
    state: &'a RoundState,
    context: &'a RoundContext,
    aka_enabled: bool,
}

impl<'a> WinEventBuilder<'a> {
    pub fn new(state: &'a RoundState, context: &'a RoundContext, aka_enabled: bool) -> Self {
        Self {
            state,
            context,
            aka_enabled,
        }
    }

    /// The tile the log names, else the winner's last draw (self-draw) or
    /// the discarder's last discard (ron).
    pub fn winning_tile(&self, claim: &WinClaim) -> Option<Tile> {
        claim.tile.or_else(|| {
            let source = if claim.is_tsumo() {
                claim.seat
            } else {
                claim.counterpart
            };
            self.state.seat(source).last_tile
        })
    }

    /// The winner's concealed tiles without the winning tile.
    ///
    /// After a self-draw the winning tile sits in the hand and is taken out
    /// once; a ron tile never entered the hand.
    pub fn closed_hand(&self, claim: &WinClaim, winning_tile: Option<Tile>) -> Vec<Tile> {
        let mut hand = self.state.seat(claim.seat).hand.clone();
        if claim.is_tsumo()
            && let Some(tile) = winning_tile
            && let Some(idx) = hand.iter().position(|&t| t == tile)
        {
            hand.remove(idx);
        }
        hand
    }

    pub fn conditions(&self, claim: &WinClaim) -> WinConditions {
        let seat = self.state.seat(claim.seat);
        let tsumo = claim.is_tsumo();
        let dealer = self.context.is_dealer(claim.seat);

        let rinshan = tsumo
            && self
                .state
                .replacement
                .is_some_and(|w| w.seat == claim.seat);
        // The robbed tile itself is not compared with the winning tile: an
        // open window plus a ron by another seat is taken as sufficient.
        let chankan = !tsumo
            && self
                .state
                .robbed_kan
                .is_some_and(|w| w.seat != claim.seat);

        WinConditions {
            riichi: seat.riichi_declared,
            double_riichi: seat.double_riichi,
            ippatsu: seat.ippatsu_open,
            rinshan,
            chankan,
            haitei: self.state.wall_exhausted && !rinshan,
            tenhou: tsumo && seat.first_turn && dealer,
            chiihou: tsumo && seat.first_turn && !dealer,
        }
    }

    pub fn build(&self, claim: &WinClaim) -> WinRecord {
        let winning_tile = self.winning_tile(claim);
        let seat = self.state.seat(claim.seat);

        WinRecord {
            winner: claim.seat,
            discarder: (!claim.is_tsumo()).then_some(claim.counterpart),
            closed_hand: self.closed_hand(claim, winning_tile),
            winning_tile,
            melds: seat.melds.clone(),
            is_tsumo: claim.is_tsumo(),
            context: *self.context,
            conditions: self.conditions(claim),
            dora_indicators: self.state.dora_indicators.clone(),
            hidden_dora_indicators: claim.hidden_dora.clone(),
            deltas: claim.deltas,
            full_visibility: seat.full_visibility,
            aka_enabled: self.aka_enabled,
        }
    }
}
