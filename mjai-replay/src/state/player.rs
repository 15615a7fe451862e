use crate::meld::MeldLedger;
use crate::tile::Tile;

/// Everything the replay tracks for one seat within a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatState {
    /// Concealed tiles in arrival order.
    pub hand: Vec<Tile>,
    pub melds: MeldLedger,
    pub riichi_declared: bool,
    pub double_riichi: bool,
    /// Ippatsu window: open from the riichi declaration until a call or a
    /// completed draw-discard cycle closes it.
    pub ippatsu_open: bool,
    /// The first self-draw after riichi has happened.
    pub ippatsu_draw_done: bool,
    /// No discard by this seat and no call by anyone yet this round.
    pub first_turn: bool,
    /// Last tile this seat drew or discarded.
    pub last_tile: Option<Tile>,
    /// False once any tile of this seat was hidden from the log.
    pub full_visibility: bool,
}

impl Default for SeatState {
    fn default() -> Self {
        Self::new()
    }
}

impl SeatState {
    pub fn new() -> Self {
        Self {
            hand: Vec::new(),
            melds: MeldLedger::new(),
            riichi_declared: false,
            double_riichi: false,
            ippatsu_open: false,
            ippatsu_draw_done: false,
            first_turn: true,
            last_tile: None,
            full_visibility: true,
        }
    }

    /// Removes one exact copy of `tile` from the hand. Returns whether a
    /// copy was present.
    pub fn remove_tile(&mut self, tile: Tile) -> bool {
        match self.hand.iter().position(|&t| t == tile) {
            Some(idx) => {
                self.hand.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn remove_tiles(&mut self, tiles: &[Tile]) {
        for &t in tiles {
            self.remove_tile(t);
        }
    }

    #[inline]
    pub fn close_ippatsu(&mut self) {
        self.ippatsu_open = false;
    }
}
