use serde::{Deserialize, Serialize};

use crate::event::Seat;
use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldKind {
    Chi,
    Pon,
    /// Ankan.
    ClosedKan,
    /// Daiminkan.
    OpenKan,
    /// Kakan: a pon promoted in place by one added tile.
    UpgradedKan { added: Tile },
}

impl MeldKind {
    #[inline]
    pub const fn is_kan(self) -> bool {
        matches!(
            self,
            MeldKind::ClosedKan | MeldKind::OpenKan | MeldKind::UpgradedKan { .. }
        )
    }

    /// Tiles the meld contributes to the hand: 3, or 4 for any quad.
    #[inline]
    pub const fn tile_count(self) -> usize {
        if self.is_kan() { 4 } else { 3 }
    }

    pub const fn name(self) -> &'static str {
        match self {
            MeldKind::Chi => "chi",
            MeldKind::Pon => "pon",
            MeldKind::ClosedKan => "ankan",
            MeldKind::OpenKan => "daiminkan",
            MeldKind::UpgradedKan { .. } => "kakan",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    pub kind: MeldKind,
    pub seat: Seat,
    /// Seat the called tile came from. None for closed kans.
    pub target: Option<Seat>,
    /// The tile taken from another seat. None for closed kans.
    pub called: Option<Tile>,
    /// Tiles that came out of the caller's own hand.
    pub consumed: Vec<Tile>,
}

impl Meld {
    pub fn called(kind: MeldKind, seat: Seat, target: Seat, called: Tile, consumed: Vec<Tile>) -> Self {
        Self {
            kind,
            seat,
            target: Some(target),
            called: Some(called),
            consumed,
        }
    }

    pub fn closed_kan(seat: Seat, consumed: Vec<Tile>) -> Self {
        Self {
            kind: MeldKind::ClosedKan,
            seat,
            target: None,
            called: None,
            consumed,
        }
    }

    /// Every tile of the meld, called tile first and an added tile last.
    pub fn tiles(&self) -> Vec<Tile> {
        let mut tiles = Vec::with_capacity(4);
        tiles.extend(self.called);
        tiles.extend_from_slice(&self.consumed);
        if let MeldKind::UpgradedKan { added } = self.kind {
            tiles.push(added);
        }
        tiles
    }

    /// Open melds expose the hand; a closed kan does not.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.kind != MeldKind::ClosedKan
    }

    /// Whether `tile` could be the fourth tile of this meld: it must be a
    /// pon and the tile must share identity with the called tile or with
    /// one of the consumed tiles.
    fn accepts_upgrade(&self, tile: Tile) -> bool {
        self.kind == MeldKind::Pon
            && (self.called.is_some_and(|c| c.same_kind(tile))
                || self.consumed.iter().any(|c| c.same_kind(tile)))
    }
}

/// Ordered melds called by one seat.
///
/// Append-only, except that a pon may be replaced at its own index by the
/// quad it is upgraded to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeldLedger {
    melds: Vec<Meld>,
}

impl MeldLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, meld: Meld) {
        self.melds.push(meld);
    }

    /// Promotes the first pon matching `added` to an upgraded kan in place
    /// and returns its index. Returns None, leaving the ledger untouched,
    /// when no pon matches.
    pub fn upgrade(&mut self, added: Tile) -> Option<usize> {
        let idx = self.melds.iter().position(|m| m.accepts_upgrade(added))?;
        let pon = &self.melds[idx];
        let kan = Meld {
            kind: MeldKind::UpgradedKan { added },
            seat: pon.seat,
            target: pon.target,
            called: pon.called,
            consumed: pon.consumed.clone(),
        };
        self.melds[idx] = kan;
        Some(idx)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Meld] {
        &self.melds
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Meld> {
        self.melds.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.melds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.melds.is_empty()
    }

    pub fn kan_count(&self) -> usize {
        self.melds.iter().filter(|m| m.kind.is_kan()).count()
    }

    /// Sum of the per-kind tile counts (3 per chi/pon, 4 per quad).
    pub fn tile_count(&self) -> usize {
        self.melds.iter().map(|m| m.kind.tile_count()).sum()
    }

    pub fn is_open(&self) -> bool {
        self.melds.iter().any(Meld::is_open)
    }
}

impl<'a> IntoIterator for &'a MeldLedger {
    type Item = &'a Meld;
    type IntoIter = std::slice::Iter<'a, Meld>;

    fn into_iter(self) -> Self::IntoIter {
        self.melds.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Tile {
        Tile::parse(s).unwrap()
    }

    fn pon(called: &str, consumed: [&str; 2]) -> Meld {
        Meld::called(MeldKind::Pon, 3, 1, t(called), consumed.iter().map(|s| t(s)).collect())
    }

    #[test]
    fn upgrade_replaces_pon_in_place() {
        let mut ledger = MeldLedger::new();
        ledger.push(Meld::called(MeldKind::Chi, 3, 2, t("3m"), vec![t("4m"), t("5m")]));
        ledger.push(pon("7p", ["7p", "7p"]));

        assert_eq!(ledger.upgrade(t("7p")), Some(1));
        assert_eq!(ledger.len(), 2);
        let kan = &ledger.as_slice()[1];
        assert_eq!(kan.kind, MeldKind::UpgradedKan { added: t("7p") });
        assert_eq!(kan.tiles().len(), 4);
        assert_eq!(ledger.kan_count(), 1);
        assert_eq!(ledger.tile_count(), 7);
    }

    #[test]
    fn red_five_matches_plain_called_tile() {
        let mut ledger = MeldLedger::new();
        ledger.push(pon("5s", ["5s", "5s"]));
        assert_eq!(ledger.upgrade(t("0s")), Some(0));
        assert_eq!(
            ledger.as_slice()[0].kind,
            MeldKind::UpgradedKan { added: t("5sr") }
        );
    }

    #[test]
    fn plain_five_matches_red_consumed_tile() {
        let mut ledger = MeldLedger::new();
        ledger.push(pon("5m", ["5mr", "5m"]));
        assert_eq!(ledger.upgrade(t("5m")), Some(0));
    }

    #[test]
    fn unmatched_upgrade_is_a_no_op() {
        let mut ledger = MeldLedger::new();
        ledger.push(pon("E", ["E", "E"]));
        let before = ledger.clone();
        assert_eq!(ledger.upgrade(t("S")), None);
        assert_eq!(ledger, before);
    }

    #[test]
    fn only_pons_are_upgraded() {
        let mut ledger = MeldLedger::new();
        ledger.push(Meld::called(MeldKind::Chi, 3, 2, t("5p"), vec![t("4p"), t("6p")]));
        ledger.push(Meld::closed_kan(3, vec![t("5p"); 4]));
        assert_eq!(ledger.upgrade(t("5p")), None);
    }

    #[test]
    fn closed_kan_keeps_hand_closed() {
        let mut ledger = MeldLedger::new();
        ledger.push(Meld::closed_kan(0, vec![t("9s"); 4]));
        assert!(!ledger.is_open());
        assert_eq!(ledger.as_slice()[0].tiles().len(), 4);
        ledger.push(pon("C", ["C", "C"]));
        assert!(ledger.is_open());
    }
}
