use log::debug;

use crate::event::{Event, NUM_SEATS, Seat, StartingHand};
use crate::meld::{Meld, MeldKind};
use crate::state::{ReplacementWindow, RobbedKanWindow, RoundStateMachine};
use crate::tile::Tile;
use crate::win::{WinClaim, WinEventBuilder, WinRecord};

pub trait RoundEventHandler {
    /// Applies one event in log order. Returns a record only for a win.
    fn apply(&mut self, event: &Event) -> Option<WinRecord>;
}

impl RoundEventHandler for RoundStateMachine {
    fn apply(&mut self, event: &Event) -> Option<WinRecord> {
        if let Some(seat) = out_of_range_seat(event) {
            debug!("ignoring '{}' for seat {}", event.kind(), seat);
            return None;
        }

        let mut win = None;
        match event {
            Event::GameStart { aka_enabled } => {
                self.aka_enabled = *aka_enabled;
            }
            Event::RoundStart {
                context,
                hands,
                first_dora,
            } => {
                self.reset(*context);
                for (seat, hand) in self.state.seats.iter_mut().zip(hands.iter()) {
                    match hand {
                        StartingHand::Known(tiles) => seat.hand = tiles.clone(),
                        StartingHand::Hidden => seat.full_visibility = false,
                    }
                }
                if let Some(dora) = first_dora {
                    self.state.dora_indicators = vec![*dora];
                }
            }
            Event::Draw { seat, tile } => self.on_draw(*seat, *tile),
            Event::Discard { seat, tile } => self.on_discard(*seat, *tile),
            Event::Chi {
                seat,
                target,
                called,
                consumed,
            } => {
                self.push_called_meld(MeldKind::Chi, *seat, *target, *called, consumed);
                self.state.interrupt_all();
            }
            Event::Pon {
                seat,
                target,
                called,
                consumed,
            } => {
                self.push_called_meld(MeldKind::Pon, *seat, *target, *called, consumed);
                self.state.interrupt_all();
            }
            Event::OpenKan {
                seat,
                target,
                called,
                consumed,
            } => {
                self.push_called_meld(MeldKind::OpenKan, *seat, *target, *called, consumed);
                self.state.replacement = Some(ReplacementWindow { seat: *seat });
                self.state.interrupt_all();
            }
            Event::ClosedKan { seat, consumed } => {
                let s = self.state.seat_mut(*seat);
                s.remove_tiles(consumed);
                s.melds.push(Meld::closed_kan(*seat, consumed.clone()));
                self.state.replacement = Some(ReplacementWindow { seat: *seat });
                // The declarer keeps their own ippatsu chance.
                self.state.close_ippatsu_except(*seat);
            }
            Event::UpgradeKan { seat, added } => self.on_upgrade(*seat, *added),
            Event::DoraReveal { tile } => self.state.dora_indicators.push(*tile),
            Event::RiichiDeclare { seat } => {
                let s = self.state.seat_mut(*seat);
                if s.first_turn {
                    s.double_riichi = true;
                }
                s.riichi_declared = true;
                s.ippatsu_open = true;
            }
            Event::RiichiAccepted { seat } => {
                self.state.seat_mut(*seat).riichi_declared = true;
                self.context.pot_count += 1;
            }
            Event::Win {
                seat,
                counterpart,
                tile,
                deltas,
                hidden_dora,
            } => {
                let claim = WinClaim {
                    seat: *seat,
                    counterpart: *counterpart,
                    tile: *tile,
                    deltas: *deltas,
                    hidden_dora: hidden_dora.clone().unwrap_or_default(),
                };
                win = Some(WinEventBuilder::new(&self.state, &self.context, self.aka_enabled).build(&claim));
                self.state.robbed_kan = None;
                self.state.replacement = None;
            }
            Event::RoundDraw | Event::RoundEnd | Event::GameEnd => {}
        }

        // A robbed-kan window only survives into the very next event.
        if !event.preserves_robbed_kan_window() {
            self.state.robbed_kan = None;
        }
        // A discard after the replacement draw ends the rinshan chance.
        if matches!(event, Event::Discard { .. }) {
            self.state.replacement = None;
        }
        self.state.last_event = Some(event.kind());
        win
    }
}

impl RoundStateMachine {
    fn on_draw(&mut self, seat: Seat, tile: Tile) {
        let s = self.state.seat_mut(seat);
        if tile.is_known() {
            s.hand.push(tile);
            s.last_tile = Some(tile);
        } else {
            s.full_visibility = false;
        }

        if s.riichi_declared && s.ippatsu_open {
            if s.ippatsu_draw_done {
                // A whole cycle passed since the riichi without a win.
                s.close_ippatsu();
            } else {
                s.ippatsu_draw_done = true;
            }
        }
        self.state.draw_from_wall();
    }

    fn on_discard(&mut self, seat: Seat, tile: Tile) {
        let s = self.state.seat_mut(seat);
        s.remove_tile(tile);
        s.last_tile = Some(tile);
        s.first_turn = false;
        if s.ippatsu_open && s.ippatsu_draw_done {
            s.close_ippatsu();
        }
    }

    fn on_upgrade(&mut self, seat: Seat, added: Tile) {
        let s = self.state.seat_mut(seat);
        s.remove_tile(added);
        if s.melds.upgrade(added).is_none() {
            // Left as is; the record's tile count will not reconcile.
            debug!("kakan of {} by seat {} matches no pon", added, seat);
        }
        self.state.replacement = Some(ReplacementWindow { seat });
        self.state.robbed_kan = Some(RobbedKanWindow { seat, tile: added });
        self.state.close_ippatsu_except(seat);
    }

    fn push_called_meld(
        &mut self,
        kind: MeldKind,
        seat: Seat,
        target: Seat,
        called: Tile,
        consumed: &[Tile],
    ) {
        let s = self.state.seat_mut(seat);
        s.remove_tiles(consumed);
        s.melds
            .push(Meld::called(kind, seat, target, called, consumed.to_vec()));
    }

    /// Feeds a sequence of events and collects every win produced.
    pub fn replay<'e, I>(&mut self, events: I) -> Vec<WinRecord>
    where
        I: IntoIterator<Item = &'e Event>,
    {
        events.into_iter().filter_map(|e| self.apply(e)).collect()
    }
}

/// First seat index in `event` that does not exist at the table.
fn out_of_range_seat(event: &Event) -> Option<Seat> {
    let seats: [Option<Seat>; 3] = match event {
        Event::Draw { seat, .. }
        | Event::Discard { seat, .. }
        | Event::ClosedKan { seat, .. }
        | Event::UpgradeKan { seat, .. }
        | Event::RiichiDeclare { seat }
        | Event::RiichiAccepted { seat } => [Some(*seat), None, None],
        Event::Chi { seat, target, .. }
        | Event::Pon { seat, target, .. }
        | Event::OpenKan { seat, target, .. } => [Some(*seat), Some(*target), None],
        Event::Win {
            seat, counterpart, ..
        } => [Some(*seat), Some(*counterpart), None],
        Event::RoundStart { context, .. } => [Some(context.dealer), None, None],
        Event::GameStart { .. }
        | Event::DoraReveal { .. }
        | Event::RoundDraw
        | Event::RoundEnd
        | Event::GameEnd => [None, None, None],
    };
    seats.into_iter().flatten().find(|&s| s >= NUM_SEATS)
}
