//! Per-round replay state.
//!
//! [`RoundStateMachine`] owns a [`RoundState`] and advances it one
//! [`Event`](crate::event::Event) at a time (see [`event_handler`]). Winning
//! events are turned into [`WinRecord`](crate::win::WinRecord)s by
//! [`WinEventBuilder`](crate::win::WinEventBuilder), which only reads the
//! state.

use crate::event::{NUM_SEATS, RoundContext, Seat};
use crate::rule::ReplayRule;
use crate::tile::Tile;

pub mod event_handler;
pub mod player;

pub use event_handler::RoundEventHandler;
pub use player::SeatState;

/// The seat that may still win on a kan replacement draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacementWindow {
    pub seat: Seat,
}

/// An added kan tile that another seat may still rob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobbedKanWindow {
    pub seat: Seat,
    pub tile: Tile,
}

/// Mutable state of the round being replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    pub seats: [SeatState; NUM_SEATS],
    pub dora_indicators: Vec<Tile>,
    /// At most one seat at a time.
    pub replacement: Option<ReplacementWindow>,
    /// At most one seat at a time.
    pub robbed_kan: Option<RobbedKanWindow>,
    /// Approximate live-wall count, decremented on every draw.
    pub wall_remaining: i64,
    pub wall_exhausted: bool,
    pub last_event: Option<&'static str>,
}

impl RoundState {
    pub fn new(rule: &ReplayRule) -> Self {
        Self {
            seats: std::array::from_fn(|_| SeatState::new()),
            dora_indicators: Vec::new(),
            replacement: None,
            robbed_kan: None,
            wall_remaining: i64::from(rule.initial_wall_tiles),
            wall_exhausted: false,
            last_event: None,
        }
    }

    #[inline]
    pub fn seat(&self, seat: Seat) -> &SeatState {
        &self.seats[seat]
    }

    #[inline]
    pub fn seat_mut(&mut self, seat: Seat) -> &mut SeatState {
        &mut self.seats[seat]
    }

    /// Clears first-turn and ippatsu for every seat (any call does this).
    pub(crate) fn interrupt_all(&mut self) {
        for s in &mut self.seats {
            s.first_turn = false;
            s.close_ippatsu();
        }
    }

    /// Closes every ippatsu window except the declaring seat's.
    pub(crate) fn close_ippatsu_except(&mut self, seat: Seat) {
        for (i, s) in self.seats.iter_mut().enumerate() {
            if i != seat {
                s.close_ippatsu();
            }
        }
    }

    pub(crate) fn draw_from_wall(&mut self) {
        self.wall_remaining -= 1;
        if self.wall_remaining <= 0 {
            self.wall_exhausted = true;
        }
    }
}

/// Replays one log, round by round.
///
/// Game-scoped settings (the red-five flag) survive [`reset`]; everything
/// else is replaced at each round start.
///
/// [`reset`]: RoundStateMachine::reset
#[derive(Debug, Clone)]
pub struct RoundStateMachine {
    pub rule: ReplayRule,
    pub aka_enabled: bool,
    pub context: RoundContext,
    pub state: RoundState,
}

impl Default for RoundStateMachine {
    fn default() -> Self {
        Self::new(ReplayRule::default())
    }
}

impl RoundStateMachine {
    pub fn new(rule: ReplayRule) -> Self {
        Self {
            rule,
            aka_enabled: rule.default_aka_enabled,
            context: RoundContext::default(),
            state: RoundState::new(&rule),
        }
    }

    /// Discards all round state and installs `context`.
    pub fn reset(&mut self, context: RoundContext) {
        self.context = context;
        self.state = RoundState::new(&self.rule);
    }

    #[inline]
    pub fn context(&self) -> &RoundContext {
        &self.context
    }

    #[inline]
    pub fn state(&self) -> &RoundState {
        &self.state
    }
}
