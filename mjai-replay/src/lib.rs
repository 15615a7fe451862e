pub mod errors;
pub mod event;
pub mod meld;
pub mod mjai;
pub mod rule;
pub mod state;
pub mod tile;
pub mod win;

pub use errors::{ReplayError, ReplayResult};
pub use event::{Event, NUM_SEATS, RoundContext, Seat, StartingHand, Wind};
pub use meld::{Meld, MeldKind, MeldLedger};
pub use mjai::{MjaiEvent, decode_line};
pub use rule::ReplayRule;
pub use state::{RoundEventHandler, RoundState, RoundStateMachine, SeatState};
pub use tile::{Suit, Tile};
pub use win::{Invalidity, WinConditions, WinRecord};
