//! Game core for a scratch-off lottery ticket.
//!
//! Pointer samples become erase strokes on per-surface alpha masks ([`ScratchEngine`]); cells
//! watch the masks they sit on ([`CellWatcher`]) and, once revealed, strike matching cards off
//! the rows ([`RowTracker`]). An emptied row wins its prize ([`PrizeTracker`]), which pays out
//! as soon as the prize cell itself has been scratched. [`Ticket`] wires all of it together and
//! is driven one frame at a time.

pub use card::*;
pub use cell::*;
pub use config::*;
pub use currency::*;
pub use deck::*;
pub use error::*;
pub use mask::*;
pub use payout::*;
pub use prize::*;
pub use progress::*;
pub use row::*;
pub use schedule::*;
pub use scratch::*;
pub use ticket::*;
pub use types::*;

mod card;
mod cell;
mod config;
mod currency;
mod deck;
mod error;
mod mask;
mod payout;
mod prize;
mod progress;
mod row;
mod schedule;
mod scratch;
mod ticket;
mod types;
