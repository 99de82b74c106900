//! Monetary input handling and wager validation.
//!
//! Everything here runs before a single symbol is drawn and never touches
//! stored state.
mod game;
mod validator;

pub use game::*;
pub use validator::*;
