//! Ordered pay rules and outcome pricing.
//!
//! - [`Pattern`] / [`PayRule`] — What an outcome must look like, and what it pays
//! - [`PayTable`] — Ordered rules, first match wins
//! - [`Payout`] — Multiplier, winnings, and win flag for one spin
//! - [`Analysis`] — Exact RTP and hit frequency by exhaustive enumeration
mod analysis;
mod payout;
mod rule;
mod table;

pub use analysis::*;
pub use payout::*;
pub use rule::*;
pub use table::*;
