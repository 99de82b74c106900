//! Durable balances and play history.
//!
//! ## Records
//!
//! - [`Bet`] — one priced play
//! - [`Deposit`] — funds credited to a player
//! - [`Void`] — cancels an entry whose commit missed its deadline
//!
//! ## Stores
//!
//! - [`Ledger`] — balance plus history behind one atomic commit
//! - [`Split`] — a [`Ledger`] over a [`BalanceStore`] and a [`HistoryStore`]
//! - [`Memory`] — in-process [`Split`] over [`Vault`] and [`Journal`]
//! - `postgres` — single-statement commits against PostgreSQL
//!
//! ## Settlement
//!
//! - [`Cashier`] — per-player locking and deadline-bounded commits
//! - [`Hold`] — a locked balance awaiting its settle
mod cashier;
mod error;
mod memory;
mod record;
mod split;
mod store;

#[cfg(feature = "database")]
pub mod postgres;

pub use cashier::*;
pub use error::*;
pub use memory::*;
pub use record::*;
pub use split::*;
pub use store::*;
