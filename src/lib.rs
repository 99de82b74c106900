//! Slot-machine payout engine.
//!
//! Accepts a wager, spins three reels, prices the outcome against an ordered
//! pay table, and settles the balance change together with the bet record as
//! one atomic unit.
//!
//! ## Pipeline
//!
//! - [`reels`] — Symbol alphabet, outcomes, and seedable symbol sources
//! - [`paytable`] — Ordered pay rules, payouts, and exact RTP analysis
//! - [`wager`] — Monetary parsing, game catalog, and wager validation
//! - [`ledger`] — Balance/history stores and the settlement coordinator
//! - [`session`] — Last-known balances and the balance-changed event bus
//! - [`machine`] — The caller-facing `play` surface
//!
//! ## Ambient
//!
//! - [`config`] — Environment-driven configuration
//! - [`error`] — Tagged play and configuration errors
//! - [`cli`] — Interactive terminal front-end (`server` feature)
#![allow(dead_code)]

pub mod config;
pub mod error;
pub mod ledger;
pub mod machine;
pub mod paytable;
pub mod reels;
pub mod session;
pub mod wager;

#[cfg(feature = "server")]
pub mod cli;

pub use config::*;
pub use error::*;

use rust_decimal_macros::dec;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Balances, wagers, and winnings. Exact decimal, never floating point.
pub type Money = rust_decimal::Decimal;
/// Pay-table multipliers applied to a wager.
pub type Multiplier = rust_decimal::Decimal;
/// Catalog identifier of a game.
pub type GameId = i16;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and Monte Carlo sampling.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

/// Marker for player identities. Balances and records are keyed by `ID<Player>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Player;

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

/// Fresh time-ordered (v7) identifier.
impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// MONETARY PARAMETERS
// ============================================================================
/// Fractional digits carried by every monetary amount (cents).
pub const CURRENCY_SCALE: u32 = 2;
/// Smallest wager the slot machine accepts.
pub const MIN_WAGER: Money = dec!(0.01);
/// Largest amount or balance representable in a `NUMERIC(14, 2)` column.
pub const MAX_AMOUNT: Money = dec!(999999999999.99);
/// Balance credited to accounts opened by the terminal front-end.
pub const OPENING_BALANCE: Money = dec!(100.00);

// ============================================================================
// PAY TABLE
// Three-of-a-kind beats an adjacent pair. Listed strongest first.
// ============================================================================
/// Multiplier for three identical symbols.
pub const TRIPLE_MULTIPLIER: Multiplier = dec!(3);
/// Multiplier for an adjacent pair (reels 0–1 or 1–2).
pub const PAIR_MULTIPLIER: Multiplier = dec!(2);
/// Multiplier when nothing matches.
pub const NOTHING_MULTIPLIER: Multiplier = dec!(0);

// ============================================================================
// GAME CATALOG
// ============================================================================
/// Catalog id of the three-reel slot machine.
pub const SLOT_GAME_ID: GameId = 2;
/// Display name of the three-reel slot machine.
pub const SLOT_GAME_NAME: &str = "Slot Machine";

// ============================================================================
// SETTLEMENT
// ============================================================================
/// Upper bound on a single persistence commit before it counts as failed.
pub const SETTLE_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
/// Extra attempts at the history append before the balance write is reverted.
pub const SETTLE_RETRIES: usize = 3;
/// Linear backoff step between history append attempts.
pub const SETTLE_BACKOFF: std::time::Duration = std::time::Duration::from_millis(25);
/// Buffered events per subscriber before slow subscribers start lagging.
pub const BUS_CAPACITY: usize = 256;
/// Default number of records returned by history queries.
pub const HISTORY_LIMIT: usize = 20;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, WARN to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Warn,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}
