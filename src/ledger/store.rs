use super::*;
use crate::ID;
use crate::Money;
use crate::HISTORY_LIMIT;
use crate::Player;
use std::time::SystemTime;

/// Slice of a player's history: newest first, at most `limit` entries,
/// optionally bounded to `[since, until)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    limit: usize,
    since: Option<SystemTime>,
    until: Option<SystemTime>,
}

impl Window {
    pub fn recent(limit: usize) -> Self {
        Self {
            limit,
            since: None,
            until: None,
        }
    }
    /// Keep entries made at or after `at`.
    pub fn after(mut self, at: SystemTime) -> Self {
        self.since = Some(at);
        self
    }
    /// Keep entries made strictly before `at`.
    pub fn before(mut self, at: SystemTime) -> Self {
        self.until = Some(at);
        self
    }
    pub fn limit(&self) -> usize {
        self.limit
    }
    pub fn since(&self) -> Option<SystemTime> {
        self.since
    }
    pub fn until(&self) -> Option<SystemTime> {
        self.until
    }
    pub fn contains(&self, at: SystemTime) -> bool {
        self.since.is_none_or(|since| at >= since) && self.until.is_none_or(|until| at < until)
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::recent(HISTORY_LIMIT)
    }
}

/// Authoritative balance per player.
#[async_trait::async_trait]
pub trait BalanceStore: Send + Sync + 'static {
    async fn open(&self, player: ID<Player>, balance: Money) -> Result<(), LedgerError>;
    async fn read(&self, player: ID<Player>) -> Result<Money, LedgerError>;
    async fn write(&self, player: ID<Player>, balance: Money) -> Result<(), LedgerError>;
}

/// Append-only history of bets, deposits, and voids.
#[async_trait::async_trait]
pub trait HistoryStore: Send + Sync + 'static {
    async fn append(&self, record: &Record) -> Result<(), LedgerError>;
    /// Most recent bets first.
    async fn bets(&self, player: ID<Player>, window: Window) -> Result<Vec<Bet>, LedgerError>;
    /// Most recent deposits first.
    async fn deposits(&self, player: ID<Player>, window: Window) -> Result<Vec<Deposit>, LedgerError>;
}

/// Balance and history behind one atomic write.
///
/// `commit` sets the player's balance and appends the record as a single
/// unit: when it returns `Err`, neither change is visible. Implementations
/// backed by a transactional database do this natively; [`Split`] provides
/// it over two independent stores by compensation.
#[async_trait::async_trait]
pub trait Ledger: Send + Sync + 'static {
    async fn open(&self, player: ID<Player>, balance: Money) -> Result<(), LedgerError>;
    async fn read(&self, player: ID<Player>) -> Result<Money, LedgerError>;
    async fn commit(&self, player: ID<Player>, balance: Money, record: &Record) -> Result<(), LedgerError>;
    async fn bets(&self, player: ID<Player>, window: Window) -> Result<Vec<Bet>, LedgerError>;
    async fn deposits(&self, player: ID<Player>, window: Window) -> Result<Vec<Deposit>, LedgerError>;
}
