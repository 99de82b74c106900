use super::*;
use crate::ID;
use crate::Money;
use crate::Player;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::RwLock;

/// In-process ledger over two independent stores.
pub type Memory = Split<Vault, Journal>;

/// Consumes one scheduled fault, if any remain after the skip count.
fn trip(skip: &AtomicUsize, faults: &AtomicUsize) -> bool {
    if skip
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
    {
        return false;
    }
    faults
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

/// Balances held in a map. Writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct Vault {
    accounts: RwLock<HashMap<ID<Player>, Money>>,
    skip: AtomicUsize,
    faults: AtomicUsize,
}

impl Vault {
    /// Fail the next `n` writes.
    pub fn sabotage(&self, n: usize) {
        self.sabotage_after(0, n);
    }
    /// Let `skip` writes through, then fail the `n` after them.
    pub fn sabotage_after(&self, skip: usize, n: usize) {
        self.skip.store(skip, Ordering::SeqCst);
        self.faults.store(n, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl BalanceStore for Vault {
    async fn open(&self, player: ID<Player>, balance: Money) -> Result<(), LedgerError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&player) {
            return Err(LedgerError::Exists(player));
        }
        accounts.insert(player, balance);
        Ok(())
    }
    async fn read(&self, player: ID<Player>) -> Result<Money, LedgerError> {
        self.accounts
            .read()
            .await
            .get(&player)
            .copied()
            .ok_or(LedgerError::Unknown(player))
    }
    async fn write(&self, player: ID<Player>, balance: Money) -> Result<(), LedgerError> {
        if trip(&self.skip, &self.faults) {
            return Err(LedgerError::Backend(format!("vault rejected write for {}", player)));
        }
        match self.accounts.write().await.get_mut(&player) {
            Some(slot) => {
                *slot = balance;
                Ok(())
            }
            None => Err(LedgerError::Unknown(player)),
        }
    }
}

/// Records held in an in-memory list, oldest first. Appends can be made
/// to fail or to lag on demand.
#[derive(Debug, Default)]
pub struct Journal {
    records: RwLock<Vec<Record>>,
    skip: AtomicUsize,
    faults: AtomicUsize,
    lag: AtomicU64,
}

impl Journal {
    /// Fail the next `n` appends.
    pub fn sabotage(&self, n: usize) {
        self.skip.store(0, Ordering::SeqCst);
        self.faults.store(n, Ordering::SeqCst);
    }
    /// Delay every append by `lag`.
    pub fn stall(&self, lag: Duration) {
        self.lag.store(lag.as_millis() as u64, Ordering::SeqCst);
    }
    fn voided(records: &[Record]) -> HashSet<uuid::Uuid> {
        records
            .iter()
            .filter_map(|r| match r {
                Record::Void(v) => Some(v.entry()),
                _ => None,
            })
            .collect()
    }
    /// Snapshot of everything appended so far.
    pub async fn records(&self) -> Vec<Record> {
        self.records.read().await.clone()
    }
}

#[async_trait::async_trait]
impl HistoryStore for Journal {
    async fn append(&self, record: &Record) -> Result<(), LedgerError> {
        let lag = self.lag.load(Ordering::SeqCst);
        if lag > 0 {
            tokio::time::sleep(Duration::from_millis(lag)).await;
        }
        if trip(&self.skip, &self.faults) {
            return Err(LedgerError::Backend(format!("journal rejected {}", record.entry())));
        }
        self.records.write().await.push(record.clone());
        Ok(())
    }
    async fn bets(&self, player: ID<Player>, window: Window) -> Result<Vec<Bet>, LedgerError> {
        let records = self.records.read().await;
        let voided = Self::voided(&records);
        Ok(records
            .iter()
            .rev()
            .filter_map(|r| match r {
                Record::Bet(b) if b.player() == player && !voided.contains(&r.entry()) => Some(b.clone()),
                _ => None,
            })
            .filter(|b| window.contains(b.at()))
            .take(window.limit())
            .collect())
    }
    async fn deposits(&self, player: ID<Player>, window: Window) -> Result<Vec<Deposit>, LedgerError> {
        let records = self.records.read().await;
        let voided = Self::voided(&records);
        Ok(records
            .iter()
            .rev()
            .filter_map(|r| match r {
                Record::Deposit(d) if d.player() == player && !voided.contains(&r.entry()) => Some(d.clone()),
                _ => None,
            })
            .filter(|d| window.contains(d.at()))
            .take(window.limit())
            .collect())
    }
}
