use super::*;
use crate::Config;
use crate::ID;
use crate::MAX_AMOUNT;
use crate::Money;
use crate::Overdraft;
use crate::Player;
use crate::SETTLE_BACKOFF;
use crate::SETTLE_RETRIES;
use crate::session::Balances;
use crate::session::Bus;
use crate::session::Event;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::sync::OwnedMutexGuard;
use tokio::sync::RwLock;

const PENDING: u8 = 0;
const DONE: u8 = 1;
const ABANDONED: u8 = 2;

/// Serializes every balance-changing operation per player and drives each
/// commit to a single, deadline-bounded outcome.
pub struct Cashier<L> {
    ledger: Arc<L>,
    locks: RwLock<HashMap<ID<Player>, Arc<Mutex<()>>>>,
    bus: Bus,
    seen: Balances,
    overdraft: Overdraft,
    timeout: Duration,
}

impl<L> Cashier<L>
where
    L: Ledger,
{
    pub fn new(ledger: Arc<L>, bus: Bus, config: &Config) -> Self {
        Self {
            ledger,
            locks: RwLock::new(HashMap::new()),
            bus,
            seen: Balances::default(),
            overdraft: config.overdraft,
            timeout: config.timeout,
        }
    }
    /// Cache to update with every committed balance, while the lock is held.
    pub fn with_balances(mut self, seen: Balances) -> Self {
        self.seen = seen;
        self
    }
    pub fn ledger(&self) -> &Arc<L> {
        &self.ledger
    }

    /// The player's mutex. Adding a new player first drops every entry that
    /// no hold owns and no caller is waiting on, so the map stays as large
    /// as the set of players in flight.
    async fn lock(&self, player: ID<Player>) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.read().await.get(&player) {
            return lock.clone();
        }
        let mut locks = self.locks.write().await;
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(player).or_default().clone()
    }

    /// Takes the player's lock and reads their balance under it. Nothing else
    /// can change this player's balance until the hold is settled or dropped.
    pub async fn hold(&self, player: ID<Player>) -> Result<Hold<'_, L>, LedgerError> {
        let guard = self.lock(player).await.lock_owned().await;
        let balance = self.ledger.read(player).await?;
        Ok(Hold {
            cashier: self,
            guard,
            player,
            balance,
        })
    }
    pub async fn open(&self, player: ID<Player>, balance: Money) -> Result<(), LedgerError> {
        self.ledger.open(player, balance).await?;
        log::info!("opened account {} with {}", player, balance);
        self.seen.observe(player, balance).await;
        self.bus.publish(Event::Balance { player, balance });
        Ok(())
    }
    pub async fn balance(&self, player: ID<Player>) -> Result<Money, LedgerError> {
        self.ledger.read(player).await
    }
    /// Rereads the stored balance under the lock and caches it.
    pub async fn refresh(&self, player: ID<Player>) -> Result<Money, LedgerError> {
        let hold = self.hold(player).await?;
        self.seen.observe(player, hold.balance).await;
        Ok(hold.balance)
    }
    pub async fn settle(&self, bet: Bet) -> Result<Money, LedgerError> {
        self.hold(bet.player()).await?.settle(bet).await
    }
    pub async fn deposit(&self, deposit: Deposit) -> Result<Money, LedgerError> {
        self.hold(deposit.player()).await?.deposit(deposit).await
    }
}

/// Exclusive access to one player's balance, as read when the hold began.
pub struct Hold<'c, L> {
    cashier: &'c Cashier<L>,
    guard: OwnedMutexGuard<()>,
    player: ID<Player>,
    balance: Money,
}

impl<'c, L> Hold<'c, L>
where
    L: Ledger,
{
    pub fn player(&self) -> ID<Player> {
        self.player
    }
    pub fn balance(&self) -> Money {
        self.balance
    }
    /// Applies a priced bet: balance moves by winnings less the wager, and
    /// the bet is recorded with it.
    pub async fn settle(self, bet: Bet) -> Result<Money, LedgerError> {
        let next = self.shift(bet.delta())?;
        if !self.cashier.overdraft.permits(next) {
            return Err(LedgerError::Overdraft {
                balance: self.balance,
                wager: bet.amount(),
            });
        }
        self.commit(next, Record::Bet(bet)).await
    }
    pub async fn deposit(self, deposit: Deposit) -> Result<Money, LedgerError> {
        let next = self.shift(deposit.amount())?;
        self.commit(next, Record::Deposit(deposit)).await
    }

    /// The balance after `delta`, if it stays within [`MAX_AMOUNT`] either way.
    fn shift(&self, delta: Money) -> Result<Money, LedgerError> {
        self.balance
            .checked_add(delta)
            .filter(|next| next.abs() <= MAX_AMOUNT)
            .ok_or(LedgerError::OutOfRange {
                balance: self.balance,
                delta,
            })
    }

    /// Runs the commit on its own task, which owns the lock until it is
    /// finished. The caller waits up to the deadline. Whichever side flips
    /// the shared state first decides the outcome: if the caller gave up
    /// first, a commit that lands afterwards is voided before the lock is
    /// released.
    async fn commit(self, next: Money, record: Record) -> Result<Money, LedgerError> {
        let Hold {
            cashier,
            guard,
            player,
            balance,
        } = self;
        let timeout = cashier.timeout;
        let ledger = cashier.ledger.clone();
        let bus = cashier.bus.clone();
        let seen = cashier.seen.clone();
        let state = Arc::new(AtomicU8::new(PENDING));
        let claim = state.clone();
        let mut task = tokio::spawn(async move {
            let _guard = guard;
            ledger.commit(player, next, &record).await?;
            if claim
                .compare_exchange(PENDING, DONE, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                log::debug!("committed {} for {}, balance {}", record.entry(), player, next);
                seen.observe(player, next).await;
                bus.publish(Event::from(record));
                bus.publish(Event::Balance { player, balance: next });
                return Ok(next);
            }
            log::warn!("{} landed after its deadline, voiding", record.entry());
            let void = Void::cancel(player, record.entry());
            match revert(ledger.as_ref(), player, balance, &void).await {
                Ok(()) => {
                    seen.observe(player, balance).await;
                    bus.publish(Event::Void(void));
                    bus.publish(Event::Balance { player, balance });
                }
                Err(e) => {
                    log::error!("could not void {} for {}, balance stays {}: {}", record.entry(), player, next, e);
                    seen.observe(player, next).await;
                    bus.publish(Event::Diverged {
                        player,
                        entry: record.entry(),
                        reason: e.to_string(),
                    });
                }
            }
            Err::<Money, _>(LedgerError::Timeout(timeout))
        });
        match tokio::time::timeout(timeout, &mut task).await {
            Ok(joined) => joined.map_err(|e| LedgerError::Backend(e.to_string()))?,
            Err(_) => match state.compare_exchange(PENDING, ABANDONED, Ordering::SeqCst, Ordering::SeqCst) {
                Ok(_) => {
                    log::warn!("commit for {} exceeded {:?}", player, timeout);
                    Err(LedgerError::Timeout(timeout))
                }
                Err(_) => task.await.map_err(|e| LedgerError::Backend(e.to_string()))?,
            },
        }
    }
}

/// Commits a void, retrying with linear backoff.
async fn revert<L>(ledger: &L, player: ID<Player>, balance: Money, void: &Void) -> Result<(), LedgerError>
where
    L: Ledger,
{
    let record = Record::Void(void.clone());
    let mut attempt = 0;
    loop {
        match ledger.commit(player, balance, &record).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < SETTLE_RETRIES => {
                attempt += 1;
                log::warn!("void {} failed (attempt {}): {}", void.entry(), attempt, e);
                tokio::time::sleep(SETTLE_BACKOFF * attempt as u32).await;
            }
            Err(e) => return Err(e),
        }
    }
}
