use super::*;
use crate::ID;
use crate::Money;
use crate::Player;
use crate::SETTLE_BACKOFF;
use crate::SETTLE_RETRIES;

/// A [`Ledger`] over physically separate balance and history stores.
///
/// `commit` writes the balance first, then appends the record, retrying the
/// append with linear backoff. If the append still fails, the previous
/// balance is written back before the error is returned. The caller must
/// hold the player's lock so the previous balance cannot move underneath.
#[derive(Debug)]
pub struct Split<B, H> {
    balances: B,
    history: H,
    retries: usize,
}

impl<B, H> Split<B, H> {
    pub fn new(balances: B, history: H) -> Self {
        Self {
            balances,
            history,
            retries: SETTLE_RETRIES,
        }
    }
    /// Extra append attempts before compensating.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }
    pub fn balances(&self) -> &B {
        &self.balances
    }
    pub fn history(&self) -> &H {
        &self.history
    }
}

impl<B, H> Default for Split<B, H>
where
    B: Default,
    H: Default,
{
    fn default() -> Self {
        Self::new(B::default(), H::default())
    }
}

impl<B, H> Split<B, H>
where
    B: BalanceStore,
    H: HistoryStore,
{
    async fn append(&self, record: &Record) -> Result<(), LedgerError> {
        let mut attempt = 0;
        loop {
            match self.history.append(record).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    log::warn!("append {} failed (attempt {}): {}", record.entry(), attempt, e);
                    tokio::time::sleep(SETTLE_BACKOFF * attempt as u32).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait::async_trait]
impl<B, H> Ledger for Split<B, H>
where
    B: BalanceStore,
    H: HistoryStore,
{
    async fn open(&self, player: ID<Player>, balance: Money) -> Result<(), LedgerError> {
        self.balances.open(player, balance).await
    }
    async fn read(&self, player: ID<Player>) -> Result<Money, LedgerError> {
        self.balances.read(player).await
    }
    async fn commit(&self, player: ID<Player>, balance: Money, record: &Record) -> Result<(), LedgerError> {
        let previous = self.balances.read(player).await?;
        self.balances.write(player, balance).await?;
        match self.append(record).await {
            Ok(()) => Ok(()),
            Err(e) => match self.balances.write(player, previous).await {
                Ok(()) => {
                    log::error!("append {} failed, restored balance {} for {}", record.entry(), previous, player);
                    Err(e)
                }
                Err(undo) => {
                    log::error!("append {} failed and restore failed for {}: {}", record.entry(), player, undo);
                    Err(LedgerError::Diverged(format!(
                        "balance of {} left at {} without record {} (append: {}; restore: {})",
                        player,
                        balance,
                        record.entry(),
                        e,
                        undo
                    )))
                }
            },
        }
    }
    async fn bets(&self, player: ID<Player>, window: Window) -> Result<Vec<Bet>, LedgerError> {
        self.history.bets(player, window).await
    }
    async fn deposits(&self, player: ID<Player>, window: Window) -> Result<Vec<Deposit>, LedgerError> {
        self.history.deposits(player, window).await
    }
}
