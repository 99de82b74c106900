use crate::ID;
use crate::Money;
use crate::Player;
use crate::ledger::Ledger;
use crate::ledger::LedgerError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared cache of last-seen balances. Clones see the same entries.
///
/// The cashier writes through a clone while it still holds the player's
/// lock, so entries land in commit order.
#[derive(Debug, Clone, Default)]
pub struct Balances(Arc<RwLock<HashMap<ID<Player>, Money>>>);

impl Balances {
    pub async fn observe(&self, player: ID<Player>, balance: Money) {
        self.0.write().await.insert(player, balance);
    }
    pub async fn get(&self, player: ID<Player>) -> Option<Money> {
        self.0.read().await.get(&player).copied()
    }
    pub async fn forget(&self, player: ID<Player>) {
        self.0.write().await.remove(&player);
    }
}

/// Last balance each logged-in player was shown.
///
/// Never authoritative. It is overwritten by every committed change the
/// machine makes, and [`Session::refresh`] rereads the store for changes
/// made elsewhere.
pub struct Session<L> {
    ledger: Arc<L>,
    known: Balances,
}

impl<L> Session<L>
where
    L: Ledger,
{
    pub fn new(ledger: Arc<L>) -> Self {
        Self {
            ledger,
            known: Balances::default(),
        }
    }
    /// Handle onto this session's cache, for writers outside the session.
    pub fn balances(&self) -> Balances {
        self.known.clone()
    }
    /// Starts tracking a player with their stored balance.
    pub async fn login(&self, player: ID<Player>) -> Result<Money, LedgerError> {
        self.refresh(player).await
    }
    /// Replaces the cached balance with the stored one.
    pub async fn refresh(&self, player: ID<Player>) -> Result<Money, LedgerError> {
        let balance = self.ledger.read(player).await?;
        self.observe(player, balance).await;
        Ok(balance)
    }
    pub async fn observe(&self, player: ID<Player>, balance: Money) {
        self.known.observe(player, balance).await;
    }
    pub async fn balance(&self, player: ID<Player>) -> Option<Money> {
        self.known.get(player).await
    }
    pub async fn forget(&self, player: ID<Player>) {
        self.known.forget(player).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Deposit;
    use crate::ledger::Memory;
    use crate::ledger::Method;
    use crate::ledger::Record;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn refresh_picks_up_outside_changes() {
        let ledger = Arc::new(Memory::default());
        let session = Session::new(ledger.clone());
        let player = ID::default();
        ledger.open(player, dec!(100.00)).await.unwrap();
        assert_eq!(session.login(player).await, Ok(dec!(100.00)));
        let deposit = Deposit::request(player, dec!(50.00), Method::BankTransfer);
        ledger
            .commit(player, dec!(150.00), &Record::Deposit(deposit))
            .await
            .unwrap();
        assert_eq!(session.balance(player).await, Some(dec!(100.00)));
        assert_eq!(session.refresh(player).await, Ok(dec!(150.00)));
        assert_eq!(session.balance(player).await, Some(dec!(150.00)));
    }

    #[tokio::test]
    async fn unknown_players_are_not_cached() {
        let session = Session::new(Arc::new(Memory::default()));
        let player = ID::default();
        assert_eq!(session.login(player).await, Err(LedgerError::Unknown(player)));
        assert_eq!(session.balance(player).await, None);
    }

    #[tokio::test]
    async fn forget_drops_the_entry() {
        let ledger = Arc::new(Memory::default());
        let session = Session::new(ledger.clone());
        let player = ID::default();
        ledger.open(player, dec!(1.00)).await.unwrap();
        session.login(player).await.unwrap();
        session.forget(player).await;
        assert_eq!(session.balance(player).await, None);
    }

    #[tokio::test]
    async fn handles_share_the_cache() {
        let session = Session::new(Arc::new(Memory::default()));
        let player = ID::default();
        session.balances().observe(player, dec!(7.00)).await;
        assert_eq!(session.balance(player).await, Some(dec!(7.00)));
    }
}
