use super::*;
use crate::Config;
use crate::ID;
use crate::Money;
use crate::PlayError;
use crate::Player;
use crate::ledger::Bet;
use crate::ledger::Cashier;
use crate::ledger::Deposit;
use crate::ledger::Ledger;
use crate::ledger::Method;
use crate::ledger::Window;
use crate::paytable::PayTable;
use crate::reels::Outcome;
use crate::reels::Reels;
use crate::reels::Source;
use crate::session::Bus;
use crate::session::Event;
use crate::session::Session;
use crate::wager::Game;
use crate::wager::precise;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::broadcast;

/// The payout engine: validates, draws, prices, and settles plays.
///
/// Any number of callers may share one machine. Plays for the same player
/// run one at a time, from the balance check through the commit; plays for
/// different players never wait on each other.
pub struct Machine<L, S = Reels> {
    game: Game,
    table: PayTable,
    reels: Mutex<S>,
    cashier: Cashier<L>,
    session: Session<L>,
    bus: Bus,
}

impl<L, S> Machine<L, S>
where
    L: Ledger,
    S: Source,
{
    pub fn new(ledger: Arc<L>, reels: S, config: &Config) -> Self {
        let bus = Bus::default();
        let session = Session::new(ledger.clone());
        Self {
            game: Game::slots(),
            table: PayTable::default(),
            reels: Mutex::new(reels),
            cashier: Cashier::new(ledger, bus.clone(), config).with_balances(session.balances()),
            session,
            bus,
        }
    }
    pub fn with_table(mut self, table: PayTable) -> Self {
        self.table = table;
        self
    }
    pub fn with_game(mut self, game: Game) -> Self {
        self.game = game;
        self
    }
    pub fn game(&self) -> &Game {
        &self.game
    }
    pub fn table(&self) -> &PayTable {
        &self.table
    }

    /// One play: wager in, outcome and new balance out.
    ///
    /// Rejections (`InvalidAmount`, `InsufficientFunds`) happen before
    /// anything is drawn. A `Persistence` failure means the play did not
    /// happen: the balance and history are exactly as they were.
    pub async fn play(&self, player: ID<Player>, wager: Money) -> Result<Spin, PlayError> {
        log::debug!("{} {}", player, Phase::Validating);
        let wager = self.game.admit(wager)?;
        let hold = self.cashier.hold(player).await?;
        let wager = self.game.validate(wager, hold.balance())?;
        log::debug!("{} {}", player, Phase::Drawing);
        let outcome = self.spin();
        log::debug!("{} {} {}", player, Phase::Evaluating, outcome);
        let payout = self.table.evaluate(&outcome, wager);
        let bet = Bet::place(player, self.game.id(), wager, outcome, &payout);
        log::debug!("{} {}", player, Phase::Settling);
        let balance = match hold.settle(bet.clone()).await {
            Ok(balance) => balance,
            Err(e) => {
                log::warn!("play by {} failed to settle: {}", player, e);
                return Err(PlayError::from(e));
            }
        };
        log::debug!("{} {}", player, Phase::Idle);
        Ok(Spin::new(bet, payout, balance))
    }

    /// Credits funds through the same lock and commit path as a play.
    pub async fn deposit(&self, player: ID<Player>, amount: Money, method: Method) -> Result<Money, PlayError> {
        let amount = precise(amount)?;
        let balance = self
            .cashier
            .deposit(Deposit::request(player, amount, method))
            .await?;
        log::info!("{} deposited {} via {}", player, amount, method);
        Ok(balance)
    }

    pub async fn open(&self, player: ID<Player>, balance: Money) -> Result<Money, PlayError> {
        let balance = match balance.is_zero() {
            true => Money::ZERO,
            false => precise(balance)?,
        };
        self.cashier.open(player, balance).await?;
        Ok(balance)
    }
    pub async fn login(&self, player: ID<Player>) -> Result<Money, PlayError> {
        self.refresh(player).await
    }
    /// Rereads the authoritative balance, picking up changes made elsewhere.
    /// Reads under the player's lock so it cannot overwrite a newer commit.
    pub async fn refresh(&self, player: ID<Player>) -> Result<Money, PlayError> {
        Ok(self.cashier.refresh(player).await?)
    }
    /// The balance this session last saw, if the player is logged in.
    pub async fn balance(&self, player: ID<Player>) -> Option<Money> {
        self.session.balance(player).await
    }
    pub async fn logout(&self, player: ID<Player>) {
        self.session.forget(player).await;
    }
    /// Settled bets inside the window, newest first.
    pub async fn bets(&self, player: ID<Player>, window: Window) -> Result<Vec<Bet>, PlayError> {
        Ok(self.cashier.ledger().bets(player, window).await?)
    }
    pub async fn deposits(&self, player: ID<Player>, window: Window) -> Result<Vec<Deposit>, PlayError> {
        Ok(self.cashier.ledger().deposits(player, window).await?)
    }
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    fn spin(&self) -> Outcome {
        match self.reels.lock() {
            Ok(mut reels) => reels.spin(),
            Err(poisoned) => poisoned.into_inner().spin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Overdraft;
    use crate::ledger::LedgerError;
    use crate::ledger::Memory;
    use crate::ledger::Record;
    use crate::reels::Rigged;
    use crate::reels::Symbol::*;
    use rust_decimal_macros::dec;

    async fn machine(outcome: Outcome) -> (Machine<Memory, Rigged>, ID<Player>) {
        machine_with(vec![outcome], Config::default()).await
    }

    async fn machine_with(outcomes: Vec<Outcome>, config: Config) -> (Machine<Memory, Rigged>, ID<Player>) {
        let ledger = Arc::new(Memory::default());
        let machine = Machine::new(ledger, Rigged::new(outcomes).unwrap(), &config);
        let player = ID::default();
        machine.open(player, dec!(100.00)).await.unwrap();
        (machine, player)
    }

    #[tokio::test]
    async fn three_sevens_pay_triple() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        let spin = machine.play(player, dec!(10.00)).await.unwrap();
        assert!(spin.is_win());
        assert_eq!(spin.winnings(), dec!(30.00));
        assert_eq!(spin.balance(), dec!(120.00));
        assert_eq!(machine.refresh(player).await, Ok(dec!(120.00)));
    }

    #[tokio::test]
    async fn no_match_loses_wager() {
        let (machine, player) = machine(Outcome::from((Cherry, Lemon, Orange))).await;
        let spin = machine.play(player, dec!(10.00)).await.unwrap();
        assert!(!spin.is_win());
        assert_eq!(spin.winnings(), dec!(0.00));
        assert_eq!(spin.balance(), dec!(90.00));
        assert_eq!(machine.balance(player).await, Some(dec!(90.00)));
    }

    #[tokio::test]
    async fn split_pair_pays_nothing() {
        let (machine, player) = machine(Outcome::from((Bell, Grape, Bell))).await;
        let spin = machine.play(player, dec!(10.00)).await.unwrap();
        assert_eq!(spin.winnings(), Money::ZERO);
        assert_eq!(spin.balance(), dec!(90.00));
    }

    #[tokio::test]
    async fn wager_over_balance_is_rejected() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        for wager in [dec!(100.01), dec!(150), dec!(1000000)] {
            assert!(matches!(
                machine.play(player, wager).await,
                Err(PlayError::InsufficientFunds { .. })
            ));
        }
        assert_eq!(machine.refresh(player).await, Ok(dec!(100.00)));
        assert!(machine.bets(player, Window::recent(10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn wager_of_whole_balance_is_allowed() {
        let (machine, player) = machine(Outcome::from((Cherry, Lemon, Orange))).await;
        let spin = machine.play(player, dec!(100.00)).await.unwrap();
        assert_eq!(spin.balance(), Money::ZERO);
    }

    #[tokio::test]
    async fn non_positive_wagers_are_invalid() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        for wager in [dec!(0), dec!(-0.01), dec!(-10)] {
            assert!(matches!(
                machine.play(player, wager).await,
                Err(PlayError::InvalidAmount(_))
            ));
        }
        assert!(matches!(
            machine.play(player, dec!(1.005)).await,
            Err(PlayError::InvalidAmount(_))
        ));
        assert_eq!(machine.refresh(player).await, Ok(dec!(100.00)));
    }

    #[tokio::test]
    async fn unknown_player_is_reported() {
        let (machine, _) = machine(Outcome::from((Seven, Seven, Seven))).await;
        let stranger = ID::default();
        assert_eq!(
            machine.play(stranger, dec!(1.00)).await.map(|s| s.balance()),
            Err(PlayError::UnknownPlayer(stranger))
        );
    }

    #[tokio::test]
    async fn reads_are_stable_between_plays() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        let ledger = machine.cashier.ledger().clone();
        for _ in 0..5 {
            assert_eq!(ledger.read(player).await, Ok(dec!(100.00)));
        }
        machine.play(player, dec!(10.00)).await.unwrap();
        for _ in 0..5 {
            assert_eq!(ledger.read(player).await, Ok(dec!(120.00)));
        }
    }

    #[tokio::test]
    async fn history_failure_leaves_balance_untouched() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        let ledger = machine.cashier.ledger().clone();
        ledger.history().sabotage(crate::SETTLE_RETRIES + 1);
        let result = machine.play(player, dec!(10.00)).await;
        assert!(matches!(result, Err(PlayError::Persistence(LedgerError::Backend(_)))));
        assert_eq!(ledger.read(player).await, Ok(dec!(100.00)));
        assert!(ledger.history().records().await.is_empty());
        assert_eq!(machine.balance(player).await, Some(dec!(100.00)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_plays_cannot_overdraw() {
        for _ in 0..25 {
            let (machine, player) = machine(Outcome::from((Cherry, Lemon, Orange))).await;
            let machine = Arc::new(machine);
            let a = tokio::spawn({
                let machine = machine.clone();
                async move { machine.play(player, dec!(60.00)).await }
            });
            let b = tokio::spawn({
                let machine = machine.clone();
                async move { machine.play(player, dec!(60.00)).await }
            });
            let results = [a.await.unwrap(), b.await.unwrap()];
            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert_eq!(
                results
                    .iter()
                    .filter(|r| matches!(r, Err(PlayError::InsufficientFunds { .. })))
                    .count(),
                1
            );
            assert_eq!(machine.refresh(player).await, Ok(dec!(40.00)));
        }
    }

    #[tokio::test]
    async fn deposits_credit_and_notify() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        let mut rx = machine.subscribe();
        assert_eq!(
            machine.deposit(player, dec!(50.00), Method::BankTransfer).await,
            Ok(dec!(150.00))
        );
        assert!(matches!(rx.recv().await.unwrap(), Event::Deposit(_)));
        assert_eq!(
            rx.recv().await.unwrap(),
            Event::Balance {
                player,
                balance: dec!(150.00)
            }
        );
        assert!(matches!(
            machine.deposit(player, dec!(0), Method::Pse).await,
            Err(PlayError::InvalidAmount(_))
        ));
        assert_eq!(machine.deposits(player, Window::recent(10)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn plays_publish_bet_then_balance() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        let mut rx = machine.subscribe();
        let spin = machine.play(player, dec!(10.00)).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), Event::Bet(spin.bet().clone()));
        assert_eq!(
            rx.recv().await.unwrap(),
            Event::Balance {
                player,
                balance: dec!(120.00)
            }
        );
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let outcomes = vec![
            Outcome::from((Seven, Seven, Seven)),
            Outcome::from((Cherry, Lemon, Orange)),
        ];
        let (machine, player) = machine_with(outcomes, Config::default()).await;
        machine.play(player, dec!(1.00)).await.unwrap();
        machine.play(player, dec!(2.00)).await.unwrap();
        let bets = machine.bets(player, Window::recent(10)).await.unwrap();
        assert_eq!(bets.iter().map(Bet::amount).collect::<Vec<_>>(), vec![dec!(2.00), dec!(1.00)]);
        assert_eq!(bets[1].outcome(), Outcome::from((Seven, Seven, Seven)));
    }

    #[tokio::test]
    async fn closed_game_rejects_plays() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        let machine = machine.with_game(Game::new(2, "Slot Machine", dec!(0.01), false));
        assert!(matches!(
            machine.play(player, dec!(1.00)).await,
            Err(PlayError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn overdraft_policy_does_not_bypass_validation() {
        let config = Config {
            overdraft: Overdraft::Allow,
            ..Config::default()
        };
        let (machine, player) = machine_with(vec![Outcome::from((Cherry, Lemon, Orange))], config).await;
        assert!(matches!(
            machine.play(player, dec!(100.01)).await,
            Err(PlayError::InsufficientFunds { .. })
        ));
    }

    #[tokio::test]
    async fn late_settle_is_reported_and_undone() {
        let config = Config {
            timeout: std::time::Duration::from_millis(50),
            ..Config::default()
        };
        let (machine, player) = machine_with(vec![Outcome::from((Seven, Seven, Seven))], config).await;
        let ledger = machine.cashier.ledger().clone();
        ledger.history().stall(std::time::Duration::from_millis(150));
        assert!(matches!(
            machine.play(player, dec!(10.00)).await,
            Err(PlayError::Persistence(LedgerError::Timeout(_)))
        ));
        ledger.history().stall(std::time::Duration::ZERO);
        // the follow-up play queues behind the void
        let spin = machine.play(player, dec!(10.00)).await.unwrap();
        assert_eq!(spin.balance(), dec!(120.00));
        let records = ledger.history().records().await;
        assert!(matches!(records[1], Record::Void(_)));
        assert_eq!(machine.bets(player, Window::recent(10)).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn cached_balance_tracks_concurrent_deposits() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        let machine = Arc::new(machine);
        let ledger = machine.cashier.ledger().clone();
        for _ in 0..200 {
            let tasks = (0..8)
                .map(|_| {
                    let machine = machine.clone();
                    tokio::spawn(async move { machine.deposit(player, dec!(1.00), Method::Pse).await })
                })
                .collect::<Vec<_>>();
            for task in tasks {
                task.await.unwrap().unwrap();
            }
            assert_eq!(machine.balance(player).await, Some(ledger.read(player).await.unwrap()));
        }
        assert_eq!(machine.balance(player).await, Some(dec!(1700.00)));
    }

    #[tokio::test]
    async fn oversized_amounts_are_invalid() {
        let (machine, player) = machine(Outcome::from((Seven, Seven, Seven))).await;
        let huge = Money::from_str_exact("50000000000000000000000000000").unwrap();
        assert!(matches!(
            machine.deposit(player, huge, Method::Pse).await,
            Err(PlayError::InvalidAmount(_))
        ));
        assert!(matches!(
            machine.deposit(player, crate::MAX_AMOUNT, Method::Pse).await,
            Err(PlayError::InvalidAmount(_))
        ));
        assert!(matches!(
            machine.play(player, huge).await,
            Err(PlayError::InvalidAmount(_))
        ));
        assert_eq!(machine.refresh(player).await, Ok(dec!(100.00)));
        assert!(machine.deposits(player, Window::recent(10)).await.unwrap().is_empty());
    }
}
