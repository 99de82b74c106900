use crate::Money;
use crate::ledger::Bet;
use crate::paytable::Payout;
use crate::reels::Outcome;

/// What a successful play returns: the stored bet, how it was priced, and
/// the balance it left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Spin {
    bet: Bet,
    payout: Payout,
    balance: Money,
}

impl Spin {
    pub fn new(bet: Bet, payout: Payout, balance: Money) -> Self {
        Self {
            bet,
            payout,
            balance,
        }
    }
    pub fn bet(&self) -> &Bet {
        &self.bet
    }
    pub fn outcome(&self) -> Outcome {
        self.bet.outcome()
    }
    pub fn payout(&self) -> &Payout {
        &self.payout
    }
    pub fn winnings(&self) -> Money {
        self.payout.winnings()
    }
    pub fn is_win(&self) -> bool {
        self.payout.is_win()
    }
    pub fn balance(&self) -> Money {
        self.balance
    }
}

impl std::fmt::Display for Spin {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "[ {} ]  {}  balance {}", self.outcome(), self.payout, self.balance)
    }
}
