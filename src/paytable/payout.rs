use super::*;
use crate::Money;
use crate::Multiplier;

/// Priced result of one outcome at one wager.
///
/// `winnings` is the gross amount credited back (zero on a loss); the net
/// balance change is `winnings - wager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Payout {
    rule: Option<Pattern>,
    multiplier: Multiplier,
    winnings: Money,
}

impl Payout {
    pub fn new(rule: Option<Pattern>, multiplier: Multiplier, winnings: Money) -> Self {
        Self {
            rule,
            multiplier,
            winnings,
        }
    }
    /// The pattern that paid, if any rule matched.
    pub fn rule(&self) -> Option<Pattern> {
        self.rule
    }
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }
    pub fn winnings(&self) -> Money {
        self.winnings
    }
    pub fn is_win(&self) -> bool {
        self.multiplier > Multiplier::ZERO
    }
}

impl std::fmt::Display for Payout {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.is_win(), self.rule) {
            (true, Some(Pattern::Triple | Pattern::Three(_))) => {
                write!(f, "JACKPOT! +{}", self.winnings)
            }
            (true, _) => write!(f, "win +{}", self.winnings),
            (false, _) => write!(f, "no win"),
        }
    }
}
