use super::*;
use crate::CURRENCY_SCALE;
use crate::ConfigError;
use crate::Money;
use crate::Multiplier;
use crate::NOTHING_MULTIPLIER;
use crate::PAIR_MULTIPLIER;
use crate::TRIPLE_MULTIPLIER;
use crate::reels::Outcome;
use rust_decimal::RoundingStrategy;

/// Ordered pay rules. The first rule matching an outcome decides its price.
///
/// Stronger patterns must precede weaker ones they overlap with: a triple is
/// also an adjacent pair, so listing `Pair` first would shadow `Triple`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PayTable(Vec<PayRule>);

impl PayTable {
    pub fn new(rules: Vec<PayRule>) -> Result<Self, ConfigError> {
        if rules.is_empty() {
            return Err(ConfigError::EmptyPayTable);
        }
        if let Some(rule) = rules.iter().find(|r| r.multiplier() < Multiplier::ZERO) {
            return Err(ConfigError::NegativeMultiplier(rule.to_string()));
        }
        Ok(Self(rules))
    }
    pub fn rules(&self) -> &[PayRule] {
        &self.0
    }
    /// First matching rule, or `None` if the table has no catch-all.
    pub fn lookup(&self, outcome: &Outcome) -> Option<&PayRule> {
        self.0.iter().find(|rule| rule.matches(outcome))
    }
    /// Multiplier for an outcome. Zero when nothing matches.
    pub fn multiplier(&self, outcome: &Outcome) -> Multiplier {
        self.lookup(outcome)
            .map(PayRule::multiplier)
            .unwrap_or(Multiplier::ZERO)
    }
    /// Prices an outcome at a wager.
    ///
    /// Winnings are truncated to whole cents; with integral multipliers and
    /// cent-precise wagers no truncation ever happens. A product too large
    /// for a decimal saturates at `Money::MAX`, which settlement refuses.
    pub fn evaluate(&self, outcome: &Outcome, wager: Money) -> Payout {
        let rule = self.lookup(outcome);
        let multiplier = rule.map(PayRule::multiplier).unwrap_or(Multiplier::ZERO);
        let winnings = wager
            .checked_mul(multiplier)
            .unwrap_or(Money::MAX)
            .round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::ToZero);
        Payout::new(rule.map(PayRule::pattern), multiplier, winnings)
    }
}

/// Three-of-a-kind pays 3x, an adjacent pair pays 2x, anything else pays nothing.
impl Default for PayTable {
    fn default() -> Self {
        Self(vec![
            PayRule::new(Pattern::Triple, TRIPLE_MULTIPLIER),
            PayRule::new(Pattern::Pair, PAIR_MULTIPLIER),
            PayRule::new(Pattern::Any, NOTHING_MULTIPLIER),
        ])
    }
}

impl std::fmt::Display for PayTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0
            .iter()
            .enumerate()
            .try_for_each(|(i, rule)| writeln!(f, "{:>2}. {}", i + 1, rule))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arbitrary;
    use crate::reels::Symbol;
    use crate::reels::Symbol::*;
    use rust_decimal_macros::dec;

    #[test]
    fn every_triple_pays_three_times() {
        let table = PayTable::default();
        for s in Symbol::all() {
            let payout = table.evaluate(&Outcome::from((s, s, s)), dec!(10.00));
            assert_eq!(payout.winnings(), dec!(30.00));
            assert_eq!(payout.rule(), Some(Pattern::Triple));
            assert!(payout.is_win());
        }
    }

    #[test]
    fn leading_pair_pays_twice() {
        let table = PayTable::default();
        for a in Symbol::all() {
            for c in Symbol::all().into_iter().filter(|c| *c != a) {
                let payout = table.evaluate(&Outcome::from((a, a, c)), dec!(2.50));
                assert_eq!(payout.winnings(), dec!(5.00));
                assert!(payout.is_win());
            }
        }
    }

    #[test]
    fn trailing_pair_pays_twice() {
        let table = PayTable::default();
        for a in Symbol::all() {
            for b in Symbol::all().into_iter().filter(|b| *b != a) {
                let payout = table.evaluate(&Outcome::from((a, b, b)), dec!(2.50));
                assert_eq!(payout.winnings(), dec!(5.00));
            }
        }
    }

    #[test]
    fn split_pair_pays_nothing() {
        let table = PayTable::default();
        for a in Symbol::all() {
            for b in Symbol::all().into_iter().filter(|b| *b != a) {
                let payout = table.evaluate(&Outcome::from((a, b, a)), dec!(10.00));
                assert_eq!(payout.winnings(), dec!(0));
                assert!(!payout.is_win());
            }
        }
    }

    #[test]
    fn no_match_pays_nothing() {
        let payout = PayTable::default().evaluate(&Outcome::from((Cherry, Lemon, Orange)), dec!(10.00));
        assert_eq!(payout.multiplier(), dec!(0));
        assert_eq!(payout.winnings(), dec!(0.00));
        assert!(!payout.is_win());
    }

    #[test]
    fn first_match_wins() {
        let shadowed = PayTable::new(vec![
            PayRule::new(Pattern::Pair, dec!(2)),
            PayRule::new(Pattern::Triple, dec!(3)),
        ])
        .unwrap();
        let triple = Outcome::from((Seven, Seven, Seven));
        assert_eq!(shadowed.multiplier(&triple), dec!(2));
        assert_eq!(PayTable::default().multiplier(&triple), dec!(3));
    }

    #[test]
    fn specific_symbol_rule_outranks_generic_triple() {
        let table = PayTable::new(vec![
            PayRule::new(Pattern::Three(Seven), dec!(10)),
            PayRule::new(Pattern::Triple, dec!(3)),
        ])
        .unwrap();
        assert_eq!(table.multiplier(&Outcome::from((Seven, Seven, Seven))), dec!(10));
        assert_eq!(table.multiplier(&Outcome::from((Bell, Bell, Bell))), dec!(3));
        assert_eq!(table.multiplier(&Outcome::from((Bell, Bell, Seven))), dec!(0));
    }

    #[test]
    fn rejects_degenerate_tables() {
        assert_eq!(PayTable::new(vec![]), Err(ConfigError::EmptyPayTable));
        assert!(matches!(
            PayTable::new(vec![PayRule::new(Pattern::Any, dec!(-1))]),
            Err(ConfigError::NegativeMultiplier(_))
        ));
    }

    #[test]
    fn fractional_multipliers_truncate_to_cents() {
        let table = PayTable::new(vec![PayRule::new(Pattern::Any, dec!(1.5))]).unwrap();
        let payout = table.evaluate(&Outcome::random(), dec!(0.01));
        assert_eq!(payout.winnings(), dec!(0.01));
    }

    #[test]
    fn repeated_play_stays_exact() {
        let table = PayTable::default();
        let pair = Outcome::from((Lemon, Lemon, Grape));
        let total = (0..1000)
            .map(|_| table.evaluate(&pair, dec!(0.10)).winnings())
            .sum::<Money>();
        assert_eq!(total, dec!(200.00));
    }

    #[test]
    fn oversized_products_saturate() {
        let table = PayTable::new(vec![PayRule::new(Pattern::Any, Multiplier::MAX)]).unwrap();
        let payout = table.evaluate(&Outcome::random(), crate::MAX_AMOUNT);
        assert_eq!(payout.winnings(), Money::MAX);
    }
}
