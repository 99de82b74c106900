use crate::Multiplier;
use crate::reels::*;

/// Shape of outcome a pay rule recognises.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Three identical symbols.
    Triple,
    /// Reels 0–1 or reels 1–2 match.
    Pair,
    /// Three of one specific symbol.
    Three(Symbol),
    /// Matches every outcome.
    Any,
}

impl Pattern {
    pub fn matches(&self, outcome: &Outcome) -> bool {
        match self {
            Self::Triple => outcome.is_triple(),
            Self::Pair => outcome.is_adjacent_pair(),
            Self::Three(s) => outcome.symbols() == [*s; 3],
            Self::Any => true,
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Triple => write!(f, "triple"),
            Self::Pair => write!(f, "pair"),
            Self::Three(s) => write!(f, "three {}", s),
            Self::Any => write!(f, "any"),
        }
    }
}

/// One line of a pay table: a pattern and what it pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PayRule {
    pattern: Pattern,
    multiplier: Multiplier,
}

impl PayRule {
    pub fn new(pattern: Pattern, multiplier: Multiplier) -> Self {
        Self {
            pattern,
            multiplier,
        }
    }
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }
    pub fn multiplier(&self) -> Multiplier {
        self.multiplier
    }
    pub fn matches(&self, outcome: &Outcome) -> bool {
        self.pattern.matches(outcome)
    }
}

impl std::fmt::Display for PayRule {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:<14}x{}", self.pattern.to_string(), self.multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    #[test]
    fn three_of_a_specific_symbol() {
        let rule = Pattern::Three(Diamond);
        assert!(rule.matches(&Outcome::from((Diamond, Diamond, Diamond))));
        assert!(!rule.matches(&Outcome::from((Seven, Seven, Seven))));
    }

    #[test]
    fn pair_ignores_outer_reels() {
        assert!(Pattern::Pair.matches(&Outcome::from((Grape, Grape, Bell))));
        assert!(Pattern::Pair.matches(&Outcome::from((Bell, Grape, Grape))));
        assert!(!Pattern::Pair.matches(&Outcome::from((Grape, Bell, Grape))));
    }
}
