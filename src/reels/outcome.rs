use super::*;
use crate::Arbitrary;

/// The three symbols showing on the payline after one spin.
///
/// Position matters: reel 0 is leftmost. Outcomes are immutable once drawn.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Outcome([Symbol; 3]);

impl Outcome {
    /// Number of distinct outcomes over the standard alphabet.
    pub const COUNT: u16 = (Symbol::COUNT * Symbol::COUNT * Symbol::COUNT) as u16;

    pub fn symbols(&self) -> [Symbol; 3] {
        self.0
    }
    /// All three reels show the same symbol.
    pub fn is_triple(&self) -> bool {
        self.0[0] == self.0[1] && self.0[1] == self.0[2]
    }
    /// Some neighbouring reels match. Reels 0 and 2 are not neighbours.
    pub fn is_adjacent_pair(&self) -> bool {
        self.0[0] == self.0[1] || self.0[1] == self.0[2]
    }
    /// Every ordered triple over the given alphabet.
    pub fn exhaust(alphabet: &[Symbol]) -> impl Iterator<Item = Outcome> + '_ {
        alphabet.iter().flat_map(move |a| {
            alphabet.iter().flat_map(move |b| {
                alphabet
                    .iter()
                    .map(move |c| Outcome::from([*a, *b, *c]))
            })
        })
    }
}

impl From<[Symbol; 3]> for Outcome {
    fn from(symbols: [Symbol; 3]) -> Self {
        Self(symbols)
    }
}
impl From<(Symbol, Symbol, Symbol)> for Outcome {
    fn from((a, b, c): (Symbol, Symbol, Symbol)) -> Self {
        Self([a, b, c])
    }
}

/// u16 isomorphism: base-7 digits, reel 0 most significant.
impl From<Outcome> for u16 {
    fn from(outcome: Outcome) -> u16 {
        outcome
            .0
            .iter()
            .fold(0u16, |n, s| n * Symbol::COUNT as u16 + u8::from(*s) as u16)
    }
}
impl TryFrom<u16> for Outcome {
    type Error = String;
    fn try_from(n: u16) -> Result<Self, Self::Error> {
        if n >= Outcome::COUNT {
            return Err(format!("invalid outcome encoding: {}", n));
        }
        let base = Symbol::COUNT as u16;
        Ok(Outcome([
            Symbol::from((n / (base * base)) as u8),
            Symbol::from((n / base % base) as u8),
            Symbol::from((n % base) as u8),
        ]))
    }
}

/// str isomorphism: three symbols separated by whitespace or commas.
impl TryFrom<&str> for Outcome {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let symbols = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(Symbol::try_from)
            .collect::<Result<Vec<Symbol>, _>>()?;
        match symbols.as_slice() {
            [a, b, c] => Ok(Outcome([*a, *b, *c])),
            _ => Err(format!("expected 3 symbols, got {}: {}", symbols.len(), s)),
        }
    }
}

impl Arbitrary for Outcome {
    fn random() -> Self {
        Self([Symbol::random(), Symbol::random(), Symbol::random()])
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} {}", self.0[0].glyph(), self.0[1].glyph(), self.0[2].glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    #[test]
    fn bijective_u16() {
        for n in 0..Outcome::COUNT {
            assert_eq!(Ok(n), Outcome::try_from(n).map(u16::from));
        }
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        assert!(Outcome::try_from(Outcome::COUNT).is_err());
        assert!(Outcome::try_from(u16::MAX).is_err());
    }

    #[test]
    fn exhaust_covers_every_triple_once() {
        let all = Outcome::exhaust(&Symbol::all()).collect::<Vec<_>>();
        let unique = all.iter().copied().collect::<std::collections::HashSet<_>>();
        assert_eq!(all.len(), Outcome::COUNT as usize);
        assert_eq!(unique.len(), Outcome::COUNT as usize);
    }

    #[test]
    fn outer_reels_are_not_neighbours() {
        let outcome = Outcome::from((Bell, Grape, Bell));
        assert!(!outcome.is_adjacent_pair());
        assert!(!outcome.is_triple());
    }

    #[test]
    fn parses_from_str() {
        assert_eq!(
            Outcome::try_from("seven, seven, seven"),
            Ok(Outcome::from((Seven, Seven, Seven)))
        );
        assert_eq!(
            Outcome::try_from("🍒 🍋 🍊"),
            Ok(Outcome::from((Cherry, Lemon, Orange)))
        );
        assert!(Outcome::try_from("cherry lemon").is_err());
    }
}
