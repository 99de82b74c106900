use crate::Arbitrary;

/// Reel symbol.
///
/// The pay table only ever compares symbols for equality; the declaration
/// order is used for the compact integer encoding and nothing else.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Cherry = 0,
    Lemon = 1,
    Orange = 2,
    Grape = 3,
    Bell = 4,
    Diamond = 5,
    Seven = 6,
}

impl Symbol {
    /// Number of symbols on a standard reel.
    pub const COUNT: usize = 7;
    /// All seven symbols in encoding order.
    pub const fn all() -> [Symbol; Self::COUNT] {
        [
            Symbol::Cherry,
            Symbol::Lemon,
            Symbol::Orange,
            Symbol::Grape,
            Symbol::Bell,
            Symbol::Diamond,
            Symbol::Seven,
        ]
    }
    /// Emoji glyph for terminal display.
    pub fn glyph(&self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Orange => "🍊",
            Symbol::Grape => "🍇",
            Symbol::Bell => "🔔",
            Symbol::Diamond => "💎",
            Symbol::Seven => "7️⃣",
        }
    }
}

impl Arbitrary for Symbol {
    fn random() -> Self {
        Self::from(rand::random_range(0..Self::COUNT as u8))
    }
}

/// u8 isomorphism
impl From<u8> for Symbol {
    fn from(n: u8) -> Symbol {
        match n {
            0 => Symbol::Cherry,
            1 => Symbol::Lemon,
            2 => Symbol::Orange,
            3 => Symbol::Grape,
            4 => Symbol::Bell,
            5 => Symbol::Diamond,
            6 => Symbol::Seven,
            _ => unreachable!("invalid symbol"),
        }
    }
}
impl From<Symbol> for u8 {
    fn from(s: Symbol) -> u8 {
        s as u8
    }
}

/// str isomorphism
impl TryFrom<&str> for Symbol {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "cherry" | "🍒" => Ok(Symbol::Cherry),
            "lemon" | "🍋" => Ok(Symbol::Lemon),
            "orange" | "🍊" => Ok(Symbol::Orange),
            "grape" | "🍇" => Ok(Symbol::Grape),
            "bell" | "🔔" => Ok(Symbol::Bell),
            "diamond" | "💎" => Ok(Symbol::Diamond),
            "seven" | "7" | "7️⃣" => Ok(Symbol::Seven),
            _ => Err(format!("invalid symbol str: {}", s)),
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Symbol::Cherry => write!(f, "cherry"),
            Symbol::Lemon => write!(f, "lemon"),
            Symbol::Orange => write!(f, "orange"),
            Symbol::Grape => write!(f, "grape"),
            Symbol::Bell => write!(f, "bell"),
            Symbol::Diamond => write!(f, "diamond"),
            Symbol::Seven => write!(f, "seven"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_u8() {
        for symbol in Symbol::all() {
            assert_eq!(symbol, Symbol::from(u8::from(symbol)));
        }
    }

    #[test]
    fn parses_names_and_glyphs() {
        for symbol in Symbol::all() {
            assert_eq!(Symbol::try_from(symbol.to_string().as_str()), Ok(symbol));
            assert_eq!(Symbol::try_from(symbol.glyph()), Ok(symbol));
        }
        assert!(Symbol::try_from("banana").is_err());
    }

    #[test]
    fn random_symbols_stay_in_alphabet() {
        for _ in 0..256 {
            assert!(Symbol::all().contains(&Symbol::random()));
        }
    }
}
