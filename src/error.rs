use crate::ID;
use crate::Money;
use crate::Player;
use crate::ledger::LedgerError;

/// Tagged failure of a play or deposit request.
///
/// `InvalidAmount` and `InsufficientFunds` are raised before anything is
/// drawn or written. `Persistence` means the settle step failed and no
/// partial write survived.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayError {
    InvalidAmount(String),
    InsufficientFunds { balance: Money, wager: Money },
    UnknownPlayer(ID<Player>),
    Persistence(LedgerError),
}

impl PlayError {
    /// True when the request was rejected before any state was touched.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}

impl std::fmt::Display for PlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAmount(s) => write!(f, "invalid amount: {}", s),
            Self::InsufficientFunds { balance, wager } => {
                write!(f, "insufficient funds: wager {} exceeds balance {}", wager, balance)
            }
            Self::UnknownPlayer(id) => write!(f, "unknown player: {}", id),
            Self::Persistence(e) => write!(f, "persistence failure: {}", e),
        }
    }
}

impl std::error::Error for PlayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persistence(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LedgerError> for PlayError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Unknown(id) => Self::UnknownPlayer(id),
            LedgerError::Overdraft { balance, wager } => Self::InsufficientFunds { balance, wager },
            e @ LedgerError::OutOfRange { .. } => Self::InvalidAmount(e.to_string()),
            e => Self::Persistence(e),
        }
    }
}

/// Construction-time misconfiguration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyAlphabet,
    EmptyPayTable,
    NegativeMultiplier(String),
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAlphabet => write!(f, "symbol alphabet is empty"),
            Self::EmptyPayTable => write!(f, "pay table has no rules"),
            Self::NegativeMultiplier(s) => write!(f, "negative multiplier: {}", s),
            Self::Invalid { key, value } => write!(f, "invalid {}: {}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}
