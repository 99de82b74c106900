use crate::ID;
use crate::Money;
use crate::Player;
use std::time::Duration;

/// Failure inside the ledger: a store, the settle protocol, or policy.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// No account exists for this player.
    Unknown(ID<Player>),
    /// An account already exists for this player.
    Exists(ID<Player>),
    /// Settling would leave a negative balance under `Overdraft::Forbid`.
    Overdraft { balance: Money, wager: Money },
    /// The resulting balance would not fit the ledger's amount range.
    OutOfRange { balance: Money, delta: Money },
    /// The underlying store refused or failed an operation.
    Backend(String),
    /// The commit did not finish within the settle deadline.
    Timeout(Duration),
    /// A write succeeded, its companion failed, and the compensating write
    /// failed too. Balance and history disagree until repaired.
    Diverged(String),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown(id) => write!(f, "no account for player {}", id),
            Self::Exists(id) => write!(f, "account already open for player {}", id),
            Self::Overdraft { balance, wager } => {
                write!(f, "overdraft: balance {} cannot cover {}", balance, wager)
            }
            Self::OutOfRange { balance, delta } => {
                write!(f, "balance {} cannot move by {}", balance, delta)
            }
            Self::Backend(s) => write!(f, "store failure: {}", s),
            Self::Timeout(d) => write!(f, "commit timed out after {:?}", d),
            Self::Diverged(s) => write!(f, "ledger diverged: {}", s),
        }
    }
}

impl std::error::Error for LedgerError {}
