use crate::BUS_CAPACITY;
use crate::ID;
use crate::Money;
use crate::Player;
use crate::ledger::Bet;
use crate::ledger::Deposit;
use crate::ledger::Record;
use crate::ledger::Void;
use tokio::sync::broadcast;

/// Something a client may want to redraw for.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Balance { player: ID<Player>, balance: Money },
    Bet(Bet),
    Deposit(Deposit),
    Void(Void),
    /// A late entry could not be voided; it stays applied until repaired.
    Diverged {
        player: ID<Player>,
        entry: uuid::Uuid,
        reason: String,
    },
}

impl Event {
    pub fn player(&self) -> ID<Player> {
        match self {
            Self::Balance { player, .. } => *player,
            Self::Bet(b) => b.player(),
            Self::Deposit(d) => d.player(),
            Self::Void(v) => v.player(),
            Self::Diverged { player, .. } => *player,
        }
    }
}

impl From<Record> for Event {
    fn from(record: Record) -> Self {
        match record {
            Record::Bet(b) => Self::Bet(b),
            Record::Deposit(d) => Self::Deposit(d),
            Record::Void(v) => Self::Void(v),
        }
    }
}

/// Fan-out of committed changes. Publishing never blocks, and slow
/// subscribers lag rather than hold anyone up.
#[derive(Debug, Clone)]
pub struct Bus(broadcast::Sender<Event>);

impl Default for Bus {
    fn default() -> Self {
        Self(broadcast::channel(BUS_CAPACITY).0)
    }
}

impl Bus {
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.0.subscribe()
    }
    pub fn publish(&self, event: Event) {
        if self.0.send(event).is_err() {
            log::trace!("no subscribers");
        }
    }
}
