use crate::*;
use crate::paytable::Payout;
use crate::reels::Outcome;
use std::time::SystemTime;

/// Persistent record of one play. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bet {
    id: ID<Self>,
    player: ID<Player>,
    game: GameId,
    amount: Money,
    outcome: Outcome,
    win: bool,
    winnings: Money,
    at: SystemTime,
}

impl Bet {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ID<Self>,
        player: ID<Player>,
        game: GameId,
        amount: Money,
        outcome: Outcome,
        win: bool,
        winnings: Money,
        at: SystemTime,
    ) -> Self {
        Self {
            id,
            player,
            game,
            amount,
            outcome,
            win,
            winnings,
            at,
        }
    }
    /// A fresh record for a play priced just now.
    pub fn place(
        player: ID<Player>,
        game: GameId,
        amount: Money,
        outcome: Outcome,
        payout: &Payout,
    ) -> Self {
        Self::new(
            ID::default(),
            player,
            game,
            amount,
            outcome,
            payout.is_win(),
            payout.winnings(),
            SystemTime::now(),
        )
    }
    pub fn player(&self) -> ID<Player> {
        self.player
    }
    pub fn game(&self) -> GameId {
        self.game
    }
    pub fn amount(&self) -> Money {
        self.amount
    }
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }
    pub fn win(&self) -> bool {
        self.win
    }
    pub fn winnings(&self) -> Money {
        self.winnings
    }
    pub fn at(&self) -> SystemTime {
        self.at
    }
    /// Net balance change (winnings less the wager).
    pub fn delta(&self) -> Money {
        self.winnings - self.amount
    }
}

impl Unique for Bet {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl std::fmt::Display for Bet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}  {:>10}  {:>+10}", self.outcome, self.amount, self.delta())
    }
}

/// How a deposit was funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Pse,
    BankTransfer,
}

impl From<Method> for i16 {
    fn from(m: Method) -> i16 {
        match m {
            Method::Pse => 0,
            Method::BankTransfer => 1,
        }
    }
}
impl TryFrom<i16> for Method {
    type Error = String;
    fn try_from(n: i16) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Method::Pse),
            1 => Ok(Method::BankTransfer),
            _ => Err(format!("invalid payment method code: {}", n)),
        }
    }
}

impl TryFrom<&str> for Method {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "pse" => Ok(Method::Pse),
            "bank" | "transfer" | "bank_transfer" => Ok(Method::BankTransfer),
            _ => Err(format!("invalid payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Method::Pse => write!(f, "PSE"),
            Method::BankTransfer => write!(f, "bank transfer"),
        }
    }
}

/// Persistent record of funds credited to a player.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Deposit {
    id: ID<Self>,
    player: ID<Player>,
    amount: Money,
    method: Method,
    at: SystemTime,
}

impl Deposit {
    pub fn new(id: ID<Self>, player: ID<Player>, amount: Money, method: Method, at: SystemTime) -> Self {
        Self {
            id,
            player,
            amount,
            method,
            at,
        }
    }
    /// A fresh deposit stamped now.
    pub fn request(player: ID<Player>, amount: Money, method: Method) -> Self {
        Self::new(ID::default(), player, amount, method, SystemTime::now())
    }
    pub fn player(&self) -> ID<Player> {
        self.player
    }
    pub fn amount(&self) -> Money {
        self.amount
    }
    pub fn method(&self) -> Method {
        self.method
    }
    pub fn at(&self) -> SystemTime {
        self.at
    }
}

impl Unique for Deposit {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl std::fmt::Display for Deposit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:>+10}  via {}", self.amount, self.method)
    }
}

/// Cancels an earlier entry whose commit landed after its deadline had
/// already been reported as a failure. The balance is restored alongside it.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Void {
    id: ID<Self>,
    player: ID<Player>,
    entry: uuid::Uuid,
    at: SystemTime,
}

impl Void {
    pub fn new(id: ID<Self>, player: ID<Player>, entry: uuid::Uuid, at: SystemTime) -> Self {
        Self {
            id,
            player,
            entry,
            at,
        }
    }
    pub fn cancel(player: ID<Player>, entry: uuid::Uuid) -> Self {
        Self::new(ID::default(), player, entry, SystemTime::now())
    }
    pub fn player(&self) -> ID<Player> {
        self.player
    }
    /// Id of the cancelled bet or deposit.
    pub fn entry(&self) -> uuid::Uuid {
        self.entry
    }
    pub fn at(&self) -> SystemTime {
        self.at
    }
}

impl Unique for Void {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

/// Anything appended to a player's history alongside a balance change.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    Bet(Bet),
    Deposit(Deposit),
    Void(Void),
}

impl Record {
    pub fn player(&self) -> ID<Player> {
        match self {
            Self::Bet(b) => b.player(),
            Self::Deposit(d) => d.player(),
            Self::Void(v) => v.player(),
        }
    }
    /// Id of the underlying entry.
    pub fn entry(&self) -> uuid::Uuid {
        match self {
            Self::Bet(b) => b.id().inner(),
            Self::Deposit(d) => d.id().inner(),
            Self::Void(v) => v.id().inner(),
        }
    }
}
