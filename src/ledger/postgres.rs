//! PostgreSQL-backed [`Ledger`]. Every commit is one statement, so balance
//! and history change together or not at all.
use super::*;
use crate::ID;
use crate::Money;
use crate::Player;
use crate::Unique;
use crate::reels::Outcome;
use std::sync::Arc;
use std::time::SystemTime;
use tokio_postgres::Client;

pub const ACCOUNTS: &str = "accounts";
pub const BETS: &str = "bets";
pub const DEPOSITS: &str = "deposits";
pub const VOIDS: &str = "voids";

/// Table metadata and DDL.
pub trait Schema {
    fn name() -> &'static str;
    fn creates() -> &'static str;
    fn indices() -> &'static str;
}

pub struct Accounts;
pub struct Bets;
pub struct Deposits;
pub struct Voids;

impl Schema for Accounts {
    fn name() -> &'static str {
        ACCOUNTS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            ACCOUNTS,
            " (
                player_id   UUID PRIMARY KEY,
                balance     NUMERIC(14, 2) NOT NULL
            );"
        )
    }
    fn indices() -> &'static str {
        ""
    }
}

impl Schema for Bets {
    fn name() -> &'static str {
        BETS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            BETS,
            " (
                id          UUID PRIMARY KEY,
                player_id   UUID NOT NULL REFERENCES ",
            ACCOUNTS,
            "(player_id),
                game_id     SMALLINT NOT NULL,
                amount      NUMERIC(14, 2) NOT NULL,
                outcome     SMALLINT NOT NULL,
                win         BOOLEAN NOT NULL,
                winnings    NUMERIC(14, 2) NOT NULL,
                placed_at   TIMESTAMPTZ NOT NULL
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_bets_player ON ",
            BETS,
            " (player_id, placed_at DESC);"
        )
    }
}

impl Schema for Deposits {
    fn name() -> &'static str {
        DEPOSITS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            DEPOSITS,
            " (
                id          UUID PRIMARY KEY,
                player_id   UUID NOT NULL REFERENCES ",
            ACCOUNTS,
            "(player_id),
                amount      NUMERIC(14, 2) NOT NULL,
                method      SMALLINT NOT NULL,
                created_at  TIMESTAMPTZ NOT NULL
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_deposits_player ON ",
            DEPOSITS,
            " (player_id, created_at DESC);"
        )
    }
}

impl Schema for Voids {
    fn name() -> &'static str {
        VOIDS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            VOIDS,
            " (
                id          UUID PRIMARY KEY,
                player_id   UUID NOT NULL REFERENCES ",
            ACCOUNTS,
            "(player_id),
                entry_id    UUID NOT NULL,
                created_at  TIMESTAMPTZ NOT NULL
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE INDEX IF NOT EXISTS idx_voids_entry ON ",
            VOIDS,
            " (entry_id);"
        )
    }
}

/// Connects to PostgreSQL and drives the connection on a background task.
pub async fn db(url: &str) -> Result<Arc<Client>, LedgerError> {
    log::info!("connecting to database");
    let tls = tokio_postgres::tls::NoTls;
    let (client, connection) = tokio_postgres::connect(url, tls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            log::error!("database connection closed: {}", e);
        }
    });
    client.execute("SET client_min_messages TO WARNING", &[]).await?;
    Ok(Arc::new(client))
}

/// Creates any missing tables and indices.
pub async fn migrate(client: &Client) -> Result<(), LedgerError> {
    for (name, creates, indices) in [
        (Accounts::name(), Accounts::creates(), Accounts::indices()),
        (Bets::name(), Bets::creates(), Bets::indices()),
        (Deposits::name(), Deposits::creates(), Deposits::indices()),
        (Voids::name(), Voids::creates(), Voids::indices()),
    ] {
        log::debug!("migrating {}", name);
        client.batch_execute(creates).await?;
        client.batch_execute(indices).await?;
    }
    Ok(())
}

impl From<tokio_postgres::Error> for LedgerError {
    fn from(e: tokio_postgres::Error) -> Self {
        LedgerError::Backend(e.to_string())
    }
}

const OPEN: &str = const_format::concatcp!(
    "INSERT INTO ",
    ACCOUNTS,
    " (player_id, balance) VALUES ($1, $2) ON CONFLICT (player_id) DO NOTHING"
);
const READ: &str = const_format::concatcp!("SELECT balance FROM ", ACCOUNTS, " WHERE player_id = $1");
const SETTLE_BET: &str = const_format::concatcp!(
    "WITH moved AS (UPDATE ",
    ACCOUNTS,
    " SET balance = $2 WHERE player_id = $1 RETURNING player_id) ",
    "INSERT INTO ",
    BETS,
    " (id, player_id, game_id, amount, outcome, win, winnings, placed_at) ",
    "SELECT $3, player_id, $4, $5, $6, $7, $8, $9 FROM moved"
);
const SETTLE_DEPOSIT: &str = const_format::concatcp!(
    "WITH moved AS (UPDATE ",
    ACCOUNTS,
    " SET balance = $2 WHERE player_id = $1 RETURNING player_id) ",
    "INSERT INTO ",
    DEPOSITS,
    " (id, player_id, amount, method, created_at) ",
    "SELECT $3, player_id, $4, $5, $6 FROM moved"
);
const SETTLE_VOID: &str = const_format::concatcp!(
    "WITH moved AS (UPDATE ",
    ACCOUNTS,
    " SET balance = $2 WHERE player_id = $1 RETURNING player_id) ",
    "INSERT INTO ",
    VOIDS,
    " (id, player_id, entry_id, created_at) ",
    "SELECT $3, player_id, $4, $5 FROM moved"
);
const RECENT_BETS: &str = const_format::concatcp!(
    "SELECT b.id, b.game_id, b.amount, b.outcome, b.win, b.winnings, b.placed_at FROM ",
    BETS,
    " b WHERE b.player_id = $1 AND NOT EXISTS (SELECT 1 FROM ",
    VOIDS,
    " v WHERE v.entry_id = b.id)",
    " AND ($3::timestamptz IS NULL OR b.placed_at >= $3)",
    " AND ($4::timestamptz IS NULL OR b.placed_at < $4)",
    " ORDER BY b.placed_at DESC LIMIT $2"
);
const RECENT_DEPOSITS: &str = const_format::concatcp!(
    "SELECT d.id, d.amount, d.method, d.created_at FROM ",
    DEPOSITS,
    " d WHERE d.player_id = $1 AND NOT EXISTS (SELECT 1 FROM ",
    VOIDS,
    " v WHERE v.entry_id = d.id)",
    " AND ($3::timestamptz IS NULL OR d.created_at >= $3)",
    " AND ($4::timestamptz IS NULL OR d.created_at < $4)",
    " ORDER BY d.created_at DESC LIMIT $2"
);

#[async_trait::async_trait]
impl Ledger for Arc<Client> {
    async fn open(&self, player: ID<Player>, balance: Money) -> Result<(), LedgerError> {
        match self.execute(OPEN, &[&player.inner(), &balance]).await? {
            0 => Err(LedgerError::Exists(player)),
            _ => Ok(()),
        }
    }
    async fn read(&self, player: ID<Player>) -> Result<Money, LedgerError> {
        self.query_opt(READ, &[&player.inner()])
            .await?
            .map(|row| row.get::<_, Money>(0))
            .ok_or(LedgerError::Unknown(player))
    }
    async fn commit(&self, player: ID<Player>, balance: Money, record: &Record) -> Result<(), LedgerError> {
        let ref id = player.inner();
        let rows = match record {
            Record::Bet(bet) => {
                self.execute(
                    SETTLE_BET,
                    &[
                        id,
                        &balance,
                        &bet.id().inner(),
                        &bet.game(),
                        &bet.amount(),
                        &(u16::from(bet.outcome()) as i16),
                        &bet.win(),
                        &bet.winnings(),
                        &bet.at(),
                    ],
                )
                .await?
            }
            Record::Deposit(deposit) => {
                self.execute(
                    SETTLE_DEPOSIT,
                    &[
                        id,
                        &balance,
                        &deposit.id().inner(),
                        &deposit.amount(),
                        &i16::from(deposit.method()),
                        &deposit.at(),
                    ],
                )
                .await?
            }
            Record::Void(void) => {
                self.execute(
                    SETTLE_VOID,
                    &[id, &balance, &void.id().inner(), &void.entry(), &void.at()],
                )
                .await?
            }
        };
        match rows {
            0 => Err(LedgerError::Unknown(player)),
            _ => Ok(()),
        }
    }
    async fn bets(&self, player: ID<Player>, window: Window) -> Result<Vec<Bet>, LedgerError> {
        let ref id = player.inner();
        let ref limit = window.limit() as i64;
        let ref since = window.since();
        let ref until = window.until();
        self.query(RECENT_BETS, &[id, limit, since, until])
            .await?
            .iter()
            .map(|row| -> Result<Bet, LedgerError> {
                Ok(Bet::new(
                    ID::from(row.get::<_, uuid::Uuid>(0)),
                    player,
                    row.get::<_, i16>(1),
                    row.get::<_, Money>(2),
                    outcome(row.get::<_, i16>(3))?,
                    row.get::<_, bool>(4),
                    row.get::<_, Money>(5),
                    row.get::<_, SystemTime>(6),
                ))
            })
            .collect()
    }
    async fn deposits(&self, player: ID<Player>, window: Window) -> Result<Vec<Deposit>, LedgerError> {
        let ref id = player.inner();
        let ref limit = window.limit() as i64;
        let ref since = window.since();
        let ref until = window.until();
        self.query(RECENT_DEPOSITS, &[id, limit, since, until])
            .await?
            .iter()
            .map(|row| -> Result<Deposit, LedgerError> {
                Ok(Deposit::new(
                    ID::from(row.get::<_, uuid::Uuid>(0)),
                    player,
                    row.get::<_, Money>(1),
                    method(row.get::<_, i16>(2))?,
                    row.get::<_, SystemTime>(3),
                ))
            })
            .collect()
    }
}

/// Decodes a stored outcome code, refusing rows outside the encoding.
fn outcome(code: i16) -> Result<Outcome, LedgerError> {
    u16::try_from(code)
        .map_err(|_| format!("invalid outcome encoding: {}", code))
        .and_then(Outcome::try_from)
        .map_err(LedgerError::Backend)
}

fn method(code: i16) -> Result<Method, LedgerError> {
    Method::try_from(code).map_err(LedgerError::Backend)
}
