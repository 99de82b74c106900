//! Slots Binary
//!
//! Interactive slot machine for a single player. Uses PostgreSQL when built
//! with `database` and `DB_URL` is set, in-memory stores otherwise.

use payline::cli::Repl;
use payline::ledger::Journal;
use payline::ledger::Ledger;
use payline::ledger::Memory;
use payline::ledger::Vault;
use payline::machine::Machine;
use payline::reels::Reels;
use payline::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log();
    kys();
    let config = Config::from_env()?;
    #[cfg(feature = "database")]
    if let Some(ref url) = config.database {
        let client = payline::ledger::postgres::db(url).await?;
        payline::ledger::postgres::migrate(&client).await?;
        return run(Arc::new(client), &config).await;
    }
    if config.database.is_some() {
        log::warn!("DB_URL is set but this build has no database support");
    }
    let ledger = Memory::new(Vault::default(), Journal::default()).with_retries(config.retries);
    run(Arc::new(ledger), &config).await
}

async fn run<L: Ledger>(ledger: Arc<L>, config: &Config) -> anyhow::Result<()> {
    let machine = Machine::new(ledger, Reels::standard(config.seed), config);
    let player = ID::default();
    machine.open(player, OPENING_BALANCE).await?;
    Repl::new(machine, player)
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))
}
