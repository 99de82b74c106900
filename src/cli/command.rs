use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub enum Command {
    #[command(about = "Wager an amount on one spin", alias = "spin")]
    Play {
        #[arg(required = true)]
        amount: String,
        #[arg(long, help = "Print the settled bet as JSON")]
        json: bool,
    },
    #[command(about = "Credit funds to the account", alias = "dep")]
    Deposit {
        #[arg(required = true)]
        amount: String,
        #[arg(default_value = "pse", help = "pse | bank")]
        method: String,
    },
    #[command(about = "Reread the stored balance", alias = "bal")]
    Balance,
    #[command(about = "List recent bets and deposits", alias = "hist")]
    History {
        #[arg(long, short, default_value_t = crate::HISTORY_LIMIT)]
        limit: usize,
        #[arg(long, help = "Only records from the last N days")]
        days: Option<u64>,
        #[arg(long, help = "Print records as JSON")]
        json: bool,
    },
    #[command(about = "Show the pay table with its exact return to player")]
    Rtp,
    #[command(about = "Estimate return to player by simulation", alias = "sim")]
    Simulate {
        #[arg(default_value_t = 1_000_000)]
        spins: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}
