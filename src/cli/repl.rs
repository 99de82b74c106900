use super::*;
use crate::ID;
use crate::Player;
use crate::ledger::Ledger;
use crate::ledger::Method;
use crate::ledger::Window;
use crate::machine::Machine;
use crate::paytable::Analysis;
use crate::reels::Symbol;
use crate::wager::parse;
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;
use std::time::SystemTime;

/// Line-oriented terminal front-end for one player at one machine.
pub struct Repl<L> {
    machine: Machine<L>,
    player: ID<Player>,
}

impl<L> Repl<L>
where
    L: Ledger,
{
    pub fn new(machine: Machine<L>, player: ID<Player>) -> Self {
        Self { machine, player }
    }

    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        log::info!("launching slots for {}", self.player);
        println!("{}", self.machine.game().to_string().bold());
        println!("{}", self.machine.table());
        loop {
            print!("{} > ", self.machine.balance(self.player).await.unwrap_or_default().to_string().yellow());
            std::io::stdout().flush()?;
            let ref mut input = String::new();
            if std::io::stdin().read_line(input)? == 0 {
                break;
            }
            match input.trim() {
                "" => continue,
                "quit" => break,
                "exit" => break,
                _ => match self.handle(input).await {
                    Err(e) => eprintln!("{}", e.to_string().red()),
                    Ok(_) => continue,
                },
            }
        }
        Ok(())
    }

    async fn handle(&self, input: &str) -> Result<(), Box<dyn std::error::Error>> {
        match Command::try_parse_from(std::iter::once("> ").chain(input.split_whitespace()))? {
            Command::Play { amount, json } => {
                let spin = self.machine.play(self.player, parse(&amount)?).await?;
                match json {
                    true => println!("{}", serde_json::to_string_pretty(spin.bet())?),
                    false if spin.is_win() => println!("{}", spin.to_string().green().bold()),
                    false => println!("{}", spin.to_string().dimmed()),
                }
                Ok(())
            }
            Command::Deposit { amount, method } => {
                let method = Method::try_from(method.as_str())?;
                let balance = self.machine.deposit(self.player, parse(&amount)?, method).await?;
                Ok(println!("deposited via {}, balance {}", method, balance.to_string().green()))
            }
            Command::Balance => Ok(println!(
                "balance {}",
                self.machine.refresh(self.player).await?.to_string().yellow()
            )),
            Command::History { limit, days, json } => {
                let window = match days {
                    Some(days) => Window::recent(limit).after(
                        SystemTime::now()
                            .checked_sub(Duration::from_secs(days.saturating_mul(86_400)))
                            .unwrap_or(SystemTime::UNIX_EPOCH),
                    ),
                    None => Window::recent(limit),
                };
                let bets = self.machine.bets(self.player, window).await?;
                let deposits = self.machine.deposits(self.player, window).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&(bets, deposits))?);
                    return Ok(());
                }
                println!("{}", "bets".bold());
                bets.iter()
                    .enumerate()
                    .for_each(|(i, bet)| println!("{:>3}. {}", i + 1, bet));
                println!("{}", "deposits".bold());
                deposits
                    .iter()
                    .enumerate()
                    .for_each(|(i, deposit)| println!("{:>3}. {}", i + 1, deposit));
                Ok(())
            }
            Command::Rtp => Ok(println!(
                "{}",
                Analysis::exact(self.machine.table(), &Symbol::all())
            )),
            Command::Simulate { spins, seed } => {
                let rtp = crate::paytable::simulate(self.machine.table(), spins, seed);
                Ok(println!("simulated rtp over {} spins: {:.4}", spins, rtp))
            }
        }
    }
}
