use super::*;
use crate::Money;
use crate::Multiplier;
use crate::reels::*;

/// Long-run economics of a pay table over an alphabet.
///
/// `rtp` is expected gross winnings per unit wagered; `hit_rate` is the
/// probability that a spin pays anything. Both are exact ratios computed by
/// enumerating every outcome, so no sampling error is involved.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Analysis {
    outcomes: u64,
    hits: Vec<(PayRule, u64)>,
    rtp: Multiplier,
    hit_rate: Multiplier,
}

impl Analysis {
    /// Exact analysis over all `|alphabet|^3` equally likely outcomes.
    pub fn exact(table: &PayTable, alphabet: &[Symbol]) -> Self {
        let mut hits = table
            .rules()
            .iter()
            .map(|rule| (*rule, 0u64))
            .collect::<Vec<_>>();
        let mut outcomes = 0u64;
        let mut paid = Multiplier::ZERO;
        let mut wins = 0u64;
        for outcome in Outcome::exhaust(alphabet) {
            outcomes += 1;
            if let Some(i) = table.rules().iter().position(|r| r.matches(&outcome)) {
                let multiplier = table.rules()[i].multiplier();
                hits[i].1 += 1;
                paid += multiplier;
                wins += (multiplier > Multiplier::ZERO) as u64;
            }
        }
        let n = Multiplier::from(outcomes.max(1));
        Self {
            outcomes,
            rtp: paid / n,
            hit_rate: Multiplier::from(wins) / n,
            hits,
        }
    }
    pub fn outcomes(&self) -> u64 {
        self.outcomes
    }
    /// How many outcomes each rule claimed, in table order.
    pub fn hits(&self) -> &[(PayRule, u64)] {
        &self.hits
    }
    pub fn rtp(&self) -> Multiplier {
        self.rtp
    }
    pub fn hit_rate(&self) -> Multiplier {
        self.hit_rate
    }
    /// Expected house take per unit wagered.
    pub fn edge(&self) -> Multiplier {
        Multiplier::ONE - self.rtp
    }
}

/// Monte Carlo RTP estimate over `spins` seeded spins, parallelised across
/// threads. Each chunk runs its own reels seeded from `seed` and its index,
/// so the estimate is reproducible for a fixed `(spins, seed)`.
#[cfg(feature = "server")]
pub fn simulate(table: &PayTable, spins: usize, seed: u64) -> Multiplier {
    use rayon::prelude::*;
    const CHUNK: usize = 4096;
    let chunks = spins.div_ceil(CHUNK);
    let wagered = Money::ONE;
    let paid = (0..chunks)
        .into_par_iter()
        .map(|i| {
            let ref mut reels = Reels::standard(Some(seed ^ (i as u64).wrapping_mul(0x9E3779B97F4A7C15)));
            let n = CHUNK.min(spins - i * CHUNK);
            (0..n)
                .map(|_| table.evaluate(&reels.spin(), wagered).winnings())
                .sum::<Money>()
        })
        .sum::<Money>();
    match spins {
        0 => Multiplier::ZERO,
        n => paid / Multiplier::from(n as u64),
    }
}

impl std::fmt::Display for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "outcomes  {}", self.outcomes)?;
        for (rule, hits) in self.hits.iter() {
            writeln!(f, "{}  hits {:>4}", rule, hits)?;
        }
        writeln!(f, "hit rate  {:.4}", self.hit_rate)?;
        writeln!(f, "rtp       {:.4}", self.rtp)?;
        write!(f, "edge      {:.4}", self.edge())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_table_economics() {
        let analysis = Analysis::exact(&PayTable::default(), &Symbol::all());
        assert_eq!(analysis.outcomes(), 343);
        assert_eq!(analysis.hits()[0].1, 7);
        assert_eq!(analysis.hits()[1].1, 84);
        assert_eq!(analysis.hits()[2].1, 252);
        assert_eq!(analysis.rtp(), dec!(189) / dec!(343));
        assert_eq!(analysis.hit_rate(), dec!(91) / dec!(343));
        assert!(analysis.edge() > dec!(0.44));
    }

    #[test]
    fn table_without_catch_all_counts_only_matches() {
        let table = PayTable::new(vec![PayRule::new(Pattern::Triple, dec!(3))]).unwrap();
        let analysis = Analysis::exact(&table, &Symbol::all());
        assert_eq!(analysis.hits()[0].1, 7);
        assert_eq!(analysis.rtp(), dec!(21) / dec!(343));
    }

    #[test]
    fn single_symbol_alphabet_always_hits() {
        let analysis = Analysis::exact(&PayTable::default(), &[Symbol::Grape]);
        assert_eq!(analysis.outcomes(), 1);
        assert_eq!(analysis.rtp(), dec!(3));
        assert_eq!(analysis.hit_rate(), dec!(1));
    }

    #[cfg(feature = "server")]
    #[test]
    fn simulation_converges_on_exact_rtp() {
        let table = PayTable::default();
        let exact = Analysis::exact(&table, &Symbol::all()).rtp();
        let estimate = simulate(&table, 200_000, 17);
        assert!((estimate - exact).abs() < dec!(0.02), "{} vs {}", estimate, exact);
        assert_eq!(estimate, simulate(&table, 200_000, 17));
    }
}
