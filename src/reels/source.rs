use super::*;
use crate::ConfigError;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Supplier of reel symbols.
///
/// Each call to [`Source::draw`] is independent of every other, including
/// the other positions of the same spin.
pub trait Source: Send {
    fn draw(&mut self) -> Symbol;
    /// Draws one symbol per reel, left to right.
    fn spin(&mut self) -> Outcome {
        let a = self.draw();
        let b = self.draw();
        let c = self.draw();
        Outcome::from([a, b, c])
    }
}

/// Uniform symbol source over a fixed alphabet.
///
/// Seeded reels replay the same sequence of outcomes, which is what tests
/// and audits rely on. Unseeded reels draw their seed from the OS.
#[derive(Debug, Clone)]
pub struct Reels {
    alphabet: Vec<Symbol>,
    rng: SmallRng,
}

impl Reels {
    /// Reels over the given alphabet with an OS-provided seed.
    pub fn new(alphabet: Vec<Symbol>) -> Result<Self, ConfigError> {
        Self::with_rng(alphabet, SmallRng::from_os_rng())
    }
    /// Reels over the given alphabet with a fixed seed.
    pub fn seeded(alphabet: Vec<Symbol>, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(alphabet, SmallRng::seed_from_u64(seed))
    }
    /// Standard seven-symbol reels, seeded when a seed is given.
    pub fn standard(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            alphabet: Symbol::all().to_vec(),
            rng,
        }
    }
    /// Restarts the sequence from a new seed.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }
    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }
    fn with_rng(alphabet: Vec<Symbol>, rng: SmallRng) -> Result<Self, ConfigError> {
        match alphabet.is_empty() {
            true => Err(ConfigError::EmptyAlphabet),
            false => Ok(Self { alphabet, rng }),
        }
    }
}

impl Default for Reels {
    fn default() -> Self {
        Self::standard(None)
    }
}

impl Source for Reels {
    fn draw(&mut self) -> Symbol {
        self.alphabet[self.rng.random_range(0..self.alphabet.len())]
    }
}

/// Replays a fixed list of outcomes, cycling when exhausted.
///
/// Used to force scenarios ("three sevens") through the full play pipeline.
#[derive(Debug, Clone)]
pub struct Rigged {
    symbols: Vec<Symbol>,
    cursor: usize,
}

impl Rigged {
    pub fn new(outcomes: Vec<Outcome>) -> Result<Self, ConfigError> {
        match outcomes.is_empty() {
            true => Err(ConfigError::EmptyAlphabet),
            false => Ok(Self {
                symbols: outcomes.iter().flat_map(Outcome::symbols).collect(),
                cursor: 0,
            }),
        }
    }
}

impl From<Outcome> for Rigged {
    fn from(outcome: Outcome) -> Self {
        Self {
            symbols: outcome.symbols().to_vec(),
            cursor: 0,
        }
    }
}

impl Source for Rigged {
    fn draw(&mut self) -> Symbol {
        let symbol = self.symbols[self.cursor];
        self.cursor = (self.cursor + 1) % self.symbols.len();
        symbol
    }
}
