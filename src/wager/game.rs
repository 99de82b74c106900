use super::*;
use crate::GameId;
use crate::MIN_WAGER;
use crate::Money;
use crate::PlayError;
use crate::SLOT_GAME_ID;
use crate::SLOT_GAME_NAME;

/// Catalog entry for a game that accepts wagers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Game {
    id: GameId,
    name: String,
    minimum: Money,
    active: bool,
}

impl Game {
    pub fn new(id: GameId, name: impl Into<String>, minimum: Money, active: bool) -> Self {
        Self {
            id,
            name: name.into(),
            minimum,
            active,
        }
    }
    /// The three-reel slot machine.
    pub fn slots() -> Self {
        Self::new(SLOT_GAME_ID, SLOT_GAME_NAME, MIN_WAGER, true)
    }
    pub fn id(&self) -> GameId {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn minimum(&self) -> Money {
        self.minimum
    }
    pub fn is_active(&self) -> bool {
        self.active
    }
    /// Checks everything about a wager that does not depend on the balance.
    pub fn admit(&self, wager: Money) -> Result<Money, PlayError> {
        if !self.active {
            return Err(PlayError::InvalidAmount(format!("{} is closed", self.name)));
        }
        let wager = precise(wager)?;
        if wager < self.minimum {
            return Err(PlayError::InvalidAmount(format!(
                "{} is below the {} minimum of {}",
                wager, self.name, self.minimum
            )));
        }
        Ok(wager)
    }
    /// Validates a wager for this game against the player's balance.
    pub fn validate(&self, wager: Money, balance: Money) -> Result<Money, PlayError> {
        validate(self.admit(wager)?, balance)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::slots()
    }
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{} {} (min {})", self.id, self.name, self.minimum)
    }
}
