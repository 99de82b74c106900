use super::*;
use std::time::Duration;

/// What settlement does when a result would drive a balance below zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Overdraft {
    /// Reject the settle with `InsufficientFunds`.
    #[default]
    Forbid,
    /// Commit the negative balance.
    Allow,
}

impl Overdraft {
    pub fn permits(&self, balance: Money) -> bool {
        match self {
            Self::Allow => true,
            Self::Forbid => balance >= Money::ZERO,
        }
    }
}

impl TryFrom<&str> for Overdraft {
    type Error = ConfigError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "forbid" | "deny" | "no" => Ok(Self::Forbid),
            "allow" | "yes" => Ok(Self::Allow),
            _ => Err(ConfigError::Invalid {
                key: "OVERDRAFT",
                value: s.to_string(),
            }),
        }
    }
}

/// Runtime configuration.
///
/// Every field has a default; [`Config::from_env`] overrides them from
/// `DB_URL`, `SETTLE_TIMEOUT` (e.g. `"500ms"`, `"5s"`), `SETTLE_RETRIES`,
/// `OVERDRAFT` (`allow` | `forbid`) and `SLOT_SEED`.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: Option<String>,
    pub timeout: Duration,
    pub retries: usize,
    pub overdraft: Overdraft,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            timeout: SETTLE_TIMEOUT,
            retries: SETTLE_RETRIES,
            overdraft: Overdraft::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests need not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        config.database = lookup("DB_URL");
        if let Some(s) = lookup("SETTLE_TIMEOUT") {
            config.timeout = parse_duration(&s).ok_or(ConfigError::Invalid {
                key: "SETTLE_TIMEOUT",
                value: s.clone(),
            })?;
        }
        if let Some(s) = lookup("SETTLE_RETRIES") {
            config.retries = s.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "SETTLE_RETRIES",
                value: s.clone(),
            })?;
        }
        if let Some(s) = lookup("OVERDRAFT") {
            config.overdraft = Overdraft::try_from(s.as_str())?;
        }
        if let Some(s) = lookup("SLOT_SEED") {
            config.seed = Some(s.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "SLOT_SEED",
                value: s.clone(),
            })?);
        }
        log::debug!("loaded {:?}", config);
        Ok(config)
    }
}

/// Parse duration string like "250ms", "30s", "5m", "2h" into Duration.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(num) = s.strip_suffix("ms") {
        return num.parse().ok().map(Duration::from_millis);
    }
    let (num, unit) = s.split_at(s.len().saturating_sub(1));
    let value: u64 = num.parse().ok()?;
    match unit {
        "s" => Some(Duration::from_secs(value)),
        "m" => Some(Duration::from_secs(value * 60)),
        "h" => Some(Duration::from_secs(value * 3600)),
        _ => None,
    }
}
