use crate::CURRENCY_SCALE;
use crate::MAX_AMOUNT;
use crate::Money;
use crate::PlayError;
use std::str::FromStr;

/// Parses user input into an exact monetary amount.
///
/// Accepts plain decimal notation with an optional leading `$`. Rejects
/// anything that is not a finite decimal, is not strictly positive, or
/// carries sub-cent precision. The result is rescaled to two fractional
/// digits so that `"5"` and `"5.00"` are the same amount.
pub fn parse(input: &str) -> Result<Money, PlayError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    let amount = Money::from_str(digits)
        .map_err(|_| PlayError::InvalidAmount(format!("not a monetary value: {:?}", input)))?;
    precise(amount)
}

/// Checks that an amount is positive, no larger than [`MAX_AMOUNT`], and
/// has at most cent precision, returning it at the canonical two-digit scale.
pub fn precise(amount: Money) -> Result<Money, PlayError> {
    if amount <= Money::ZERO {
        return Err(PlayError::InvalidAmount(format!("must be positive: {}", amount)));
    }
    if amount > MAX_AMOUNT {
        return Err(PlayError::InvalidAmount(format!("exceeds {}: {}", MAX_AMOUNT, amount)));
    }
    let normalized = amount.normalize();
    if normalized.scale() > CURRENCY_SCALE {
        return Err(PlayError::InvalidAmount(format!(
            "more than {} decimal places: {}",
            CURRENCY_SCALE, amount
        )));
    }
    let mut scaled = normalized;
    scaled.rescale(CURRENCY_SCALE);
    Ok(scaled)
}

/// Checks a wager against the balance it would be drawn from.
///
/// Pure: it reads nothing and writes nothing, so a failure leaves all
/// state untouched.
pub fn validate(wager: Money, balance: Money) -> Result<Money, PlayError> {
    let wager = precise(wager)?;
    match wager > balance {
        true => Err(PlayError::InsufficientFunds { balance, wager }),
        false => Ok(wager),
    }
}
