//! Parsing of user supplied ether amounts.

use alloy_primitives::{U256, utils};

/// Reasons a user supplied amount is rejected before any network interaction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// Nothing but whitespace was supplied.
    #[error("amount is empty")]
    Empty,
    /// A leading minus sign.
    #[error("amount must not be negative")]
    Negative,
    /// The amount parses to zero wei.
    #[error("amount must be greater than zero")]
    Zero,
    /// Not a plain decimal number, or more precision than wei allows.
    #[error("invalid amount {value:?}: {reason}")]
    Malformed {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Parses a positive decimal ether string (e.g. `0.01`) into wei.
///
/// Only plain decimal notation is accepted: digits with at most one `.` separator.
pub fn parse_amount(amount: &str) -> Result<U256, AmountError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(AmountError::Empty);
    }
    if amount.starts_with('-') {
        return Err(AmountError::Negative);
    }

    let malformed = |reason: &str| AmountError::Malformed {
        value: amount.to_string(),
        reason: reason.to_string(),
    };
    if !amount.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(malformed("expected a decimal number"));
    }
    if amount.matches('.').count() > 1 || !amount.chars().any(|c| c.is_ascii_digit()) {
        return Err(malformed("expected a decimal number"));
    }

    let wei = utils::parse_ether(amount).map_err(|err| malformed(&err.to_string()))?;
    if wei.is_zero() {
        return Err(AmountError::Zero);
    }
    Ok(wei)
}
