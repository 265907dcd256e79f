//! Helpers for formatting ethereum values for display.

use alloy_primitives::{Address, U256, utils};

/// Number of fractional digits shown for ether amounts.
pub const ETHER_DISPLAY_DECIMALS: usize = 4;

/// Formats a wei amount as ether with [`ETHER_DISPLAY_DECIMALS`] fractional digits.
///
/// Falls back to `0.0000` if the value cannot be represented.
pub fn format_ether(value: U256) -> String {
    match utils::format_ether(value).parse::<f64>() {
        Ok(ether) => format!("{ether:.prec$}", prec = ETHER_DISPLAY_DECIMALS),
        Err(_) => format!("{:.prec$}", 0.0, prec = ETHER_DISPLAY_DECIMALS),
    }
}

/// Shortens an address string to `0x1234...abcd`.
///
/// Returns an empty string for an empty input.
pub fn format_address(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    let head: String = address.chars().take(6).collect();
    let tail_start = address.chars().count().saturating_sub(4);
    let tail: String = address.chars().skip(tail_start).collect();
    format!("{head}...{tail}")
}

/// Shortens the checksummed representation of `address`.
pub fn short_address(address: Address) -> String {
    format_address(&address.to_string())
}
