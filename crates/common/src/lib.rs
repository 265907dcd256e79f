//! Common utilities for building and using the SimplePay crates.

#![warn(missing_docs, unused_crate_dependencies)]

pub mod fmt;
pub mod style;
pub mod units;

pub use fmt::{format_address, format_ether, short_address};
pub use units::{AmountError, parse_amount};
