//! Bindings for the deployed payment contract.
//!
//! The interface description is the contract's published ABI, kept verbatim in
//! `abi/SimplePayment.json`.

use alloy_json_abi::JsonAbi;
use alloy_sol_types::sol;

/// The contract ABI as published.
pub const SIMPLE_PAYMENT_ABI: &str = include_str!("../abi/SimplePayment.json");

sol!(
    #[sol(rpc)]
    SimplePayment,
    "abi/SimplePayment.json"
);

/// Parses [`SIMPLE_PAYMENT_ABI`].
pub fn interface() -> Result<JsonAbi, serde_json::Error> {
    serde_json::from_str(SIMPLE_PAYMENT_ABI)
}
