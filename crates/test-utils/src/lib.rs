//! Test doubles for the wallet provider and the payment contract.

#![warn(unused_crate_dependencies, unreachable_pub)]

mod contract;
pub use contract::StubPaymentContract;

mod wallet;
pub use wallet::StubWalletProvider;

use alloy_primitives::{Address, address};

/// First default anvil account.
pub const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
/// Second default anvil account.
pub const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Initializes tracing for tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
