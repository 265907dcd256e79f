//! # simplepay-wallets
//!
//! Wallet session management: the [`WalletProvider`] capability the wallet is reached through,
//! and the [`WalletSessionManager`] that owns the resulting [`WalletSession`].

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

pub mod error;
pub use error::{PrivateKeyError, ProviderError, WalletError};

pub mod provider;
pub use provider::{ProviderEvent, WalletProvider};

pub mod rpc;
pub use rpc::RpcWalletProvider;

pub mod utils;

mod manager;
pub use manager::WalletSessionManager;

mod session;
pub use session::{Connection, WalletSession};

mod subscription;
pub use subscription::Subscription;
