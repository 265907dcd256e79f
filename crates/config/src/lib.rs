//! # simplepay-config
//!
//! SimplePay configuration.
//!
//! Values are layered, lowest priority first: [`Config::default`], the `simplepay.toml` file,
//! `SIMPLEPAY_` prefixed environment variables, and finally whatever provider the caller merges
//! on top (the CLI merges its flags this way).

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

#[macro_use]
extern crate tracing;

use alloy_primitives::{Address, address};
use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Map},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use figment;

mod error;
pub use error::{ExtractConfigError, FAILED_TO_EXTRACT_CONFIG_MSG};

pub mod network;
pub use network::{AddEthereumChainParameter, NativeCurrency, NetworkConfig, SEPOLIA_CHAIN_ID};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "simplepay.toml";

/// Prefix of environment variables that override config values.
pub const ENV_PREFIX: &str = "SIMPLEPAY_";

/// Default local RPC endpoint.
pub const LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";

/// Address of the deployed payment contract on Sepolia.
pub const DEFAULT_CONTRACT_ADDRESS: Address =
    address!("0xC4a450b7f6B373889f3eA5efC4D326b28D8300b5");

/// SimplePay configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON-RPC endpoint the wallet provider talks to.
    pub rpc_url: String,
    /// Address of the payment contract.
    pub contract: Address,
    /// The network the contract lives on; the wallet is switched to it on connect.
    pub network: NetworkConfig,
    /// Seconds between chain id polls while watching for network changes.
    pub chain_poll_interval: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: LOCAL_RPC_URL.to_string(),
            contract: DEFAULT_CONTRACT_ADDRESS,
            network: NetworkConfig::default(),
            chain_poll_interval: 4,
        }
    }
}

impl Config {
    /// Returns the default figment: defaults, `simplepay.toml` in the working directory and
    /// the environment.
    pub fn figment() -> Figment {
        Self::figment_with_file(CONFIG_FILE_NAME)
    }

    /// Same as [`Config::figment`] but reads the given config file.
    pub fn figment_with_file(file: impl AsRef<Path>) -> Figment {
        let file = file.as_ref();
        trace!(target: "simplepay::config", file = %file.display(), "loading config");
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extracts a config from any figment provider.
    pub fn from_provider<T: Provider>(provider: T) -> Result<Self, ExtractConfigError> {
        Figment::from(provider).extract().map_err(ExtractConfigError::new)
    }
}

impl Provider for Config {
    fn metadata(&self) -> Metadata {
        Metadata::named("SimplePay Config")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Serialized::defaults(self).data()
    }
}
