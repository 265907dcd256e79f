//! The network the contract is deployed on.

use alloy_primitives::{Address, ChainId, TxHash};
use serde::{Deserialize, Serialize};

/// Chain id of the Sepolia test network.
pub const SEPOLIA_CHAIN_ID: ChainId = 11_155_111;

/// Native currency description, as used by `wallet_addEthereumChain`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for NativeCurrency {
    fn default() -> Self {
        Self { name: "ETH".to_string(), symbol: "ETH".to_string(), decimals: 18 }
    }
}

/// Parameters of an [EIP-3085](https://eips.ethereum.org/EIPS/eip-3085)
/// `wallet_addEthereumChain` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEthereumChainParameter {
    /// Hex encoded chain id, e.g. `0xaa36a7`.
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

/// The network the wallet must be connected to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub chain_id: ChainId,
    /// Full name registered with the wallet.
    pub name: String,
    /// Short label shown next to the connected account.
    pub label: String,
    pub currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    /// Block explorer base url, with a trailing slash.
    pub explorer_url: String,
    pub faucet_url: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::sepolia()
    }
}

impl NetworkConfig {
    /// The Sepolia test network.
    pub fn sepolia() -> Self {
        Self {
            chain_id: SEPOLIA_CHAIN_ID,
            name: "Sepolia Test Network".to_string(),
            label: "Sepolia Testnet".to_string(),
            currency: NativeCurrency::default(),
            rpc_urls: vec!["https://sepolia.infura.io/v3/".to_string()],
            explorer_url: "https://sepolia.etherscan.io/".to_string(),
            faucet_url: Some("https://sepoliafaucet.com/".to_string()),
        }
    }

    /// The chain id as a `0x` prefixed hex string, as wallets expect it.
    pub fn hex_chain_id(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Builds the `wallet_addEthereumChain` parameters for this network.
    pub fn add_chain_params(&self) -> AddEthereumChainParameter {
        AddEthereumChainParameter {
            chain_id: self.hex_chain_id(),
            chain_name: self.name.clone(),
            native_currency: self.currency.clone(),
            rpc_urls: self.rpc_urls.clone(),
            block_explorer_urls: vec![self.explorer_url.clone()],
        }
    }

    /// Label for `chain_id`: the configured label if it is this network, the raw id otherwise.
    pub fn label_for(&self, chain_id: ChainId) -> String {
        if chain_id == self.chain_id { self.label.clone() } else { format!("Chain ID: {chain_id}") }
    }

    /// Explorer link for a transaction.
    pub fn tx_url(&self, hash: TxHash) -> String {
        format!("{}tx/{hash}", self.explorer_base())
    }

    /// Explorer link for an account or contract.
    pub fn address_url(&self, address: Address) -> String {
        format!("{}address/{address}", self.explorer_base())
    }

    fn explorer_base(&self) -> String {
        if self.explorer_url.ends_with('/') {
            self.explorer_url.clone()
        } else {
            format!("{}/", self.explorer_url)
        }
    }
}
