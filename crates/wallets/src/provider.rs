//! The injected wallet provider capability.

use crate::error::ProviderError;
use alloy_primitives::{Address, ChainId};
use async_trait::async_trait;
use simplepay_config::AddEthereumChainParameter;
use tokio::sync::broadcast;

/// Capacity of provider event channels.
pub const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Asynchronous notifications emitted by a wallet provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The set of authorized accounts changed. Empty means the user revoked access.
    AccountsChanged(Vec<Address>),
    /// The wallet switched to another chain.
    ChainChanged(ChainId),
}

/// The operations a wallet provider exposes, modelled after
/// [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193).
///
/// Implementations are injected into [`WalletSessionManager`](crate::WalletSessionManager)
/// rather than discovered from ambient state.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the user already authorized (`eth_accounts`). Never prompts.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Asks the user to authorize accounts (`eth_requestAccounts`). May prompt.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// The chain the wallet is currently connected to (`eth_chainId`).
    async fn chain_id(&self) -> Result<ChainId, ProviderError>;

    /// Requests a switch to `chain_id` (`wallet_switchEthereumChain`).
    ///
    /// Fails with [`ProviderError::UNRECOGNIZED_CHAIN`] if the wallet does not know the chain.
    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ProviderError>;

    /// Registers a chain with the wallet (`wallet_addEthereumChain`).
    async fn add_chain(&self, params: &AddEthereumChainParameter) -> Result<(), ProviderError>;

    /// Subscribes to account and chain change notifications.
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}
