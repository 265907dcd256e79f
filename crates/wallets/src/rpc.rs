//! A [`WalletProvider`] backed by a JSON-RPC endpoint.

use crate::{
    Subscription,
    error::ProviderError,
    provider::{EVENT_CHANNEL_CAPACITY, ProviderEvent, WalletProvider},
};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, ChainId};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::TransportError;
use async_trait::async_trait;
use serde_json::{Value, json};
use simplepay_config::AddEthereumChainParameter;
use std::{sync::Arc, time::Duration};
use tokio::sync::broadcast;

/// Wallet provider talking to a node or wallet bridge over JSON-RPC.
///
/// With a local signer the signer's address is the single, pre-authorized account and
/// transactions are signed locally. Without one, account management is left to the endpoint
/// (`eth_accounts` / `eth_requestAccounts`), e.g. a node with unlocked accounts.
#[derive(Debug)]
pub struct RpcWalletProvider {
    provider: DynProvider,
    signers: Vec<Address>,
    events: broadcast::Sender<ProviderEvent>,
}

impl RpcWalletProvider {
    pub fn new(provider: DynProvider, signers: Vec<Address>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { provider, signers, events }
    }

    /// Connects to `rpc_url`, signing with `signer` if given.
    pub async fn connect(
        rpc_url: &str,
        signer: Option<PrivateKeySigner>,
    ) -> Result<Self, ProviderError> {
        let Some(signer) = signer else {
            let provider = ProviderBuilder::new().connect(rpc_url).await.map_err(provider_error)?;
            return Ok(Self::new(provider.erased(), Vec::new()));
        };

        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect(rpc_url)
            .await
            .map_err(provider_error)?;
        debug!(target: "simplepay::wallet", %address, rpc_url, "using local signer");
        Ok(Self::new(provider.erased(), vec![address]))
    }

    /// The underlying provider, used to bind contract call handles.
    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    /// Polls `eth_chainId` every `interval` and emits [`ProviderEvent::ChainChanged`] when it
    /// changes. Plain JSON-RPC endpoints have no push notifications.
    pub fn watch_chain(self: &Arc<Self>, interval: Duration) -> Subscription {
        let this = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut last = None;
            loop {
                ticker.tick().await;
                let Some(this) = this.upgrade() else { break };
                match this.provider.get_chain_id().await {
                    Ok(chain_id) => {
                        if last.is_some_and(|last| last != chain_id) {
                            let _ = this.events.send(ProviderEvent::ChainChanged(chain_id));
                        }
                        last = Some(chain_id);
                    }
                    Err(err) => debug!(target: "simplepay::wallet", %err, "failed to poll chain id"),
                }
            }
        });
        Subscription::new(task)
    }
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        if !self.signers.is_empty() {
            return Ok(self.signers.clone());
        }
        self.provider.get_accounts().await.map_err(provider_error)
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        if !self.signers.is_empty() {
            return Ok(self.signers.clone());
        }
        self.provider
            .raw_request::<_, Vec<Address>>("eth_requestAccounts".into(), ())
            .await
            .map_err(provider_error)
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        self.provider.get_chain_id().await.map_err(provider_error)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ProviderError> {
        self.provider
            .raw_request::<_, Value>(
                "wallet_switchEthereumChain".into(),
                [json!({ "chainId": format!("{chain_id:#x}") })],
            )
            .await
            .map_err(provider_error)?;
        let _ = self.events.send(ProviderEvent::ChainChanged(chain_id));
        Ok(())
    }

    async fn add_chain(&self, params: &AddEthereumChainParameter) -> Result<(), ProviderError> {
        self.provider
            .raw_request::<_, Value>("wallet_addEthereumChain".into(), [params.clone()])
            .await
            .map_err(provider_error)?;
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

/// Maps a transport failure to the provider error shape, keeping the JSON-RPC error code if
/// the endpoint returned one.
pub fn provider_error(err: TransportError) -> ProviderError {
    match err.as_error_resp() {
        Some(payload) => ProviderError::new(payload.code, payload.message.to_string()),
        None => ProviderError::new(ProviderError::INTERNAL_ERROR, err.to_string()),
    }
}
