use crate::{
    Subscription,
    error::{ProviderError, WalletError},
    provider::{ProviderEvent, WalletProvider},
    session::{Connection, WalletSession},
};
use alloy_primitives::ChainId;
use parking_lot::RwLock;
use simplepay_config::NetworkConfig;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::{broadcast::error::RecvError, watch};

/// Owns the [`WalletSession`] and mediates every interaction with the wallet provider.
///
/// The manager is the only writer of the session. Readers either take a snapshot with
/// [`session`](Self::session) or follow changes through [`subscribe`](Self::subscribe).
pub struct WalletSessionManager {
    provider: Option<Arc<dyn WalletProvider>>,
    network: NetworkConfig,
    session: watch::Sender<WalletSession>,
    /// Error of the most recent connection attempt.
    error: RwLock<Option<String>>,
    connecting: AtomicBool,
}

impl std::fmt::Debug for WalletSessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletSessionManager")
            .field("has_provider", &self.has_provider())
            .field("network", &self.network.chain_id)
            .field("session", &self.session())
            .finish_non_exhaustive()
    }
}

impl WalletSessionManager {
    /// Creates a disconnected manager. `None` means no wallet provider is available.
    pub fn new(provider: Option<Arc<dyn WalletProvider>>, network: NetworkConfig) -> Self {
        Self {
            provider,
            network,
            session: watch::channel(WalletSession::disconnected()).0,
            error: RwLock::new(None),
            connecting: AtomicBool::new(false),
        }
    }

    pub fn with_provider(provider: Arc<dyn WalletProvider>, network: NetworkConfig) -> Self {
        Self::new(Some(provider), network)
    }

    /// Current session snapshot.
    pub fn session(&self) -> WalletSession {
        *self.session.borrow()
    }

    /// Follows session changes.
    pub fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.session.subscribe()
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.read().clone()
    }

    /// Whether a [`connect`](Self::connect) call is in progress.
    pub fn is_connecting(&self) -> bool {
        self.connecting.load(Ordering::Acquire)
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// The network the wallet is switched to on connect.
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Asks the provider for account authorization and makes sure the wallet is on the
    /// configured network, switching or registering it if necessary.
    ///
    /// On failure the session is left untouched and the error is kept as
    /// [`last_error`](Self::last_error).
    pub async fn connect(&self) -> Result<WalletSession, WalletError> {
        let Some(provider) = self.provider.as_deref() else {
            let err = WalletError::ProviderUnavailable;
            self.set_error(Some(err.to_string()));
            return Err(err);
        };

        self.set_error(None);
        self.connecting.store(true, Ordering::Release);
        let result = self.authorize(provider).await;
        self.connecting.store(false, Ordering::Release);

        match result {
            Ok(connection) => {
                debug!(target: "simplepay::wallet", address = %connection.0, chain_id = connection.1, "wallet connected");
                self.set_session(connection.into());
                Ok(self.session())
            }
            Err(err) => {
                warn!(target: "simplepay::wallet", %err, "wallet connection failed");
                self.set_error(Some(err.to_string()));
                Err(err)
            }
        }
    }

    async fn authorize(&self, provider: &dyn WalletProvider) -> Result<Connection, WalletError> {
        let accounts = provider.request_accounts().await?;
        let address = *accounts.first().ok_or_else(|| {
            WalletError::ConnectionRejected("No accounts were authorized.".to_string())
        })?;

        let chain_id = provider.chain_id().await?;
        if chain_id == self.network.chain_id {
            return Ok(Connection(address, chain_id));
        }

        self.switch_network(provider, chain_id).await?;

        // the wallet must report the target chain now, otherwise we'd claim a connection on the
        // wrong network
        let chain_id = provider.chain_id().await?;
        if chain_id != self.network.chain_id {
            return Err(WalletError::ConnectionRejected(format!(
                "Wallet is on chain {chain_id} instead of {} ({}).",
                self.network.chain_id, self.network.label
            )));
        }
        Ok(Connection(address, chain_id))
    }

    async fn switch_network(
        &self,
        provider: &dyn WalletProvider,
        current: ChainId,
    ) -> Result<(), WalletError> {
        let target = self.network.chain_id;
        debug!(target: "simplepay::wallet", current, target, "switching network");
        match provider.switch_chain(target).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_unrecognized_chain() => {
                debug!(target: "simplepay::wallet", name = %self.network.name, "registering network with wallet");
                provider.add_chain(&self.network.add_chain_params()).await?;
                provider.switch_chain(target).await?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Forgets the local session. Provider-side authorization is not revoked.
    pub fn disconnect(&self) {
        self.set_session(WalletSession::disconnected());
        self.set_error(None);
    }

    /// Picks up an account the provider already authorized, without prompting the user.
    ///
    /// Does nothing if there is no provider, no authorized account, or the provider fails.
    pub async fn restore_session(&self) -> WalletSession {
        let Some(provider) = self.provider.as_deref() else { return self.session() };
        match Self::authorized_connection(provider).await {
            Ok(Some(connection)) => self.set_session(connection.into()),
            Ok(None) => trace!(target: "simplepay::wallet", "no authorized accounts"),
            Err(err) => debug!(target: "simplepay::wallet", %err, "failed to restore session"),
        }
        self.session()
    }

    async fn authorized_connection(
        provider: &dyn WalletProvider,
    ) -> Result<Option<Connection>, ProviderError> {
        let accounts = provider.accounts().await?;
        let Some(&address) = accounts.first() else { return Ok(None) };
        let chain_id = provider.chain_id().await?;
        Ok(Some(Connection(address, chain_id)))
    }

    /// Rebuilds the session from the provider's current state after missed notifications.
    async fn resync(&self) {
        let Some(provider) = self.provider.as_deref() else { return };
        match provider.accounts().await {
            Ok(accounts) if accounts.is_empty() => {
                if self.session().is_connected() {
                    self.disconnect();
                }
            }
            Ok(_) => {
                self.restore_session().await;
            }
            Err(err) => debug!(target: "simplepay::wallet", %err, "failed to resync session"),
        }
    }

    /// Applies a provider notification to the session.
    pub async fn handle_event(&self, event: ProviderEvent) {
        trace!(target: "simplepay::wallet", ?event, "provider event");
        match event {
            ProviderEvent::AccountsChanged(accounts) if accounts.is_empty() => self.disconnect(),
            ProviderEvent::AccountsChanged(_) | ProviderEvent::ChainChanged(_) => {
                self.restore_session().await;
            }
        }
    }

    /// Subscribes to provider notifications and keeps the session in sync with them until the
    /// returned guard is dropped. Returns `None` if there is no provider.
    pub fn listen(self: &Arc<Self>) -> Option<Subscription> {
        let mut events = self.provider.as_ref()?.subscribe();
        let manager = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            loop {
                let event = match events.recv().await {
                    Ok(event) => Some(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(target: "simplepay::wallet", skipped, "missed provider events, resyncing");
                        None
                    }
                    Err(RecvError::Closed) => break,
                };
                let Some(manager) = manager.upgrade() else { break };
                match event {
                    Some(event) => manager.handle_event(event).await,
                    None => manager.resync().await,
                }
            }
            trace!(target: "simplepay::wallet", "provider listener stopped");
        });
        Some(Subscription::new(task))
    }

    fn set_session(&self, session: WalletSession) {
        self.session.send_if_modified(|current| {
            if *current == session {
                return false;
            }
            *current = session;
            true
        });
    }

    fn set_error(&self, error: Option<String>) {
        *self.error.write() = error;
    }
}
