use alloy_primitives::{Address, ChainId};
use async_trait::async_trait;
use parking_lot::Mutex;
use simplepay_config::AddEthereumChainParameter;
use simplepay_wallets::{
    ProviderError, ProviderEvent, WalletProvider, provider::EVENT_CHANNEL_CAPACITY,
};
use tokio::sync::broadcast;

#[derive(Debug)]
struct WalletState {
    /// Accounts granted on `eth_requestAccounts`.
    available: Vec<Address>,
    /// Accounts already authorized.
    authorized: Vec<Address>,
    chain_id: ChainId,
    known_chains: Vec<ChainId>,
    added: Vec<AddEthereumChainParameter>,
    reject_accounts: bool,
    reject_switch: bool,
    reject_add: bool,
    /// Switch requests succeed without changing the chain.
    stuck: bool,
    calls: Vec<&'static str>,
}

/// Scriptable in-memory [`WalletProvider`].
///
/// By default it holds one unauthorized account on `chain_id`, knows only that chain and
/// approves every request.
#[derive(Debug)]
pub struct StubWalletProvider {
    state: Mutex<WalletState>,
    events: broadcast::Sender<ProviderEvent>,
}

impl StubWalletProvider {
    pub fn new(account: Address, chain_id: ChainId) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(WalletState {
                available: vec![account],
                authorized: Vec::new(),
                chain_id,
                known_chains: vec![chain_id],
                added: Vec::new(),
                reject_accounts: false,
                reject_switch: false,
                reject_add: false,
                stuck: false,
                calls: Vec::new(),
            }),
            events,
        }
    }

    /// Marks the account as already authorized.
    pub fn authorized(self) -> Self {
        {
            let mut state = self.state.lock();
            state.authorized = state.available.clone();
        }
        self
    }

    /// Grants no accounts at all.
    pub fn without_accounts(self) -> Self {
        self.state.lock().available.clear();
        self
    }

    pub fn with_known_chain(self, chain_id: ChainId) -> Self {
        self.state.lock().known_chains.push(chain_id);
        self
    }

    pub fn rejecting_accounts(self) -> Self {
        self.state.lock().reject_accounts = true;
        self
    }

    pub fn rejecting_switch(self) -> Self {
        self.state.lock().reject_switch = true;
        self
    }

    pub fn rejecting_add(self) -> Self {
        self.state.lock().reject_add = true;
        self
    }

    /// Accepts switch requests but stays on the current chain.
    pub fn stuck(self) -> Self {
        self.state.lock().stuck = true;
        self
    }

    pub fn current_chain(&self) -> ChainId {
        self.state.lock().chain_id
    }

    /// Chains registered through `wallet_addEthereumChain`.
    pub fn added_chains(&self) -> Vec<AddEthereumChainParameter> {
        self.state.lock().added.clone()
    }

    /// Methods called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state.lock().calls.iter().filter(|call| **call == method).count()
    }

    /// Switches chains from the wallet side, notifying listeners.
    pub fn change_chain(&self, chain_id: ChainId) {
        self.state.lock().chain_id = chain_id;
        self.emit(ProviderEvent::ChainChanged(chain_id));
    }

    /// Replaces the authorized accounts from the wallet side, notifying listeners.
    pub fn change_accounts(&self, accounts: Vec<Address>) {
        {
            let mut state = self.state.lock();
            state.available.clone_from(&accounts);
            state.authorized.clone_from(&accounts);
        }
        self.emit(ProviderEvent::AccountsChanged(accounts));
    }

    pub fn emit(&self, event: ProviderEvent) {
        let _ = self.events.send(event);
    }

    fn record(&self, method: &'static str) {
        self.state.lock().calls.push(method);
    }
}

#[async_trait]
impl WalletProvider for StubWalletProvider {
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("eth_accounts");
        Ok(self.state.lock().authorized.clone())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.record("eth_requestAccounts");
        let mut state = self.state.lock();
        if state.reject_accounts {
            return Err(ProviderError::user_rejected());
        }
        state.authorized = state.available.clone();
        Ok(state.authorized.clone())
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        self.record("eth_chainId");
        Ok(self.state.lock().chain_id)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ProviderError> {
        self.record("wallet_switchEthereumChain");
        let mut state = self.state.lock();
        if state.reject_switch {
            return Err(ProviderError::user_rejected());
        }
        if !state.known_chains.contains(&chain_id) {
            return Err(ProviderError::unrecognized_chain(chain_id));
        }
        if !state.stuck {
            state.chain_id = chain_id;
        }
        Ok(())
    }

    async fn add_chain(&self, params: &AddEthereumChainParameter) -> Result<(), ProviderError> {
        self.record("wallet_addEthereumChain");
        let mut state = self.state.lock();
        if state.reject_add {
            return Err(ProviderError::user_rejected());
        }
        let chain_id = ChainId::from_str_radix(params.chain_id.trim_start_matches("0x"), 16)
            .map_err(|err| ProviderError::new(-32602, err.to_string()))?;
        state.known_chains.push(chain_id);
        state.added.push(params.clone());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}
