use crate::{
    call::{ContractCall, PaymentContract},
    error::{CallError, MirrorError},
    outcome::{Operation, TransactionOutcome, TxPhase},
    snapshot::ContractSnapshot,
};
use alloy_primitives::{Address, TxHash};
use parking_lot::RwLock;
use simplepay_common::parse_amount;
use simplepay_wallets::{Connection, Subscription, WalletError, WalletSession, WalletSessionManager};
use std::sync::Arc;

/// Error message recorded when the contract state could not be read.
pub const FETCH_ERROR: &str = "Failed to fetch contract data";

#[derive(Debug, Default)]
struct MirrorState {
    snapshot: ContractSnapshot,
    treasury: Option<Address>,
    is_owner: bool,
    /// The connection `is_owner` was computed for.
    owner_of: Option<Connection>,
    phase: TxPhase,
    operation: Option<Operation>,
    last_outcome: Option<TransactionOutcome>,
    error: Option<String>,
    /// Session observed by the last [`ContractMirror::sync_session`].
    seen: WalletSession,
}

/// Local view of the payment contract, kept consistent with the chain by explicit refreshes.
///
/// Reads go through the contract's view functions. State-changing calls are signed by the
/// connected account of the shared [`WalletSessionManager`]; at most one is in flight at a time.
pub struct ContractMirror {
    wallet: Arc<WalletSessionManager>,
    contract: Arc<dyn PaymentContract>,
    state: RwLock<MirrorState>,
}

impl std::fmt::Debug for ContractMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractMirror")
            .field("contract", &self.contract.address())
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}

impl ContractMirror {
    pub fn new(wallet: Arc<WalletSessionManager>, contract: Arc<dyn PaymentContract>) -> Self {
        Self { wallet, contract, state: RwLock::default() }
    }

    pub fn wallet(&self) -> &Arc<WalletSessionManager> {
        &self.wallet
    }

    pub fn contract_address(&self) -> Address {
        self.contract.address()
    }

    pub fn snapshot(&self) -> ContractSnapshot {
        self.state.read().snapshot
    }

    /// Treasury wallet as of the last successful read.
    pub fn treasury(&self) -> Option<Address> {
        self.state.read().treasury
    }

    /// Whether the connected account is the contract owner. Always `false` while disconnected.
    pub fn is_owner(&self) -> bool {
        let state = self.state.read();
        state.is_owner && self.wallet.session().connection() == state.owner_of
    }

    pub fn phase(&self) -> TxPhase {
        self.state.read().phase
    }

    /// The operation of the current or most recent transaction.
    pub fn operation(&self) -> Option<Operation> {
        self.state.read().operation
    }

    pub fn is_busy(&self) -> bool {
        self.phase().is_pending()
    }

    pub fn last_outcome(&self) -> Option<TransactionOutcome> {
        self.state.read().last_outcome.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    fn reader(&self) -> Result<&dyn PaymentContract, MirrorError> {
        if !self.wallet.has_provider() {
            return Err(WalletError::ProviderUnavailable.into());
        }
        Ok(self.contract.as_ref())
    }

    fn signer(&self) -> Result<Address, MirrorError> {
        self.wallet.session().address().ok_or(MirrorError::NotConnected)
    }

    /// Reads the aggregate totals and balance concurrently and replaces the snapshot.
    ///
    /// If any of the three reads fails the previous snapshot is kept and [`FETCH_ERROR`] is
    /// recorded. The treasury address is read afterwards on a best-effort basis.
    pub async fn refresh(&self) -> Result<ContractSnapshot, MirrorError> {
        let contract = self.reader()?;
        let reads = tokio::try_join!(
            contract.total_payments(),
            contract.total_fees(),
            contract.contract_balance(),
        );
        let (total_payments, total_fees, contract_balance) = match reads {
            Ok(reads) => reads,
            Err(err) => {
                warn!(target: "simplepay::contract", %err, "failed to fetch contract data");
                self.state.write().error = Some(FETCH_ERROR.to_string());
                return Err(err.into());
            }
        };

        let snapshot = ContractSnapshot { total_payments, total_fees, contract_balance };
        {
            let mut state = self.state.write();
            state.snapshot = snapshot;
            if state.error.as_deref() == Some(FETCH_ERROR) {
                state.error = None;
            }
        }
        trace!(target: "simplepay::contract", ?snapshot, "refreshed");

        match contract.treasury().await {
            Ok(treasury) => self.state.write().treasury = Some(treasury),
            Err(err) => debug!(target: "simplepay::contract", %err, "failed to read treasury"),
        }
        Ok(snapshot)
    }

    /// Compares the contract owner with the connected account and records the result.
    ///
    /// Any failure, including being disconnected, counts as not owner.
    pub async fn check_ownership(&self) -> bool {
        let session = self.wallet.session();
        let is_owner = match (session.address(), self.reader()) {
            (Some(address), Ok(contract)) => match contract.owner().await {
                Ok(owner) => owner == address,
                Err(err) => {
                    warn!(target: "simplepay::contract", %err, "failed to read owner");
                    false
                }
            },
            _ => false,
        };
        let mut state = self.state.write();
        state.is_owner = is_owner;
        state.owner_of = session.connection();
        is_owner
    }

    /// Sends `amount` ether (decimal string) to `makePayment()`.
    pub async fn make_payment(&self, amount: &str) -> Result<TransactionOutcome, MirrorError> {
        let value = parse_amount(amount)?;
        self.execute(ContractCall::MakePayment { value }).await
    }

    /// Sends `amount` ether (decimal string) to `transferFee()`.
    pub async fn transfer_fee(&self, amount: &str) -> Result<TransactionOutcome, MirrorError> {
        let value = parse_amount(amount)?;
        self.execute(ContractCall::TransferFee { value }).await
    }

    /// Withdraws the contract balance. Owner only.
    pub async fn withdraw(&self) -> Result<TransactionOutcome, MirrorError> {
        self.execute(ContractCall::Withdraw).await
    }

    /// Points the contract at a new treasury wallet. Owner only.
    pub async fn update_treasury(
        &self,
        treasury: Address,
    ) -> Result<TransactionOutcome, MirrorError> {
        self.execute(ContractCall::UpdateTreasury { treasury }).await
    }

    /// The connected account that may submit `operation`.
    fn signer_for(&self, operation: Operation) -> Result<Address, MirrorError> {
        if operation.is_owner_only() && !self.is_owner() {
            return Err(MirrorError::NotAuthorized);
        }
        self.signer()
    }

    async fn execute(&self, call: ContractCall) -> Result<TransactionOutcome, MirrorError> {
        let operation = call.operation();
        let from = self.signer_for(operation)?;
        self.begin(operation)?;
        debug!(target: "simplepay::contract", %from, %operation, value = %call.value(), "submitting");

        let outcome = match self.submit_and_confirm(from, call).await {
            Ok(hash) => {
                debug!(target: "simplepay::contract", %hash, %operation, "confirmed");
                // a failed refresh records its own error and leaves the outcome alone
                let _ = self.refresh().await;
                TransactionOutcome::succeeded(hash)
            }
            Err(err) => {
                if err.is_rejected() {
                    debug!(target: "simplepay::contract", %operation, "rejected in wallet");
                } else {
                    warn!(target: "simplepay::contract", %err, %operation, "transaction failed");
                }
                TransactionOutcome::failed(err.to_string())
            }
        };
        self.finish(&outcome);
        Ok(outcome)
    }

    async fn submit_and_confirm(
        &self,
        from: Address,
        call: ContractCall,
    ) -> Result<TxHash, CallError> {
        let pending = self.contract.submit(from, call).await?;
        trace!(target: "simplepay::contract", tx_hash = %pending.tx_hash(), "waiting for receipt");
        self.state.write().phase = TxPhase::Confirming;
        pending.confirm().await
    }

    fn begin(&self, operation: Operation) -> Result<(), MirrorError> {
        let mut state = self.state.write();
        if state.phase.is_pending() {
            let running = state.operation.unwrap_or(operation);
            return Err(MirrorError::Busy(running));
        }
        state.phase = TxPhase::Submitting;
        state.operation = Some(operation);
        state.error = None;
        Ok(())
    }

    fn finish(&self, outcome: &TransactionOutcome) {
        let mut state = self.state.write();
        state.phase = if outcome.success { TxPhase::Succeeded } else { TxPhase::Failed };
        if let Some(error) = &outcome.error {
            state.error = Some(error.clone());
        }
        state.last_outcome = Some(outcome.clone());
    }

    /// Brings the mirror in line with the current wallet session.
    ///
    /// A new connection, including a change of account or chain, refreshes the contract state
    /// and then checks ownership. Disconnecting clears ownership.
    pub async fn sync_session(&self) {
        let session = self.wallet.session();
        let previous = std::mem::replace(&mut self.state.write().seen, session);

        let Some(connection) = session.connection() else {
            let mut state = self.state.write();
            state.is_owner = false;
            state.owner_of = None;
            return;
        };

        if previous.connection() != Some(connection) {
            if let Err(err) = self.refresh().await {
                debug!(target: "simplepay::contract", %err, "refresh on connection change failed");
            }
            self.check_ownership().await;
            return;
        }

        let stale = self.state.read().owner_of != Some(connection);
        if stale {
            self.check_ownership().await;
        }
    }

    /// Runs [`sync_session`](Self::sync_session) now and on every session change until the
    /// returned guard is dropped.
    pub fn watch_session(self: &Arc<Self>) -> Subscription {
        let mut sessions = self.wallet.subscribe();
        let mirror = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            loop {
                let Some(mirror) = mirror.upgrade() else { break };
                mirror.sync_session().await;
                drop(mirror);
                if sessions.changed().await.is_err() {
                    break;
                }
            }
            trace!(target: "simplepay::contract", "session watcher stopped");
        });
        Subscription::new(task)
    }
}
