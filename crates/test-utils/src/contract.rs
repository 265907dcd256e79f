use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use simplepay_contract::{CallError, ContractCall, PaymentContract, PendingCall};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct ContractState {
    total_payments: U256,
    total_fees: U256,
    balance: U256,
    owner: Address,
    treasury: Address,
    fail_reads: bool,
    submit_error: Option<CallError>,
    confirm_error: Option<CallError>,
    revert: bool,
    reads: HashMap<&'static str, usize>,
    submitted: Vec<(Address, ContractCall)>,
}

impl ContractState {
    fn apply(&mut self, call: ContractCall) {
        match call {
            ContractCall::MakePayment { value } => {
                self.total_payments += value;
                self.balance += value;
            }
            // fees are forwarded to the treasury
            ContractCall::TransferFee { value } => self.total_fees += value,
            ContractCall::Withdraw => self.balance = U256::ZERO,
            ContractCall::UpdateTreasury { treasury } => self.treasury = treasury,
        }
    }
}

/// In-memory [`PaymentContract`] that applies confirmed calls to its own state.
#[derive(Clone, Debug)]
pub struct StubPaymentContract {
    address: Address,
    state: Arc<Mutex<ContractState>>,
    gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl StubPaymentContract {
    pub fn new(address: Address, owner: Address) -> Self {
        let state = ContractState { owner, treasury: owner, ..Default::default() };
        Self { address, state: Arc::new(Mutex::new(state)), gate: Default::default() }
    }

    pub fn with_totals(self, total_payments: U256, total_fees: U256, balance: U256) -> Self {
        self.set_totals(total_payments, total_fees, balance);
        self
    }

    pub fn set_totals(&self, total_payments: U256, total_fees: U256, balance: U256) {
        let mut state = self.state.lock();
        state.total_payments = total_payments;
        state.total_fees = total_fees;
        state.balance = balance;
    }

    pub fn set_owner(&self, owner: Address) {
        self.state.lock().owner = owner;
    }

    /// Makes every view call fail until reset.
    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// The next submission fails with `err` before a transaction exists.
    pub fn fail_next_submit(&self, err: CallError) {
        self.state.lock().submit_error = Some(err);
    }

    /// The next confirmation fails with `err`.
    pub fn fail_next_confirm(&self, err: CallError) {
        self.state.lock().confirm_error = Some(err);
    }

    /// The next transaction is mined but reverts.
    pub fn revert_next(&self) {
        self.state.lock().revert = true;
    }

    /// Holds confirmations until the returned handle is notified.
    pub fn pause_confirmations(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock() = Some(notify.clone());
        notify
    }

    pub fn read_count(&self, method: &str) -> usize {
        self.state.lock().reads.get(method).copied().unwrap_or_default()
    }

    /// Calls submitted so far, with their sender.
    pub fn submitted(&self) -> Vec<(Address, ContractCall)> {
        self.state.lock().submitted.clone()
    }

    fn read<T>(
        &self,
        method: &'static str,
        f: impl FnOnce(&ContractState) -> T,
    ) -> Result<T, CallError> {
        let mut state = self.state.lock();
        *state.reads.entry(method).or_default() += 1;
        if state.fail_reads {
            return Err(CallError::Failed(format!("{method}: connection refused")));
        }
        Ok(f(&state))
    }
}

#[async_trait]
impl PaymentContract for StubPaymentContract {
    fn address(&self) -> Address {
        self.address
    }

    async fn total_payments(&self) -> Result<U256, CallError> {
        self.read("totalPayments", |state| state.total_payments)
    }

    async fn total_fees(&self) -> Result<U256, CallError> {
        self.read("totalFees", |state| state.total_fees)
    }

    async fn contract_balance(&self) -> Result<U256, CallError> {
        self.read("getContractBalance", |state| state.balance)
    }

    async fn owner(&self) -> Result<Address, CallError> {
        self.read("owner", |state| state.owner)
    }

    async fn treasury(&self) -> Result<Address, CallError> {
        self.read("treasuryWallet", |state| state.treasury)
    }

    async fn submit(
        &self,
        from: Address,
        call: ContractCall,
    ) -> Result<Box<dyn PendingCall>, CallError> {
        let mut state = self.state.lock();
        if let Some(err) = state.submit_error.take() {
            return Err(err);
        }
        state.submitted.push((from, call));
        let hash = TxHash::with_last_byte(state.submitted.len() as u8);
        Ok(Box::new(StubPendingCall {
            hash,
            call,
            error: state.confirm_error.take(),
            revert: std::mem::take(&mut state.revert),
            state: self.state.clone(),
            gate: self.gate.lock().clone(),
        }))
    }
}

struct StubPendingCall {
    hash: TxHash,
    call: ContractCall,
    error: Option<CallError>,
    revert: bool,
    state: Arc<Mutex<ContractState>>,
    gate: Option<Arc<Notify>>,
}

#[async_trait]
impl PendingCall for StubPendingCall {
    fn tx_hash(&self) -> TxHash {
        self.hash
    }

    async fn confirm(self: Box<Self>) -> Result<TxHash, CallError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.revert {
            return Err(CallError::Reverted { hash: self.hash });
        }
        self.state.lock().apply(self.call);
        Ok(self.hash)
    }
}
