//! The contract capability the mirror reads from and submits transactions through.

use crate::{error::CallError, outcome::Operation};
use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;

/// A state-changing contract call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContractCall {
    /// `makePayment()` carrying `value` wei.
    MakePayment { value: U256 },
    /// `transferFee()` carrying `value` wei.
    TransferFee { value: U256 },
    /// `withdraw()`.
    Withdraw,
    /// `updateTreasuryWallet(treasury)`.
    UpdateTreasury { treasury: Address },
}

impl ContractCall {
    pub fn operation(&self) -> Operation {
        match self {
            Self::MakePayment { .. } => Operation::Payment,
            Self::TransferFee { .. } => Operation::FeeTransfer,
            Self::Withdraw => Operation::Withdrawal,
            Self::UpdateTreasury { .. } => Operation::TreasuryUpdate,
        }
    }

    /// Wei attached to the call.
    pub fn value(&self) -> U256 {
        match self {
            Self::MakePayment { value } | Self::TransferFee { value } => *value,
            Self::Withdraw | Self::UpdateTreasury { .. } => U256::ZERO,
        }
    }
}

/// A submitted transaction that has not been confirmed yet.
#[async_trait]
pub trait PendingCall: Send {
    fn tx_hash(&self) -> TxHash;

    /// Waits for the receipt. A reverted transaction is an error.
    async fn confirm(self: Box<Self>) -> Result<TxHash, CallError>;
}

/// Read and write access to a deployed payment contract.
#[async_trait]
pub trait PaymentContract: Send + Sync {
    fn address(&self) -> Address;

    async fn total_payments(&self) -> Result<U256, CallError>;

    async fn total_fees(&self) -> Result<U256, CallError>;

    async fn contract_balance(&self) -> Result<U256, CallError>;

    async fn owner(&self) -> Result<Address, CallError>;

    async fn treasury(&self) -> Result<Address, CallError>;

    /// Signs and broadcasts `call` from `from`.
    async fn submit(
        &self,
        from: Address,
        call: ContractCall,
    ) -> Result<Box<dyn PendingCall>, CallError>;
}
