use alloy_primitives::TxHash;
use alloy_provider::PendingTransactionError;
use simplepay_common::AmountError;
use simplepay_wallets::{ProviderError, WalletError};

/// A failed contract interaction.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    /// The user declined to sign.
    #[error("{0}")]
    Rejected(String),
    /// The transaction was mined but reverted.
    #[error("transaction {hash} reverted")]
    Reverted { hash: TxHash },
    #[error("{0}")]
    Failed(String),
}

impl CallError {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<alloy_contract::Error> for CallError {
    fn from(err: alloy_contract::Error) -> Self {
        if let alloy_contract::Error::TransportError(transport) = &err
            && let Some(payload) = transport.as_error_resp()
        {
            let message = payload.message.to_string();
            if payload.code == ProviderError::USER_REJECTED_REQUEST {
                return Self::Rejected(message);
            }
            return Self::Failed(message);
        }
        Self::Failed(err.to_string())
    }
}

impl From<PendingTransactionError> for CallError {
    fn from(err: PendingTransactionError) -> Self {
        Self::Failed(err.to_string())
    }
}

/// Errors returned by [`ContractMirror`](crate::ContractMirror) operations.
///
/// Failures of the transaction itself are not errors: they are reported through a
/// [`TransactionOutcome`](crate::TransactionOutcome).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MirrorError {
    #[error("Please enter a valid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("Please connect your wallet first.")]
    NotConnected,
    #[error("Only the contract owner can do this.")]
    NotAuthorized,
    #[error("A {0} is still pending.")]
    Busy(crate::Operation),
    #[error(transparent)]
    CallFailed(#[from] CallError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
}
