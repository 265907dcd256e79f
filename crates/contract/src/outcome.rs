use alloy_primitives::TxHash;
use std::fmt;

/// Result of a state-changing contract call.
///
/// `hash` is set whenever the transaction was confirmed; `error` is set whenever it was not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub hash: Option<TxHash>,
    pub success: bool,
    pub error: Option<String>,
}

impl TransactionOutcome {
    pub fn succeeded(hash: TxHash) -> Self {
        Self { hash: Some(hash), success: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { hash: None, success: false, error: Some(error.into()) }
    }
}

/// Progress of the in-flight transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TxPhase {
    #[default]
    Idle,
    /// Waiting for the wallet to sign and broadcast.
    Submitting,
    /// Broadcast, waiting for the receipt.
    Confirming,
    Succeeded,
    Failed,
}

impl TxPhase {
    /// Whether a transaction is in flight.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Submitting | Self::Confirming)
    }
}

impl fmt::Display for TxPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Submitting => "Processing...",
            Self::Confirming => "Waiting for confirmation...",
            Self::Succeeded => "confirmed",
            Self::Failed => "failed",
        })
    }
}

/// The kinds of state-changing calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Payment,
    FeeTransfer,
    Withdrawal,
    TreasuryUpdate,
}

impl Operation {
    /// Whether only the contract owner may perform this operation.
    pub fn is_owner_only(self) -> bool {
        matches!(self, Self::Withdrawal | Self::TreasuryUpdate)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Payment => "payment",
            Self::FeeTransfer => "fee transfer",
            Self::Withdrawal => "withdrawal",
            Self::TreasuryUpdate => "treasury update",
        })
    }
}
