use alloy_primitives::hex::FromHexError;

/// A failure reported by the wallet provider, following the
/// [EIP-1193](https://eips.ethereum.org/EIPS/eip-1193#provider-errors) error shape.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    /// The user rejected the request.
    pub const USER_REJECTED_REQUEST: i64 = 4001;
    /// The requested chain has not been added to the wallet.
    pub const UNRECOGNIZED_CHAIN: i64 = 4902;
    /// JSON-RPC internal error, used for transport failures without a provider code.
    pub const INTERNAL_ERROR: i64 = -32603;

    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn user_rejected() -> Self {
        Self::new(Self::USER_REJECTED_REQUEST, "User rejected the request.")
    }

    pub fn unrecognized_chain(chain_id: u64) -> Self {
        Self::new(Self::UNRECOGNIZED_CHAIN, format!("Unrecognized chain ID {chain_id:#x}."))
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == Self::UNRECOGNIZED_CHAIN
    }
}

/// Errors surfaced by the wallet session manager.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    #[error("No wallet provider found. Install a wallet provider to continue.")]
    ProviderUnavailable,
    #[error("{0}")]
    ConnectionRejected(String),
}

impl From<ProviderError> for WalletError {
    fn from(err: ProviderError) -> Self {
        Self::ConnectionRejected(err.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PrivateKeyError {
    #[error("Failed to create wallet from private key. Private key is invalid hex: {0}")]
    InvalidHex(#[from] FromHexError),
    #[error(
        "Failed to create wallet from private key. Invalid private key. But env var {0} exists. Is the `$` anchor missing?"
    )]
    ExistsAsEnvVar(String),
    #[error("Failed to create wallet from private key: {0}")]
    InvalidKey(String),
}
