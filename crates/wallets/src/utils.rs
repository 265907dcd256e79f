use crate::error::PrivateKeyError;
use alloy_primitives::{B256, hex::FromHex};
use alloy_signer_local::PrivateKeySigner;

fn ensure_pk_not_env(pk: &str) -> Result<(), PrivateKeyError> {
    if !pk.starts_with("0x") && std::env::var(pk).is_ok() {
        return Err(PrivateKeyError::ExistsAsEnvVar(pk.to_string()));
    }
    Ok(())
}

/// Validates and sanitizes a hex private key, returning the local signer for it.
pub fn create_private_key_signer(private_key: &str) -> Result<PrivateKeySigner, PrivateKeyError> {
    let private_key = private_key.trim();
    let key = match B256::from_hex(private_key) {
        Ok(key) => key,
        Err(err) => {
            ensure_pk_not_env(private_key)?;
            return Err(err.into());
        }
    };
    match PrivateKeySigner::from_bytes(&key) {
        Ok(signer) => Ok(signer),
        Err(err) => {
            ensure_pk_not_env(private_key)?;
            Err(PrivateKeyError::InvalidKey(err.to_string()))
        }
    }
}
