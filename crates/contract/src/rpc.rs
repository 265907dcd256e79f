//! [`PaymentContract`] over a JSON-RPC provider.

use crate::{
    abi::SimplePayment::{self, SimplePaymentInstance},
    call::{ContractCall, PaymentContract, PendingCall},
    error::CallError,
};
use alloy_network::{Ethereum, ReceiptResponse};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{DynProvider, PendingTransactionBuilder};
use async_trait::async_trait;

/// The deployed contract, reached through the wallet's provider.
#[derive(Clone, Debug)]
pub struct RpcPaymentContract {
    instance: SimplePaymentInstance<DynProvider>,
}

impl RpcPaymentContract {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { instance: SimplePayment::new(address, provider) }
    }
}

#[async_trait]
impl PaymentContract for RpcPaymentContract {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn total_payments(&self) -> Result<U256, CallError> {
        Ok(self.instance.totalPayments().call().await?)
    }

    async fn total_fees(&self) -> Result<U256, CallError> {
        Ok(self.instance.totalFees().call().await?)
    }

    async fn contract_balance(&self) -> Result<U256, CallError> {
        Ok(self.instance.getContractBalance().call().await?)
    }

    async fn owner(&self) -> Result<Address, CallError> {
        Ok(self.instance.owner().call().await?)
    }

    async fn treasury(&self) -> Result<Address, CallError> {
        Ok(self.instance.treasuryWallet().call().await?)
    }

    async fn submit(
        &self,
        from: Address,
        call: ContractCall,
    ) -> Result<Box<dyn PendingCall>, CallError> {
        let pending = match call {
            ContractCall::MakePayment { value } => {
                self.instance.makePayment().from(from).value(value).send().await
            }
            ContractCall::TransferFee { value } => {
                self.instance.transferFee().from(from).value(value).send().await
            }
            ContractCall::Withdraw => self.instance.withdraw().from(from).send().await,
            ContractCall::UpdateTreasury { treasury } => {
                self.instance.updateTreasuryWallet(treasury).from(from).send().await
            }
        }?;
        debug!(target: "simplepay::contract", tx_hash = %pending.tx_hash(), ?call, "transaction sent");
        Ok(Box::new(RpcPendingCall { inner: pending }))
    }
}

struct RpcPendingCall {
    inner: PendingTransactionBuilder<Ethereum>,
}

#[async_trait]
impl PendingCall for RpcPendingCall {
    fn tx_hash(&self) -> TxHash {
        *self.inner.tx_hash()
    }

    async fn confirm(self: Box<Self>) -> Result<TxHash, CallError> {
        let receipt = self.inner.get_receipt().await?;
        let hash = ReceiptResponse::transaction_hash(&receipt);
        if !ReceiptResponse::status(&receipt) {
            return Err(CallError::Reverted { hash });
        }
        Ok(hash)
    }
}
