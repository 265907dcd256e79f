use alloy_primitives::U256;

/// Last observed aggregate contract state, all values in wei.
///
/// Replaced as a whole by a successful refresh; starts out zeroed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContractSnapshot {
    pub total_payments: U256,
    pub total_fees: U256,
    pub contract_balance: U256,
}
