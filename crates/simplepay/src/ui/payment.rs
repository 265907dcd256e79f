use super::{row, styled};
use simplepay_common::{
    format_ether,
    style::{DIMMED, ERROR, HEADING, SUCCESS, WARN},
};
use simplepay_config::NetworkConfig;
use simplepay_contract::{ContractSnapshot, Operation, TransactionOutcome, TxPhase};
use std::fmt;

/// Contract statistics and the result of the last payment or fee transfer.
#[derive(Clone, Debug)]
pub struct PaymentPanel<'a> {
    pub connected: bool,
    pub snapshot: ContractSnapshot,
    pub phase: TxPhase,
    pub error: Option<&'a str>,
    /// The most recent operation and its outcome.
    pub last: Option<(Operation, &'a TransactionOutcome)>,
    pub network: &'a NetworkConfig,
}

impl fmt::Display for PaymentPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.connected {
            styled(f, HEADING, "Connect Your Wallet")?;
            writeln!(f)?;
            return writeln!(f, "Please connect your wallet to interact with the smart contract.");
        }

        styled(f, HEADING, "Contract Statistics")?;
        writeln!(f)?;
        let currency = &self.network.currency.symbol;
        let ContractSnapshot { total_payments, total_fees, contract_balance } = self.snapshot;
        row(f, "Total Payments", format_args!("{} {currency}", format_ether(total_payments)))?;
        row(f, "Total Fees", format_args!("{} {currency}", format_ether(total_fees)))?;
        row(f, "Contract Balance", format_args!("{} {currency}", format_ether(contract_balance)))?;

        if self.phase.is_pending() {
            styled(f, WARN, self.phase)?;
            writeln!(f)?;
        }
        if let Some(error) = self.error {
            styled(f, ERROR, format_args!("Error: {error}"))?;
            writeln!(f)?;
        }

        let Some((operation, outcome)) = self.last else { return Ok(()) };
        let label = match operation {
            Operation::Payment => "Payment",
            Operation::FeeTransfer => "Fee transfer",
            Operation::Withdrawal | Operation::TreasuryUpdate => return Ok(()),
        };
        if let (true, Some(hash)) = (outcome.success, outcome.hash) {
            styled(f, SUCCESS, format_args!("{label} successful!"))?;
            writeln!(f)?;
            styled(f, DIMMED, format_args!("  View on explorer: {}", self.network.tx_url(hash)))?;
            writeln!(f)?;
        }
        Ok(())
    }
}
