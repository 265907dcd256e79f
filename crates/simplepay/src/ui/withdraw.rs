use super::{row, styled};
use alloy_primitives::U256;
use simplepay_common::{
    format_ether,
    style::{DIMMED, ERROR, HEADING, SUCCESS, WARN},
};
use simplepay_config::NetworkConfig;
use simplepay_contract::TransactionOutcome;
use std::fmt;

/// Owner-only withdrawal panel. Renders nothing for anyone else.
#[derive(Clone, Debug)]
pub struct WithdrawPanel<'a> {
    pub connected: bool,
    pub is_owner: bool,
    pub balance: U256,
    /// Outcome of the last withdrawal, if any.
    pub last: Option<&'a TransactionOutcome>,
    pub network: &'a NetworkConfig,
}

impl fmt::Display for WithdrawPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.connected || !self.is_owner {
            return Ok(());
        }

        styled(f, HEADING, "Owner Withdrawal")?;
        writeln!(f)?;
        row(
            f,
            "Available Balance",
            format_args!("{} {}", format_ether(self.balance), self.network.currency.symbol),
        )?;
        if self.balance.is_zero() {
            styled(f, WARN, "No funds available for withdrawal")?;
            writeln!(f)?;
        }

        match self.last {
            Some(TransactionOutcome { success: true, hash: Some(hash), .. }) => {
                styled(f, SUCCESS, "Withdrawal successful!")?;
                writeln!(f)?;
                let url = self.network.tx_url(*hash);
                styled(f, DIMMED, format_args!("  View on explorer: {url}"))?;
                writeln!(f)?;
            }
            Some(TransactionOutcome { success: false, .. }) => {
                styled(f, ERROR, "Withdrawal failed. Please try again.")?;
                writeln!(f)?;
            }
            _ => {}
        }
        Ok(())
    }
}
