use super::{row, styled};
use alloy_primitives::Address;
use simplepay_common::{short_address, style::HEADING};
use simplepay_config::NetworkConfig;
use std::fmt;

/// Static facts about the deployed contract.
#[derive(Clone, Copy, Debug)]
pub struct InfoPanel<'a> {
    pub contract: Address,
    pub treasury: Option<Address>,
    pub network: &'a NetworkConfig,
}

impl fmt::Display for InfoPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        styled(f, HEADING, "Contract Information")?;
        writeln!(f)?;
        row(
            f,
            "Contract Address",
            format_args!(
                "{} ({})",
                short_address(self.contract),
                self.network.address_url(self.contract)
            ),
        )?;
        row(f, "Network", &self.network.label)?;
        row(f, "Chain ID", self.network.chain_id)?;
        if let Some(treasury) = self.treasury {
            row(f, "Treasury", short_address(treasury))?;
        }
        Ok(())
    }
}
