use super::styled;
use simplepay_common::style::{DIMMED, HEADING};
use simplepay_config::NetworkConfig;
use std::fmt;

const TITLE: &str = "SimplePayment DApp";

/// Application title.
#[derive(Clone, Copy, Debug, Default)]
pub struct Header;

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        styled(f, HEADING, TITLE)?;
        writeln!(f)?;
        styled(f, DIMMED, "Blockchain Payment System")?;
        writeln!(f)
    }
}

/// Resource links and the security note.
#[derive(Clone, Copy, Debug)]
pub struct Footer<'a> {
    pub network: &'a NetworkConfig,
}

impl fmt::Display for Footer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}: a secure blockchain payment system built on Ethereum.")?;
        writeln!(f)?;
        styled(f, HEADING, "Resources")?;
        writeln!(f)?;
        writeln!(f, "  Block explorer  {}", self.network.explorer_url)?;
        if let Some(faucet) = &self.network.faucet_url {
            writeln!(f, "  Get test ETH    {faucet}")?;
        }
        writeln!(f)?;
        styled(f, HEADING, "Security")?;
        writeln!(f)?;
        writeln!(f, "  Always verify contract addresses and use testnet for testing.")
    }
}
