use super::{row, styled};
use simplepay_common::{
    short_address,
    style::{DIMMED, ERROR, SUCCESS},
};
use simplepay_config::NetworkConfig;
use simplepay_wallets::WalletSession;
use std::fmt;

/// Wallet connection status.
#[derive(Clone, Copy, Debug)]
pub struct ConnectionWidget<'a> {
    pub session: WalletSession,
    pub connecting: bool,
    pub error: Option<&'a str>,
    pub network: &'a NetworkConfig,
}

impl fmt::Display for ConnectionWidget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(error) = self.error {
            styled(f, ERROR, format_args!("Error: {error}"))?;
            writeln!(f)?;
        }
        let Some(connection) = self.session.connection() else {
            let status = if self.connecting { "Connecting..." } else { "Not connected" };
            styled(f, DIMMED, status)?;
            return writeln!(f);
        };
        styled(f, SUCCESS, "Connected")?;
        writeln!(f)?;
        row(f, "Account", short_address(connection.0))?;
        row(f, "Network", self.network.label_for(connection.1))
    }
}
