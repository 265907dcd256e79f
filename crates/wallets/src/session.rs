use alloy_primitives::{Address, ChainId};

/// An authorized account on a specific chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection(pub Address, pub ChainId);

impl Connection {
    pub fn new(address: Address, chain_id: ChainId) -> Self {
        Self(address, chain_id)
    }
}

/// The authoritative view of the wallet connection.
///
/// A session is either disconnected or holds both an address and a chain id; there is no
/// state in between.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalletSession {
    connection: Option<Connection>,
}

impl WalletSession {
    /// A session without a connection.
    pub const fn disconnected() -> Self {
        Self { connection: None }
    }

    pub const fn connected(address: Address, chain_id: ChainId) -> Self {
        Self { connection: Some(Connection(address, chain_id)) }
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn address(&self) -> Option<Address> {
        self.connection.map(|Connection(address, _)| address)
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        self.connection.map(|Connection(_, chain_id)| chain_id)
    }

    pub fn connection(&self) -> Option<Connection> {
        self.connection
    }
}

impl From<Connection> for WalletSession {
    fn from(connection: Connection) -> Self {
        Self { connection: Some(connection) }
    }
}

impl From<Option<Connection>> for WalletSession {
    fn from(connection: Option<Connection>) -> Self {
        Self { connection }
    }
}
