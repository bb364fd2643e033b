use async_trait::async_trait;

use crate::error::ConnectorError;
use crate::types::{Address, Chain};

/// Persistent key-value storage supplied by the wallet-abstraction layer.
/// The connector writes a single flag to it (the shim disconnect key).
pub trait Storage: Send + Sync {
    fn set_item(&self, key: &str, value: &str);
    fn get_item(&self, key: &str) -> Option<String>;
    fn remove_item(&self, key: &str);
}

/// The generic connector base this adapter plugs into.
///
/// Supplies the default event handlers the resynced listeners dispatch to,
/// chain switching and support checks, error predicates, storage, and its
/// own disconnect path (which clears the shim flag and base listener state).
#[async_trait]
pub trait ConnectorHost: Send + Sync {
    /// Default handler for the provider's accountsChanged event.
    fn on_accounts_changed(&self, accounts: &[Address]);

    /// Default handler for the provider's chainChanged event. `chain` is the
    /// hexadecimal id string as emitted by the provider.
    fn on_chain_changed(&self, chain: &str);

    /// Default handler for the provider's disconnect event.
    fn on_disconnect(&self);

    /// Ask the wallet to switch networks; returns the chain switched to.
    async fn switch_chain(&self, chain_id: u64) -> Result<Chain, ConnectorError>;

    /// Whether `chain_id` falls outside the configured supported set.
    fn is_chain_unsupported(&self, chain_id: u64) -> bool;

    /// Whether `error` represents the wallet holder declining a request.
    fn is_user_rejected(&self, error: &ConnectorError) -> bool;

    /// Persistent storage, when the host carries one.
    fn storage(&self) -> Option<&dyn Storage>;

    /// The base disconnect path.
    async fn disconnect(&self) -> Result<(), ConnectorError>;
}
