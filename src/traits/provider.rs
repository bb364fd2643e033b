use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProviderError;
use crate::types::Address;

/// Events the connector keeps tracked listeners for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEvent {
    AccountsChanged,
    ChainChanged,
    Disconnect,
}

impl ProviderEvent {
    /// The three events whose listeners are resynced as a unit.
    pub const TRACKED: [ProviderEvent; 3] = [
        ProviderEvent::AccountsChanged,
        ProviderEvent::ChainChanged,
        ProviderEvent::Disconnect,
    ];

    /// Wire name of the event on the provider.
    pub fn name(&self) -> &'static str {
        match self {
            ProviderEvent::AccountsChanged => "accountsChanged",
            ProviderEvent::ChainChanged => "chainChanged",
            ProviderEvent::Disconnect => "disconnect",
        }
    }
}

impl fmt::Display for ProviderEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload delivered to an event callback.
#[derive(Debug, Clone)]
pub enum EventPayload {
    Accounts(Vec<Address>),
    /// Hexadecimal chain id string as emitted by the provider.
    Chain(String),
    Disconnected(Option<ProviderError>),
}

/// Callback registered on a provider for a tracked event.
pub type EventCallback = Arc<dyn Fn(EventPayload) + Send + Sync>;

/// Token identifying one registered listener, used to unsubscribe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A wallet provider reference.
///
/// The reference is not uniquely owned; the SDK may hold (and replace) its
/// own. `instance_id` gives the identity the connector uses to detect that
/// the SDK swapped providers mid-handshake.
#[async_trait]
pub trait WalletProvider: Send + Sync + fmt::Debug {
    /// Issue a JSON-RPC request through the wallet.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Register a callback for `event`, returning the token to remove it.
    fn subscribe(&self, event: ProviderEvent, callback: EventCallback) -> ListenerId;

    /// Remove a previously registered callback. Unknown tokens are ignored.
    fn unsubscribe(&self, event: ProviderEvent, id: ListenerId);

    /// Synchronously readable chain id, `0x`-prefixed hexadecimal. May be
    /// unset before the first chainChanged event fires.
    fn chain_id_hex(&self) -> Option<String>;

    /// Stable identity of this provider instance.
    fn instance_id(&self) -> u64;
}
