use std::sync::Arc;

use tracing::debug;

use crate::traits::host::ConnectorHost;
use crate::traits::provider::{
    EventCallback, EventPayload, ListenerId, ProviderEvent, WalletProvider,
};

/// The one active set of tracked listeners, bound to a specific provider
/// instance.
///
/// At most one binding exists per connector. Replacing it is the listener
/// resync: detach from the (possibly stale) old provider, attach to the
/// current one. The provider reference is kept so detach targets the exact
/// instance the tokens were issued by.
pub struct ListenerBinding {
    provider: Arc<dyn WalletProvider>,
    accounts: ListenerId,
    chain: ListenerId,
    disconnect: ListenerId,
}

impl ListenerBinding {
    /// Subscribe the host's default handlers to the three tracked events on
    /// `provider`.
    pub fn attach(provider: Arc<dyn WalletProvider>, host: Arc<dyn ConnectorHost>) -> Self {
        let accounts = {
            let host = Arc::clone(&host);
            let callback: EventCallback = Arc::new(move |payload| {
                if let EventPayload::Accounts(accounts) = payload {
                    host.on_accounts_changed(&accounts);
                }
            });
            provider.subscribe(ProviderEvent::AccountsChanged, callback)
        };

        let chain = {
            let host = Arc::clone(&host);
            let callback: EventCallback = Arc::new(move |payload| {
                if let EventPayload::Chain(chain) = payload {
                    host.on_chain_changed(&chain);
                }
            });
            provider.subscribe(ProviderEvent::ChainChanged, callback)
        };

        let disconnect = {
            let callback: EventCallback = Arc::new(move |payload| {
                if let EventPayload::Disconnected(_) = payload {
                    host.on_disconnect();
                }
            });
            provider.subscribe(ProviderEvent::Disconnect, callback)
        };

        debug!(provider = provider.instance_id(), "listeners attached");

        Self {
            provider,
            accounts,
            chain,
            disconnect,
        }
    }

    /// Remove all three listeners from the provider they were attached to.
    pub fn detach(self) {
        debug!(provider = self.provider.instance_id(), "listeners detached");
        self.provider
            .unsubscribe(ProviderEvent::AccountsChanged, self.accounts);
        self.provider
            .unsubscribe(ProviderEvent::ChainChanged, self.chain);
        self.provider
            .unsubscribe(ProviderEvent::Disconnect, self.disconnect);
    }

    /// Whether this binding is attached to `provider`.
    pub fn bound_to(&self, provider: &Arc<dyn WalletProvider>) -> bool {
        self.provider.instance_id() == provider.instance_id()
    }
}
