//! Collaborator seams: the wallet SDK, the provider reference it hands out,
//! and the wallet-abstraction layer hosting this connector. The connector
//! core is written entirely against these traits; production wiring supplies
//! vendor-backed implementations, tests supply mocks.

pub mod host;
pub mod provider;
pub mod sdk;

pub use host::{ConnectorHost, Storage};
pub use provider::{EventCallback, EventPayload, ListenerId, ProviderEvent, WalletProvider};
pub use sdk::{SdkFactory, SdkSession, WalletSdk};
