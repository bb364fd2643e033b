//! Wallet SDK connector
//!
//! This crate adapts a vendor-supplied browser/mobile wallet SDK to the
//! uniform connector contract consumed by a wallet-abstraction layer. Its
//! core is the connection lifecycle state machine: SDK initialization,
//! wallet authorization (tolerating both signal-driven and legacy SDK
//! variants), listener re-registration onto whichever provider instance is
//! currently live, account discovery, and chain negotiation — reconciled
//! into a single deterministic `connect` operation.

pub mod connector;
pub mod error;
pub mod traits;
pub mod types;

pub use connector::authorization::AuthStrategy;
pub use connector::chain::parse_chain_id;
pub use connector::listeners::ListenerBinding;
pub use connector::SdkConnector;
pub use error::{ConnectorError, ProviderError, RESOURCE_UNAVAILABLE_CODE};
pub use traits::{
    ConnectorHost, EventCallback, EventPayload, ListenerId, ProviderEvent, SdkFactory,
    SdkSession, Storage, WalletProvider, WalletSdk,
};
pub use types::{
    Address, Chain, ChainDescriptor, Connection, ConnectorOptions, SdkOptions,
    DEFAULT_SHIM_DISCONNECT_KEY,
};

pub type Result<T> = std::result::Result<T, ConnectorError>;
