use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::{ConnectorError, ProviderError};
use crate::traits::provider::WalletProvider;
use crate::types::SdkOptions;

/// Builds a wallet SDK instance from dapp options when the connector is
/// constructed without a prebuilt instance.
pub type SdkFactory = Arc<dyn Fn(SdkOptions) -> Arc<dyn WalletSdk> + Send + Sync>;

/// The vendor wallet SDK surface this connector drives.
///
/// The SDK owns transport (deep-linking, QR pairing, bridge sessions) and
/// account storage; the connector only orchestrates its lifecycle. Signal
/// subscriptions are one-shot: each returned future resolves at most once,
/// for the next occurrence of the signal.
#[async_trait]
pub trait WalletSdk: Send + Sync {
    /// Whether `init` has already completed.
    fn is_initialized(&self) -> bool;

    /// Initialize the SDK. Idempotent; concurrent or repeated calls after
    /// completion return immediately.
    async fn init(&self) -> Result<(), ConnectorError>;

    /// The SDK's current provider reference, if it has produced one. The
    /// instance may change identity between calls while a handshake is in
    /// flight.
    fn provider(&self) -> Option<Arc<dyn WalletProvider>>;

    /// Start the connect handshake. The resolved account list is a
    /// best-effort hint; its completion ordering relative to authorization
    /// varies by wallet version.
    async fn connect(&self) -> Result<Vec<String>, ProviderError>;

    /// Terminate the active session.
    async fn terminate(&self) -> Result<(), ConnectorError>;

    /// One-shot signal fired once authorization and provider selection have
    /// both settled.
    fn provider_update_signal(&self) -> BoxFuture<'static, ()>;

    /// Whether this SDK version supports the synchronous authorization
    /// query. Drives authorization-strategy selection at construction.
    fn supports_authorized_query(&self) -> bool {
        false
    }

    /// Synchronous "already authorized" state, for SDK versions that record
    /// it before the provider-update signal fires.
    fn is_authorized(&self) -> bool {
        false
    }

    /// Whether a browser extension is serving this session. Legacy wallet
    /// versions deliver account data through the extension before the
    /// authorization boolean is recorded.
    fn is_extension_active(&self) -> bool {
        false
    }

    /// Lower-level connection object exposed by legacy SDK versions, if any.
    fn active_session(&self) -> Option<Arc<dyn SdkSession>> {
        None
    }
}

/// Lower-level connection object of legacy SDK versions.
pub trait SdkSession: Send + Sync {
    /// One-shot signal fired when the wallet records authorization.
    fn authorized_signal(&self) -> BoxFuture<'static, ()>;
}
