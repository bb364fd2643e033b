use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::traits::provider::WalletProvider;
use crate::traits::sdk::{SdkFactory, WalletSdk};

/// Storage key under which the shim disconnect flag is persisted when no
/// custom key is configured.
pub const DEFAULT_SHIM_DISCONNECT_KEY: &str = "walletSdk.shimDisconnect";

/// An Ethereum account address as reported by the wallet, `0x`-prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Placeholder address returned when the wallet reports no accounts.
    pub fn zero() -> Self {
        Address("0x".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Address(s.to_string())
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Address(s)
    }
}

/// Outcome of chain reconciliation for one connection.
///
/// `unsupported` is only ever true when a chain switch was requested and the
/// switched-to chain falls outside the configured supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    /// Decimal chain id, parsed from the provider's hexadecimal string.
    pub id: u64,
    pub unsupported: bool,
}

/// Chain metadata handed back by the wallet-abstraction layer after a
/// network switch. The connector adopts only `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: u64,
    pub name: String,
}

/// Result of a successful `connect` call. Produced fresh every time, never
/// cached between calls.
#[derive(Clone)]
pub struct Connection {
    pub is_connected: bool,
    pub account: Address,
    pub chain: ChainDescriptor,
    /// The provider reference that was live when the connection settled.
    pub provider: Arc<dyn WalletProvider>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("is_connected", &self.is_connected)
            .field("account", &self.account)
            .field("chain", &self.chain)
            .field("provider", &self.provider.instance_id())
            .finish()
    }
}

/// Dapp metadata used to build a wallet SDK instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SdkOptions {
    /// Name shown to the wallet holder during pairing.
    pub dapp_name: String,

    /// Origin URL shown to the wallet holder during pairing.
    pub dapp_url: Option<String>,

    /// Prefer deep-linking into an installed mobile wallet over QR pairing.
    pub prefer_deeplink: bool,
}

impl SdkOptions {
    pub fn new(dapp_name: impl Into<String>) -> Self {
        Self {
            dapp_name: dapp_name.into(),
            dapp_url: None,
            prefer_deeplink: false,
        }
    }

    pub fn with_dapp_url(mut self, url: impl Into<String>) -> Self {
        self.dapp_url = Some(url.into());
        self
    }

    pub fn with_deeplink(mut self, prefer: bool) -> Self {
        self.prefer_deeplink = prefer;
        self
    }
}

/// Construction options for the connector.
///
/// Either `sdk` (a prebuilt instance) or `sdk_options` together with
/// `sdk_factory` must be supplied; providing neither is a configuration
/// error raised synchronously at construction time.
#[derive(Clone)]
pub struct ConnectorOptions {
    /// Prebuilt wallet SDK instance.
    pub sdk: Option<Arc<dyn WalletSdk>>,

    /// Options from which to build an SDK instance via `sdk_factory`.
    pub sdk_options: Option<SdkOptions>,

    /// Builds an SDK instance from `sdk_options` when no prebuilt instance
    /// is supplied.
    pub sdk_factory: Option<SdkFactory>,

    /// Persist the "was connected" flag on successful connect so callers can
    /// distinguish a fresh session from an explicit disconnect across
    /// reloads.
    pub shim_disconnect: bool,

    /// Storage key for the shim disconnect flag.
    pub shim_disconnect_key: String,
}

impl Default for ConnectorOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorOptions {
    pub fn new() -> Self {
        Self {
            sdk: None,
            sdk_options: None,
            sdk_factory: None,
            shim_disconnect: false,
            shim_disconnect_key: DEFAULT_SHIM_DISCONNECT_KEY.to_string(),
        }
    }

    pub fn with_sdk(mut self, sdk: Arc<dyn WalletSdk>) -> Self {
        self.sdk = Some(sdk);
        self
    }

    pub fn with_sdk_options(mut self, options: SdkOptions, factory: SdkFactory) -> Self {
        self.sdk_options = Some(options);
        self.sdk_factory = Some(factory);
        self
    }

    pub fn with_shim_disconnect(mut self, enabled: bool) -> Self {
        self.shim_disconnect = enabled;
        self
    }

    pub fn with_shim_disconnect_key(mut self, key: impl Into<String>) -> Self {
        self.shim_disconnect_key = key.into();
        self
    }
}

impl fmt::Debug for ConnectorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorOptions")
            .field("sdk", &self.sdk.is_some())
            .field("sdk_options", &self.sdk_options)
            .field("sdk_factory", &self.sdk_factory.is_some())
            .field("shim_disconnect", &self.shim_disconnect)
            .field("shim_disconnect_key", &self.shim_disconnect_key)
            .finish()
    }
}
