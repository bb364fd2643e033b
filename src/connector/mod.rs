//! Connection lifecycle for a vendor wallet SDK, exposed through the
//! uniform connector contract.
//!
//! `connect` reconciles the SDK's event-driven handshake (initialization,
//! authorization, provider identity changes, listener re-registration,
//! chain negotiation) into one deterministic operation. Concurrent
//! `connect` calls on the same connector are not serialized; the listener
//! binding left behind is whichever call resynced last. Callers wanting
//! stricter guarantees should wrap the call in their own in-flight guard.

pub mod authorization;
pub mod chain;
pub mod listeners;

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::error::{ConnectorError, ProviderError, RESOURCE_UNAVAILABLE_CODE};
use crate::traits::host::ConnectorHost;
use crate::traits::provider::WalletProvider;
use crate::traits::sdk::WalletSdk;
use crate::types::{Address, Connection, ConnectorOptions};

use authorization::AuthStrategy;
use listeners::ListenerBinding;

/// Connector adapter over a browser/mobile wallet SDK.
pub struct SdkConnector {
    sdk: Arc<dyn WalletSdk>,
    host: Arc<dyn ConnectorHost>,
    strategy: AuthStrategy,
    shim_disconnect: bool,
    shim_disconnect_key: String,
    init: OnceCell<()>,
    /// The provider reference currently considered active.
    provider: Mutex<Option<Arc<dyn WalletProvider>>>,
    /// The one active set of tracked listeners.
    binding: Mutex<Option<ListenerBinding>>,
}

impl std::fmt::Debug for SdkConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConnector")
            .field("strategy", &self.strategy)
            .field("shim_disconnect", &self.shim_disconnect)
            .field("shim_disconnect_key", &self.shim_disconnect_key)
            .finish_non_exhaustive()
    }
}

impl SdkConnector {
    /// Connector identity within the wallet-abstraction layer.
    pub const ID: &'static str = "walletSdk";

    /// Build a connector from either a prebuilt SDK instance or SDK
    /// construction options plus a factory.
    pub fn new(
        host: Arc<dyn ConnectorHost>,
        options: ConnectorOptions,
    ) -> Result<Self, ConnectorError> {
        let sdk = match (options.sdk, options.sdk_options) {
            (Some(sdk), _) => sdk,
            (None, Some(sdk_options)) => match options.sdk_factory {
                Some(factory) => factory(sdk_options),
                None => {
                    return Err(ConnectorError::Configuration(
                        "sdk options supplied without an sdk factory".to_string(),
                    ))
                }
            },
            (None, None) => {
                return Err(ConnectorError::Configuration(
                    "either an sdk instance or sdk options must be supplied".to_string(),
                ))
            }
        };

        let strategy = AuthStrategy::detect(sdk.as_ref());
        debug!(?strategy, "authorization strategy selected");

        Ok(Self {
            sdk,
            host,
            strategy,
            shim_disconnect: options.shim_disconnect,
            shim_disconnect_key: options.shim_disconnect_key,
            init: OnceCell::new(),
            provider: Mutex::new(None),
            binding: Mutex::new(None),
        })
    }

    pub fn id(&self) -> &'static str {
        Self::ID
    }

    pub fn name(&self) -> &'static str {
        "Wallet SDK"
    }

    /// Establish a connection, optionally switching to `requested_chain_id`.
    pub async fn connect(
        &self,
        requested_chain_id: Option<u64>,
    ) -> Result<Connection, ConnectorError> {
        info!(id = Self::ID, chain = ?requested_chain_id, "connecting");
        match self.do_connect(requested_chain_id).await {
            Ok(connection) => {
                info!(
                    account = %connection.account,
                    chain = connection.chain.id,
                    unsupported = connection.chain.unsupported,
                    "connected"
                );
                Ok(connection)
            }
            // Classification happens exactly once, here at the outermost
            // level, regardless of which step failed.
            Err(err) => Err(self.classify(err)),
        }
    }

    async fn do_connect(
        &self,
        requested_chain_id: Option<u64>,
    ) -> Result<Connection, ConnectorError> {
        self.ensure_initialized().await?;

        // Fire the SDK handshake without treating its outcome as
        // authoritative: completion ordering relative to authorization
        // varies by wallet version, and the authorization wait below is the
        // signal that counts. A transient rejection here must not abort the
        // flow.
        let sdk = Arc::clone(&self.sdk);
        tokio::spawn(async move {
            match sdk.connect().await {
                Ok(accounts) => debug!(hint = accounts.len(), "sdk connect trigger resolved"),
                Err(err) => debug!(%err, "sdk connect trigger rejected"),
            }
        });

        self.strategy.wait(&self.sdk).await;

        // The SDK may have swapped provider instances during the handshake;
        // rebind listeners to whichever instance is now live before reading
        // accounts or chain off it.
        self.resync_listeners().await?;
        let provider = self.get_provider().await?;

        let accounts = self.request_accounts(&provider).await?;
        let account = accounts.into_iter().next().unwrap_or_else(Address::zero);

        let chain = chain::reconcile_chain(&provider, &self.host, requested_chain_id).await?;

        if self.shim_disconnect {
            if let Some(storage) = self.host.storage() {
                storage.set_item(&self.shim_disconnect_key, "true");
            }
        }

        Ok(Connection {
            is_connected: true,
            account,
            chain,
            provider,
        })
    }

    /// Terminate the SDK session, then run the base disconnect path (which
    /// clears the shim flag and base listener state).
    pub async fn disconnect(&self) -> Result<(), ConnectorError> {
        info!(id = Self::ID, "disconnecting");
        self.sdk.terminate().await?;
        self.host.disconnect().await
    }

    /// The current provider reference, initializing the SDK first if
    /// needed and caching the reference on first use.
    pub async fn get_provider(&self) -> Result<Arc<dyn WalletProvider>, ConnectorError> {
        self.ensure_initialized().await?;

        let mut cached = self.provider.lock().await;
        if let Some(provider) = cached.as_ref() {
            return Ok(Arc::clone(provider));
        }
        let provider = self
            .sdk
            .provider()
            .ok_or(ConnectorError::ProviderUnavailable)?;
        *cached = Some(Arc::clone(&provider));
        Ok(provider)
    }

    /// Whether a previous session persisted the shim disconnect flag, i.e.
    /// the dapp was connected and has not been explicitly disconnected.
    pub fn is_authorized(&self) -> bool {
        if !self.shim_disconnect {
            return false;
        }
        self.host
            .storage()
            .and_then(|storage| storage.get_item(&self.shim_disconnect_key))
            .as_deref()
            == Some("true")
    }

    /// SDK initialization, run at most once per connector.
    async fn ensure_initialized(&self) -> Result<(), ConnectorError> {
        self.init
            .get_or_try_init(|| async {
                if !self.sdk.is_initialized() {
                    debug!("initializing wallet sdk");
                    self.sdk.init().await?;
                }
                Ok(())
            })
            .await
            .map(|_| ())
    }

    /// Re-pull the provider from the SDK, overwriting the cached reference.
    async fn refresh_provider(&self) -> Result<Arc<dyn WalletProvider>, ConnectorError> {
        let provider = self
            .sdk
            .provider()
            .ok_or(ConnectorError::ProviderUnavailable)?;
        *self.provider.lock().await = Some(Arc::clone(&provider));
        Ok(provider)
    }

    /// Detach the tracked listeners from the previously active provider and
    /// attach them to the SDK's current one. Idempotent.
    async fn resync_listeners(&self) -> Result<(), ConnectorError> {
        let mut binding = self.binding.lock().await;
        if let Some(old) = binding.take() {
            old.detach();
        }
        let provider = self.refresh_provider().await?;
        *binding = Some(ListenerBinding::attach(provider, Arc::clone(&self.host)));
        Ok(())
    }

    async fn request_accounts(
        &self,
        provider: &Arc<dyn WalletProvider>,
    ) -> Result<Vec<Address>, ConnectorError> {
        let value = provider.request("eth_requestAccounts", Value::Null).await?;
        let accounts: Vec<String> = serde_json::from_value(value)
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(accounts.into_iter().map(Address::from).collect())
    }

    fn classify(&self, err: ConnectorError) -> ConnectorError {
        if self.host.is_user_rejected(&err) {
            warn!("connect request rejected by the wallet holder");
            return ConnectorError::UserRejected(Box::new(err));
        }
        if err.rpc_code() == Some(RESOURCE_UNAVAILABLE_CODE) {
            warn!("wallet is already processing a request");
            return ConnectorError::ResourceUnavailable(Box::new(err));
        }
        err
    }
}
