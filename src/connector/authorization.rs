use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::traits::sdk::WalletSdk;

/// How the connector decides the wallet has authorized the session.
///
/// Selected once at construction from the capabilities the SDK exposes,
/// rather than branching per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// The SDK emits a one-shot provider-update signal once authorization
    /// and provider selection have both settled. Waiting on it alone is
    /// sufficient.
    Signal,

    /// Older wallet/SDK combinations record authorization synchronously, or
    /// expose it through a lower-level session object, possibly after
    /// account data was already delivered. The synchronous check runs in
    /// parallel with the primary signal so neither path starves the other.
    Legacy,
}

impl AuthStrategy {
    /// Pick the strategy matching the SDK's capability surface.
    pub fn detect(sdk: &dyn WalletSdk) -> Self {
        if sdk.supports_authorized_query() || sdk.active_session().is_some() {
            AuthStrategy::Legacy
        } else {
            AuthStrategy::Signal
        }
    }

    /// Resolve once the wallet has authorized the current session.
    ///
    /// Every candidate path writes a shared first-write-wins completion
    /// cell; whichever settles first wins and late writers are no-ops. There
    /// is deliberately no timeout: a wait that never receives a signal hangs,
    /// and callers needing a deadline wrap this externally.
    pub async fn wait(&self, sdk: &Arc<dyn WalletSdk>) {
        let (done, mut completion) = mpsc::channel::<()>(1);

        // Primary path, used by both strategies.
        let signal = sdk.provider_update_signal();
        let primary = done.clone();
        tokio::spawn(async move {
            signal.await;
            let _ = primary.try_send(());
        });

        if *self == AuthStrategy::Legacy {
            if sdk.is_authorized() || sdk.is_extension_active() {
                debug!("wallet already authorized");
                let _ = done.try_send(());
            } else if let Some(session) = sdk.active_session() {
                let signal = session.authorized_signal();
                let legacy = done.clone();
                tokio::spawn(async move {
                    signal.await;
                    let _ = legacy.try_send(());
                });
            }
        }

        drop(done);
        if completion.recv().await.is_none() {
            // All paths went away without firing; keep the documented
            // no-timeout semantics rather than resolving spuriously.
            futures::future::pending::<()>().await;
        }
        debug!("authorization settled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::Notify;

    use crate::error::{ConnectorError, ProviderError};
    use crate::traits::provider::WalletProvider;
    use crate::traits::sdk::SdkSession;

    #[derive(Default)]
    struct StubSdk {
        authorized: AtomicBool,
        extension_active: AtomicBool,
        legacy: bool,
        update: Arc<Notify>,
        session: Option<Arc<NotifySession>>,
    }

    struct NotifySession {
        authorized: Arc<Notify>,
    }

    impl SdkSession for NotifySession {
        fn authorized_signal(&self) -> BoxFuture<'static, ()> {
            let notify = Arc::clone(&self.authorized);
            async move { notify.notified().await }.boxed()
        }
    }

    #[async_trait]
    impl WalletSdk for StubSdk {
        fn is_initialized(&self) -> bool {
            true
        }

        async fn init(&self) -> Result<(), ConnectorError> {
            Ok(())
        }

        fn provider(&self) -> Option<Arc<dyn WalletProvider>> {
            None
        }

        async fn connect(&self) -> Result<Vec<String>, ProviderError> {
            Ok(vec![])
        }

        async fn terminate(&self) -> Result<(), ConnectorError> {
            Ok(())
        }

        fn provider_update_signal(&self) -> BoxFuture<'static, ()> {
            let notify = Arc::clone(&self.update);
            async move { notify.notified().await }.boxed()
        }

        fn supports_authorized_query(&self) -> bool {
            self.legacy
        }

        fn is_authorized(&self) -> bool {
            self.authorized.load(Ordering::SeqCst)
        }

        fn is_extension_active(&self) -> bool {
            self.extension_active.load(Ordering::SeqCst)
        }

        fn active_session(&self) -> Option<Arc<dyn SdkSession>> {
            self.session
                .as_ref()
                .map(|s| Arc::clone(s) as Arc<dyn SdkSession>)
        }
    }

    #[test]
    fn detects_legacy_from_capabilities() {
        let signal_only = StubSdk::default();
        assert_eq!(AuthStrategy::detect(&signal_only), AuthStrategy::Signal);

        let legacy = StubSdk {
            legacy: true,
            ..StubSdk::default()
        };
        assert_eq!(AuthStrategy::detect(&legacy), AuthStrategy::Legacy);
    }

    #[tokio::test]
    async fn signal_strategy_resolves_on_provider_update() {
        let sdk = Arc::new(StubSdk::default());
        // Permit is stored, so firing before the wait polls is safe.
        sdk.update.notify_one();

        let dyn_sdk: Arc<dyn WalletSdk> = sdk;
        AuthStrategy::Signal.wait(&dyn_sdk).await;
    }

    #[tokio::test]
    async fn legacy_strategy_short_circuits_when_already_authorized() {
        let sdk = Arc::new(StubSdk {
            legacy: true,
            ..StubSdk::default()
        });
        sdk.authorized.store(true, Ordering::SeqCst);

        let dyn_sdk: Arc<dyn WalletSdk> = sdk;
        // Never fires the provider-update signal; the sync check must win.
        AuthStrategy::Legacy.wait(&dyn_sdk).await;
    }

    #[tokio::test]
    async fn legacy_strategy_accepts_extension_active() {
        let sdk = Arc::new(StubSdk {
            legacy: true,
            ..StubSdk::default()
        });
        sdk.extension_active.store(true, Ordering::SeqCst);

        let dyn_sdk: Arc<dyn WalletSdk> = sdk;
        AuthStrategy::Legacy.wait(&dyn_sdk).await;
    }

    #[tokio::test]
    async fn legacy_strategy_resolves_on_session_signal() {
        let authorized = Arc::new(Notify::new());
        let sdk = Arc::new(StubSdk {
            legacy: true,
            session: Some(Arc::new(NotifySession {
                authorized: Arc::clone(&authorized),
            })),
            ..StubSdk::default()
        });
        authorized.notify_one();

        let dyn_sdk: Arc<dyn WalletSdk> = sdk;
        AuthStrategy::Legacy.wait(&dyn_sdk).await;
    }
}
