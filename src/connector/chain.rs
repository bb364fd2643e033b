use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::ConnectorError;
use crate::traits::host::ConnectorHost;
use crate::traits::provider::WalletProvider;
use crate::types::ChainDescriptor;

/// Parse a provider-reported chain id string as a base-16 integer. The
/// `0x` prefix is optional; some wallets omit it.
pub fn parse_chain_id(raw: &str) -> Result<u64, ConnectorError> {
    let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")).unwrap_or(raw);
    u64::from_str_radix(digits, 16).map_err(|_| ConnectorError::InvalidChainId(raw.to_string()))
}

/// Determine the connected chain, optionally switching networks.
///
/// Reads the chain id off the provider when populated, falling back to an
/// explicit `eth_chainId` request; the field may be unset before the first
/// chainChanged event fires. `unsupported` is only computed after an actual
/// switch; a passively discovered chain is never flagged.
pub async fn reconcile_chain(
    provider: &Arc<dyn WalletProvider>,
    host: &Arc<dyn ConnectorHost>,
    requested: Option<u64>,
) -> Result<ChainDescriptor, ConnectorError> {
    let hex = match provider.chain_id_hex() {
        Some(hex) => hex,
        None => {
            let value = provider.request("eth_chainId", Value::Null).await?;
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| ConnectorError::InvalidChainId(value.to_string()))?
        }
    };

    let mut id = parse_chain_id(&hex)?;
    let mut unsupported = false;

    if let Some(target) = requested {
        if target != id {
            debug!(discovered = id, target, "switching chain");
            let switched = host.switch_chain(target).await?;
            id = switched.id;
            unsupported = host.is_chain_unsupported(id);
        }
    }

    Ok(ChainDescriptor { id, unsupported })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    use crate::error::ProviderError;
    use crate::traits::provider::{EventCallback, ListenerId, ProviderEvent};
    use crate::types::{Address, Chain};

    #[derive(Debug)]
    struct StubProvider {
        chain_id_hex: Option<String>,
        rpc_chain_hex: String,
    }

    #[async_trait]
    impl WalletProvider for StubProvider {
        async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
            match method {
                "eth_chainId" => Ok(json!(self.rpc_chain_hex.clone())),
                other => Err(ProviderError::Transport(format!("unexpected method {other}"))),
            }
        }

        fn subscribe(&self, _event: ProviderEvent, _callback: EventCallback) -> ListenerId {
            ListenerId(0)
        }

        fn unsubscribe(&self, _event: ProviderEvent, _id: ListenerId) {}

        fn chain_id_hex(&self) -> Option<String> {
            self.chain_id_hex.clone()
        }

        fn instance_id(&self) -> u64 {
            1
        }
    }

    struct StubHost {
        switch_to: Mutex<Option<Chain>>,
        unsupported: bool,
    }

    #[async_trait]
    impl ConnectorHost for StubHost {
        fn on_accounts_changed(&self, _accounts: &[Address]) {}
        fn on_chain_changed(&self, _chain: &str) {}
        fn on_disconnect(&self) {}

        async fn switch_chain(&self, _chain_id: u64) -> Result<Chain, ConnectorError> {
            self.switch_to
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| ConnectorError::Configuration("no switch configured".into()))
        }

        fn is_chain_unsupported(&self, _chain_id: u64) -> bool {
            self.unsupported
        }

        fn is_user_rejected(&self, _error: &ConnectorError) -> bool {
            false
        }

        fn storage(&self) -> Option<&dyn crate::traits::host::Storage> {
            None
        }

        async fn disconnect(&self) -> Result<(), ConnectorError> {
            Ok(())
        }
    }

    #[test]
    fn parses_prefixed_and_bare_hex() {
        assert_eq!(parse_chain_id("0x1").unwrap(), 1);
        assert_eq!(parse_chain_id("0x89").unwrap(), 137);
        assert_eq!(parse_chain_id("89").unwrap(), 137);
        assert!(matches!(
            parse_chain_id("0xzz"),
            Err(ConnectorError::InvalidChainId(_))
        ));
    }

    #[tokio::test]
    async fn reads_chain_id_field_when_populated() {
        let provider: Arc<dyn WalletProvider> = Arc::new(StubProvider {
            chain_id_hex: Some("0x1".into()),
            rpc_chain_hex: "0x89".into(),
        });
        let host: Arc<dyn ConnectorHost> = Arc::new(StubHost {
            switch_to: Mutex::new(None),
            unsupported: false,
        });

        let chain = reconcile_chain(&provider, &host, None).await.unwrap();
        assert_eq!(chain, ChainDescriptor { id: 1, unsupported: false });
    }

    #[tokio::test]
    async fn falls_back_to_rpc_when_field_missing() {
        let provider: Arc<dyn WalletProvider> = Arc::new(StubProvider {
            chain_id_hex: None,
            rpc_chain_hex: "0x89".into(),
        });
        let host: Arc<dyn ConnectorHost> = Arc::new(StubHost {
            switch_to: Mutex::new(None),
            unsupported: false,
        });

        let chain = reconcile_chain(&provider, &host, None).await.unwrap();
        assert_eq!(chain.id, 137);
        assert!(!chain.unsupported);
    }

    #[tokio::test]
    async fn switch_adopts_returned_id_and_support_flag() {
        let provider: Arc<dyn WalletProvider> = Arc::new(StubProvider {
            chain_id_hex: Some("0x1".into()),
            rpc_chain_hex: "0x1".into(),
        });
        let host: Arc<dyn ConnectorHost> = Arc::new(StubHost {
            switch_to: Mutex::new(Some(Chain { id: 137, name: "Polygon".into() })),
            unsupported: true,
        });

        let chain = reconcile_chain(&provider, &host, Some(137)).await.unwrap();
        assert_eq!(chain, ChainDescriptor { id: 137, unsupported: true });
    }

    #[tokio::test]
    async fn matching_request_skips_switch() {
        let provider: Arc<dyn WalletProvider> = Arc::new(StubProvider {
            chain_id_hex: Some("0x1".into()),
            rpc_chain_hex: "0x1".into(),
        });
        // A switch attempt would error: none configured.
        let host: Arc<dyn ConnectorHost> = Arc::new(StubHost {
            switch_to: Mutex::new(None),
            unsupported: true,
        });

        let chain = reconcile_chain(&provider, &host, Some(1)).await.unwrap();
        assert_eq!(chain, ChainDescriptor { id: 1, unsupported: false });
    }
}
