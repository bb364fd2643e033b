/// JSON-RPC error code emitted by wallet providers when a conflicting
/// request is already being processed.
pub const RESOURCE_UNAVAILABLE_CODE: i64 = -32002;

/// Errors surfaced by a wallet provider reference.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    /// JSON-RPC level error carrying the provider's numeric code.
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Transport-level failure between the dapp and the wallet.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider returned a response the connector could not interpret.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        ProviderError::Rpc {
            code,
            message: message.into(),
        }
    }

    /// Numeric JSON-RPC code, when this error carries one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ProviderError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Errors that can occur in the connector lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Configuration or construction error.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The wallet holder declined the request.
    #[error("user rejected the request")]
    UserRejected(#[source] Box<ConnectorError>),

    /// The wallet is already processing a conflicting request.
    #[error("wallet is already processing a request")]
    ResourceUnavailable(#[source] Box<ConnectorError>),

    /// The SDK has no provider reference to hand out.
    #[error("no provider available from the wallet SDK")]
    ProviderUnavailable,

    /// A chain id string that does not parse as a hexadecimal integer.
    #[error("invalid chain id: {0:?}")]
    InvalidChainId(String),

    /// Provider-level failure, passed through unmodified.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Uncategorized collaborator failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConnectorError {
    /// The JSON-RPC code carried by this error, if any, looking through
    /// classification wrappers.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            ConnectorError::Provider(e) => e.code(),
            ConnectorError::UserRejected(inner) | ConnectorError::ResourceUnavailable(inner) => {
                inner.rpc_code()
            }
            _ => None,
        }
    }

    /// True when this is the typed user-rejection error.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, ConnectorError::UserRejected(_))
    }

    /// True when this is the typed request-already-pending error.
    pub fn is_resource_unavailable(&self) -> bool {
        matches!(self, ConnectorError::ResourceUnavailable(_))
    }
}
