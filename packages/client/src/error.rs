use std::sync::Arc;

use thiserror::Error;

use crate::cache::RequestKind;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error returned by [`ReferenceCache`](crate::cache::ReferenceCache) accessors.
///
/// Every caller that awaited the same failed request receives a clone
/// sharing one underlying [`ClientError`].
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Failed to fetch {kind}: {source}")]
    Fetch {
        kind: RequestKind,
        source: Arc<ClientError>,
    },
}
