use thiserror::Error;

use crate::time::Endpoint;

/// Why a contest form cannot be submitted yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Contest title must not be empty")]
    EmptyTitle,

    #[error("{endpoint} time '{timestamp}' is not a valid date and time")]
    InvalidTime {
        endpoint: Endpoint,
        timestamp: String,
    },

    #[error("End time ({end}) must not be before start time ({start})")]
    EndBeforeStart { start: i64, end: i64 },
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Failed to register route: {0}")]
    Insert(#[from] matchit::InsertError),
}
