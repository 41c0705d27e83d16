use async_trait::async_trait;
use common::{ProblemMap, ProblemModelMap};

use crate::error::ClientError;

/// Where reference collections come from.
///
/// [`ApiClient`](crate::api::ApiClient) is the network implementation; the
/// cache only ever talks to this trait.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch_problems(&self) -> Result<ProblemMap, ClientError>;

    async fn fetch_problem_models(&self) -> Result<ProblemModelMap, ClientError>;
}
