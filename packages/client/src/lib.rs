pub mod api;
pub mod cache;
pub mod error;
pub mod source;

pub use api::{ApiClient, UserInfo};
pub use cache::{ReferenceCache, RequestKind};
pub use error::{CacheError, ClientError};
pub use source::ReferenceSource;
