pub mod auth;
pub mod indexing_client;

pub use auth::{Credentials, ServiceAccount, TokenProvider};
pub use indexing_client::{ChangeType, IndexingApi, IndexingClient};
