//! External Service Connectors
//!
//! All calls to the hosted backend go through this module so the catalog
//! services stay independent of HTTP and testable against the in-memory store.
//!
//! ## Architecture Pattern
//!
//! 1. Define traits in `remote_store/mod.rs` → allows the in-memory store in tests
//! 2. Implement the HTTP client in `remote_store/client.rs`
//! 3. Configuration in `config.rs`
//! 4. Hand `Arc<dyn Trait>` handles to services → services never see reqwest
//!
//! ## Testing
//!
//! ```ignore
//! #[tokio::test]
//! async fn lists_without_http() {
//!     let store = MockRemoteStore::new();
//!     let repository = ProductRepository::new(Arc::new(store.clone()));
//!     assert!(repository.list_all().await.unwrap().is_empty());
//! }
//! ```

pub mod config;
pub mod errors;
pub mod remote_store;

pub use config::{ConnectorConfig, RemoteStoreConfig};
pub use errors::ConnectorError;
pub use remote_store::{
    AuthGateway, AuthSession, AuthUser, MockRemoteStore, ObjectStorage, ProductQuery,
    ProductTable, RemoteCall, RemoteStore, SupabaseClient,
};

pub use remote_store::init as init_remote_store;
