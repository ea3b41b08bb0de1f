//! Remote store connector
//!
//! The hosted backend exposes three surfaces used by the catalog: row CRUD over
//! the `products` table, password auth, and a public object bucket for images.
//! Each surface is a trait so services can run against the HTTP client or the
//! in-memory store.

pub mod client;
pub mod init;
pub mod mock;

pub use client::SupabaseClient;
pub use init::init;
pub use mock::{MockRemoteStore, RemoteCall};

use super::errors::ConnectorError;
use crate::models::{NewProduct, Product, ProductPatch};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Row filter for a `products` select. Ordering is fixed to the catalog order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub id: Option<i64>,
    pub featured_only: bool,
}

impl ProductQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn featured() -> Self {
        Self {
            featured_only: true,
            ..Default::default()
        }
    }

    pub fn by_id(id: i64) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.id.map_or(true, |id| product.id == id) && (!self.featured_only || product.is_featured)
    }
}

/// Authenticated user as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Raw session returned by a password sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

#[async_trait]
pub trait ProductTable: Send + Sync {
    /// Rows matching `query`, in catalog order.
    async fn select(&self, query: &ProductQuery) -> Result<Vec<Product>, ConnectorError>;

    /// Insert one row and return the stored representation.
    async fn insert(&self, product: &NewProduct) -> Result<Product, ConnectorError>;

    /// Patch one row. Fails with `NotFound` when the id matches nothing.
    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Product, ConnectorError>;

    /// Delete by id. Deleting a missing id is not an error.
    async fn delete(&self, id: i64) -> Result<(), ConnectorError>;
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    fn bucket(&self) -> &str;

    /// Store `body` at `path`. Overwrites are refused.
    async fn upload(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ConnectorError>;

    /// Stable public URL for an object path.
    fn public_url(&self, path: &str) -> String;

    /// Remove several objects in one request.
    async fn remove(&self, paths: &[String]) -> Result<(), ConnectorError>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ConnectorError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), ConnectorError>;

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, ConnectorError>;
}

/// The three remote surfaces behind one cloneable handle.
#[derive(Clone)]
pub struct RemoteStore {
    pub products: Arc<dyn ProductTable>,
    pub storage: Arc<dyn ObjectStorage>,
    pub auth: Arc<dyn AuthGateway>,
}

impl RemoteStore {
    pub fn from_client<C>(client: C) -> Self
    where
        C: ProductTable + ObjectStorage + AuthGateway + 'static,
    {
        let client = Arc::new(client);
        Self {
            products: client.clone(),
            storage: client.clone(),
            auth: client,
        }
    }
}
