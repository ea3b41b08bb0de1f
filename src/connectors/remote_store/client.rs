use super::{AuthGateway, AuthSession, AuthUser, ObjectStorage, ProductQuery, ProductTable};
use crate::connectors::config::RemoteStoreConfig;
use crate::connectors::errors::ConnectorError;
use crate::models::{NewProduct, Product, ProductPatch};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::Instrument;

/// PostgREST ordering matching `models::catalog_order`.
const CATALOG_ORDER: &str = "display_order.asc.nullslast,created_at.desc";

/// HTTP client for a Supabase-style backend: PostgREST under `/rest/v1`,
/// storage under `/storage/v1`, auth under `/auth/v1`.
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
    table: String,
    bucket: String,
    cache_control_secs: u64,
    http_client: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(config: RemoteStoreConfig) -> Result<Self, ConnectorError> {
        let timeout = std::time::Duration::from_secs(config.timeout_secs);
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConnectorError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key,
            access_token: config.access_token,
            table: config.table,
            bucket: config.bucket,
            cache_control_secs: config.cache_control_secs,
            http_client,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    /// Request carrying the project key and the session (or anon) bearer.
    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        self.http_client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    fn id_filter(id: i64) -> String {
        format!("eq.{}", id)
    }

    /// Turn a non-success response into a `ConnectorError`.
    async fn check(resp: Response) -> Result<Response, ConnectorError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        Err(ConnectorError::from_status(status, &body))
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ConnectorError> {
        let text = resp
            .text()
            .await
            .map_err(|e| ConnectorError::HttpError(e.to_string()))?;
        serde_json::from_str::<T>(&text).map_err(|e| {
            tracing::error!("Failed to decode remote store response: {:?}", e);
            ConnectorError::InvalidResponse(text)
        })
    }
}

#[async_trait]
impl ProductTable for SupabaseClient {
    async fn select(&self, query: &ProductQuery) -> Result<Vec<Product>, ConnectorError> {
        let span = tracing::info_span!(
            "remote_store_select",
            id = ?query.id,
            featured_only = query.featured_only
        );

        let mut params: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("order", CATALOG_ORDER.to_string()),
        ];
        if query.featured_only {
            params.push(("is_featured", "eq.true".to_string()));
        }
        if let Some(id) = query.id {
            params.push(("id", Self::id_filter(id)));
        }

        let resp = self
            .request(Method::GET, &self.table_url())
            .query(&params)
            .send()
            .instrument(span)
            .await?;

        let resp = Self::check(resp).await?;
        Self::decode::<Vec<Product>>(resp).await
    }

    async fn insert(&self, product: &NewProduct) -> Result<Product, ConnectorError> {
        let span = tracing::info_span!("remote_store_insert", title = %product.title);

        let resp = self
            .request(Method::POST, &self.table_url())
            .header("Prefer", "return=representation")
            .json(product)
            .send()
            .instrument(span)
            .await?;

        let resp = Self::check(resp).await?;
        let mut rows = Self::decode::<Vec<Product>>(resp).await?;
        if rows.is_empty() {
            return Err(ConnectorError::InvalidResponse(
                "insert returned no representation".to_string(),
            ));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Product, ConnectorError> {
        let span = tracing::info_span!("remote_store_update", id = id);

        let resp = self
            .request(Method::PATCH, &self.table_url())
            .query(&[("id", Self::id_filter(id))])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .instrument(span)
            .await?;

        let resp = Self::check(resp).await?;
        let mut rows = Self::decode::<Vec<Product>>(resp).await?;
        if rows.is_empty() {
            return Err(ConnectorError::NotFound(format!("product {} does not exist", id)));
        }
        Ok(rows.swap_remove(0))
    }

    async fn delete(&self, id: i64) -> Result<(), ConnectorError> {
        let span = tracing::info_span!("remote_store_delete", id = id);

        let resp = self
            .request(Method::DELETE, &self.table_url())
            .query(&[("id", Self::id_filter(id))])
            .send()
            .instrument(span)
            .await?;

        Self::check(resp).await.map(|_| ())
    }
}

#[async_trait]
impl ObjectStorage for SupabaseClient {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ConnectorError> {
        let span = tracing::info_span!("remote_store_upload", path = %path, size = body.len());

        let resp = self
            .request(Method::POST, &self.object_url(path))
            .header("content-type", content_type)
            .header("cache-control", format!("max-age={}", self.cache_control_secs))
            .header("x-upsert", "false")
            .body(body)
            .send()
            .instrument(span)
            .await?;

        Self::check(resp).await.map(|_| ())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    async fn remove(&self, paths: &[String]) -> Result<(), ConnectorError> {
        let span = tracing::info_span!("remote_store_remove", count = paths.len());
        let url = format!("{}/storage/v1/object/{}", self.base_url, self.bucket);

        let resp = self
            .request(Method::DELETE, &url)
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .instrument(span)
            .await?;

        Self::check(resp).await.map(|_| ())
    }
}

#[async_trait]
impl AuthGateway for SupabaseClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ConnectorError> {
        let span = tracing::info_span!("remote_store_sign_in", email = %email);
        let url = format!("{}/auth/v1/token", self.base_url);

        let resp = self
            .http_client
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .instrument(span)
            .await?;

        // The auth service answers bad credentials with 400; surface them as auth failures.
        if resp.status() == reqwest::StatusCode::BAD_REQUEST {
            let body = resp.text().await.unwrap_or_default();
            return Err(ConnectorError::Unauthorized(body));
        }

        let resp = Self::check(resp).await?;
        Self::decode::<AuthSession>(resp).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ConnectorError> {
        let span = tracing::info_span!("remote_store_sign_out");
        let url = format!("{}/auth/v1/logout", self.base_url);

        let resp = self
            .http_client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .instrument(span)
            .await?;

        Self::check(resp).await.map(|_| ())
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, ConnectorError> {
        let span = tracing::info_span!("remote_store_get_user");
        let url = format!("{}/auth/v1/user", self.base_url);

        let resp = self
            .http_client
            .get(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .instrument(span)
            .await?;

        let resp = Self::check(resp).await?;
        Self::decode::<AuthUser>(resp).await
    }
}
