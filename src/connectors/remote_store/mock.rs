use super::{AuthGateway, AuthSession, AuthUser, ObjectStorage, ProductQuery, ProductTable};
use crate::connectors::errors::ConnectorError;
use crate::models::{sort_catalog, NewProduct, Product, ProductPatch};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

const MOCK_BASE_URL: &str = "https://mock.supabase.test";

/// 2025-11-30T12:00:00Z
const SERVER_EPOCH: i64 = 1_764_504_000;

/// One request observed by the in-memory store, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Select(ProductQuery),
    Insert { title: String },
    Update { id: i64, patch: ProductPatch },
    Delete { id: i64 },
    Upload { path: String },
    Remove { paths: Vec<String> },
    SignIn { email: String },
    SignOut,
    GetUser,
}

#[derive(Default)]
struct Failures {
    selects: bool,
    inserts: bool,
    deletes: bool,
    removes: bool,
    update_ids: HashSet<i64>,
    uploads_after: Option<usize>,
}

struct MockState {
    rows: Vec<Product>,
    next_id: i64,
    clock: DateTime<Utc>,
    objects: BTreeMap<String, Vec<u8>>,
    users: HashMap<String, String>,
    sessions: HashMap<String, String>,
    calls: Vec<RemoteCall>,
    failures: Failures,
    uploads_done: usize,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
            clock: DateTime::<Utc>::from_timestamp(SERVER_EPOCH, 0).unwrap_or_default(),
            objects: BTreeMap::new(),
            users: HashMap::new(),
            sessions: HashMap::new(),
            calls: Vec::new(),
            failures: Failures::default(),
            uploads_done: 0,
        }
    }
}

/// In-memory remote store: rows, objects and sessions live behind one mutex.
///
/// Clones share state, so a test can keep a handle while the services own
/// another. Each insert advances the server clock by one second so
/// `created_at` values are distinct and increasing.
#[derive(Clone, Default)]
pub struct MockRemoteStore {
    state: Arc<Mutex<MockState>>,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small seeded catalog plus one admin account, used by the offline demo.
    pub fn demo() -> Self {
        let store = Self::new().with_admin("admin@moodoo.com", "moodoo");
        let seed = [
            ("Amóre Chili", 10500.0, Some(1), true, "35cm x 45cm"),
            ("Lumière Bleue", 8200.0, Some(2), true, "30cm x 30cm"),
            ("Aurora Panel", 15750.0, Some(3), false, "50cm x 70cm"),
        ];
        for (title, price, order, featured, dimensions) in seed {
            let slug = title.to_lowercase().replace(' ', "-");
            store.seed(NewProduct {
                title: title.to_string(),
                description: Some("Handmade stained glass.".to_string()),
                price,
                images: vec![store.public_url(&format!("seed/{}.jpg", slug))],
                shopier_url: format!("https://www.shopier.com/moodoo/{}", slug),
                dimensions: Some(dimensions.to_string()),
                materials: Some("Stained glass, copper foil".to_string()),
                stock: 1,
                is_featured: featured,
                display_order: order,
            });
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panic while holding the lock only happens in a failing test; keep the data.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_admin(self, email: &str, password: &str) -> Self {
        self.lock()
            .users
            .insert(email.to_string(), password.to_string());
        self
    }

    /// Insert a row directly, without recording a call.
    pub fn seed(&self, product: NewProduct) -> Product {
        let mut state = self.lock();
        Self::insert_row(&mut state, product)
    }

    fn insert_row(state: &mut MockState, product: NewProduct) -> Product {
        state.clock = state.clock + Duration::seconds(1);
        let row = Product {
            id: state.next_id,
            title: product.title,
            description: product.description,
            price: product.price,
            images: product.images,
            shopier_url: product.shopier_url,
            dimensions: product.dimensions,
            materials: product.materials,
            stock: product.stock,
            is_featured: product.is_featured,
            display_order: product.display_order,
            created_at: state.clock,
        };
        state.next_id += 1;
        state.rows.push(row.clone());
        row
    }

    pub fn rows(&self) -> Vec<Product> {
        let mut rows = self.lock().rows.clone();
        sort_catalog(&mut rows);
        rows
    }

    pub fn row(&self, id: i64) -> Option<Product> {
        self.lock().rows.iter().find(|p| p.id == id).cloned()
    }

    pub fn object_paths(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn fail_selects(&self, fail: bool) {
        self.lock().failures.selects = fail;
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.lock().failures.inserts = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.lock().failures.deletes = fail;
    }

    pub fn fail_removes(&self, fail: bool) {
        self.lock().failures.removes = fail;
    }

    /// Every update targeting `id` is refused.
    pub fn fail_updates_for(&self, id: i64) {
        self.lock().failures.update_ids.insert(id);
    }

    /// Uploads succeed `count` more times, then are refused.
    pub fn fail_uploads_after(&self, count: usize) {
        let mut state = self.lock();
        state.failures.uploads_after = Some(state.uploads_done + count);
    }

    fn unavailable(what: &str) -> ConnectorError {
        ConnectorError::ServiceUnavailable(format!("mock {} failure", what))
    }
}

#[async_trait]
impl ProductTable for MockRemoteStore {
    async fn select(&self, query: &ProductQuery) -> Result<Vec<Product>, ConnectorError> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::Select(*query));
        if state.failures.selects {
            return Err(Self::unavailable("select"));
        }
        let mut rows: Vec<Product> = state
            .rows
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        sort_catalog(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, product: &NewProduct) -> Result<Product, ConnectorError> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::Insert {
            title: product.title.clone(),
        });
        if state.failures.inserts {
            return Err(Self::unavailable("insert"));
        }
        Ok(Self::insert_row(&mut state, product.clone()))
    }

    async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Product, ConnectorError> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::Update {
            id,
            patch: patch.clone(),
        });
        if state.failures.update_ids.contains(&id) {
            return Err(Self::unavailable("update"));
        }
        let row = state
            .rows
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ConnectorError::NotFound(format!("product {} does not exist", id)))?;
        patch.clone().apply(row);
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), ConnectorError> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::Delete { id });
        if state.failures.deletes {
            return Err(Self::unavailable("delete"));
        }
        state.rows.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for MockRemoteStore {
    fn bucket(&self) -> &str {
        "product-images"
    }

    async fn upload(
        &self,
        path: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), ConnectorError> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::Upload {
            path: path.to_string(),
        });
        if state
            .failures
            .uploads_after
            .map_or(false, |limit| state.uploads_done >= limit)
        {
            return Err(Self::unavailable("upload"));
        }
        if state.objects.contains_key(path) {
            return Err(ConnectorError::Rejected(format!(
                "The resource already exists: {}",
                path
            )));
        }
        state.objects.insert(path.to_string(), body);
        state.uploads_done += 1;
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            MOCK_BASE_URL,
            self.bucket(),
            path
        )
    }

    async fn remove(&self, paths: &[String]) -> Result<(), ConnectorError> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::Remove {
            paths: paths.to_vec(),
        });
        if state.failures.removes {
            return Err(Self::unavailable("remove"));
        }
        for path in paths {
            state.objects.remove(path);
        }
        Ok(())
    }
}

#[async_trait]
impl AuthGateway for MockRemoteStore {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ConnectorError> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::SignIn {
            email: email.to_string(),
        });
        if state.users.get(email).map(String::as_str) != Some(password) {
            return Err(ConnectorError::Unauthorized(
                "Invalid login credentials".to_string(),
            ));
        }
        let token = format!("mock-token-{}", state.sessions.len() + 1);
        state.sessions.insert(token.clone(), email.to_string());
        Ok(AuthSession {
            access_token: token,
            refresh_token: Some("mock-refresh".to_string()),
            token_type: Some("bearer".to_string()),
            expires_in: Some(3600),
            user: AuthUser {
                id: format!("user-{}", email),
                email: Some(email.to_string()),
            },
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), ConnectorError> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::SignOut);
        state.sessions.remove(access_token);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, ConnectorError> {
        let mut state = self.lock();
        state.calls.push(RemoteCall::GetUser);
        let email = state
            .sessions
            .get(access_token)
            .cloned()
            .ok_or_else(|| ConnectorError::Unauthorized("invalid JWT".to_string()))?;
        Ok(AuthUser {
            id: format!("user-{}", email),
            email: Some(email),
        })
    }
}
