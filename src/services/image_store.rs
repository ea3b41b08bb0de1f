//! Image store adapter
//!
//! Uploads product images to the object bucket and turns public URLs back
//! into object paths. Product rows only ever hold the public URLs.

use crate::connectors::ObjectStorage;
use crate::errors::CatalogError;
use chrono::Utc;
use futures::future::try_join_all;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;

/// Namespace for uploads made before the product has an id.
const TEMP_NAMESPACE: &str = "temp";

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 6;

/// A file picked by the admin, not yet uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its content type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content_type = content_type_for(&file_name).to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Lower-cased alphanumeric extension, if any.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.file_name.rsplit_once('.')?;
        let ext: String = ext
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        (!ext.is_empty()).then_some(ext)
    }
}

pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_CHARSET.len());
            SUFFIX_CHARSET[idx] as char
        })
        .collect()
}

/// `<product_id|temp>/<unix millis>-<random>.<ext>`. A new path on every call.
pub fn object_path(file: &ImageFile, product_id: Option<i64>) -> String {
    let namespace = product_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| TEMP_NAMESPACE.to_string());
    let mut file_name = format!("{}-{}", Utc::now().timestamp_millis(), random_suffix());
    if let Some(ext) = file.extension() {
        file_name.push('.');
        file_name.push_str(&ext);
    }
    format!("{}/{}", namespace, file_name)
}

#[derive(Clone)]
pub struct ImageStore {
    storage: Arc<dyn ObjectStorage>,
}

impl ImageStore {
    pub fn new(storage: Arc<dyn ObjectStorage>) -> Self {
        Self { storage }
    }

    fn marker(&self) -> String {
        format!("/{}/", self.storage.bucket())
    }

    /// Object path of a public URL from this bucket; `None` for foreign or
    /// malformed URLs.
    pub fn storage_path(&self, url: &str) -> Option<String> {
        let marker = self.marker();
        let start = url.rfind(&marker)? + marker.len();
        let path = &url[start..];
        (!path.is_empty()).then(|| path.to_string())
    }

    /// Store one file and return its public URL. A rejected write is not
    /// retried; calling again generates a fresh path.
    pub async fn upload(
        &self,
        file: &ImageFile,
        product_id: Option<i64>,
    ) -> Result<String, CatalogError> {
        let path = object_path(file, product_id);
        self.storage
            .upload(&path, file.bytes.clone(), &file.content_type)
            .await
            .map_err(CatalogError::Storage)?;
        tracing::debug!(path = %path, "Image uploaded");
        Ok(self.storage.public_url(&path))
    }

    /// Upload all files concurrently. Fails with the first error; objects that
    /// were already stored stay in the bucket. URLs come back in input order.
    pub async fn upload_many(
        &self,
        files: &[ImageFile],
        product_id: Option<i64>,
    ) -> Result<Vec<String>, CatalogError> {
        try_join_all(files.iter().map(|file| self.upload(file, product_id))).await
    }

    /// Remove the object behind `url`. URLs outside the bucket are ignored.
    pub async fn remove(&self, url: &str) -> Result<(), CatalogError> {
        let Some(path) = self.storage_path(url) else {
            tracing::debug!(url = %url, "Not a bucket URL, nothing to remove");
            return Ok(());
        };
        self.storage
            .remove(&[path])
            .await
            .map_err(CatalogError::Storage)
    }

    /// Remove every derivable object in one batched request.
    pub async fn remove_many(&self, urls: &[String]) -> Result<(), CatalogError> {
        let paths: Vec<String> = urls.iter().filter_map(|url| self.storage_path(url)).collect();
        if paths.is_empty() {
            return Ok(());
        }
        self.storage
            .remove(&paths)
            .await
            .map_err(CatalogError::Storage)
    }

    /// Cleanup step: remove images, logging instead of returning failures.
    pub async fn discard(&self, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        if let Err(err) = self.remove_many(urls).await {
            tracing::warn!(count = urls.len(), "Image cleanup failed: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::{MockRemoteStore, RemoteCall};

    fn store() -> (ImageStore, MockRemoteStore) {
        let remote = MockRemoteStore::new();
        (ImageStore::new(Arc::new(remote.clone())), remote)
    }

    fn jpeg(name: &str) -> ImageFile {
        ImageFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF])
    }

    #[test]
    fn test_object_path_namespaces() {
        let file = jpeg("Vitray Foto.JPG");

        let temp = object_path(&file, None);
        assert!(temp.starts_with("temp/"), "{temp}");
        assert!(temp.ends_with(".jpg"), "{temp}");

        let owned = object_path(&file, Some(12));
        assert!(owned.starts_with("12/"), "{owned}");
    }

    #[test]
    fn test_object_path_is_fresh_each_call() {
        let file = jpeg("a.png");
        assert_ne!(object_path(&file, None), object_path(&file, None));
    }

    #[test]
    fn test_extension_sanitized() {
        assert_eq!(jpeg("x.j p/g").extension().as_deref(), Some("jpg"));
        assert_eq!(jpeg("noext").extension(), None);
        assert_eq!(jpeg("trailing.").extension(), None);
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.JPEG"), "image/jpeg");
        assert_eq!(content_type_for("a.webp"), "image/webp");
        assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
    }

    #[test]
    fn test_storage_path_derivation() {
        let (images, _) = store();
        assert_eq!(
            images.storage_path(
                "https://x.supabase.co/storage/v1/object/public/product-images/12/a.jpg"
            ),
            Some("12/a.jpg".to_string())
        );
        assert_eq!(images.storage_path("https://example.com/pictures/a.jpg"), None);
        assert_eq!(
            images.storage_path("https://x.supabase.co/storage/v1/object/public/product-images/"),
            None
        );
    }

    #[tokio::test]
    async fn test_upload_returns_public_url() {
        let (images, remote) = store();
        let url = images.upload(&jpeg("a.jpg"), Some(3)).await.unwrap();

        let path = images.storage_path(&url).unwrap();
        assert!(path.starts_with("3/"));
        assert_eq!(remote.object_paths(), vec![path]);
    }

    #[tokio::test]
    async fn test_upload_many_keeps_order_and_fails_as_a_whole() {
        let (images, remote) = store();
        let files = vec![jpeg("a.jpg"), jpeg("b.png")];
        let urls = images.upload_many(&files, None).await.unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].ends_with(".jpg"));
        assert!(urls[1].ends_with(".png"));

        remote.fail_uploads_after(1);
        let err = images.upload_many(&files, None).await.unwrap_err();
        assert!(matches!(err, CatalogError::Storage(_)));
        // The upload that went through is not cleaned up.
        assert_eq!(remote.object_paths().len(), 3);
    }

    #[tokio::test]
    async fn test_remove_ignores_foreign_url() {
        let (images, remote) = store();
        images.remove("https://example.com/a.jpg").await.unwrap();
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_remove_many_sends_only_valid_paths() {
        let (images, remote) = store();
        let urls = vec![
            remote.public_url("7/a.jpg"),
            "https://elsewhere.test/img/b.jpg".to_string(),
        ];
        images.remove_many(&urls).await.unwrap();

        assert_eq!(
            remote.calls(),
            vec![RemoteCall::Remove {
                paths: vec!["7/a.jpg".to_string()]
            }]
        );
    }

    #[tokio::test]
    async fn test_remove_many_without_valid_paths_makes_no_request() {
        let (images, remote) = store();
        images
            .remove_many(&["https://elsewhere.test/b.jpg".to_string()])
            .await
            .unwrap();
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_discard_swallows_errors() {
        let (images, remote) = store();
        remote.fail_removes(true);
        images.discard(&[remote.public_url("1/a.jpg")]).await;
        assert_eq!(remote.calls().len(), 1);
    }
}
