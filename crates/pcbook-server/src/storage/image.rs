use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("cannot write image file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Index entry for one persisted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub laptop_id: String,
    pub image_type: String,
    pub path: PathBuf,
    pub size: usize,
}

/// Writes images to a directory and indexes them by generated ID.
#[derive(Clone)]
pub struct DiskImageStore {
    image_dir: PathBuf,
    images: Arc<RwLock<HashMap<String, ImageInfo>>>,
}

impl DiskImageStore {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            images: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Persist `data` as `<image_dir>/<id><image_type>` and index it.
    ///
    /// The file is written before the index lock is taken. A failed write
    /// leaves no index entry; a partially written file is not removed.
    pub async fn save(
        &self,
        laptop_id: &str,
        image_type: &str,
        data: &[u8],
    ) -> Result<String, ImageStoreError> {
        let image_id = Uuid::new_v4().to_string();
        let path = self.image_dir.join(format!("{image_id}{image_type}"));

        tokio::fs::write(&path, data)
            .await
            .map_err(|source| ImageStoreError::Write {
                path: path.clone(),
                source,
            })?;

        let info = ImageInfo {
            laptop_id: laptop_id.to_string(),
            image_type: image_type.to_string(),
            path,
            size: data.len(),
        };
        self.images.write().await.insert(image_id.clone(), info);
        debug!(image_id = %image_id, laptop_id, size = data.len(), "Image indexed");
        Ok(image_id)
    }

    pub async fn get(&self, image_id: &str) -> Option<ImageInfo> {
        self.images.read().await.get(image_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.images.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.images.read().await.is_empty()
    }
}
