use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use pcbook_proto::v1::Laptop;

use super::StoreError;
use crate::context::{CallContext, ContextError};

/// Why a search stopped before visiting every laptop.
#[derive(Debug, Error)]
pub enum SearchError<E> {
    #[error("search aborted: {0}")]
    Context(#[from] ContextError),

    #[error("search callback failed: {0}")]
    Callback(E),
}

/// Thread-safe catalog of laptops keyed by ID.
#[derive(Clone, Default)]
pub struct LaptopStore {
    laptops: Arc<RwLock<HashMap<String, Laptop>>>,
}

impl LaptopStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `laptop` and return its final ID.
    ///
    /// An empty ID is replaced with a fresh v4 UUID. A supplied ID must parse
    /// as a UUID and is kept exactly as sent, so later lookups by that string
    /// find the record.
    pub async fn save(&self, mut laptop: Laptop) -> Result<String, StoreError> {
        if laptop.id.is_empty() {
            laptop.id = Uuid::new_v4().to_string();
        } else {
            Uuid::parse_str(&laptop.id)?;
        }

        let id = laptop.id.clone();
        match self.laptops.write().await.entry(id.clone()) {
            Entry::Occupied(_) => return Err(StoreError::AlreadyExists(id)),
            Entry::Vacant(slot) => {
                slot.insert(laptop);
            }
        }
        debug!(laptop_id = %id, "Laptop saved");
        Ok(id)
    }

    pub async fn find(&self, id: &str) -> Option<Laptop> {
        self.laptops.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.laptops.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.laptops.read().await.is_empty()
    }

    /// Visit every laptop, passing each one `matches` accepts to `on_match`.
    ///
    /// The key set is snapshotted up front and each record is copied under
    /// its own short read guard, so writers are never blocked for the whole
    /// scan. Laptops saved after the snapshot are not visited. `ctx` is
    /// checked before every record; a failed `on_match` stops the scan.
    /// Returns the number of matches delivered.
    pub async fn search<P, F, Fut, E>(
        &self,
        ctx: &CallContext,
        mut matches: P,
        mut on_match: F,
    ) -> Result<usize, SearchError<E>>
    where
        P: FnMut(&Laptop) -> bool,
        F: FnMut(Laptop) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let ids: Vec<String> = self.laptops.read().await.keys().cloned().collect();

        let mut delivered = 0;
        for id in ids {
            ctx.check()?;

            let Some(laptop) = self.find(&id).await else {
                continue;
            };
            if !matches(&laptop) {
                continue;
            }
            on_match(laptop).await.map_err(SearchError::Callback)?;
            delivered += 1;
        }
        Ok(delivered)
    }
}
