use std::sync::Arc;

use tokio::sync::{watch, RwLock};

use crate::core::error::Result;
use crate::features::foods::models::FoodItem;
use crate::modules::food_store::FoodStore;

/// Local copy of the whole food collection.
///
/// The copy is dropped on every mutation and reloaded wholesale on the next
/// read. Each invalidation bumps a revision counter that listeners can watch.
pub struct FoodCatalog {
    store: Arc<dyn FoodStore>,
    cache: RwLock<Option<Vec<FoodItem>>>,
    revision: watch::Sender<u64>,
}

impl FoodCatalog {
    pub fn new(store: Arc<dyn FoodStore>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            store,
            cache: RwLock::new(None),
            revision,
        }
    }

    /// Full list, newest first. Loads from the store if the copy is stale.
    pub async fn items(&self) -> Result<Vec<FoodItem>> {
        {
            let cache = self.cache.read().await;
            if let Some(ref items) = *cache {
                return Ok(items.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another reader may have loaded it while we waited for the lock
        if let Some(ref items) = *cache {
            return Ok(items.clone());
        }

        let items = self.store.list_all().await?;
        tracing::debug!("Food catalog loaded with {} items", items.len());
        *cache = Some(items.clone());
        Ok(items)
    }

    /// Whether a copy is currently held
    #[allow(dead_code)]
    pub async fn is_loaded(&self) -> bool {
        self.cache.read().await.is_some()
    }

    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
        self.revision.send_modify(|r| *r += 1);
    }

    /// Receiver that is notified after every invalidation
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
