use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};

use crate::core::error::Result;
use crate::features::foods::models::{CategoryFilter, FoodItem};
use crate::features::foods::FoodCatalog;
use crate::features::gacha::engine::{GachaEngine, GachaEvent, GachaSnapshot, StartOutcome};
use crate::features::gacha::filter::eligible;

/// Bridges the food catalog, the category filter and the engine
pub struct GachaService {
    catalog: Arc<FoodCatalog>,
    engine: GachaEngine,
    /// Held while the eligible set is recomputed
    filter_lock: Mutex<()>,
}

impl GachaService {
    pub fn new(catalog: Arc<FoodCatalog>, engine: GachaEngine) -> Self {
        Self {
            catalog,
            engine,
            filter_lock: Mutex::new(()),
        }
    }

    /// Eligible items for a selector, without touching the engine
    pub async fn eligible(&self, category: &CategoryFilter) -> Result<Vec<FoodItem>> {
        let items = self.catalog.items().await?;
        Ok(eligible(&items, category))
    }

    /// Switch the engine to another category
    pub async fn set_category(&self, category: CategoryFilter) -> Result<GachaSnapshot> {
        let _guard = self.filter_lock.lock().await;
        self.apply(category).await
    }

    /// Re-apply the current category to the latest catalog
    pub async fn refresh(&self) -> Result<GachaSnapshot> {
        let _guard = self.filter_lock.lock().await;
        self.apply(self.engine.category()).await
    }

    async fn apply(&self, category: CategoryFilter) -> Result<GachaSnapshot> {
        let items = self.eligible(&category).await?;
        tracing::debug!(
            "Gacha category set to {} ({} eligible)",
            category,
            items.len()
        );
        self.engine.set_eligible(category, items);
        Ok(self.engine.snapshot())
    }

    pub async fn spin(&self) -> Result<StartOutcome> {
        self.refresh().await?;
        let outcome = self.engine.start();
        tracing::info!("Gacha spin requested: {:?}", outcome);
        Ok(outcome)
    }

    pub fn cancel(&self) -> bool {
        self.engine.cancel()
    }

    /// Current engine state plus the size of the whole catalog
    pub async fn state(&self) -> Result<(GachaSnapshot, usize)> {
        let total = self.catalog.items().await?.len();
        Ok((self.engine.snapshot(), total))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<GachaEvent> {
        self.engine.subscribe_events()
    }

    /// Keep the eligible set in step with catalog invalidations
    pub async fn run_catalog_listener(self: Arc<Self>) {
        let mut revisions = self.catalog.subscribe();

        while revisions.changed().await.is_ok() {
            if let Err(e) = self.refresh().await {
                tracing::warn!("Failed to refresh gacha after catalog change: {}", e);
            }
        }
    }

    pub fn shutdown(&self) {
        if self.engine.cancel() {
            tracing::info!("Running gacha sequence cancelled on shutdown");
        }
    }
}
