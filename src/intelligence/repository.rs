// Storage seams for the recommenders
//
// Recommenders only see these traits, so tests can hand them a broken store.
// `Database` is the real implementation.

use crate::db::{CatalogProduct, Database, HistoryUpsert, PurchaseHistoryRecord};
use crate::error::Result;
use crate::intelligence::Season;
use async_trait::async_trait;

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Records with the highest purchase counts, highest first
    async fn top_by_purchase_count(&self, limit: i64) -> Result<Vec<PurchaseHistoryRecord>>;

    /// Exact, case-sensitive lookup
    async fn find_by_item_name(&self, item_name: &str) -> Result<Option<PurchaseHistoryRecord>>;

    /// Insert or overwrite the record for `record.item_name`
    async fn upsert(&self, record: HistoryUpsert) -> Result<()>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Seasonal products for `season`, at most `limit`
    async fn seasonal_by_season(&self, season: Season, limit: i64) -> Result<Vec<CatalogProduct>>;

    /// First product whose name contains `name`, case-insensitive
    async fn find_by_name_like(&self, name: &str) -> Result<Option<CatalogProduct>>;
}

#[async_trait]
impl HistoryRepository for Database {
    async fn top_by_purchase_count(&self, limit: i64) -> Result<Vec<PurchaseHistoryRecord>> {
        self.get_history_by_purchase_count(limit).await
    }

    async fn find_by_item_name(&self, item_name: &str) -> Result<Option<PurchaseHistoryRecord>> {
        self.get_history(item_name).await
    }

    async fn upsert(&self, record: HistoryUpsert) -> Result<()> {
        self.upsert_history(record).await.map(|_| ())
    }
}

#[async_trait]
impl CatalogRepository for Database {
    async fn seasonal_by_season(&self, season: Season, limit: i64) -> Result<Vec<CatalogProduct>> {
        self.get_seasonal_products(season, limit).await
    }

    async fn find_by_name_like(&self, name: &str) -> Result<Option<CatalogProduct>> {
        self.find_catalog_product(name).await
    }
}

/// Store that fails every call, for exercising the degrade paths
#[cfg(test)]
pub(crate) struct OfflineStore;

#[cfg(test)]
#[async_trait]
impl HistoryRepository for OfflineStore {
    async fn top_by_purchase_count(&self, _limit: i64) -> Result<Vec<PurchaseHistoryRecord>> {
        Err(crate::error::CartError::Generic("store offline".to_string()))
    }

    async fn find_by_item_name(&self, _item_name: &str) -> Result<Option<PurchaseHistoryRecord>> {
        Err(crate::error::CartError::Generic("store offline".to_string()))
    }

    async fn upsert(&self, _record: HistoryUpsert) -> Result<()> {
        Err(crate::error::CartError::Generic("store offline".to_string()))
    }
}

#[cfg(test)]
#[async_trait]
impl CatalogRepository for OfflineStore {
    async fn seasonal_by_season(
        &self,
        _season: Season,
        _limit: i64,
    ) -> Result<Vec<CatalogProduct>> {
        Err(crate::error::CartError::Generic("store offline".to_string()))
    }

    async fn find_by_name_like(&self, _name: &str) -> Result<Option<CatalogProduct>> {
        Err(crate::error::CartError::Generic("store offline".to_string()))
    }
}
