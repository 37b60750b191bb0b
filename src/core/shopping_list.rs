/// Shopping list service
///
/// Item store operations used by the assistant and the CLI.

use crate::core::Searcher;
use crate::db::{AddedVia, Database, ItemInput, ItemStatus, ShoppingItem};
use crate::error::Result;
use std::sync::Arc;

// Fuzzy fallback never returns more than this
const FUZZY_LIMIT: usize = 10;

pub struct ShoppingList {
    db: Arc<Database>,
    searcher: Searcher,
}

impl ShoppingList {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            searcher: Searcher::new(Arc::clone(&db)),
            db,
        }
    }

    /// Put an item on the list
    pub async fn add_item(
        &self,
        item_name: &str,
        quantity: u32,
        category: &str,
        brand: Option<String>,
        price_range: Option<String>,
        added_via: AddedVia,
    ) -> Result<ShoppingItem> {
        self.db
            .add_item(ItemInput {
                item_name: item_name.to_string(),
                quantity: i64::from(quantity),
                category: category.to_string(),
                brand,
                price_range,
                added_via,
            })
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Option<ShoppingItem>> {
        self.db.get_item(id).await
    }

    /// Active items, newest first
    pub async fn active_items(&self) -> Result<Vec<ShoppingItem>> {
        self.db.get_active_items().await
    }

    pub async fn items_by_category(&self, category: &str) -> Result<Vec<ShoppingItem>> {
        self.db.get_items_by_category(category).await
    }

    pub async fn remove_item(&self, id: i64) -> Result<()> {
        self.db.set_item_status(id, ItemStatus::Removed).await
    }

    pub async fn complete_item(&self, id: i64) -> Result<()> {
        self.db.set_item_status(id, ItemStatus::Completed).await
    }

    /// Remove every active item whose name contains `item_name`
    pub async fn remove_by_name(&self, item_name: &str) -> Result<u64> {
        self.db.set_status_by_name(item_name, ItemStatus::Removed).await
    }

    /// Complete every active item whose name contains `item_name`
    pub async fn complete_by_name(&self, item_name: &str) -> Result<u64> {
        self.db
            .set_status_by_name(item_name, ItemStatus::Completed)
            .await
    }

    pub async fn update_quantity(&self, id: i64, quantity: i64) -> Result<()> {
        self.db.update_quantity(id, quantity).await
    }

    /// Remove everything that's still active
    pub async fn clear(&self) -> Result<u64> {
        self.db.clear_active_items().await
    }

    /// Substring search over active items
    ///
    /// With no price filter and no substring hit, falls back to fuzzy matching
    /// so "strwbrs" still finds "strawberries".
    pub async fn search(
        &self,
        query: &str,
        price_range: Option<&str>,
    ) -> Result<Vec<ShoppingItem>> {
        let items = self.db.search_items(query, price_range).await?;

        if !items.is_empty() || price_range.is_some() {
            return Ok(items);
        }

        let fuzzy = self.searcher.fuzzy_search(query, FUZZY_LIMIT).await?;
        tracing::debug!(query, hits = fuzzy.len(), "substring search empty, used fuzzy match");

        Ok(fuzzy.into_iter().map(|r| r.item).collect())
    }
}
