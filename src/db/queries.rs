/// SQL query functions for database operations
///
/// All queries use sqlx for type safety.

use crate::db::models::*;
use crate::db::Database;
use crate::error::{CartError, Result};
use crate::intelligence::Season;
use chrono::Utc;
use sqlx::Row;

impl Database {
    /// Add an item to the list
    ///
    /// # Arguments
    /// * `input` - Item data. Quantity must be at least 1.
    ///
    /// # Returns
    /// * `Ok(ShoppingItem)` - The stored item, status active
    /// * `Err(CartError)` - If the quantity is invalid or the insert fails
    pub async fn add_item(&self, input: ItemInput) -> Result<ShoppingItem> {
        if input.quantity < 1 {
            return Err(CartError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }

        let now = Utc::now();
        let item = sqlx::query_as::<_, ShoppingItem>(
            r#"
            INSERT INTO shopping_items
                (item_name, quantity, category, brand, price_range, status, added_via, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&input.item_name)
        .bind(input.quantity)
        .bind(&input.category)
        .bind(&input.brand)
        .bind(&input.price_range)
        .bind(ItemStatus::Active.to_string())
        .bind(input.added_via.to_string())
        .bind(now)
        .bind(now)
        .fetch_one(self.pool())
        .await?;

        Ok(item)
    }

    /// Get item by ID, whatever its status
    pub async fn get_item(&self, id: i64) -> Result<Option<ShoppingItem>> {
        let item = sqlx::query_as::<_, ShoppingItem>("SELECT * FROM shopping_items WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(item)
    }

    /// Active items, newest first
    pub async fn get_active_items(&self) -> Result<Vec<ShoppingItem>> {
        let items = sqlx::query_as::<_, ShoppingItem>(
            "SELECT * FROM shopping_items WHERE status = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(ItemStatus::Active.to_string())
        .fetch_all(self.pool())
        .await?;

        Ok(items)
    }

    /// Active items in one category, newest first
    pub async fn get_items_by_category(&self, category: &str) -> Result<Vec<ShoppingItem>> {
        let items = sqlx::query_as::<_, ShoppingItem>(
            "SELECT * FROM shopping_items WHERE status = ? AND category = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(ItemStatus::Active.to_string())
        .bind(category)
        .fetch_all(self.pool())
        .await?;

        Ok(items)
    }

    /// Move one item to a new status
    ///
    /// # Returns
    /// * `Err(CartError::ItemNotFound)` - If no item has this id
    pub async fn set_item_status(&self, id: i64, status: ItemStatus) -> Result<()> {
        let result =
            sqlx::query("UPDATE shopping_items SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status.to_string())
                .bind(Utc::now())
                .bind(id)
                .execute(self.pool())
                .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::ItemNotFound(id));
        }

        Ok(())
    }

    /// Move every active item whose name contains `name` (case-insensitive)
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of items changed
    pub async fn set_status_by_name(&self, name: &str, status: ItemStatus) -> Result<u64> {
        let pattern = format!("%{}%", name);

        let result = sqlx::query(
            "UPDATE shopping_items SET status = ?, updated_at = ? WHERE status = ? AND item_name LIKE ?",
        )
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(ItemStatus::Active.to_string())
        .bind(&pattern)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected())
    }

    /// Change the quantity of one item
    pub async fn update_quantity(&self, id: i64, quantity: i64) -> Result<()> {
        if quantity < 1 {
            return Err(CartError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }

        let result =
            sqlx::query("UPDATE shopping_items SET quantity = ?, updated_at = ? WHERE id = ?")
                .bind(quantity)
                .bind(Utc::now())
                .bind(id)
                .execute(self.pool())
                .await?;

        if result.rows_affected() == 0 {
            return Err(CartError::ItemNotFound(id));
        }

        Ok(())
    }

    /// Mark every active item removed
    pub async fn clear_active_items(&self) -> Result<u64> {
        let result =
            sqlx::query("UPDATE shopping_items SET status = ?, updated_at = ? WHERE status = ?")
                .bind(ItemStatus::Removed.to_string())
                .bind(Utc::now())
                .bind(ItemStatus::Active.to_string())
                .execute(self.pool())
                .await?;

        Ok(result.rows_affected())
    }

    /// Search active items by name (case-insensitive)
    ///
    /// # Arguments
    /// * `query` - Substring of the item name
    /// * `price_range` - Optional exact `under_<N>` token to filter on
    pub async fn search_items(
        &self,
        query: &str,
        price_range: Option<&str>,
    ) -> Result<Vec<ShoppingItem>> {
        let pattern = format!("%{}%", query);

        let items = if let Some(range) = price_range {
            sqlx::query_as::<_, ShoppingItem>(
                "SELECT * FROM shopping_items WHERE status = ? AND item_name LIKE ? AND price_range = ? ORDER BY created_at DESC, id DESC",
            )
            .bind(ItemStatus::Active.to_string())
            .bind(&pattern)
            .bind(range)
            .fetch_all(self.pool())
            .await?
        } else {
            sqlx::query_as::<_, ShoppingItem>(
                "SELECT * FROM shopping_items WHERE status = ? AND item_name LIKE ? ORDER BY created_at DESC, id DESC",
            )
            .bind(ItemStatus::Active.to_string())
            .bind(&pattern)
            .fetch_all(self.pool())
            .await?
        };

        Ok(items)
    }

    /// Most purchased items first
    pub async fn get_history_by_purchase_count(
        &self,
        limit: i64,
    ) -> Result<Vec<PurchaseHistoryRecord>> {
        let records = sqlx::query_as::<_, PurchaseHistoryRecord>(
            "SELECT * FROM shopping_history ORDER BY purchase_count DESC, id ASC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(records)
    }

    /// History record by exact (case-sensitive) item name
    pub async fn get_history(&self, item_name: &str) -> Result<Option<PurchaseHistoryRecord>> {
        let record = sqlx::query_as::<_, PurchaseHistoryRecord>(
            "SELECT * FROM shopping_history WHERE item_name = ?",
        )
        .bind(item_name)
        .fetch_optional(self.pool())
        .await?;

        Ok(record)
    }

    /// Insert a history record, or overwrite the counters of the existing one
    ///
    /// The category of an existing record is left as first recorded.
    pub async fn upsert_history(&self, record: HistoryUpsert) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO shopping_history
                (item_name, category, purchase_count, last_purchased, average_frequency_days, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(item_name) DO UPDATE SET
                purchase_count = excluded.purchase_count,
                last_purchased = excluded.last_purchased,
                average_frequency_days = excluded.average_frequency_days
            RETURNING id
            "#,
        )
        .bind(&record.item_name)
        .bind(&record.category)
        .bind(record.purchase_count)
        .bind(record.last_purchased)
        .bind(record.average_frequency_days)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Add a product to the catalog
    pub async fn add_catalog_product(&self, input: CatalogInput) -> Result<i64> {
        let alternatives_json = serde_json::to_string(&input.alternatives)?;

        let result = sqlx::query(
            r#"
            INSERT INTO product_catalog
                (product_name, category, brand, price, seasonal, season, alternatives, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&input.product_name)
        .bind(&input.category)
        .bind(&input.brand)
        .bind(input.price)
        .bind(input.seasonal)
        .bind(input.season.map(|s| s.to_string()))
        .bind(alternatives_json)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Seasonal products for one season
    pub async fn get_seasonal_products(
        &self,
        season: Season,
        limit: i64,
    ) -> Result<Vec<CatalogProduct>> {
        let products = sqlx::query_as::<_, CatalogProduct>(
            "SELECT * FROM product_catalog WHERE seasonal = 1 AND season = ? ORDER BY id ASC LIMIT ?",
        )
        .bind(season.to_string())
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(products)
    }

    /// First catalog product whose name contains `name` (case-insensitive)
    pub async fn find_catalog_product(&self, name: &str) -> Result<Option<CatalogProduct>> {
        let pattern = format!("%{}%", name);

        let product = sqlx::query_as::<_, CatalogProduct>(
            "SELECT * FROM product_catalog WHERE product_name LIKE ? ORDER BY id ASC LIMIT 1",
        )
        .bind(&pattern)
        .fetch_optional(self.pool())
        .await?;

        Ok(product)
    }

    /// Keep a record of an interpreted phrase
    pub async fn log_voice_command(&self, input: VoiceCommandInput) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO voice_commands
                (command_text, intent, extracted_item, extracted_quantity, language, success, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(input.command_text)
        .bind(input.intent)
        .bind(input.extracted_item)
        .bind(input.extracted_quantity)
        .bind(input.language)
        .bind(input.success)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }
}
