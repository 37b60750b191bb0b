/// Data models for database entities
///
/// All models map to database tables and use sqlx for type-safe queries.

use crate::intelligence::Season;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Item on the shopping list
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShoppingItem {
    pub id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub category: String,
    pub brand: Option<String>,
    pub price_range: Option<String>,
    pub status: String,    // 'active', 'completed', 'removed'
    pub added_via: String, // 'voice', 'manual'
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShoppingItem {
    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active.to_string()
    }
}

/// Input for adding an item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemInput {
    pub item_name: String,
    pub quantity: i64,
    pub category: String,
    pub brand: Option<String>,
    pub price_range: Option<String>,
    pub added_via: AddedVia,
}

/// Lifecycle of a list item. Items are never deleted, only moved out of `Active`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    Completed,
    Removed,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemStatus::Active => "active",
            ItemStatus::Completed => "completed",
            ItemStatus::Removed => "removed",
        };
        write!(f, "{}", s)
    }
}

/// How an item got onto the list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AddedVia {
    Voice,
    Manual,
}

impl std::fmt::Display for AddedVia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AddedVia::Voice => "voice",
            AddedVia::Manual => "manual",
        };
        write!(f, "{}", s)
    }
}

/// Running purchase statistics for one item name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseHistoryRecord {
    pub id: i64,
    pub item_name: String, // unique, case-sensitive
    pub category: String,
    pub purchase_count: i64,
    pub last_purchased: DateTime<Utc>,
    pub average_frequency_days: i64, // 0 = only bought once so far
    pub created_at: DateTime<Utc>,
}

/// Write instruction for a history record, keyed on item name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryUpsert {
    pub item_name: String,
    pub category: String,
    pub purchase_count: i64,
    pub last_purchased: DateTime<Utc>,
    pub average_frequency_days: i64,
}

/// Product catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CatalogProduct {
    pub id: i64,
    pub product_name: String,
    pub category: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    pub seasonal: bool,
    pub season: Option<String>,
    pub alternatives: Option<String>, // JSON array
    pub created_at: DateTime<Utc>,
}

impl CatalogProduct {
    /// Parse alternatives from JSON string
    pub fn get_alternatives(&self) -> Vec<String> {
        self.alternatives
            .as_ref()
            .and_then(|a| serde_json::from_str(a).ok())
            .unwrap_or_default()
    }
}

/// Input for adding a catalog product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogInput {
    pub product_name: String,
    pub category: String,
    pub brand: Option<String>,
    pub price: Option<f64>,
    /// Offered as a seasonal suggestion. Independent of the `season` tag.
    pub seasonal: bool,
    pub season: Option<Season>,
    pub alternatives: Vec<String>,
}

/// One interpreted phrase, kept for later inspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceCommandInput {
    pub command_text: String,
    pub intent: String,
    pub extracted_item: Option<String>,
    pub extracted_quantity: i64,
    pub language: String,
    pub success: bool,
}
