// Suggests things you buy regularly and are probably out of by now
//
// Every completion folds the days since the previous purchase into a running
// average. Once that many days have passed again, the item is due.

use crate::db::{HistoryUpsert, PurchaseHistoryRecord};
use crate::intelligence::repository::HistoryRepository;
use crate::intelligence::{Scorer, Suggestion, SuggestionSource};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};

// Only the most purchased items are candidates
const HISTORY_SCAN_LIMIT: i64 = 10;

pub struct HistoryRecommender {
    history: Arc<dyn HistoryRepository>,
}

impl HistoryRecommender {
    pub fn new(history: Arc<dyn HistoryRepository>) -> Self {
        Self { history }
    }

    /// Items due for repurchase right now
    pub async fn due_suggestions(&self) -> Vec<Suggestion> {
        self.due_suggestions_at(Utc::now()).await
    }

    /// Items due for repurchase at `now`. Empty if the store is unreachable.
    pub async fn due_suggestions_at(&self, now: DateTime<Utc>) -> Vec<Suggestion> {
        match self.history.top_by_purchase_count(HISTORY_SCAN_LIMIT).await {
            Ok(records) => Self::select_due(&records, now),
            Err(e) => {
                warn!(error = %e, "could not load purchase history for suggestions");
                Vec::new()
            }
        }
    }

    /// Keep the records whose learned interval has elapsed, in the given order
    pub fn select_due(records: &[PurchaseHistoryRecord], now: DateTime<Utc>) -> Vec<Suggestion> {
        records
            .iter()
            .filter(|record| {
                let days = Scorer::days_between(record.last_purchased, now);
                Scorer::is_due(record.average_frequency_days, days)
            })
            .map(|record| Suggestion {
                id: record.id.to_string(),
                item_name: record.item_name.clone(),
                reason: format!(
                    "You usually buy this every {} days",
                    record.average_frequency_days
                ),
                category: record.category.clone(),
                alternatives: None,
                source: SuggestionSource::History,
            })
            .collect()
    }

    /// Record that `item_name` was just bought
    pub async fn update_purchase_history(
        &self,
        item_name: &str,
        category: &str,
    ) -> Option<HistoryUpsert> {
        self.update_purchase_history_at(item_name, category, Utc::now())
            .await
    }

    /// Record a purchase at `now`
    ///
    /// Read-modify-write on one record. Callers must not run two of these for
    /// the same item name at once. Store failures are logged and swallowed.
    ///
    /// # Returns
    /// * `Some(HistoryUpsert)` - What was written
    /// * `None` - If the store failed
    pub async fn update_purchase_history_at(
        &self,
        item_name: &str,
        category: &str,
        now: DateTime<Utc>,
    ) -> Option<HistoryUpsert> {
        let existing = match self.history.find_by_item_name(item_name).await {
            Ok(existing) => existing,
            Err(e) => {
                warn!(error = %e, item = item_name, "could not read purchase history");
                return None;
            }
        };

        let record = Self::next_record(existing.as_ref(), item_name, category, now);

        if let Err(e) = self.history.upsert(record.clone()).await {
            warn!(error = %e, item = item_name, "could not write purchase history");
            return None;
        }

        debug!(
            item = item_name,
            count = record.purchase_count,
            average_days = record.average_frequency_days,
            "purchase history updated"
        );

        Some(record)
    }

    /// State of the record after one more purchase at `now`
    pub fn next_record(
        existing: Option<&PurchaseHistoryRecord>,
        item_name: &str,
        category: &str,
        now: DateTime<Utc>,
    ) -> HistoryUpsert {
        match existing {
            Some(record) => {
                // A clock that went backwards shouldn't drag the interval negative
                let days = Scorer::days_between(record.last_purchased, now).max(0);

                HistoryUpsert {
                    item_name: record.item_name.clone(),
                    category: record.category.clone(),
                    purchase_count: record.purchase_count + 1,
                    last_purchased: now,
                    average_frequency_days: Scorer::running_average(
                        record.average_frequency_days,
                        record.purchase_count,
                        days,
                    ),
                }
            }
            None => HistoryUpsert {
                item_name: item_name.to_string(),
                category: category.to_string(),
                purchase_count: 1,
                last_purchased: now,
                average_frequency_days: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::intelligence::repository::OfflineStore;
    use chrono::Duration;

    fn record(
        name: &str,
        count: i64,
        avg: i64,
        days_ago: i64,
        now: DateTime<Utc>,
    ) -> PurchaseHistoryRecord {
        PurchaseHistoryRecord {
            id: count,
            item_name: name.to_string(),
            category: "general".to_string(),
            purchase_count: count,
            last_purchased: now - Duration::days(days_ago),
            average_frequency_days: avg,
            created_at: now - Duration::days(100),
        }
    }

    async fn setup() -> (HistoryRecommender, Arc<Database>) {
        let db = Arc::new(Database::new_test().await.unwrap());
        (HistoryRecommender::new(db.clone()), db)
    }

    #[test]
    fn test_select_due() {
        let now = Utc::now();
        let records = vec![
            record("milk", 8, 7, 7, now),  // exactly due
            record("eggs", 6, 7, 3, now),  // not yet
            record("salt", 1, 0, 400, now), // bought once, never due
            record("bread", 4, 3, 10, now), // overdue
        ];

        let due = HistoryRecommender::select_due(&records, now);
        let names: Vec<_> = due.iter().map(|s| s.item_name.as_str()).collect();
        assert_eq!(names, vec!["milk", "bread"]);
        assert_eq!(due[0].reason, "You usually buy this every 7 days");
        assert_eq!(due[0].source, SuggestionSource::History);
        assert!(due[0].alternatives.is_none());
    }

    #[test]
    fn test_next_record_existing() {
        let now = Utc::now();
        let existing = record("milk", 2, 5, 10, now);

        let next = HistoryRecommender::next_record(Some(&existing), "milk", "dairy", now);
        assert_eq!(next.average_frequency_days, 7);
        assert_eq!(next.purchase_count, 3);
        assert_eq!(next.last_purchased, now);
        // Category of the stored record wins
        assert_eq!(next.category, "general");
    }

    #[test]
    fn test_next_record_first_purchase() {
        let now = Utc::now();
        let next = HistoryRecommender::next_record(None, "Milk", "dairy", now);

        assert_eq!(next.item_name, "Milk");
        assert_eq!(next.category, "dairy");
        assert_eq!(next.purchase_count, 1);
        assert_eq!(next.average_frequency_days, 0);
    }

    #[test]
    fn test_next_record_future_last_purchase() {
        let now = Utc::now();
        let existing = record("milk", 1, 0, -2, now);

        let next = HistoryRecommender::next_record(Some(&existing), "milk", "dairy", now);
        assert_eq!(next.average_frequency_days, 0);
    }

    #[tokio::test]
    async fn test_update_creates_then_increments() {
        let (recommender, db) = setup().await;
        let start = Utc::now() - Duration::days(20);

        recommender
            .update_purchase_history_at("milk", "dairy", start)
            .await
            .unwrap();
        let first = db.get_history("milk").await.unwrap().unwrap();
        assert_eq!(first.purchase_count, 1);
        assert_eq!(first.average_frequency_days, 0);

        recommender
            .update_purchase_history_at("milk", "dairy", start + Duration::days(6))
            .await
            .unwrap();
        let second = db.get_history("milk").await.unwrap().unwrap();
        assert_eq!(second.purchase_count, 2);
        assert_eq!(second.average_frequency_days, 3); // round(6 / 2)
    }

    #[tokio::test]
    async fn test_due_item_round_trip() {
        let (recommender, _db) = setup().await;
        let start = Utc::now() - Duration::days(30);

        recommender.update_purchase_history_at("coffee", "beverages", start).await;
        recommender
            .update_purchase_history_at("coffee", "beverages", start + Duration::days(10))
            .await;
        // average is now 5, last purchase 20 days ago
        recommender.update_purchase_history_at("rice", "general", start).await;

        let due = recommender.due_suggestions().await;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].item_name, "coffee");
        assert_eq!(due[0].reason, "You usually buy this every 5 days");
    }

    #[tokio::test]
    async fn test_offline_store_degrades() {
        let recommender = HistoryRecommender::new(Arc::new(OfflineStore));

        assert!(recommender.due_suggestions().await.is_empty());
        assert!(recommender
            .update_purchase_history("milk", "dairy")
            .await
            .is_none());
    }
}
