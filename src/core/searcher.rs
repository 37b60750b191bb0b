/// Item searcher with fuzzy matching
///
/// Fallback for when a plain substring search comes up empty.

use crate::db::{Database, ShoppingItem};
use crate::error::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::Serialize;
use std::sync::Arc;

/// Search hit with its fuzzy score
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub item: ShoppingItem,
    pub score: f64,
}

pub struct Searcher {
    db: Arc<Database>,
    matcher: SkimMatcherV2,
}

impl Searcher {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Rank active items against `query`
    ///
    /// # Arguments
    /// * `query` - What the user said, typos and all
    /// * `limit` - Maximum results to return
    ///
    /// # Returns
    /// * `Ok(Vec<SearchResult>)` - Matches sorted by score, best first
    pub async fn fuzzy_search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let items = self.db.get_active_items().await?;

        let mut results: Vec<SearchResult> = items
            .into_iter()
            .filter_map(|item| {
                self.matcher
                    .fuzzy_match(&item.item_name, query)
                    .map(|score| SearchResult {
                        item,
                        score: score as f64,
                    })
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{AddedVia, ItemInput, ItemStatus};

    async fn setup() -> (Searcher, Arc<Database>) {
        let db = Arc::new(Database::new_test().await.unwrap());

        for name in ["strawberries", "string cheese", "bread", "paper towels"] {
            db.add_item(ItemInput {
                item_name: name.to_string(),
                quantity: 1,
                category: "general".to_string(),
                brand: None,
                price_range: None,
                added_via: AddedVia::Manual,
            })
            .await
            .unwrap();
        }

        (Searcher::new(Arc::clone(&db)), db)
    }

    #[tokio::test]
    async fn test_fuzzy_typo() {
        let (searcher, _db) = setup().await;

        let results = searcher.fuzzy_search("strwbrs", 10).await.unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].item.item_name, "strawberries");
    }

    #[tokio::test]
    async fn test_fuzzy_needs_letters_in_order() {
        let (searcher, _db) = setup().await;

        // No "y" anywhere in "strawberries"
        let results = searcher.fuzzy_search("strwbry", 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_fuzzy_ignores_inactive() {
        let (searcher, db) = setup().await;

        let bread = db.search_items("bread", None).await.unwrap().remove(0);
        db.set_item_status(bread.id, ItemStatus::Removed).await.unwrap();

        let results = searcher.fuzzy_search("bread", 10).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_fuzzy_limit() {
        let (searcher, _db) = setup().await;

        let results = searcher.fuzzy_search("s", 2).await.unwrap();
        assert!(results.len() <= 2);
    }
}
