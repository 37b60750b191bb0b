/// Seasonal suggestions
///
/// Pulls catalog products flagged for the current season.

use crate::intelligence::repository::CatalogRepository;
use crate::intelligence::{Season, Suggestion, SuggestionSource};
use std::sync::Arc;
use tracing::warn;

const SEASONAL_LIMIT: usize = 3;

pub struct SeasonalRecommender {
    catalog: Arc<dyn CatalogRepository>,
}

impl SeasonalRecommender {
    pub fn new(catalog: Arc<dyn CatalogRepository>) -> Self {
        Self { catalog }
    }

    /// Suggestions for the season we're in
    pub async fn seasonal_suggestions(&self) -> Vec<Suggestion> {
        self.suggestions_for(Season::current()).await
    }

    /// Up to three seasonal products for `season`. Empty if the store is unreachable.
    pub async fn suggestions_for(&self, season: Season) -> Vec<Suggestion> {
        let products = match self
            .catalog
            .seasonal_by_season(season, SEASONAL_LIMIT as i64)
            .await
        {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, %season, "could not load seasonal products");
                return Vec::new();
            }
        };

        products
            .into_iter()
            .take(SEASONAL_LIMIT)
            .map(|product| {
                let alternatives = product.get_alternatives();

                Suggestion {
                    id: product.id.to_string(),
                    item_name: product.product_name,
                    reason: format!("{} seasonal item", season),
                    category: product.category,
                    alternatives: if alternatives.is_empty() {
                        None
                    } else {
                        Some(alternatives)
                    },
                    source: SuggestionSource::Seasonal,
                }
            })
            .collect()
    }

    /// Substitutes listed for the first catalog product matching `item_name`
    pub async fn find_alternatives(&self, item_name: &str) -> Vec<String> {
        match self.catalog.find_by_name_like(item_name).await {
            Ok(Some(product)) => product.get_alternatives(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, item = item_name, "could not look up alternatives");
                Vec::new()
            }
        }
    }
}
