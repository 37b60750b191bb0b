/// Suggestion aggregator
///
/// Merges history-based and seasonal suggestions into one short list.

use crate::db::Database;
use crate::intelligence::{HistoryRecommender, Season, SeasonalRecommender, Suggestion};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Never show more than this many suggestions
pub const MAX_SUGGESTIONS: usize = 5;

pub struct SuggestionAggregator {
    history: HistoryRecommender,
    seasonal: SeasonalRecommender,
}

impl SuggestionAggregator {
    pub fn new(history: HistoryRecommender, seasonal: SeasonalRecommender) -> Self {
        Self { history, seasonal }
    }

    /// Aggregator backed by one database for both history and catalog
    pub fn from_database(db: Arc<Database>) -> Self {
        Self::new(
            HistoryRecommender::new(db.clone()),
            SeasonalRecommender::new(db),
        )
    }

    /// Suggestions for right now
    pub async fn smart_suggestions(&self) -> Vec<Suggestion> {
        self.smart_suggestions_for(Utc::now(), Season::current())
            .await
    }

    pub async fn smart_suggestions_for(
        &self,
        now: DateTime<Utc>,
        season: Season,
    ) -> Vec<Suggestion> {
        let (history, seasonal) = tokio::join!(
            self.history.due_suggestions_at(now),
            self.seasonal.suggestions_for(season)
        );

        Self::merge(history, seasonal)
    }

    /// History first, then seasonal, cut to `MAX_SUGGESTIONS`
    pub fn merge(history: Vec<Suggestion>, seasonal: Vec<Suggestion>) -> Vec<Suggestion> {
        let mut suggestions = history;
        suggestions.extend(seasonal);
        suggestions.truncate(MAX_SUGGESTIONS);
        suggestions
    }
}
