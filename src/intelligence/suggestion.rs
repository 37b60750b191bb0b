/// Suggestion shown to the user
///
/// Rebuilt on every request and never stored.

use serde::{Deserialize, Serialize};

/// Which recommender produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    History,
    Seasonal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub item_name: String,
    pub reason: String,
    pub category: String,
    pub alternatives: Option<Vec<String>>,
    pub source: SuggestionSource,
}
