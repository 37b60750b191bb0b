/// Intelligence module
///
/// Smart shopping suggestions from purchase history and the season.

pub mod aggregator;
pub mod history;
pub mod repository;
pub mod scorer;
pub mod season;
pub mod seasonal;
pub mod suggestion;

pub use aggregator::SuggestionAggregator;
pub use history::HistoryRecommender;
pub use repository::{CatalogRepository, HistoryRepository};
pub use scorer::Scorer;
pub use season::Season;
pub use seasonal::SeasonalRecommender;
pub use suggestion::{Suggestion, SuggestionSource};
