/// Core functionality modules
///
/// List storage, fuzzy search, and the assistant that applies voice commands.

pub mod assistant;
pub mod searcher;
pub mod shopping_list;

pub use assistant::{Assistant, CommandOutcome};
pub use searcher::{SearchResult, Searcher};
pub use shopping_list::ShoppingList;
