/// cartwise library
///
/// Voice-driven shopping list: phrase interpretation, list storage, and
/// purchase-history and seasonal suggestions.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod intelligence;
pub mod nlp;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::{CartError, Result};
