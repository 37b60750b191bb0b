/// Command interpretation
///
/// Turns a free-text shopping phrase into a structured command with plain
/// keyword matching. English keyword tables only.

pub mod categorizer;
pub mod extractor;
pub mod intent;
pub mod lexicon;
pub mod parser;

pub use categorizer::Categorizer;
pub use extractor::{Entities, EntityExtractor, StripRule};
pub use intent::IntentClassifier;
pub use lexicon::{Category, Intent, Lexicon};
pub use parser::{CommandParser, ParsedCommand};
