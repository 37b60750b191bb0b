/// Command parser
///
/// Public entry point for interpretation. Classifies the phrase, then extracts
/// entities when the intent carries any.

use crate::nlp::extractor::EntityExtractor;
use crate::nlp::intent::IntentClassifier;
use crate::nlp::lexicon::{Category, Intent, Lexicon};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Structured form of one phrase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub intent: Intent,
    pub item_name: Option<String>,
    /// Always at least 1
    pub quantity: u32,
    pub brand: Option<String>,
    pub price_range: Option<String>,
    /// Only set when `item_name` is
    pub category: Option<Category>,
}

impl ParsedCommand {
    fn bare(intent: Intent) -> Self {
        Self {
            intent,
            item_name: None,
            quantity: 1,
            brand: None,
            price_range: None,
            category: None,
        }
    }

    /// Category label to store, `general` when nothing matched
    pub fn category_or_general(&self) -> Category {
        self.category.unwrap_or(Category::General)
    }
}

pub struct CommandParser {
    classifier: IntentClassifier,
    extractor: EntityExtractor,
}

impl CommandParser {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            classifier: IntentClassifier::new(Arc::clone(&lexicon)),
            extractor: EntityExtractor::new(lexicon),
        }
    }

    /// Parse any phrase. Never fails; missing information is left as `None`.
    pub fn parse(&self, text: &str) -> ParsedCommand {
        let normalized = text.trim().to_lowercase();
        let intent = self.classifier.classify(&normalized);

        if !intent.carries_entities() {
            return ParsedCommand::bare(intent);
        }

        let entities = self.extractor.extract(&normalized, intent);

        ParsedCommand {
            intent,
            item_name: entities.item_name,
            quantity: entities.quantity,
            brand: entities.brand,
            price_range: entities.price_range,
            category: entities.category,
        }
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::english()))
    }
}
