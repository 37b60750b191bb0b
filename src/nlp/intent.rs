/// Intent classification
///
/// First-match substring scan over the lexicon's intent sets.

use crate::nlp::lexicon::{Intent, Lexicon};
use std::sync::Arc;

pub struct IntentClassifier {
    lexicon: Arc<Lexicon>,
}

impl IntentClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Classify lower-cased, trimmed text
    ///
    /// Walks the intent sets in precedence order (clear, complete, remove, search, add)
    /// and returns the first set with a keyword contained anywhere in the text.
    /// Text matching nothing is treated as an add. This never returns `Unknown`.
    pub fn classify(&self, text: &str) -> Intent {
        self.lexicon
            .intent_keywords
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Add)
    }
}
