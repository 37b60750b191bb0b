/// Item categorization
///
/// Maps an item name to the first category whose keyword appears inside it.

use crate::nlp::lexicon::{Category, Lexicon};
use std::sync::Arc;

pub struct Categorizer {
    lexicon: Arc<Lexicon>,
}

impl Categorizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Categorize an item name
    ///
    /// Categories are tried in their fixed order, so a keyword listed under two
    /// categories always resolves to the earlier one. Falls back to `General`.
    pub fn categorize(&self, item_name: &str) -> Category {
        let lower = item_name.to_lowercase();

        self.lexicon
            .categories
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::General)
    }
}
