// Pulls quantity, item name, brand and price limit out of a phrase
//
// Item names come from a fixed pipeline of stripping rules over whitespace tokens.
// Brand and price are read from the full text, so a price phrase ends up both
// stripped from the item name and captured as the price range.

use crate::nlp::categorizer::Categorizer;
use crate::nlp::lexicon::{Category, Intent, Lexicon};
use regex::Regex;
use std::sync::Arc;

// First standalone digit run, wherever it appears
const DIGIT_PATTERN: &str = r"\b(\d+)\b";

const PRICE_PATTERN: &str = r"(?i)\bunder\s+\$?(\d+)|\bless\s+than\s+\$?(\d+)|\bbelow\s+\$?(\d+)";

/// Everything extracted from one phrase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entities {
    pub quantity: u32,
    pub item_name: Option<String>,
    pub brand: Option<String>,
    pub price_range: Option<String>,
    pub category: Option<Category>,
}

/// One step of the item-name pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripRule {
    /// `under $N`, `less than $N`
    PricePhrases,
    /// Keywords of every intent, longest phrase first
    IntentKeywords,
    /// Number words and bare digit runs
    QuantityWords,
    /// bottle(s), can(s), box(es), bag(s), item(s), of
    UnitNouns,
    /// to, my, the, from, list
    Stopwords,
}

impl StripRule {
    pub const PIPELINE: [StripRule; 5] = [
        StripRule::PricePhrases,
        StripRule::IntentKeywords,
        StripRule::QuantityWords,
        StripRule::UnitNouns,
        StripRule::Stopwords,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StripRule::PricePhrases => "price_phrases",
            StripRule::IntentKeywords => "intent_keywords",
            StripRule::QuantityWords => "quantity_words",
            StripRule::UnitNouns => "unit_nouns",
            StripRule::Stopwords => "stopwords",
        }
    }

    /// Remove every match of this rule, repeating until nothing else matches
    pub fn apply<'a>(&self, tokens: Vec<&'a str>, extractor: &EntityExtractor) -> Vec<&'a str> {
        let mut current = tokens;

        loop {
            let mut kept = Vec::with_capacity(current.len());
            let mut removed = false;
            let mut i = 0;

            while i < current.len() {
                match self.match_len(&current[i..], extractor) {
                    Some(len) if len > 0 => {
                        i += len;
                        removed = true;
                    }
                    _ => {
                        kept.push(current[i]);
                        i += 1;
                    }
                }
            }

            if !removed {
                return kept;
            }
            current = kept;
        }
    }

    /// How many leading tokens of `rest` this rule consumes, if any
    fn match_len(&self, rest: &[&str], extractor: &EntityExtractor) -> Option<usize> {
        let first = core(rest.first()?);

        match self {
            StripRule::PricePhrases => {
                if first == "under" && rest.len() >= 2 && is_dollar_amount(core(rest[1])) {
                    Some(2)
                } else if first == "less"
                    && rest.len() >= 3
                    && core(rest[1]) == "than"
                    && is_dollar_amount(core(rest[2]))
                {
                    Some(3)
                } else {
                    None
                }
            }
            StripRule::IntentKeywords => extractor
                .keyword_phrases
                .iter()
                .find(|phrase| starts_with_phrase(rest, phrase))
                .map(|phrase| phrase.len()),
            StripRule::QuantityWords => {
                let is_number_word = extractor
                    .lexicon
                    .number_words
                    .iter()
                    .any(|(word, _)| *word == first);
                let is_digits = !first.is_empty() && first.chars().all(|c| c.is_ascii_digit());
                (is_number_word || is_digits).then_some(1)
            }
            StripRule::UnitNouns => extractor.lexicon.unit_nouns.contains(&first).then_some(1),
            StripRule::Stopwords => extractor.lexicon.stopwords.contains(&first).then_some(1),
        }
    }
}

/// Token with surrounding punctuation removed. `$` survives so prices stay recognizable.
fn core(token: &str) -> &str {
    token.trim_matches(|c: char| !(c.is_alphanumeric() || c == '$'))
}

fn is_dollar_amount(token: &str) -> bool {
    token
        .strip_prefix('$')
        .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

fn starts_with_phrase(rest: &[&str], phrase: &[&str]) -> bool {
    phrase.len() <= rest.len() && phrase.iter().zip(rest).all(|(word, token)| core(token) == *word)
}

pub struct EntityExtractor {
    lexicon: Arc<Lexicon>,
    categorizer: Categorizer,
    number_regex: Vec<(Regex, u32)>,
    digit_regex: Option<Regex>,
    price_regex: Option<Regex>,
    keyword_phrases: Vec<Vec<&'static str>>,
}

impl EntityExtractor {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        // Compile everything once up front
        let number_regex = lexicon
            .number_words
            .iter()
            .filter_map(|(word, value)| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
                    .ok()
                    .map(|re| (re, *value))
            })
            .collect();

        let mut keyword_phrases: Vec<Vec<&'static str>> = lexicon
            .all_intent_keywords()
            .map(|kw| kw.split_whitespace().collect())
            .collect();
        // Stable sort keeps table order among phrases of equal length
        keyword_phrases.sort_by(|a, b| b.len().cmp(&a.len()));

        Self {
            categorizer: Categorizer::new(Arc::clone(&lexicon)),
            lexicon,
            number_regex,
            digit_regex: Regex::new(DIGIT_PATTERN).ok(),
            price_regex: Regex::new(PRICE_PATTERN).ok(),
            keyword_phrases,
        }
    }

    /// Extract all entities from lower-cased, trimmed text
    pub fn extract(&self, text: &str, intent: Intent) -> Entities {
        let item_name = self.item_name(text);
        let category = item_name
            .as_deref()
            .map(|name| self.categorizer.categorize(name));

        let entities = Entities {
            quantity: self.quantity(text),
            item_name,
            brand: self.brand(text),
            price_range: self.price_range(text),
            category,
        };

        tracing::debug!(
            %intent,
            item = ?entities.item_name,
            quantity = entities.quantity,
            "extracted entities"
        );

        entities
    }

    /// Quantity from number words, then digits, else 1
    ///
    /// Number words are checked in table order, not text order: "one of the two"
    /// yields 1 because "one" is listed before "two".
    pub fn quantity(&self, text: &str) -> u32 {
        if let Some((_, value)) = self.number_regex.iter().find(|(re, _)| re.is_match(text)) {
            return *value;
        }

        self.digit_regex
            .as_ref()
            .and_then(|re| re.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .filter(|n| *n >= 1)
            .unwrap_or(1)
    }

    /// Whatever is left after the stripping pipeline
    pub fn item_name(&self, text: &str) -> Option<String> {
        let mut tokens: Vec<&str> = text.split_whitespace().collect();

        for rule in StripRule::PIPELINE {
            tokens = rule.apply(tokens, self);
            tracing::trace!(rule = rule.name(), remaining = tokens.len(), "strip rule applied");
        }

        let name = tokens
            .into_iter()
            .map(core)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Word right after "brand" or "by"
    pub fn brand(&self, text: &str) -> Option<String> {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        for indicator in self.lexicon.brand_indicators {
            if let Some(pos) = tokens.iter().position(|t| core(t).eq_ignore_ascii_case(indicator)) {
                return tokens
                    .get(pos + 1)
                    .map(|t| core(t))
                    .filter(|t| !t.is_empty())
                    .map(|t| t.to_string());
            }
        }

        None
    }

    /// Canonical `under_<N>` token
    pub fn price_range(&self, text: &str) -> Option<String> {
        let caps = self.price_regex.as_ref()?.captures(text)?;
        let price = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
        Some(format!("under_{}", price.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EntityExtractor {
        EntityExtractor::new(Arc::new(Lexicon::english()))
    }

    fn tokens(text: &str) -> Vec<&str> {
        text.split_whitespace().collect()
    }

    #[test]
    fn test_quantity_from_digits() {
        assert_eq!(extractor().quantity("add 3 apples"), 3);
        assert_eq!(extractor().quantity("add 12 eggs"), 12);
    }

    #[test]
    fn test_quantity_words_beat_digits() {
        assert_eq!(extractor().quantity("add two bags of 5 potatoes"), 2);
    }

    #[test]
    fn test_quantity_table_order_not_text_order() {
        // "two" appears first in the text but "one" is earlier in the table
        assert_eq!(extractor().quantity("two cans and one bottle"), 1);
        // "a" sits after the digit words in the table
        assert_eq!(extractor().quantity("a box of five donuts"), 5);
    }

    #[test]
    fn test_quantity_whole_word_only() {
        // "an" inside "banana" and "a" inside "bag" don't count
        assert_eq!(extractor().quantity("bananas"), 1);
        assert_eq!(extractor().quantity("add often"), 1);
    }

    #[test]
    fn test_quantity_defaults() {
        assert_eq!(extractor().quantity("milk"), 1);
        assert_eq!(extractor().quantity("add 0 eggs"), 1);
    }

    #[test]
    fn test_quantity_digit_run_includes_prices() {
        assert_eq!(extractor().quantity("add milk under $5"), 5);
        assert_eq!(extractor().quantity("3 milk under $5"), 3);
        assert_eq!(extractor().quantity("milk under $0"), 1);
    }

    #[test]
    fn test_item_name_scenarios() {
        let ex = extractor();
        assert_eq!(ex.item_name("add 3 apples"), Some("apples".to_string()));
        assert_eq!(ex.item_name("i need milk"), Some("milk".to_string()));
        assert_eq!(ex.item_name("remove bread"), Some("bread".to_string()));
        assert_eq!(
            ex.item_name("add two bottles of orange juice to my list"),
            Some("orange juice".to_string())
        );
    }

    #[test]
    fn test_item_name_strips_other_intents_keywords() {
        assert_eq!(
            extractor().item_name("take off the cheese"),
            Some("cheese".to_string())
        );
    }

    #[test]
    fn test_item_name_empty_is_none() {
        assert_eq!(extractor().item_name("add"), None);
        assert_eq!(extractor().item_name("add a bag to my list"), None);
        assert_eq!(extractor().item_name(""), None);
    }

    #[test]
    fn test_item_name_drops_price_phrase() {
        assert_eq!(
            extractor().item_name("find coffee under $10"),
            Some("coffee".to_string())
        );
        assert_eq!(
            extractor().item_name("buy wine less than $20"),
            Some("wine".to_string())
        );
    }

    #[test]
    fn test_item_name_strips_punctuation() {
        assert_eq!(
            extractor().item_name("add eggs, please."),
            Some("eggs please".to_string())
        );
    }

    #[test]
    fn test_price_rule_needs_dollar_sign() {
        let ex = extractor();
        let out = StripRule::PricePhrases.apply(tokens("milk under 5"), &ex);
        assert_eq!(out, vec!["milk", "under", "5"]);

        let out = StripRule::PricePhrases.apply(tokens("milk under $5"), &ex);
        assert_eq!(out, vec!["milk"]);
    }

    #[test]
    fn test_intent_rule_longest_phrase_first() {
        let ex = extractor();
        let out = StripRule::IntentKeywords.apply(tokens("i want grapes"), &ex);
        assert_eq!(out, vec!["grapes"]);
    }

    #[test]
    fn test_intent_rule_runs_to_fixed_point() {
        let ex = extractor();
        // removing "add" joins "look" and "for" into a search phrase
        let out = StripRule::IntentKeywords.apply(tokens("look add for salt"), &ex);
        assert_eq!(out, vec!["salt"]);
    }

    #[test]
    fn test_quantity_rule() {
        let ex = extractor();
        let out = StripRule::QuantityWords.apply(tokens("a dozen 12 eggs"), &ex);
        assert_eq!(out, vec!["dozen", "eggs"]);
    }

    #[test]
    fn test_unit_and_stopword_rules() {
        let ex = extractor();
        let out = StripRule::UnitNouns.apply(tokens("boxes of cereal"), &ex);
        assert_eq!(out, vec!["cereal"]);

        let out = StripRule::Stopwords.apply(tokens("the milk from my list"), &ex);
        assert_eq!(out, vec!["milk"]);
    }

    #[test]
    fn test_brand() {
        let ex = extractor();
        assert_eq!(ex.brand("add coffee brand starbucks"), Some("starbucks".to_string()));
        assert_eq!(ex.brand("add cereal by kelloggs please"), Some("kelloggs".to_string()));
        assert_eq!(ex.brand("add milk"), None);
        assert_eq!(ex.brand("add coffee brand"), None);
    }

    #[test]
    fn test_brand_indicator_is_whole_word() {
        assert_eq!(extractor().brand("add baby food"), None);
    }

    #[test]
    fn test_brand_prefers_brand_indicator() {
        assert_eq!(
            extractor().brand("get chips by tomorrow brand lays"),
            Some("lays".to_string())
        );
    }

    #[test]
    fn test_price_range() {
        let ex = extractor();
        assert_eq!(ex.price_range("find coffee under $10"), Some("under_10".to_string()));
        assert_eq!(ex.price_range("wine less than $20"), Some("under_20".to_string()));
        assert_eq!(ex.price_range("cheese below 8"), Some("under_8".to_string()));
        assert_eq!(ex.price_range("cheese Under $3"), Some("under_3".to_string()));
        assert_eq!(ex.price_range("cheese"), None);
    }

    #[test]
    fn test_price_phrase_both_stripped_and_captured() {
        let e = extractor().extract("add milk under $5", Intent::Add);
        assert_eq!(e.item_name, Some("milk".to_string()));
        assert_eq!(e.price_range, Some("under_5".to_string()));
        // The price digits are the only digit run, so they double as the quantity
        assert_eq!(e.quantity, 5);
    }

    #[test]
    fn test_category_only_with_item() {
        let e = extractor().extract("add 3 apples", Intent::Add);
        assert_eq!(e.category, Some(Category::Produce));

        let e = extractor().extract("add", Intent::Add);
        assert_eq!(e.item_name, None);
        assert_eq!(e.category, None);
    }
}
