// Keyword tables for command interpretation
//
// English only. Order matters almost everywhere in here, so don't sort these lists.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the user wants to do with their list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Add,
    Remove,
    Search,
    Clear,
    Complete,
    Unknown,
}

impl Intent {
    /// Whether entity extraction runs for this intent
    pub fn carries_entities(&self) -> bool {
        matches!(
            self,
            Intent::Add | Intent::Remove | Intent::Search | Intent::Complete
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Add => "add",
            Intent::Remove => "remove",
            Intent::Search => "search",
            Intent::Clear => "clear",
            Intent::Complete => "complete",
            Intent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dairy,
    Produce,
    Meat,
    Bakery,
    Beverages,
    Snacks,
    Household,
    PersonalCare,
    General,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Dairy => "dairy",
            Category::Produce => "produce",
            Category::Meat => "meat",
            Category::Bakery => "bakery",
            Category::Beverages => "beverages",
            Category::Snacks => "snacks",
            Category::Household => "household",
            Category::PersonalCare => "personal_care",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dairy" => Ok(Category::Dairy),
            "produce" => Ok(Category::Produce),
            "meat" => Ok(Category::Meat),
            "bakery" => Ok(Category::Bakery),
            "beverages" => Ok(Category::Beverages),
            "snacks" => Ok(Category::Snacks),
            "household" => Ok(Category::Household),
            "personal_care" => Ok(Category::PersonalCare),
            "general" => Ok(Category::General),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

const ADD_KEYWORDS: &[&str] = &[
    "add", "need", "want", "buy", "get", "purchase", "i need", "i want",
];
const REMOVE_KEYWORDS: &[&str] = &["remove", "delete", "take off", "cancel", "drop"];
const SEARCH_KEYWORDS: &[&str] = &["find", "search", "look for", "show me"];
const CLEAR_KEYWORDS: &[&str] = &["clear", "empty", "delete all", "remove all"];
const COMPLETE_KEYWORDS: &[&str] = &["bought", "purchased", "got", "completed", "done with"];

// Iteration order is the lookup order, not text order
const NUMBER_WORDS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("a", 1),
    ("an", 1),
];

const UNIT_NOUNS: &[&str] = &[
    "bottle", "bottles", "can", "cans", "box", "boxes", "bag", "bags", "item", "items", "of",
];
const STOPWORDS: &[&str] = &["to", "my", "the", "from", "list"];
const BRAND_INDICATORS: &[&str] = &["brand", "by"];

// "soap" is in both household and personal_care. Household wins because it comes first.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Dairy,
        &["milk", "cheese", "butter", "yogurt", "cream", "ice cream"],
    ),
    (
        Category::Produce,
        &[
            "apple", "banana", "orange", "tomato", "lettuce", "carrot", "potato", "onion",
            "fruit", "vegetable",
        ],
    ),
    (
        Category::Meat,
        &["chicken", "beef", "pork", "fish", "turkey", "lamb", "meat"],
    ),
    (
        Category::Bakery,
        &["bread", "bagel", "muffin", "cake", "cookie", "pastry"],
    ),
    (
        Category::Beverages,
        &["water", "juice", "soda", "coffee", "tea", "beer", "wine"],
    ),
    (
        Category::Snacks,
        &["chips", "crackers", "popcorn", "nuts", "candy", "chocolate"],
    ),
    (
        Category::Household,
        &["soap", "detergent", "paper towels", "toilet paper", "cleaner"],
    ),
    (
        Category::PersonalCare,
        &["toothpaste", "shampoo", "deodorant", "soap", "lotion"],
    ),
];

/// Every table the interpreter reads
///
/// Built once at startup and shared by reference. Nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Lexicon {
    /// Intent keyword sets in precedence order (earlier wins on overlap)
    pub intent_keywords: Vec<(Intent, &'static [&'static str])>,
    pub number_words: &'static [(&'static str, u32)],
    pub unit_nouns: &'static [&'static str],
    pub stopwords: &'static [&'static str],
    pub brand_indicators: &'static [&'static str],
    pub categories: &'static [(Category, &'static [&'static str])],
}

impl Lexicon {
    /// The built-in English tables
    pub fn english() -> Self {
        Self {
            intent_keywords: vec![
                (Intent::Clear, CLEAR_KEYWORDS),
                (Intent::Complete, COMPLETE_KEYWORDS),
                (Intent::Remove, REMOVE_KEYWORDS),
                (Intent::Search, SEARCH_KEYWORDS),
                (Intent::Add, ADD_KEYWORDS),
            ],
            number_words: NUMBER_WORDS,
            unit_nouns: UNIT_NOUNS,
            stopwords: STOPWORDS,
            brand_indicators: BRAND_INDICATORS,
            categories: CATEGORY_KEYWORDS,
        }
    }

    /// Keywords of every intent, flattened
    pub fn all_intent_keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.intent_keywords
            .iter()
            .flat_map(|(_, keywords)| keywords.iter().copied())
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::english()
    }
}
