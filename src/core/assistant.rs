// Applies interpreted voice commands to the shopping list
//
// Every phrase goes through the parser, gets logged, then turns into a list
// operation and a short confirmation message.

use crate::core::ShoppingList;
use crate::db::{AddedVia, Database, ShoppingItem, VoiceCommandInput};
use crate::error::{CartError, Result};
use crate::intelligence::{
    HistoryRecommender, SeasonalRecommender, Suggestion, SuggestionAggregator,
};
use crate::nlp::{CommandParser, Intent, Lexicon, ParsedCommand};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

// Longer phrases are cut before they're logged
const MAX_LOGGED_LENGTH: usize = 1_000;

const UNKNOWN_MESSAGE: &str =
    "Could not understand the command. Try saying \"Add milk\" or \"Remove bread\"";

/// What happened after handling a phrase
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub command: ParsedCommand,
    pub success: bool,
    pub message: String,
    /// Added item or search hits, empty otherwise
    pub items: Vec<ShoppingItem>,
}

impl CommandOutcome {
    fn done(command: ParsedCommand, message: String, items: Vec<ShoppingItem>) -> Self {
        Self {
            command,
            success: true,
            message,
            items,
        }
    }

    fn failed(command: ParsedCommand, message: String) -> Self {
        Self {
            command,
            success: false,
            message,
            items: Vec::new(),
        }
    }
}

pub struct Assistant {
    db: Arc<Database>,
    parser: CommandParser,
    list: ShoppingList,
    history: HistoryRecommender,
    seasonal: SeasonalRecommender,
    suggestions: SuggestionAggregator,
    locale: String,
    // Serializes history read-modify-write
    history_lock: Mutex<()>,
}

impl Assistant {
    pub fn new(db: Arc<Database>, lexicon: Arc<Lexicon>, locale: impl Into<String>) -> Self {
        Self {
            parser: CommandParser::new(lexicon),
            list: ShoppingList::new(Arc::clone(&db)),
            history: HistoryRecommender::new(db.clone()),
            seasonal: SeasonalRecommender::new(db.clone()),
            suggestions: SuggestionAggregator::from_database(Arc::clone(&db)),
            locale: locale.into(),
            history_lock: Mutex::new(()),
            db,
        }
    }

    pub fn list(&self) -> &ShoppingList {
        &self.list
    }

    /// Interpret `text` and apply it to the list
    ///
    /// # Returns
    /// * `Ok(CommandOutcome)` - Applied, or rejected with a user-facing message
    /// * `Err(CartError)` - If the list store failed
    pub async fn handle(&self, text: &str) -> Result<CommandOutcome> {
        let command = self.parser.parse(text);
        info!(
            intent = %command.intent,
            item = command.item_name.as_deref().unwrap_or(""),
            quantity = command.quantity,
            "interpreted command"
        );

        let result = self.apply(command.clone()).await;
        let success = matches!(&result, Ok(outcome) if outcome.success);
        self.log_command(text, &command, success).await;

        result
    }

    async fn apply(&self, command: ParsedCommand) -> Result<CommandOutcome> {
        let item_name = match (command.intent, command.item_name.clone()) {
            (Intent::Clear, _) => {
                let cleared = self.list.clear().await?;
                debug!(cleared, "list cleared");
                return Ok(CommandOutcome::done(
                    command,
                    "Cleared your shopping list".to_string(),
                    Vec::new(),
                ));
            }
            (Intent::Unknown, _) => {
                return Ok(CommandOutcome::failed(command, UNKNOWN_MESSAGE.to_string()));
            }
            (intent, None) => {
                let verb = match intent {
                    Intent::Remove => "remove",
                    Intent::Complete => "complete",
                    Intent::Search => "search for",
                    _ => "add",
                };
                return Ok(CommandOutcome::failed(
                    command,
                    format!("Could not identify the item to {}", verb),
                ));
            }
            (_, Some(name)) => name,
        };

        match command.intent {
            Intent::Add => {
                let item = self
                    .list
                    .add_item(
                        &item_name,
                        command.quantity,
                        command.category_or_general().as_str(),
                        command.brand.clone(),
                        command.price_range.clone(),
                        AddedVia::Voice,
                    )
                    .await?;
                let message = format!("Added {} {} to your list", command.quantity, item_name);
                Ok(CommandOutcome::done(command, message, vec![item]))
            }
            Intent::Remove => {
                let removed = self.list.remove_by_name(&item_name).await?;
                debug!(removed, item = %item_name, "removed by name");
                let message = format!("Removed {} from your list", item_name);
                Ok(CommandOutcome::done(command, message, Vec::new()))
            }
            Intent::Complete => {
                let category = command.category_or_general();
                {
                    let _guard = self.history_lock.lock().await;
                    let completed = self.list.complete_by_name(&item_name).await?;
                    debug!(completed, item = %item_name, "completed by name");
                    self.history
                        .update_purchase_history(&item_name, category.as_str())
                        .await;
                }
                let message = format!("Marked {} as purchased", item_name);
                Ok(CommandOutcome::done(command, message, Vec::new()))
            }
            Intent::Search => {
                let items = self
                    .list
                    .search(&item_name, command.price_range.as_deref())
                    .await?;
                let message = format!("Found {} items", items.len());
                Ok(CommandOutcome::done(command, message, items))
            }
            Intent::Clear | Intent::Unknown => {
                Ok(CommandOutcome::failed(command, UNKNOWN_MESSAGE.to_string()))
            }
        }
    }

    async fn log_command(&self, text: &str, command: &ParsedCommand, success: bool) {
        let command_text: String = text.chars().take(MAX_LOGGED_LENGTH).collect();

        let input = VoiceCommandInput {
            command_text,
            intent: command.intent.to_string(),
            extracted_item: command.item_name.clone(),
            extracted_quantity: i64::from(command.quantity),
            language: self.locale.clone(),
            success,
        };

        if let Err(e) = self.db.log_voice_command(input).await {
            warn!(error = %e, "could not log voice command");
        }
    }

    /// Mark one item purchased by id and feed it into purchase history
    pub async fn complete_item_by_id(&self, id: i64) -> Result<ShoppingItem> {
        let _guard = self.history_lock.lock().await;

        let item = self
            .list
            .get(id)
            .await?
            .ok_or(CartError::ItemNotFound(id))?;

        self.list.complete_item(id).await?;
        self.history
            .update_purchase_history(&item.item_name, &item.category)
            .await;

        Ok(item)
    }

    /// Accept a suggestion onto the list
    pub async fn add_suggestion(&self, item_name: &str, category: &str) -> Result<ShoppingItem> {
        self.list
            .add_item(item_name, 1, category, None, None, AddedVia::Manual)
            .await
    }

    pub async fn suggestions(&self) -> Vec<Suggestion> {
        self.suggestions.smart_suggestions().await
    }

    pub async fn alternatives(&self, item_name: &str) -> Vec<String> {
        self.seasonal.find_alternatives(item_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::CatalogInput;
    use crate::intelligence::Season;

    async fn setup() -> (Assistant, Arc<Database>) {
        let db = Arc::new(Database::new_test().await.unwrap());
        let assistant = Assistant::new(Arc::clone(&db), Arc::new(Lexicon::english()), "en-US");
        (assistant, db)
    }

    #[tokio::test]
    async fn test_add_command() {
        let (assistant, db) = setup().await;

        let outcome = assistant.handle("Add 3 apples").await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.message, "Added 3 apples to your list");
        assert_eq!(outcome.items.len(), 1);

        let items = db.get_active_items().await.unwrap();
        assert_eq!(items[0].item_name, "apples");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].category, "produce");
        assert_eq!(items[0].added_via, "voice");

        assert_eq!(db.stats().await.unwrap().voice_commands, 1);
    }

    #[tokio::test]
    async fn test_add_without_item() {
        let (assistant, db) = setup().await;

        let outcome = assistant.handle("add").await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Could not identify the item to add");

        assert!(db.get_active_items().await.unwrap().is_empty());
        let logged: (bool,) = sqlx::query_as("SELECT success FROM voice_commands")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert!(!logged.0);
    }

    #[tokio::test]
    async fn test_remove_command() {
        let (assistant, db) = setup().await;
        assistant.handle("add bread").await.unwrap();

        let outcome = assistant.handle("Remove bread").await.unwrap();
        assert_eq!(outcome.message, "Removed bread from your list");
        assert!(db.get_active_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_updates_history() {
        let (assistant, db) = setup().await;
        assistant.handle("add milk").await.unwrap();

        let outcome = assistant.handle("Bought milk").await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.message, "Marked milk as purchased");

        assert!(db.get_active_items().await.unwrap().is_empty());
        let record = db.get_history("milk").await.unwrap().unwrap();
        assert_eq!(record.purchase_count, 1);
        assert_eq!(record.category, "dairy");
    }

    #[tokio::test]
    async fn test_search_and_clear() {
        let (assistant, _db) = setup().await;
        assistant.handle("add milk").await.unwrap();
        assistant.handle("add bread").await.unwrap();

        let found = assistant.handle("find milk").await.unwrap();
        assert_eq!(found.message, "Found 1 items");
        assert_eq!(found.items[0].item_name, "milk");

        let cleared = assistant.handle("clear the list").await.unwrap();
        assert_eq!(cleared.message, "Cleared your shopping list");
        assert!(assistant.list().active_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_complete_item_by_id() {
        let (assistant, db) = setup().await;
        let item = assistant.add_suggestion("Coffee", "beverages").await.unwrap();
        assert_eq!(item.added_via, "manual");
        assert_eq!(item.quantity, 1);

        let completed = assistant.complete_item_by_id(item.id).await.unwrap();
        assert_eq!(completed.item_name, "Coffee");
        assert_eq!(db.get_history("Coffee").await.unwrap().unwrap().category, "beverages");

        let missing = assistant.complete_item_by_id(999).await;
        assert!(matches!(missing, Err(CartError::ItemNotFound(999))));
    }

    #[tokio::test]
    async fn test_suggestions_and_alternatives_from_catalog() {
        let (assistant, db) = setup().await;

        for season in [Season::Spring, Season::Summer, Season::Fall, Season::Winter] {
            db.add_catalog_product(CatalogInput {
                product_name: format!("{} squash", season),
                category: "produce".to_string(),
                brand: None,
                price: None,
                seasonal: true,
                season: Some(season),
                alternatives: vec!["zucchini".to_string()],
            })
            .await
            .unwrap();
        }

        let suggestions = assistant.suggestions().await;
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].item_name, format!("{} squash", Season::current()));
        assert_eq!(suggestions[0].alternatives, Some(vec!["zucchini".to_string()]));

        assert_eq!(assistant.alternatives("squash").await, vec!["zucchini"]);
    }

    #[tokio::test]
    async fn test_alternatives_and_suggestions_empty_store() {
        let (assistant, _db) = setup().await;

        assert!(assistant.alternatives("rice").await.is_empty());
        assert!(assistant.suggestions().await.is_empty());
    }
}
