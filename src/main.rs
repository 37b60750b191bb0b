// cartwise - a shopping list you talk to
//
// This is the main entry point. Parses CLI args and dispatches to handlers.

use anyhow::Context;
use cartwise_lib::{
    core::{Assistant, CommandOutcome},
    db::CatalogInput,
    intelligence::Season,
    nlp::{Category, CommandParser, Lexicon},
    CartError, Config, Database,
};
use std::env;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let lang = take_flag(&mut args, "--lang");

    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(lang) = lang {
        config = config.with_locale(lang);
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = args.first().cloned() else {
        print_usage();
        return Ok(());
    };
    let rest = &args[1..];

    let result = match command.as_str() {
        "say" => handle_say(&config, rest).await,
        "parse" => handle_parse(rest),
        "list" => handle_list(&config, rest).await,
        "complete" => handle_complete(&config, rest).await,
        "remove" => handle_remove(&config, rest).await,
        "qty" => handle_qty(&config, rest).await,
        "clear" => handle_clear(&config).await,
        "suggest" => handle_suggest(&config).await,
        "accept" => handle_accept(&config, rest).await,
        "alternatives" => handle_alternatives(&config, rest).await,
        "catalog-add" => handle_catalog_add(&config, rest).await,
        "status" => handle_status(&config).await,
        "version" | "-v" | "--version" => {
            println!("cartwise v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "-h" | "--help" => {
            print_usage();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("✗ {}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

/// Pull `--flag value` out of the argument list wherever it appears
fn take_flag(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.remove(pos);
    if pos < args.len() {
        Some(args.remove(pos))
    } else {
        None
    }
}

fn parse_id(args: &[String]) -> cartwise_lib::Result<i64> {
    let raw = args
        .first()
        .ok_or_else(|| CartError::InvalidInput("missing item id".to_string()))?;
    raw.parse()
        .map_err(|_| CartError::InvalidInput(format!("'{}' is not an item id", raw)))
}

async fn open(config: &Config) -> cartwise_lib::Result<Arc<Database>> {
    Ok(Arc::new(Database::new(&config.db_path).await?))
}

async fn assistant(config: &Config) -> cartwise_lib::Result<Assistant> {
    let db = open(config).await?;
    Ok(Assistant::new(db, Arc::new(Lexicon::english()), config.locale.clone()))
}

async fn handle_say(config: &Config, args: &[String]) -> cartwise_lib::Result<()> {
    if args.is_empty() {
        eprintln!("Error: No phrase provided");
        return Ok(());
    }

    let assistant = assistant(config).await?;
    let outcome = assistant.handle(&args.join(" ")).await?;
    print_outcome(&outcome);

    Ok(())
}

fn print_outcome(outcome: &CommandOutcome) {
    let mark = if outcome.success { "✓" } else { "✗" };
    println!("{} {}", mark, outcome.message);

    if outcome.command.intent == cartwise_lib::nlp::Intent::Search {
        for item in &outcome.items {
            println!("  [{}] {} x{} ({})", item.id, item.item_name, item.quantity, item.category);
        }
    }
}

fn handle_parse(args: &[String]) -> cartwise_lib::Result<()> {
    let parser = CommandParser::new(Arc::new(Lexicon::english()));
    let command = parser.parse(&args.join(" "));
    println!("{}", serde_json::to_string_pretty(&command)?);
    Ok(())
}

async fn handle_list(config: &Config, args: &[String]) -> cartwise_lib::Result<()> {
    let assistant = assistant(config).await?;

    let items = match args.first() {
        Some(category) => {
            let category: Category = category.parse().map_err(CartError::InvalidInput)?;
            assistant.list().items_by_category(category.as_str()).await?
        }
        None => assistant.list().active_items().await?,
    };

    if items.is_empty() {
        println!("Your shopping list is empty.");
        return Ok(());
    }

    println!("\nShopping list:");
    println!("{}", "=".repeat(60));
    for item in &items {
        let brand = item
            .brand
            .as_deref()
            .map(|b| format!(" [{}]", b))
            .unwrap_or_default();
        println!(
            "{:4}. {} x{}{} ({})",
            item.id, item.item_name, item.quantity, brand, item.category
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

async fn handle_complete(config: &Config, args: &[String]) -> cartwise_lib::Result<()> {
    let id = parse_id(args)?;
    let item = assistant(config).await?.complete_item_by_id(id).await?;
    println!("✓ Marked {} as purchased", item.item_name);
    Ok(())
}

async fn handle_remove(config: &Config, args: &[String]) -> cartwise_lib::Result<()> {
    let id = parse_id(args)?;
    assistant(config).await?.list().remove_item(id).await?;
    println!("✓ Removed item {}", id);
    Ok(())
}

async fn handle_qty(config: &Config, args: &[String]) -> cartwise_lib::Result<()> {
    let id = parse_id(args)?;
    let raw = args
        .get(1)
        .ok_or_else(|| CartError::InvalidInput("missing quantity".to_string()))?;
    let quantity: i64 = raw
        .parse()
        .map_err(|_| CartError::InvalidInput(format!("'{}' is not a quantity", raw)))?;

    assistant(config)
        .await?
        .list()
        .update_quantity(id, quantity)
        .await?;
    println!("✓ Item {} quantity set to {}", id, quantity);
    Ok(())
}

async fn handle_clear(config: &Config) -> cartwise_lib::Result<()> {
    let cleared = assistant(config).await?.list().clear().await?;
    println!("✓ Cleared {} item(s)", cleared);
    Ok(())
}

async fn handle_suggest(config: &Config) -> cartwise_lib::Result<()> {
    let suggestions = assistant(config).await?.suggestions().await;

    if suggestions.is_empty() {
        println!("No suggestions right now.");
        println!("Mark items as purchased to build up your history!");
        return Ok(());
    }

    println!("{}", "=".repeat(60));
    println!("Suggestions");
    println!("{}", "=".repeat(60));
    for (i, suggestion) in suggestions.iter().enumerate() {
        println!("\n{}. {} ({})", i + 1, suggestion.item_name, suggestion.category);
        println!("   {}", suggestion.reason);
        if let Some(alternatives) = &suggestion.alternatives {
            println!("   or try: {}", alternatives.join(", "));
        }
    }
    println!("\n{}", "=".repeat(60));

    Ok(())
}

async fn handle_accept(config: &Config, args: &[String]) -> cartwise_lib::Result<()> {
    let item_name = args
        .first()
        .ok_or_else(|| CartError::InvalidInput("missing item name".to_string()))?;
    let category = match args.get(1) {
        Some(c) => c.parse::<Category>().map_err(CartError::InvalidInput)?,
        None => Category::General,
    };

    let item = assistant(config)
        .await?
        .add_suggestion(item_name, category.as_str())
        .await?;
    println!("✓ Added {} to your list", item.item_name);
    Ok(())
}

async fn handle_alternatives(config: &Config, args: &[String]) -> cartwise_lib::Result<()> {
    if args.is_empty() {
        eprintln!("Error: No item provided");
        return Ok(());
    }

    let item_name = args.join(" ");
    let alternatives = assistant(config).await?.alternatives(&item_name).await;

    if alternatives.is_empty() {
        println!("No alternatives known for '{}'", item_name);
    } else {
        println!("Instead of {} you could get:", item_name);
        for alternative in alternatives {
            println!("  - {}", alternative);
        }
    }

    Ok(())
}

async fn handle_catalog_add(config: &Config, args: &[String]) -> cartwise_lib::Result<()> {
    let mut args = args.to_vec();
    let season = take_flag(&mut args, "--season")
        .map(|s| s.parse::<Season>().map_err(CartError::InvalidInput))
        .transpose()?;
    let alternatives: Vec<String> = take_flag(&mut args, "--alt")
        .map(|list| {
            list.split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let (name, category) = match args.as_slice() {
        [name, category, ..] => {
            let category = category.parse::<Category>().map_err(CartError::InvalidInput)?;
            (name.clone(), category)
        }
        _ => {
            return Err(CartError::InvalidInput(
                "usage: catalog-add <name> <category> [--season <s>] [--alt a,b]".to_string(),
            ))
        }
    };

    let db = open(config).await?;
    let id = db
        .add_catalog_product(CatalogInput {
            product_name: name.clone(),
            category: category.as_str().to_string(),
            brand: None,
            price: None,
            seasonal: season.is_some(),
            season,
            alternatives,
        })
        .await?;
    println!("✓ Added {} to the catalog (id {})", name, id);

    Ok(())
}

async fn handle_status(config: &Config) -> cartwise_lib::Result<()> {
    let db = open(config).await?;
    let stats = db.stats().await?;

    println!("\ncartwise Status");
    println!("{}", "=".repeat(60));
    println!("\nDatabase: {}", db.path().display());
    println!("Language: {}", config.locale);
    println!("Season:   {}", Season::current());

    println!("\nDatabase Statistics:");
    println!("  Items on list:    {}", stats.active_items);
    println!("  History records:  {}", stats.history_records);
    println!("  Catalog products: {}", stats.catalog_products);
    println!("  Voice commands:   {}", stats.voice_commands);
    println!(
        "  Connections:      {} open, {} idle",
        stats.pool_size, stats.idle_connections
    );
    println!("{}", "=".repeat(60));

    db.close().await;
    Ok(())
}

fn print_usage() {
    println!(
        r#"cartwise v{} - A shopping list you talk to

USAGE:
    cartwise [--lang <tag>] <COMMAND> [OPTIONS]

COMMANDS:
    say <phrase>               Interpret a phrase and apply it to the list
    parse <phrase>             Show how a phrase is interpreted (JSON)
    list [category]            Show active items
    complete <id>              Mark an item purchased
    remove <id>                Remove an item
    qty <id> <n>               Change an item's quantity
    clear                      Remove every active item
    suggest                    Show suggestions
    accept <item> [category]   Add a suggestion to the list
    alternatives <item>        Show substitutes for an item
    catalog-add <name> <category> [--season <s>] [--alt a,b]
                               Add a product to the catalog
    status                     Show status and stats
    version                    Show version
    help                       Show this help

EXAMPLES:
    cartwise say "add 3 apples"
    cartwise say "I need milk"
    cartwise say "bought milk"
    cartwise parse "find coffee under $10"
    cartwise catalog-add pumpkin produce --season fall --alt "butternut squash"

ENVIRONMENT:
    CARTWISE_DB     Database file (default: ~/.cartwise/list.db)
    CARTWISE_LANG   Language tag recorded with commands (default: en-US)
    CARTWISE_LOG    Log filter, e.g. debug (default: warn)
"#,
        env!("CARGO_PKG_VERSION")
    );
}
