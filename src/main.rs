use std::env;
use std::io::BufRead;
use std::time::Duration;

use html_escape::decode_html_entities;
use log::{debug, error};
use tokio::sync::mpsc;

use recipe_search::{
    clean_summary, ApiConfig, Debouncer, PageControl, Recipe, RecipeQuery, ScrollFeed,
    SearchError, SearchOrchestrator, PAGE_RANGE,
};

const USAGE: &str = "\
Usage:
  recipe-search search <text> [--page N] [--diet D] [--cuisine C] [--type T]
  recipe-search ingredients <list> [--diet D] [--cuisine C] [--type T] [--no-details]
  recipe-search shell

Set RECIPE_SEARCH__API_KEY (or api_key in config.toml) first.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        return Err("No command given".into());
    };

    match command.as_str() {
        "search" => run_direct(rest).await,
        "ingredients" => run_ingredients(rest).await,
        "shell" => run_shell().await,
        other => {
            eprintln!("{USAGE}");
            Err(format!("Unknown command: {other}").into())
        }
    }
}

#[derive(Default)]
struct Flags {
    text: String,
    page: u32,
    diet: Option<String>,
    cuisine: Option<String>,
    meal_type: Option<String>,
    no_details: bool,
}

fn parse_flags(args: &[String]) -> Result<Flags, Box<dyn std::error::Error>> {
    let mut flags = Flags {
        page: 1,
        ..Flags::default()
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value_for = |name: &str| -> Result<String, Box<dyn std::error::Error>> {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{name} needs a value").into())
        };
        match arg.as_str() {
            "--page" => flags.page = value_for("--page")?.parse()?,
            "--diet" => flags.diet = Some(value_for("--diet")?),
            "--cuisine" => flags.cuisine = Some(value_for("--cuisine")?),
            "--type" => flags.meal_type = Some(value_for("--type")?),
            "--no-details" => flags.no_details = true,
            other if other.starts_with("--") => {
                return Err(format!("Unknown flag: {other}").into());
            }
            text => {
                if !flags.text.is_empty() {
                    flags.text.push(' ');
                }
                flags.text.push_str(text);
            }
        }
    }
    Ok(flags)
}

fn apply_filters(mut query: RecipeQuery, flags: &Flags) -> RecipeQuery {
    if let Some(diet) = &flags.diet {
        query = query.with_diet(diet);
    }
    if let Some(cuisine) = &flags.cuisine {
        query = query.with_cuisine(cuisine);
    }
    if let Some(meal_type) = &flags.meal_type {
        query = query.with_meal_type(meal_type);
    }
    query
}

async fn run_direct(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let flags = parse_flags(args)?;
    if !PAGE_RANGE.contains(&flags.page) {
        return Err(format!(
            "Page {} is out of range ({}-{})",
            flags.page,
            PAGE_RANGE.start(),
            PAGE_RANGE.end()
        )
        .into());
    }

    let config = ApiConfig::load()?;
    let budget = config.summary_budget;
    let orchestrator = SearchOrchestrator::from_config(config)?;

    let query = apply_filters(RecipeQuery::direct(&flags.text)?, &flags)
        .with_page(flags.page)
        .with_per_page(orchestrator.config().page_size);

    let mut pages = PageControl::new(orchestrator, query);
    pages.load().await?;

    println!(
        "Page {} of {}-{} for \"{}\"",
        pages.page(),
        PAGE_RANGE.start(),
        PAGE_RANGE.end(),
        flags.text
    );
    render(&pages.items, budget);
    Ok(())
}

async fn run_ingredients(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let flags = parse_flags(args)?;

    let config = ApiConfig::load()?;
    let budget = config.summary_budget;
    let page_size = config.page_size;
    let orchestrator = SearchOrchestrator::from_config(config)?;

    let query = apply_filters(RecipeQuery::by_ingredients(&flags.text)?, &flags)
        .with_per_page(page_size)
        .with_details(!flags.no_details);

    let page = orchestrator.search(&query).await?;
    render(&page.items, budget);
    Ok(())
}

/// Interactive ingredient feed: typed lines are debounced queries, an empty
/// line plays the part of scrolling to the bottom.
async fn run_shell() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::load()?;
    let budget = config.summary_budget;
    let delay = Duration::from_millis(config.debounce_ms);

    let mut feed = ScrollFeed::new(SearchOrchestrator::from_config(config)?);
    let (debouncer, mut queries) = Debouncer::spawn(delay);
    let mut lines = spawn_stdin_reader();

    println!("Type ingredients (comma-separated); empty line loads more results; Ctrl-D quits.");

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                if line.trim().is_empty() {
                    more_results(&mut feed, budget).await;
                } else {
                    debouncer.input(line);
                }
            }
            settled = queries.recv() => {
                let Some(raw) = settled else { break };
                new_query(&mut feed, &mut queries, raw, budget).await;
            }
        }
    }
    Ok(())
}

enum Settled {
    Page(Result<usize, SearchError>),
    Superseded(Option<String>),
}

/// Run a debounced query, letting an even newer one supersede it mid-flight.
/// Dropping the in-flight `submit` future cancels the request; the feed only
/// commits state once a fetch settles, so nothing stale sticks.
async fn new_query(
    feed: &mut ScrollFeed,
    queries: &mut mpsc::UnboundedReceiver<String>,
    raw: String,
    budget: usize,
) {
    let mut pending = raw;
    loop {
        let settled = {
            let current = pending.clone();
            let submit = feed.submit(&current);
            tokio::pin!(submit);
            tokio::select! {
                result = &mut submit => Settled::Page(result),
                newer = queries.recv() => Settled::Superseded(newer),
            }
        };

        match settled {
            Settled::Page(Ok(count)) => {
                println!("-- {count} results for \"{pending}\"");
                render(&feed.items, budget);
                return;
            }
            Settled::Page(Err(e)) => {
                error!("Search failed: {e}");
                return;
            }
            Settled::Superseded(Some(newer)) => {
                debug!("Query \"{pending}\" superseded before completion");
                pending = newer;
            }
            Settled::Superseded(None) => return,
        }
    }
}

async fn more_results(feed: &mut ScrollFeed, budget: usize) {
    let already = feed.items.len();
    match feed.load_more().await {
        Ok(true) => {
            render(&feed.items[already..], budget);
            if !feed.wants_more() {
                println!("-- end of results");
            }
        }
        Ok(false) => println!("-- no more results"),
        Err(e) => error!("Loading more failed: {e}"),
    }
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn render(items: &[Recipe], budget: usize) {
    if items.is_empty() {
        println!("No recipes found.");
        return;
    }
    for recipe in items {
        print_card(recipe, budget);
    }
}

fn print_card(recipe: &Recipe, budget: usize) {
    println!();
    println!("* {}", decode_html_entities(&recipe.title));

    let minutes = recipe
        .ready_in_minutes
        .map(|m| format!("{m} min"))
        .unwrap_or_else(|| "not available".to_string());
    let servings = recipe
        .servings
        .map(|s| s.to_string())
        .unwrap_or_else(|| "not available".to_string());
    println!("  ready in: {minutes} | servings: {servings}");

    if let Some(tags) = dietary_tags(recipe) {
        println!("  {tags}");
    }

    match recipe.summary.as_deref() {
        Some(html) => println!("  {}", clean_summary(html, budget)),
        None => println!("  summary not available"),
    }
    println!("  {}", recipe.source_link());
}

fn dietary_tags(recipe: &Recipe) -> Option<String> {
    let mut tags = Vec::new();
    if recipe.vegetarian == Some(true) {
        tags.push("vegetarian");
    }
    if recipe.vegan == Some(true) {
        tags.push("vegan");
    }
    if recipe.gluten_free == Some(true) {
        tags.push("gluten-free");
    }
    if recipe.dairy_free == Some(true) {
        tags.push("dairy-free");
    }
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(", "))
    }
}
