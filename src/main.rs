use anyhow::{Context, Result};
use clap::Parser;
use futures::FutureExt;
use std::io::{BufRead, Write};
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use tokio::sync::mpsc;

use headlines::app::{App, AppEvent};
use headlines::config::Config;
use headlines::news::{build_http_client, NewsClient};
use headlines::storage::{Article, LocalStorage};
use headlines::store::{Category, FeedStore, Filter};
use headlines::ui;

/// Get the config directory path (~/.config/headlines/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("headlines");
    Ok(config_dir)
}

#[derive(Parser, Debug)]
#[command(name = "headlines", about = "Terminal news reader for NewsAPI-compatible services")]
struct Args {
    /// Config file (defaults to ~/.config/headlines/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Category to open with (general, business, technology, sports, health,
    /// science, entertainment, for-you)
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Start with a search instead of a category
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Print the first page of headlines and exit
    #[arg(long)]
    print: bool,

    /// Delete saved articles and settings
    #[arg(long)]
    reset_storage: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // SEC-007: Set directory permissions on Unix (user-only access)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    tracing::debug!(config = ?config, "Effective configuration");

    let storage_path = config_dir.join("storage.json");

    // Handle --reset-storage flag
    if args.reset_storage && storage_path.exists() {
        std::fs::remove_file(&storage_path).context("Failed to delete storage file")?;
        println!("Saved articles and settings reset.");
    }

    let initial = match &args.category {
        Some(name) => Category::from_name(name).with_context(|| {
            let names: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
            format!("Unknown category '{}'. Valid: {}", name, names.join(", "))
        })?,
        None => config.initial_category(),
    };

    let mut store = FeedStore::new(initial, LocalStorage::load(&storage_path));
    if let Some(query) = &args.search {
        store.set_search_query(query);
    }

    let api_key = config.resolve_api_key(std::env::var("NEWS_API_KEY").ok());
    let http = build_http_client(config.request_timeout()).context("Failed to build HTTP client")?;
    let news = NewsClient::new(http, api_key, config.base_url.clone(), config.country.clone());
    if !news.has_api_key() {
        tracing::warn!("No news API key configured; headlines cannot be fetched");
    }

    if args.print {
        return print_headlines(&news, &store).await;
    }

    let mut app = App::new(news, store, config.cache_ttl());

    loop {
        // Create event channel for background tasks
        let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

        match AssertUnwindSafe(ui::run(&mut app, event_tx, event_rx))
            .catch_unwind()
            .await
        {
            Ok(result) => {
                result?;
                break;
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&'static str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(error = %message, "UI loop panicked");

                if !prompt_relaunch(&message)? {
                    std::process::exit(1);
                }
                app.recover();
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Ask whether to restart the UI after a crash. Anything but y/yes declines.
fn prompt_relaunch(message: &str) -> Result<bool> {
    eprintln!();
    eprintln!("Something went wrong: {}", message);
    eprint!("Relaunch headlines? [y/N] ");
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

/// Headless mode: print page 1 of the startup filter.
async fn print_headlines(news: &NewsClient, store: &FeedStore) -> Result<()> {
    let filter = store.filter();
    println!("{}", filter);
    println!();

    if let Filter::Category(Category::ForYou) = filter {
        if store.saved().is_empty() {
            println!("No Saved Articles Yet");
        }
        for article in store.saved().as_slice() {
            print_article(article);
        }
        return Ok(());
    }

    let page = news
        .fetch_page(filter, 1)
        .await
        .with_context(|| format!("Failed to fetch {}", filter))?;

    if page.articles.is_empty() {
        println!("No Articles Found");
    }
    for article in &page.articles {
        print_article(article);
    }
    if page.next_page.is_some() {
        println!("More results available; run without --print to browse.");
    }
    Ok(())
}

fn print_article(article: &Article) {
    let title = headlines::util::strip_control_chars(&article.title);
    let source = headlines::util::strip_control_chars(&article.source.name);
    println!("• {} ({})", title, source);
    println!("  {}", article.url);
}
