use clap::{Parser, Subcommand};
use newsdesk_service::{
    AppState, DefaultAppState,
    config::Config,
    dashboard::{Listing, NewsFilter, NewsOutcome, PostsOutcome},
    models::{NewsItem, Post},
    shutdown::StoreFile,
    store,
    views::TIMESTAMP_FORMAT,
};
use std::error::Error;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Fetch, store and browse posts and news from the terminal")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "NEWSDESK_CONFIG", default_value = "newsdesk.toml")]
    config: PathBuf,

    /// Store location, overriding the configuration file
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch posts unless some are already stored
    FetchPosts,
    /// Scrape news and replace the stored items
    FetchNews,
    /// Clear posts and refetch both sources
    Refresh,
    /// Show a page of stored posts
    Posts {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show a page of stored news, optionally filtered
    News {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
        /// Substring to look for in title or body
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Delete the store file
    Purge,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_or_default(&cli.config);
    if let Some(database_url) = cli.database_url {
        config.store.database_url = database_url;
    }
    config.validate()?;

    match cli.command {
        Commands::FetchPosts => {
            let state = open(&config)?;
            print_posts_outcome(&state.dashboard().fetch_posts().await?);
        }
        Commands::FetchNews => {
            let state = open(&config)?;
            print_news_outcome(&state.dashboard().fetch_news().await?);
        }
        Commands::Refresh => {
            let state = open(&config)?;
            let outcome = state.dashboard().refresh_all().await?;
            println!("Cleared {} posts", outcome.cleared_posts);
            print_posts_outcome(&outcome.posts);
            print_news_outcome(&outcome.news);
        }
        Commands::Posts { page } => {
            let state = open(&config)?;
            print_posts(&state.dashboard().posts_page(page).await?);
        }
        Commands::News {
            category,
            search,
            page,
        } => {
            let state = open(&config)?;
            let filter = NewsFilter::new(category, search);
            print_news(&state.dashboard().news_page(&filter, page).await?);
        }
        Commands::Purge => {
            let store_file = StoreFile::from_database_url(&config.store.database_url);
            match store_file.path() {
                Some(path) => println!("Removing {}", path.display()),
                None => println!("In-memory store, nothing to remove"),
            }
            store_file.teardown();
        }
    }

    Ok(())
}

fn open(config: &Config) -> Result<DefaultAppState, Box<dyn Error>> {
    let connection = store::establish(&config.store.database_url)?;
    Ok(DefaultAppState::new(store::shared(connection), config)?)
}

fn print_posts_outcome(outcome: &PostsOutcome) {
    match outcome {
        PostsOutcome::Skipped { existing } => {
            println!("Posts already stored ({existing}), fetch skipped")
        }
        PostsOutcome::Fetched {
            inserted,
            skipped_users,
        } => {
            println!("Fetched {inserted} posts");
            if !skipped_users.is_empty() {
                eprintln!("No posts for user ids: {skipped_users:?}");
            }
        }
    }
}

fn print_news_outcome(outcome: &NewsOutcome) {
    println!("Stored {} news items", outcome.stored);
    for warning in &outcome.warnings {
        eprintln!("Warning: category {}: {}", warning.category, warning.message);
    }
}

fn print_page_footer<T>(listing: &Listing<T>) {
    let window = &listing.window;
    println!(
        "-- page {} of {} ({} items){}{}",
        window.page,
        window.total_pages().max(1),
        window.total,
        if window.has_previous() { ", previous available" } else { "" },
        if window.has_next() { ", next available" } else { "" },
    );
}

fn print_posts(listing: &Listing<Post>) {
    if listing.items.is_empty() {
        println!("No posts to show");
    }
    for post in &listing.items {
        println!("User ID: {}  Post ID: {}", post.user_id, post.post_id);
        println!("  {}", post.title);
        println!("  {}", post.body.replace('\n', "\n  "));
        println!();
    }
    print_page_footer(listing);
}

fn print_news(listing: &Listing<NewsItem>) {
    if listing.items.is_empty() {
        println!("No news to show");
    }
    for item in &listing.items {
        println!(
            "[{}] {}  ({})",
            item.category,
            item.title,
            item.created_at.format(TIMESTAMP_FORMAT)
        );
        if let Some(url) = &item.source_url {
            println!("  {url}");
        }
        println!("  {}", item.body);
        println!();
    }
    print_page_footer(listing);
}
