use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackbox_api::GatewayClient;
use trackbox_core::{
    Config, Container, FavoritesRepo, GatewayProvider, SearchFilter, SearchHistoryRepo,
    SearchResultsRepo, Tracker,
};
use trackbox_store::{KvStore, SqliteStore};

#[derive(Parser)]
#[command(name = "trackbox")]
#[command(version, about = "Shipping-container tracking for the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search a container number against the gateway
    Search {
        /// Container number or MRN
        query: String,
        /// Restrict results to one traffic direction
        #[arg(long, default_value = "all")]
        filter: SearchFilter,
    },
    /// Past searches
    History {
        #[command(subcommand)]
        action: Option<ListAction>,
    },
    /// Previously fetched containers
    Results {
        #[command(subcommand)]
        action: Option<ListAction>,
    },
    /// Starred containers
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
}

#[derive(clap::Subcommand)]
enum ListAction {
    /// Show stored entries (the default)
    List,
    /// Remove one entry by id
    Remove { id: String },
    /// Drop everything
    Clear,
}

#[derive(clap::Subcommand)]
enum FavoritesAction {
    /// Show starred containers (the default)
    List,
    /// Search a container and star the first match
    Add { query: String },
    /// Unstar by container id
    Remove { id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trackbox=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    if let Some(parent) = config.storage.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store: Arc<dyn KvStore> = Arc::new(SqliteStore::new(&config.storage.db_path)?);

    let client = GatewayClient::with_base_url(
        config.gateway.username.clone(),
        config.gateway.password.clone(),
        config.gateway.base_url.clone(),
    );
    let tracker = Tracker::new(
        Box::new(GatewayProvider::new(client)),
        SearchHistoryRepo::new(store.clone()),
        SearchResultsRepo::new(store.clone()),
    );
    let favorites = FavoritesRepo::new(store);

    match cli.command {
        Commands::Search { query, filter } => {
            let containers = tracker.search(&query, filter).await;
            if containers.is_empty() {
                println!("No containers found.");
            }
            for container in &containers {
                print_container(container);
            }
        }
        Commands::History { action } => match action.unwrap_or(ListAction::List) {
            ListAction::List => {
                for entry in tracker.history().list().await {
                    println!(
                        "{}  {:<15} filter: {:<7} ({})",
                        entry.id, entry.query, entry.filter, entry.timestamp
                    );
                }
            }
            ListAction::Remove { id } => {
                tracker.history().remove(&id).await;
            }
            ListAction::Clear => {
                tracker.history().clear().await;
            }
        },
        Commands::Results { action } => match action.unwrap_or(ListAction::List) {
            ListAction::List => {
                for entry in tracker.results().list().await {
                    println!("-- searched at {} --", entry.searched_at);
                    print_container(&entry.container);
                }
            }
            ListAction::Remove { id } => {
                tracker.results().remove(&id).await;
            }
            ListAction::Clear => {
                tracker.results().clear().await;
            }
        },
        Commands::Favorites { action } => match action.unwrap_or(FavoritesAction::List) {
            FavoritesAction::List => {
                for container in favorites.list().await {
                    print_container(&container);
                }
            }
            FavoritesAction::Add { query } => {
                let containers = tracker.search(&query, SearchFilter::All).await;
                match containers.into_iter().next() {
                    Some(container) => {
                        let number = container.number.clone();
                        if favorites.add(container).await {
                            println!("Starred {}", number);
                        } else {
                            println!("Could not star {}", number);
                        }
                    }
                    None => println!("Nothing to star for {}", query),
                }
            }
            FavoritesAction::Remove { id } => {
                favorites.remove(&id).await;
            }
        },
    }

    Ok(())
}

fn print_container(container: &Container) {
    println!(
        "{}  [{}]  {} ({}%)",
        container.number, container.kind, container.status, container.progress
    );
    println!(
        "    mrn: {}  terminal: {}  arrival: {}  carrier: {}  updated: {}",
        container.mrn, container.terminal, container.arrival, container.carrier, container.time_ago
    );
    for checkpoint in &container.history {
        let mark = if checkpoint.completed { "x" } else { " " };
        let date = checkpoint.date.as_deref().unwrap_or("N/A");
        println!("    [{}] {:<22} {}", mark, checkpoint.title, date);
    }
}
