// Core business logic lives here - the brain of the operation
pub mod config;
pub mod error;
pub mod favorites;
pub mod gateway;
pub mod history;
pub mod mapping;
pub mod models;
pub mod results;
pub mod tracker;

pub use config::Config;
pub use error::Error;
pub use favorites::FavoritesRepo;
pub use gateway::{ContainerSource, GatewayProvider};
pub use history::SearchHistoryRepo;
pub use models::{Checkpoint, Container, ContainerKind, HistoryEntry, SearchFilter, SearchResultEntry};
pub use results::SearchResultsRepo;
pub use tracker::Tracker;

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
