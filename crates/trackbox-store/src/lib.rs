// Persistent key/value blob storage
// One string key, one JSON blob - the repositories layer everything on top

pub mod store;

pub use store::{KvStore, MemoryStore, SqliteStore, StoreError};
