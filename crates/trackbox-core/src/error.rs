use thiserror::Error;

/// All the ways things can go wrong in TrackBox
///
/// We use thiserror here because it generates the boilerplate for us.
/// Life's too short to manually implement Display and Error traits.
///
/// Note that very little of this ever reaches a caller: storage
/// failures degrade to empty lists at the repository boundary and
/// gateway failures degrade to a placeholder container, so the enum
/// mostly serves config loading and custom ContainerSource impls.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Gateway request failed: {0}")]
    ApiError(String),

    #[error("Store operation failed: {0}")]
    StoreError(#[from] trackbox_store::StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
