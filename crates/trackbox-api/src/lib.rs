// HTTP client for the container tracking gateway
pub mod gateway;

// Re-export common types
pub use gateway::{GatewayClient, GatewayContainer, GatewayError, ShipDetails};
