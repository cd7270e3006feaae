// Gateway provider - bridges the API client with the ContainerSource trait
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};
use trackbox_api::GatewayClient;

use crate::{
    mapping,
    models::{Container, SearchFilter},
    Result,
};

/// Trait for container sources - makes testing easier and keeps things flexible
///
/// The gateway is the only real source today, but the seam lets tests
/// drive the tracker with canned data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContainerSource: Send + Sync {
    async fn search(&self, query: &str, filter: SearchFilter) -> Result<Vec<Container>>;
}

/// The real gateway-backed source.
///
/// Never fails from the caller's point of view: any transport error,
/// non-2xx status, or empty response degrades to a single placeholder
/// container so the user always sees something for their query.
pub struct GatewayProvider {
    client: GatewayClient,
}

impl GatewayProvider {
    pub fn new(client: GatewayClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContainerSource for GatewayProvider {
    async fn search(&self, query: &str, filter: SearchFilter) -> Result<Vec<Container>> {
        // Blank query: empty result, no network call
        let normalized = query.trim().to_uppercase();
        if normalized.is_empty() {
            debug!("Blank query, skipping gateway call");
            return Ok(Vec::new());
        }

        let records = match self.client.container_details(&normalized).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Gateway lookup for {} failed: {}", normalized, e);
                return Ok(vec![mapping::placeholder(&normalized)]);
            }
        };

        if records.is_empty() {
            debug!("No upstream data for {}, returning placeholder", normalized);
            return Ok(vec![mapping::placeholder(&normalized)]);
        }

        let now = Utc::now();
        let containers: Vec<Container> = records
            .iter()
            .map(|record| mapping::map_record(record, now))
            .filter(|container| filter.matches(container.kind))
            .collect();

        debug!(
            "Mapped {} container(s) for {} (filter: {})",
            containers.len(),
            normalized,
            filter
        );
        Ok(containers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_provider() -> GatewayProvider {
        // Nothing listens on this port; the request fails immediately
        GatewayProvider::new(GatewayClient::with_base_url(
            "user",
            "pass",
            "http://127.0.0.1:9".to_string(),
        ))
    }

    #[tokio::test]
    async fn test_blank_query_returns_empty_without_network() {
        // The provider only talks to an unreachable address, so a
        // placeholder would come back if any request were attempted.
        let provider = unreachable_provider();

        let results = provider.search("", SearchFilter::All).await.unwrap();
        assert!(results.is_empty());

        let results = provider.search("   ", SearchFilter::All).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_yields_placeholder() {
        let provider = unreachable_provider();

        let results = provider
            .search("tcku7486791", SearchFilter::All)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        let container = &results[0];
        assert_eq!(container.id, "TCKU7486791");
        assert_eq!(container.status, "Nieznany");
        assert_eq!(container.progress, 0);
        assert_eq!(container.history.len(), 4);
        assert!(container.history.iter().all(|c| !c.completed));
    }

    #[tokio::test]
    async fn test_query_is_trimmed_and_uppercased() {
        let provider = unreachable_provider();

        let results = provider
            .search("  tcku7486791  ", SearchFilter::All)
            .await
            .unwrap();

        assert_eq!(results[0].number, "TCKU7486791");
    }
}
