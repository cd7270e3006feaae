// Search orchestration: fetch, then remember what we fetched
use tracing::warn;

use crate::{
    gateway::ContainerSource,
    history::SearchHistoryRepo,
    models::{Container, SearchFilter},
    results::SearchResultsRepo,
};

/// Ties a container source to the history and results repositories.
///
/// One user-visible search = one source call, one history entry, one
/// results batch. Persistence failures are logged and swallowed; a
/// search that fetched data never fails because a blob write did.
pub struct Tracker {
    source: Box<dyn ContainerSource>,
    history: SearchHistoryRepo,
    results: SearchResultsRepo,
}

impl Tracker {
    pub fn new(
        source: Box<dyn ContainerSource>,
        history: SearchHistoryRepo,
        results: SearchResultsRepo,
    ) -> Self {
        Self {
            source,
            history,
            results,
        }
    }

    /// Run a search and persist its outcome.
    ///
    /// The query lands in search history whether or not anything came
    /// back (a blank query records nothing - the history repo guards
    /// that itself). Fetched containers land in the results blob.
    pub async fn search(&self, query: &str, filter: SearchFilter) -> Vec<Container> {
        let containers = match self.source.search(query, filter).await {
            Ok(containers) => containers,
            Err(e) => {
                warn!("Container source failed for {:?}: {}", query, e);
                Vec::new()
            }
        };

        // The repos warn on their own when a write is lost
        self.history.add(query, filter).await;
        self.results.add_many(&containers).await;

        containers
    }

    pub fn history(&self) -> &SearchHistoryRepo {
        &self.history
    }

    pub fn results(&self) -> &SearchResultsRepo {
        &self.results
    }
}
