use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Container view model - the star of the show
///
/// This is the one shape every consumer sees, no matter how ragged the
/// upstream record was. Serialized field names match the blobs the
/// original mobile app wrote, so existing stores keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Stable identifier; the container number when known, otherwise a
    /// generated token. Dedup/removal key everywhere.
    pub id: String,
    /// Container number as entered/returned (uppercase)
    pub number: String,
    /// Customs office number or "N/A"
    pub mrn: String,
    /// Human-readable status (Polish), "Nieznany" when upstream is silent
    pub status: String,
    /// 0-100, derived from status
    pub progress: u8,
    pub terminal: String,
    /// Formatted departure date or "N/A"
    pub arrival: String,
    #[serde(rename = "type")]
    pub kind: ContainerKind,
    /// Relative-time label computed once at fetch time
    pub time_ago: String,
    /// Ship/operator name or "N/A"
    pub carrier: String,
    /// Exactly 4 milestones in fixed order
    pub history: Vec<Checkpoint>,
}

/// One fixed milestone in a container's journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub title: String,
    pub date: Option<String>,
    pub completed: bool,
}

/// Traffic direction of a container
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContainerKind {
    Import,
    Export,
}

impl std::fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerKind::Import => write!(f, "Import"),
            ContainerKind::Export => write!(f, "Export"),
        }
    }
}

/// Search filter as picked in the filter bar
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchFilter {
    #[default]
    All,
    Import,
    Export,
}

impl SearchFilter {
    pub fn matches(&self, kind: ContainerKind) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::Import => kind == ContainerKind::Import,
            SearchFilter::Export => kind == ContainerKind::Export,
        }
    }
}

impl std::fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchFilter::All => write!(f, "all"),
            SearchFilter::Import => write!(f, "import"),
            SearchFilter::Export => write!(f, "export"),
        }
    }
}

impl std::str::FromStr for SearchFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(SearchFilter::All),
            "import" => Ok(SearchFilter::Import),
            "export" => Ok(SearchFilter::Export),
            other => Err(format!("unknown filter: {}", other)),
        }
    }
}

/// One remembered search (query + filter)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// Trimmed, uppercased query text
    pub query: String,
    pub filter: SearchFilter,
    pub timestamp: DateTime<Utc>,
}

/// A previously fetched container, annotated with when it was searched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultEntry {
    #[serde(flatten)]
    pub container: Container,
    pub searched_at: DateTime<Utc>,
}
