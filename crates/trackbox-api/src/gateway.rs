use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GATEWAY_API_BASE: &str = "https://demo.polskipcs.pl/gateway";

/// Default API user for the public demo gateway.
pub const DEMO_API_USER: &str = "api_www@polskipcs.pl";
pub const DEMO_API_PASSWORD: &str = "Noh28976";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Client for the container terminal gateway.
///
/// The gateway exposes a single details endpoint keyed by container
/// number and authenticates every call with HTTP Basic. One request
/// per lookup, no retries - callers treat any failure as "no data".
pub struct GatewayClient {
    client: reqwest::Client,
    username: String,
    password: String,
    base_url: String,
}

impl GatewayClient {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_base_url(username, password, GATEWAY_API_BASE.to_string())
    }

    /// For self-hosted gateway instances or testing with custom API URL
    pub fn with_base_url(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: String,
    ) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("TrackBox/0.1.0"),
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            username: username.into(),
            password: password.into(),
            base_url,
        }
    }

    /// Create Basic Auth header value
    fn basic_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.username, self.password);
        let encoded =
            base64::Engine::encode(&base64::engine::general_purpose::STANDARD, credentials.as_bytes());
        format!("Basic {}", encoded)
    }

    /// Fetch terminal details for a container number.
    ///
    /// Returns the raw upstream records. An empty body is a valid
    /// response (the gateway answers with nothing for unknown numbers)
    /// and comes back as an empty vec rather than an error.
    pub async fn container_details(&self, number: &str) -> Result<Vec<GatewayContainer>> {
        let url = format!(
            "{}/containers/terminals/details?numbers={}",
            self.base_url, number
        );
        debug!("Fetching container details: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, self.basic_auth_header())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::RequestFailed(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            debug!("Empty gateway response for {}", number);
            return Ok(Vec::new());
        }

        let records: Vec<GatewayContainer> = serde_json::from_str(&body)?;
        debug!("Gateway returned {} record(s) for {}", records.len(), number);
        Ok(records)
    }
}

/// One upstream record from the details endpoint.
///
/// Every field is optional - the gateway omits whatever a terminal did
/// not report. Newer gateway versions moved the ship fields under a
/// nested `shipDetails` object; the accessor methods below check the
/// flat field first and fall back to the nested one, so callers never
/// care which API version answered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayContainer {
    #[serde(default)]
    pub container_number: Option<String>,
    #[serde(default)]
    pub customs_office_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub terminal_name: Option<String>,
    #[serde(default)]
    pub gate_in_time: Option<String>,
    #[serde(default)]
    pub loading_time: Option<String>,
    #[serde(default)]
    pub port_code: Option<String>,
    #[serde(default)]
    pub atd: Option<String>,
    #[serde(default)]
    pub ship_name: Option<String>,
    #[serde(default)]
    pub ship_details: Option<ShipDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipDetails {
    #[serde(default)]
    pub ship_name: Option<String>,
    #[serde(default)]
    pub atd: Option<String>,
}

impl GatewayContainer {
    /// Ship/operator name: flat `shipName`, else nested `shipDetails.shipName`
    pub fn carrier_name(&self) -> Option<&str> {
        self.ship_name
            .as_deref()
            .or_else(|| self.ship_details.as_ref()?.ship_name.as_deref())
    }

    /// Actual time of departure: flat `atd`, else nested `shipDetails.atd`
    pub fn departure_time(&self) -> Option<&str> {
        self.atd
            .as_deref()
            .or_else(|| self.ship_details.as_ref()?.atd.as_deref())
    }
}
