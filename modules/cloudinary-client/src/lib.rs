pub mod delivery;
pub mod error;
pub mod types;

pub use delivery::{format_delivery_url, TransformOptions};
pub use error::{CloudinaryError, Result};
pub use types::{ResourceRecord, SearchRequest, SearchResponse, SortHint};

use std::time::Duration;

use tracing::info;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Account credentials and connection settings, supplied once at
/// construction.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Hard bound on one search call.
    pub timeout: Duration,
}

pub struct CloudinaryClient {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

impl CloudinaryClient {
    pub fn new(config: CloudinaryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");
        Self { config, client }
    }

    pub fn cloud_name(&self) -> &str {
        &self.config.cloud_name
    }

    /// Execute one search API call. One network round trip, no retries;
    /// any transport or provider failure surfaces as an error.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        info!(
            expression = %request.expression,
            max_results = request.max_results,
            "Cloudinary search"
        );

        let url = format!("{}/{}/resources/search", API_BASE, self.config.cloud_name);
        let mut body = serde_json::json!({
            "expression": request.expression,
            "max_results": request.max_results,
            "with_field": ["context"],
        });
        if let Some(sort) = request.sort_by {
            body["sort_by"] = serde_json::json!([sort.to_sort_by()]);
        }

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CloudinaryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: SearchResponse = resp.json().await?;
        info!(
            count = data.resources.len(),
            total = data.total_count,
            "Cloudinary search complete"
        );
        Ok(data)
    }
}
