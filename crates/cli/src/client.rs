//! API client for the Singularity scheduler API

use anyhow::{Context, Result};
use dashboard_lib::fetch::{async_trait, UtilizationSource};
use dashboard_lib::ClusterUtilization;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Path of the cluster utilization endpoint, relative to the API base URL
pub const UTILIZATION_PATH: &str = "api/usage/cluster/utilization";

/// API client for the scheduler API
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        // Url::join replaces the last path segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }
}

#[async_trait]
impl UtilizationSource for ApiClient {
    async fn fetch_utilization(&self) -> Result<ClusterUtilization> {
        self.get(UTILIZATION_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "requestUtilizations": [{
            "requestId": "req-1",
            "cpuReserved": 4.0,
            "cpuUsed": 2.0,
            "memBytesReserved": 4096,
            "memBytesUsed": 2048,
            "numTasks": 2,
            "minMemBytesUsed": 1024,
            "maxMemBytesUsed": 3072,
            "minCpuUsed": 0.5,
            "maxCpuUsed": 1.5
        }]
    }"#;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client =
            ApiClient::new("http://localhost:7099/singularity", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:7099/singularity/");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(ApiClient::new("not a url", Duration::from_secs(5)).is_err());
    }

    #[tokio::test]
    async fn test_fetch_utilization() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/singularity/api/usage/cluster/utilization")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SNAPSHOT)
            .create_async()
            .await;

        let client = ApiClient::new(
            &format!("{}/singularity", server.url()),
            Duration::from_secs(5),
        )
        .unwrap();
        let snapshot = client.fetch_utilization().await.unwrap();

        mock.assert_async().await;
        assert_eq!(snapshot.request_utilizations.len(), 1);
        assert_eq!(snapshot.request_utilizations[0].request_id, "req-1");
    }

    #[tokio::test]
    async fn test_fetch_utilization_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/usage/cluster/utilization")
            .with_status(503)
            .with_body("scheduler unavailable")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let err = client.fetch_utilization().await.unwrap_err();

        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("scheduler unavailable"));
    }
}
