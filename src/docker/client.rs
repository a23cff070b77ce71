use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::de::DeserializeOwned;

use super::models::{ContainerInspect, VolumeList};
use super::transport::{self, Endpoint};
use super::{
    Container, ContainerListOptions, ContainerStats, Error, HealthStatus, Image, ImageFilter,
    Result, Runtime, Volume,
};

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// `filters={"dangling":["true"]}`, percent-encoded.
const DANGLING_FILTER: &str = "filters=%7B%22dangling%22%3A%5B%22true%22%5D%7D";

/// Client for the Docker Engine HTTP API.
///
/// Every request opens its own connection, so the client is cheap to clone and
/// holds no connection state between calls.
#[derive(Debug, Clone)]
pub struct DockerClient {
    endpoint: Endpoint,
    api_version: Option<String>,
    timeout: Duration,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorMessage {
    message: String,
}

impl DockerClient {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            api_version: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Pins requests to an API version, e.g. `1.43` yields `/v1.43/...` paths.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        match &self.api_version {
            Some(version) => format!("/v{}{path}", version.trim_start_matches('v')),
            None => path.to_owned(),
        }
    }

    async fn request(&self, path: &str) -> Result<Bytes> {
        let url = self.url(path);
        let started = Instant::now();
        let response = tokio::time::timeout(self.timeout, transport::get(&self.endpoint, &url))
            .await
            .map_err(|_| Error::Timeout {
                path: url.clone(),
                timeout: self.timeout,
            })??;
        log::debug!(
            "GET {url} -> {} in {}ms",
            response.status(),
            started.elapsed().as_millis()
        );

        let status = response.status();
        let body = response.into_body();
        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorMessage>(&body)
                .map(|err| err.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).trim().to_owned());
            return Err(Error::Status {
                path: url,
                status,
                message,
            });
        }

        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.request(path).await?;
        serde_json::from_slice(&body).map_err(|source| Error::Decode {
            path: self.url(path),
            source,
        })
    }
}

impl Runtime for DockerClient {
    async fn ping(&self) -> Result<()> {
        self.request("/_ping").await.map(|_| ())
    }

    async fn list_containers(&self, options: ContainerListOptions) -> Result<Vec<Container>> {
        let path = if options.size {
            "/containers/json?all=1&size=1"
        } else {
            "/containers/json?all=1"
        };
        self.get_json(path).await
    }

    async fn list_images(&self, filter: ImageFilter) -> Result<Vec<Image>> {
        let path = match filter {
            ImageFilter::TopLevel => "/images/json".to_owned(),
            ImageFilter::All => "/images/json?all=1".to_owned(),
            ImageFilter::Dangling => format!("/images/json?{DANGLING_FILTER}"),
        };
        self.get_json(&path).await
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>> {
        let list: VolumeList = self.get_json("/volumes").await?;
        Ok(list.volumes.unwrap_or_default())
    }

    async fn inspect_health(&self, id: &str) -> Result<Option<HealthStatus>> {
        let inspect: ContainerInspect = self.get_json(&format!("/containers/{id}/json")).await?;
        Ok(inspect
            .state
            .and_then(|state| state.health)
            .map(|health| health.status))
    }

    async fn container_stats(&self, id: &str) -> Result<ContainerStats> {
        self.get_json(&format!("/containers/{id}/stats?stream=false"))
            .await
    }
}
