//! Read-only access to a Docker Engine.
//!
//! [`Runtime`] is the narrow seam the reporting code depends on; [`DockerClient`]
//! implements it over the Engine HTTP API.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod models;
mod transport;

pub use client::{DEFAULT_TIMEOUT, DockerClient};
pub use error::{Error, Result};
pub use models::{
    Chronological, Container, ContainerStats, ContainerStatus, CpuStats, CpuUsage, HealthStatus,
    Image, MemoryStats, NetworkStats, Timestamp, Volume,
};
pub use transport::{DEFAULT_SOCKET_PATH, Endpoint};

/// Options for listing containers. Stopped containers are always included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerListOptions {
    /// Also compute the writable layer size (`SizeRw`), which is slow.
    pub size: bool,
}

/// Which images an image listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFilter {
    /// Top-level images, dangling ones included.
    TopLevel,
    /// Every image, intermediate layers included.
    All,
    /// Untagged images not referenced by any other image.
    Dangling,
}

/// The operations the plugin needs from a container runtime.
pub trait Runtime {
    /// Checks that the endpoint answers.
    fn ping(&self) -> impl Future<Output = Result<()>> + Send;

    fn list_containers(
        &self,
        options: ContainerListOptions,
    ) -> impl Future<Output = Result<Vec<Container>>> + Send;

    fn list_images(&self, filter: ImageFilter)
    -> impl Future<Output = Result<Vec<Image>>> + Send;

    fn list_volumes(&self) -> impl Future<Output = Result<Vec<Volume>>> + Send;

    /// Health check state of a container, `None` when it has no health check.
    fn inspect_health(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<HealthStatus>>> + Send;

    /// A single stats sample, including the previous CPU sample.
    fn container_stats(&self, id: &str) -> impl Future<Output = Result<ContainerStats>> + Send;
}
