//! In-memory [`Runtime`] used by the reporting tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{
    Container, ContainerListOptions, ContainerStats, ContainerStatus, Error, HealthStatus, Image,
    ImageFilter, Result, Runtime, Timestamp, Volume,
};

#[derive(Debug, Default)]
pub(crate) struct FakeRuntime {
    pub containers: Vec<Container>,
    pub images: HashMap<ImageFilter, Vec<Image>>,
    pub volumes: Vec<Volume>,
    pub health: HashMap<String, HealthStatus>,
    pub stats: HashMap<String, ContainerStats>,
    pub unreachable: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeRuntime {
    pub fn with_containers(containers: Vec<Container>) -> Self {
        Self {
            containers,
            ..Default::default()
        }
    }

    /// A runtime whose every call fails to connect.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    /// Number of calls made so far to `name`, e.g. `list_containers`.
    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    fn record(&self, name: &str) -> Result<()> {
        self.calls.lock().unwrap().push(name.to_owned());
        if self.unreachable {
            return Err(Error::Connect {
                endpoint: "unix:///fake/docker.sock".to_owned(),
                source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            });
        }
        Ok(())
    }
}

impl Runtime for FakeRuntime {
    async fn ping(&self) -> Result<()> {
        self.record("ping")
    }

    async fn list_containers(&self, options: ContainerListOptions) -> Result<Vec<Container>> {
        self.record("list_containers")?;
        let mut containers = self.containers.clone();
        if !options.size {
            for container in &mut containers {
                container.size_rw = None;
            }
        }
        Ok(containers)
    }

    async fn list_images(&self, filter: ImageFilter) -> Result<Vec<Image>> {
        self.record("list_images")?;
        Ok(self.images.get(&filter).cloned().unwrap_or_default())
    }

    async fn list_volumes(&self) -> Result<Vec<Volume>> {
        self.record("list_volumes")?;
        Ok(self.volumes.clone())
    }

    async fn inspect_health(&self, id: &str) -> Result<Option<HealthStatus>> {
        self.record("inspect_health")?;
        Ok(self.health.get(id).copied())
    }

    async fn container_stats(&self, id: &str) -> Result<ContainerStats> {
        self.record("container_stats")?;
        self.stats.get(id).cloned().ok_or_else(|| Error::Status {
            path: format!("/containers/{id}/stats?stream=false"),
            status: http::StatusCode::NOT_FOUND,
            message: format!("No such container: {id}"),
        })
    }
}

pub(crate) fn container(name: &str, status: ContainerStatus, created: i64) -> Container {
    Container {
        id: format!("{name}-id"),
        names: vec![format!("/{name}")],
        status,
        created: Some(Timestamp::Epoch(created)),
        created_at: None,
        size_rw: None,
    }
}

pub(crate) fn image(id: &str, tags: &[&str], created: i64, size: i64) -> Image {
    Image {
        id: id.to_owned(),
        repo_tags: Some(tags.iter().map(|t| (*t).to_owned()).collect()),
        created: Some(Timestamp::Epoch(created)),
        created_at: None,
        size,
    }
}

pub(crate) fn volume(name: &str, created_at: &str) -> Volume {
    Volume {
        name: name.to_owned(),
        created: None,
        created_at: Some(Timestamp::Text(created_at.to_owned())),
    }
}
