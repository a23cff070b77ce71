//! Per-run cache of everything fetched from the runtime.
//!
//! Each listing is requested at most once per process and kept sorted by
//! creation time, so repeated polls print series in a stable order.

use std::collections::HashSet;

use regex::Regex;

use crate::docker::{
    Chronological, Container, ContainerListOptions, ContainerStats, ContainerStatus, Image,
    ImageFilter, Result, Runtime, Volume,
};
use crate::error::ResultOkLogExt;

/// Sorts oldest first, breaking ties by id or name.
pub fn sort_by_creation<T: Chronological>(items: &mut [T]) {
    items.sort_by(|a, b| {
        a.creation_time()
            .cmp(&b.creation_time())
            .then_with(|| a.sort_key().cmp(b.sort_key()))
    });
}

/// A container id and name paired with its stats sample.
#[derive(Debug, Clone)]
pub struct NamedStats {
    pub id: String,
    pub name: String,
    pub stats: ContainerStats,
}

pub struct Inventory<R> {
    runtime: R,
    exclude: Option<Regex>,
    all_containers: Option<Vec<Container>>,
    containers: Option<Vec<Container>>,
    sized_containers: Option<Vec<Container>>,
    images: Option<Vec<Image>>,
    all_images: Option<Vec<Image>>,
    dangling_images: Option<Vec<Image>>,
    intermediate_images: Option<Vec<Image>>,
    volumes: Option<Vec<Volume>>,
    stats: Option<Vec<NamedStats>>,
}

impl<R: Runtime> Inventory<R> {
    pub fn new(runtime: R, exclude: Option<Regex>) -> Self {
        Self {
            runtime,
            exclude,
            all_containers: None,
            containers: None,
            sized_containers: None,
            images: None,
            all_images: None,
            dangling_images: None,
            intermediate_images: None,
            volumes: None,
            stats: None,
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    fn is_reported(&self, container: &Container) -> bool {
        container.status == ContainerStatus::Running
            && !self
                .exclude
                .as_ref()
                .is_some_and(|re| re.is_match(container.name()))
    }

    /// Every container in any state. The exclusion pattern does not apply.
    pub async fn all_containers(&mut self) -> Result<&[Container]> {
        let containers = match self.all_containers.take() {
            Some(containers) => containers,
            None => {
                let mut containers = self
                    .runtime
                    .list_containers(ContainerListOptions::default())
                    .await?;
                sort_by_creation(&mut containers);
                containers
            }
        };
        Ok(self.all_containers.insert(containers).as_slice())
    }

    /// Running containers that are not excluded by name.
    pub async fn containers(&mut self) -> Result<&[Container]> {
        let containers = match self.containers.take() {
            Some(containers) => containers,
            None => {
                let all = self.all_containers().await?.to_vec();
                all.into_iter().filter(|c| self.is_reported(c)).collect()
            }
        };
        Ok(self.containers.insert(containers).as_slice())
    }

    /// Same selection as [`Inventory::containers`], with `SizeRw` populated.
    pub async fn sized_containers(&mut self) -> Result<&[Container]> {
        let containers = match self.sized_containers.take() {
            Some(containers) => containers,
            None => {
                let mut containers: Vec<Container> = self
                    .runtime
                    .list_containers(ContainerListOptions { size: true })
                    .await?
                    .into_iter()
                    .filter(|c| self.is_reported(c))
                    .collect();
                sort_by_creation(&mut containers);
                containers
            }
        };
        Ok(self.sized_containers.insert(containers).as_slice())
    }

    /// Top-level images, dangling ones included.
    pub async fn images(&mut self) -> Result<&[Image]> {
        let images = match self.images.take() {
            Some(images) => images,
            None => self.fetch_images(ImageFilter::TopLevel).await?,
        };
        Ok(self.images.insert(images).as_slice())
    }

    pub async fn all_images(&mut self) -> Result<&[Image]> {
        let images = match self.all_images.take() {
            Some(images) => images,
            None => self.fetch_images(ImageFilter::All).await?,
        };
        Ok(self.all_images.insert(images).as_slice())
    }

    pub async fn dangling_images(&mut self) -> Result<&[Image]> {
        let images = match self.dangling_images.take() {
            Some(images) => images,
            None => self.fetch_images(ImageFilter::Dangling).await?,
        };
        Ok(self.dangling_images.insert(images).as_slice())
    }

    /// Images that are neither top-level nor dangling, i.e. parent layers.
    pub async fn intermediate_images(&mut self) -> Result<&[Image]> {
        let images = match self.intermediate_images.take() {
            Some(images) => images,
            None => {
                let mut known: HashSet<String> =
                    self.images().await?.iter().map(|i| i.id.clone()).collect();
                known.extend(self.dangling_images().await?.iter().map(|i| i.id.clone()));
                self.all_images()
                    .await?
                    .iter()
                    .filter(|i| !known.contains(&i.id))
                    .cloned()
                    .collect()
            }
        };
        Ok(self.intermediate_images.insert(images).as_slice())
    }

    pub async fn volumes(&mut self) -> Result<&[Volume]> {
        let volumes = match self.volumes.take() {
            Some(volumes) => volumes,
            None => {
                let mut volumes = self.runtime.list_volumes().await?;
                sort_by_creation(&mut volumes);
                volumes
            }
        };
        Ok(self.volumes.insert(volumes).as_slice())
    }

    /// Stats samples for [`Inventory::containers`], in the same order.
    ///
    /// Containers whose stats cannot be fetched are logged and skipped.
    pub async fn stats(&mut self) -> Result<&[NamedStats]> {
        let stats = match self.stats.take() {
            Some(stats) => stats,
            None => {
                let targets: Vec<(String, String)> = self
                    .containers()
                    .await?
                    .iter()
                    .map(|c| (c.id.clone(), c.name().to_owned()))
                    .collect();
                let mut stats = Vec::with_capacity(targets.len());
                for (id, name) in targets {
                    let started = std::time::Instant::now();
                    if let Some(sample) = self.runtime.container_stats(&id).await.ok_log() {
                        log::trace!(
                            "stats for `{name}` took {}ms",
                            started.elapsed().as_millis()
                        );
                        stats.push(NamedStats {
                            id,
                            name,
                            stats: sample,
                        });
                    }
                }
                stats
            }
        };
        Ok(self.stats.insert(stats).as_slice())
    }

    async fn fetch_images(&self, filter: ImageFilter) -> Result<Vec<Image>> {
        let mut images = self.runtime.list_images(filter).await?;
        sort_by_creation(&mut images);
        Ok(images)
    }
}
