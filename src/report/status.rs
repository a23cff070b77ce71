use std::io::Write;

use super::Result;
use super::graph::{self, Graph};
use crate::docker::{ContainerStatus, HealthStatus, Runtime};
use crate::error::ResultOkLogExt;
use crate::inventory::Inventory;

/// Number of containers per lifecycle bucket.
///
/// Running containers whose health check reports `unhealthy` are counted in
/// `unhealthy` instead of `running`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub running: usize,
    pub unhealthy: usize,
    pub paused: usize,
    pub created: usize,
    pub restarting: usize,
    pub removing: usize,
    pub exited: usize,
    pub dead: usize,
}

impl StatusCounts {
    /// Field names and counts, in output order.
    pub fn fields(&self) -> [(&'static str, usize); 8] {
        [
            ("running", self.running),
            ("unhealthy", self.unhealthy),
            ("paused", self.paused),
            ("created", self.created),
            ("restarting", self.restarting),
            ("removing", self.removing),
            ("exited", self.exited),
            ("dead", self.dead),
        ]
    }

    pub fn total(&self) -> usize {
        self.fields().iter().map(|(_, n)| n).sum()
    }
}

/// Buckets every container by status, inspecting running ones for their health.
///
/// A health lookup that fails (e.g. the container just went away) is logged
/// and the container counts as running.
pub async fn count_statuses<R: Runtime>(inventory: &mut Inventory<R>) -> Result<StatusCounts> {
    let containers = inventory.all_containers().await?.to_vec();
    let mut counts = StatusCounts::default();
    for container in &containers {
        match container.status {
            ContainerStatus::Running => {
                let health = inventory
                    .runtime()
                    .inspect_health(&container.id)
                    .await
                    .ok_log()
                    .flatten();
                if health == Some(HealthStatus::Unhealthy) {
                    counts.unhealthy += 1;
                } else {
                    counts.running += 1;
                }
            }
            ContainerStatus::Paused => counts.paused += 1,
            ContainerStatus::Created => counts.created += 1,
            ContainerStatus::Restarting => counts.restarting += 1,
            ContainerStatus::Removing => counts.removing += 1,
            ContainerStatus::Exited => counts.exited += 1,
            ContainerStatus::Dead => counts.dead += 1,
        }
    }
    log::debug!(
        "counted {} containers by status: {counts:?}",
        containers.len()
    );

    Ok(counts)
}

pub(super) async fn values<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    let counts = count_statuses(inventory).await?;
    for (field, count) in counts.fields() {
        graph::value(out, field, count)?;
    }
    Ok(())
}

pub(super) fn graph(out: &mut impl Write) -> Result<()> {
    Graph {
        title: "Docker containers by status",
        vlabel: "containers",
        args: "--base 1000 --lower-limit 0",
        info: "Containers per lifecycle state. Running containers failing their health check are counted as unhealthy.",
    }
    .write(out)?;
    for (field, _) in StatusCounts::default().fields() {
        graph::field(out, field, field)?;
    }
    Ok(())
}
