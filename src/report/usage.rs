//! Per-container resource series computed from stats samples.

use std::io::Write;

use super::Result;
use super::fieldname::FieldNames;
use super::graph::{self, Graph};
use crate::docker::Runtime;
use crate::inventory::Inventory;

pub(super) async fn cpu_values<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    let mut fields = FieldNames::new(inventory.containers().await?);
    for sample in inventory.stats().await? {
        let percent = format!("{:.2}", sample.stats.cpu_percent());
        graph::value(out, &fields.get(&sample.id, &sample.name), percent)?;
    }
    Ok(())
}

pub(super) async fn cpu_graph<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    Graph {
        title: "Docker containers CPU usage",
        vlabel: "%",
        args: "--base 1000 --lower-limit 0",
        info: "CPU usage of each running container, where 100% is one fully used CPU.",
    }
    .write(out)?;
    container_fields(inventory, out).await
}

pub(super) async fn memory_values<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    let mut fields = FieldNames::new(inventory.containers().await?);
    for sample in inventory.stats().await? {
        let field = fields.get(&sample.id, &sample.name);
        graph::value(out, &field, sample.stats.memory_usage())?;
    }
    Ok(())
}

pub(super) async fn memory_graph<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    Graph {
        title: "Docker containers memory usage",
        vlabel: "bytes",
        args: "--base 1024 --lower-limit 0",
        info: "Memory used by each running container, without reclaimable page cache.",
    }
    .write(out)?;
    container_fields(inventory, out).await
}

pub(super) async fn network_values<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    let mut fields = FieldNames::new(inventory.containers().await?);
    for sample in inventory.stats().await? {
        let field = fields.get(&sample.id, &sample.name);
        let (rx, tx) = sample.stats.network_totals();
        graph::value(out, &format!("{field}_down"), rx)?;
        graph::value(out, &format!("{field}_up"), tx)?;
    }
    Ok(())
}

/// Received bytes are drawn below the axis, transmitted bytes above it.
pub(super) async fn network_graph<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    Graph {
        title: "Docker containers network usage",
        vlabel: "bytes in (-) / out (+) per ${graph_period}",
        args: "--base 1024",
        info: "Network traffic of each running container, summed over its interfaces.",
    }
    .write(out)?;
    let containers = inventory.containers().await?;
    let mut fields = FieldNames::new(containers);
    for container in containers {
        let field = fields.get(&container.id, container.name());
        let down = format!("{field}_down");
        let up = format!("{field}_up");

        graph::attribute(out, &down, "label", container.name())?;
        graph::attribute(out, &down, "type", "DERIVE")?;
        graph::attribute(out, &down, "graph", "no")?;
        graph::attribute(out, &down, "min", 0)?;
        graph::attribute(out, &up, "label", container.name())?;
        graph::attribute(out, &up, "type", "DERIVE")?;
        graph::attribute(out, &up, "negative", &down)?;
        graph::attribute(out, &up, "min", 0)?;
    }
    Ok(())
}

async fn container_fields<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    let containers = inventory.containers().await?;
    let mut fields = FieldNames::new(containers);
    for container in containers {
        let field = fields.get(&container.id, container.name());
        graph::field(out, &field, container.name())?;
    }
    Ok(())
}
