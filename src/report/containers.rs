use std::io::Write;

use super::Result;
use super::fieldname::FieldNames;
use super::graph::{self, Graph};
use crate::docker::Runtime;
use crate::inventory::Inventory;

pub(super) async fn values<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    let all = inventory.all_containers().await?.len();
    let running = inventory.containers().await?;
    let names: Vec<&str> = running.iter().map(|c| c.name()).collect();

    graph::value(out, "containers_quantity", running.len())?;
    graph::extinfo(out, "containers_quantity", &names.join(", "))?;
    graph::value(out, "all_containers_quantity", all)?;
    Ok(())
}

pub(super) fn graph(out: &mut impl Write) -> Result<()> {
    Graph {
        title: "Docker containers",
        vlabel: "containers",
        args: "--base 1000 --lower-limit 0",
        info: "Running containers that are not excluded by name, and all containers in any state.",
    }
    .write(out)?;
    graph::field(out, "containers_quantity", "Running containers")?;
    graph::field(out, "all_containers_quantity", "All containers")?;
    Ok(())
}

pub(super) async fn size_values<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    let mut fields = FieldNames::new(inventory.containers().await?);
    for container in inventory.sized_containers().await? {
        let field = fields.get(&container.id, container.name());
        graph::value(out, &field, container.size_rw.unwrap_or(0))?;
    }
    Ok(())
}

pub(super) async fn size_graph<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    Graph {
        title: "Docker containers size",
        vlabel: "bytes",
        args: "--base 1024 --lower-limit 0",
        info: "Size of the writable layer of each running container.",
    }
    .write(out)?;
    let containers = inventory.containers().await?;
    let mut fields = FieldNames::new(containers);
    for container in containers {
        let field = fields.get(&container.id, container.name());
        graph::field(out, &field, container.name())?;
    }
    Ok(())
}
