use std::io::Write;

use super::Result;
use super::graph::{self, Graph};
use crate::docker::Runtime;
use crate::inventory::Inventory;

pub(super) async fn values<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    let volumes = inventory.volumes().await?;
    let names: Vec<&str> = volumes.iter().map(|v| v.name.as_str()).collect();
    graph::value(out, "volumes_quantity", volumes.len())?;
    graph::extinfo(out, "volumes_quantity", &names.join(", "))?;
    Ok(())
}

pub(super) fn graph(out: &mut impl Write) -> Result<()> {
    Graph {
        title: "Docker volumes",
        vlabel: "volumes",
        args: "--base 1000 --lower-limit 0",
        info: "Number of volumes.",
    }
    .write(out)?;
    graph::field(out, "volumes_quantity", "Volumes")?;
    Ok(())
}
