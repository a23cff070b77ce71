use std::io::Write;

use time::OffsetDateTime;
use time::macros::format_description;

use super::Result;
use super::graph::{self, Graph};
use crate::docker::{Chronological, Image, Runtime};
use crate::inventory::Inventory;

const MIB: f64 = 1024.0 * 1024.0;

/// One-line description of an image for `extinfo`.
///
/// ```text
/// sha256:ec3f0931a6 (example:latest) 2022-02-04 21:20:12 UTC 164.09 MiB
/// ```
pub(super) fn summary(image: &Image) -> String {
    let tags: Vec<&str> = image.tags().collect();
    let tags = if tags.is_empty() {
        "<none>".to_owned()
    } else {
        tags.join(" ")
    };
    let created = OffsetDateTime::from_unix_timestamp(image.creation_time())
        .ok()
        .and_then(|t| {
            t.format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
            ))
            .ok()
        })
        .unwrap_or_else(|| "unknown".to_owned());

    format!(
        "{} ({tags}) {created} {:.2} MiB",
        image.short_id(),
        image.size as f64 / MIB
    )
}

fn summaries(images: &[Image]) -> String {
    images.iter().map(summary).collect::<Vec<_>>().join(", ")
}

pub(super) async fn values<R: Runtime>(
    inventory: &mut Inventory<R>,
    out: &mut impl Write,
) -> Result<()> {
    let images = inventory.images().await?;
    graph::value(out, "images_quantity", images.len())?;
    graph::extinfo(out, "images_quantity", &summaries(images))?;

    let dangling = inventory.dangling_images().await?;
    graph::value(out, "dangling_quantity", dangling.len())?;
    graph::extinfo(out, "dangling_quantity", &summaries(dangling))?;

    let intermediate = inventory.intermediate_images().await?.len();
    graph::value(out, "intermediate_quantity", intermediate)?;
    Ok(())
}

pub(super) fn graph(out: &mut impl Write) -> Result<()> {
    Graph {
        title: "Docker images",
        vlabel: "images",
        args: "--base 1000 --lower-limit 0",
        info: "Top-level images, dangling images and intermediate layers.",
    }
    .write(out)?;
    graph::field(out, "images_quantity", "Images")?;
    graph::field(out, "dangling_quantity", "Dangling images")?;
    graph::field(out, "intermediate_quantity", "Intermediate images")?;
    Ok(())
}
