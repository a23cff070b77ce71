//! Munin output for every series the plugin knows.
//!
//! A series has a values printer (normal runs) and a graph printer (`config`
//! runs). [`Reporter`] dispatches to both and adds the `multigraph` headers
//! when all series are reported at once.

mod containers;
mod fieldname;
mod graph;
mod images;
mod status;
mod usage;
mod volumes;

use std::fmt;
use std::io::Write;

use crate::docker::Runtime;
use crate::inventory::Inventory;
use crate::invocation::Selection;

pub use fieldname::clean_fieldname;
pub use status::{StatusCounts, count_statuses};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to query docker: {0}")]
    Runtime(#[from] crate::docker::Error),
    #[error("failed to write plugin output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A graph the plugin can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    Containers,
    Cpu,
    Images,
    Memory,
    Network,
    Status,
    Volumes,
    Size,
}

/// Series names as used in plugin link names, in `Series` declaration order.
const SERIES_NAMES: [(&str, Series); 8] = [
    ("containers", Series::Containers),
    ("cpu", Series::Cpu),
    ("images", Series::Images),
    ("memory", Series::Memory),
    ("network", Series::Network),
    ("status", Series::Status),
    ("volumes", Series::Volumes),
    ("size", Series::Size),
];

impl Series {
    pub const ALL: [Series; 8] = [
        Series::Containers,
        Series::Cpu,
        Series::Images,
        Series::Memory,
        Series::Network,
        Series::Status,
        Series::Volumes,
        Series::Size,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        SERIES_NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, series)| *series)
    }

    pub fn name(&self) -> &'static str {
        SERIES_NAMES[*self as usize].0
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Reporter<R> {
    inventory: Inventory<R>,
    dirty_config: bool,
}

impl<R: Runtime> Reporter<R> {
    pub fn new(inventory: Inventory<R>, dirty_config: bool) -> Self {
        Self {
            inventory,
            dirty_config,
        }
    }

    pub fn inventory(&self) -> &Inventory<R> {
        &self.inventory
    }

    /// Prints the values of every selected series.
    pub async fn fetch<W: Write>(&mut self, selection: Selection, out: &mut W) -> Result<()> {
        for &series in selection.series() {
            if selection.is_multi() {
                writeln!(out, "multigraph {series}")?;
            }
            self.values(series, out).await?;
        }
        Ok(())
    }

    /// Prints the graph configuration of every selected series, followed by
    /// its values when Munin supports dirty config.
    pub async fn config<W: Write>(&mut self, selection: Selection, out: &mut W) -> Result<()> {
        for &series in selection.series() {
            if selection.is_multi() {
                writeln!(out, "multigraph {series}")?;
            }
            self.graph(series, out).await?;
            if self.dirty_config {
                self.values(series, out).await?;
            }
        }
        Ok(())
    }

    async fn values<W: Write>(&mut self, series: Series, out: &mut W) -> Result<()> {
        let inventory = &mut self.inventory;
        match series {
            Series::Containers => containers::values(inventory, out).await,
            Series::Cpu => usage::cpu_values(inventory, out).await,
            Series::Images => images::values(inventory, out).await,
            Series::Memory => usage::memory_values(inventory, out).await,
            Series::Network => usage::network_values(inventory, out).await,
            Series::Status => status::values(inventory, out).await,
            Series::Volumes => volumes::values(inventory, out).await,
            Series::Size => containers::size_values(inventory, out).await,
        }
    }

    async fn graph<W: Write>(&mut self, series: Series, out: &mut W) -> Result<()> {
        let inventory = &mut self.inventory;
        match series {
            Series::Containers => containers::graph(out),
            Series::Cpu => usage::cpu_graph(inventory, out).await,
            Series::Images => images::graph(out),
            Series::Memory => usage::memory_graph(inventory, out).await,
            Series::Network => usage::network_graph(inventory, out).await,
            Series::Status => status::graph(out),
            Series::Volumes => volumes::graph(out),
            Series::Size => containers::size_graph(inventory, out).await,
        }
    }
}
