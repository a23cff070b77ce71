use std::fmt::Display;
use std::io::{self, Write};

const CATEGORY: &str = "virtualization";

/// Graph-level attributes of a `config` response.
pub(super) struct Graph<'a> {
    pub title: &'a str,
    pub vlabel: &'a str,
    pub args: &'a str,
    pub info: &'a str,
}

impl Graph<'_> {
    pub fn write(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "graph_title {}", self.title)?;
        writeln!(out, "graph_vlabel {}", self.vlabel)?;
        writeln!(out, "graph_category {CATEGORY}")?;
        writeln!(out, "graph_args {}", self.args)?;
        writeln!(out, "graph_info {}", self.info)
    }
}

pub(super) fn value(out: &mut impl Write, field: &str, value: impl Display) -> io::Result<()> {
    writeln!(out, "{field}.value {value}")
}

/// Writes `<field>.extinfo`, skipping empty text.
pub(super) fn extinfo(out: &mut impl Write, field: &str, text: &str) -> io::Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    writeln!(out, "{field}.extinfo {text}")
}

pub(super) fn attribute(
    out: &mut impl Write,
    field: &str,
    name: &str,
    value: impl Display,
) -> io::Result<()> {
    writeln!(out, "{field}.{name} {value}")
}

/// Writes the `label` and `min 0` attributes shared by most fields.
pub(super) fn field(out: &mut impl Write, field: &str, label: &str) -> io::Result<()> {
    attribute(out, field, "label", label)?;
    attribute(out, field, "min", 0)
}
