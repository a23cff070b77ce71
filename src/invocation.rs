//! Decodes how Munin invoked the plugin.
//!
//! Munin runs wildcard plugins through symlinks named `docker_<series>` and
//! passes the protocol command, if any, as the first argument.

use std::path::Path;
use std::str::FromStr;

use crate::report::Series;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing program name")]
    MissingProgram,
    #[error("program name `{0}` has no `_<series>` suffix")]
    MissingSuffix(String),
    #[error("unknown command `{0}` (expected config, autoconf or suggest)")]
    UnknownMode(String),
    #[error("unknown series `{0}`")]
    UnknownSeries(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No argument: print values.
    Fetch,
    Config,
    Autoconf,
    Suggest,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "" => Ok(Mode::Fetch),
            "config" => Ok(Mode::Config),
            "autoconf" => Ok(Mode::Autoconf),
            "suggest" => Ok(Mode::Suggest),
            other => Err(Error::UnknownMode(other.to_owned())),
        }
    }
}

/// The series a run reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every series, each under its own `multigraph` header.
    Multi,
    Single(Series),
}

impl Selection {
    pub fn series(&self) -> &'static [Series] {
        match self {
            Selection::Multi => &Series::ALL,
            Selection::Single(series) => {
                let all: &'static [Series] = &Series::ALL;
                let index = *series as usize;
                &all[index..=index]
            }
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Selection::Multi)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    suffix: String,
    mode: Mode,
}

impl Invocation {
    pub fn new(suffix: impl Into<String>, mode: Mode) -> Self {
        Self {
            suffix: suffix.into(),
            mode,
        }
    }

    /// Parses `argv`: the program path followed by an optional command.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let program = args.next().ok_or(Error::MissingProgram)?;
        let program = program.as_ref();
        let name = Path::new(program)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::MissingSuffix(program.to_owned()))?;
        let (_, suffix) = name
            .split_once('_')
            .ok_or_else(|| Error::MissingSuffix(name.clone()))?;

        let mode = match args.next() {
            Some(arg) => arg.as_ref().parse()?,
            None => Mode::Fetch,
        };

        Ok(Self::new(suffix, mode))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Resolves the suffix to the series to report.
    pub fn selection(&self) -> Result<Selection> {
        if self.suffix == "multi" {
            return Ok(Selection::Multi);
        }
        Series::from_name(&self.suffix)
            .map(Selection::Single)
            .ok_or_else(|| Error::UnknownSeries(self.suffix.clone()))
    }
}
