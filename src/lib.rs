//! Munin wildcard plugin reporting on a Docker host.
//!
//! The plugin is linked as `docker_<series>` and reads everything it prints
//! from the Docker Engine API: container counts and states, images, volumes
//! and per-container resource usage. Linked as `docker_multi` it reports every
//! series in one run using `multigraph`.
use std::io::{BufWriter, Write};
use std::process::ExitCode;

use config::Settings;
use invocation::Invocation;
use plugin::Exit;

pub mod config;
pub mod docker;
pub mod error;
pub mod inventory;
pub mod invocation;
pub mod plugin;
pub mod report;

/// Runs the plugin for `args` (program path first) and returns its exit code.
///
/// Settings come from the process environment; output goes to stdout.
pub async fn run(args: impl IntoIterator<Item = String>) -> ExitCode {
    let invocation = match Invocation::from_args(args) {
        Ok(invocation) => invocation,
        Err(err) => {
            log::error!("{err}");
            return Exit::Failure.into();
        }
    };
    log::debug!("Invocation: {invocation:?}");

    let connection = Settings::from_env()
        .map(|settings| {
            let client = settings.client();
            (settings, client)
        })
        .map_err(error::Error::from);

    let mut out = BufWriter::new(std::io::stdout().lock());
    let exit = plugin::execute(&invocation, connection, &mut out).await;
    if let Err(err) = out.flush() {
        log::error!("failed to write plugin output: {err}");
        return Exit::Failure.into();
    }
    exit.into()
}
