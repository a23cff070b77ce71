//! One plugin run: mode dispatch and exit status.

use std::io::Write;
use std::process::ExitCode;

use crate::config::Settings;
use crate::docker::Runtime;
use crate::error::{Error, Result};
use crate::inventory::Inventory;
use crate::invocation::{Invocation, Mode};
use crate::report::Reporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}

/// Runs `invocation` against an already configured runtime.
///
/// `connection` carries the outcome of loading the settings and building the
/// client, so a configuration error is reported the same way as a daemon that
/// does not answer.
pub async fn execute<R: Runtime, W: Write>(
    invocation: &Invocation,
    connection: Result<(Settings, R)>,
    out: &mut W,
) -> Exit {
    match invocation.mode() {
        Mode::Suggest => finish(writeln!(out, "multi").map_err(report_error)),
        Mode::Autoconf => {
            let answer = match connect(connection).await {
                Ok(_) => "yes".to_owned(),
                Err(err) => {
                    log::debug!("autoconf: {err}");
                    format!("no ({err})")
                }
            };
            finish(writeln!(out, "{answer}").map_err(report_error))
        }
        mode @ (Mode::Fetch | Mode::Config) => {
            let selection = match invocation.selection() {
                Ok(selection) => selection,
                Err(err) => {
                    log::error!("{err}");
                    return Exit::Failure;
                }
            };
            let (settings, runtime) = match connect(connection).await {
                Ok(connected) => connected,
                Err(err) => {
                    log::error!("{err}");
                    // Munin shows stdout, so the reason is repeated there.
                    if let Err(err) = writeln!(out, "no ({err})") {
                        log::error!("{err}");
                    }
                    return Exit::Failure;
                }
            };

            let inventory = Inventory::new(runtime, settings.exclude.clone());
            let mut reporter = Reporter::new(inventory, settings.dirty_config);
            let result = match mode {
                Mode::Config => reporter.config(selection, out).await,
                _ => reporter.fetch(selection, out).await,
            };
            finish(result.map_err(Error::from))
        }
    }
}

async fn connect<R: Runtime>(connection: Result<(Settings, R)>) -> Result<(Settings, R)> {
    let (settings, runtime) = connection?;
    runtime.ping().await?;
    Ok((settings, runtime))
}

fn report_error(err: std::io::Error) -> Error {
    crate::report::Error::from(err).into()
}

fn finish(result: Result<()>) -> Exit {
    match result {
        Ok(()) => Exit::Success,
        Err(err) => {
            log::error!("{err}");
            Exit::Failure
        }
    }
}
