use std::process::Command;

use tracing::info;

use crate::error::{Error, Result};
use crate::registry::ServerRecord;

/// Arguments passed to `ssh`: `-p <port> -- <user>@<host>`.
pub fn ssh_args(record: &ServerRecord) -> Vec<String> {
    vec![
        "-p".to_string(),
        record.port.clone(),
        "--".to_string(),
        record.target(),
    ]
}

/// Run `ssh` in the foreground and wait for it.
///
/// Returns the exit code of ssh, or 1 if it was killed by a signal.
///
/// # Errors
///
/// Returns [`Error::Ssh`] if the process could not be started.
pub fn connect(record: &ServerRecord) -> Result<i32> {
    info!("connecting to {} ({})", record.name, record.target());

    let status = Command::new("ssh")
        .args(ssh_args(record))
        .status()
        .map_err(|source| Error::Ssh {
            target: record.target(),
            source,
        })?;

    info!("ssh exited with {}", status);
    Ok(status.code().unwrap_or(1))
}
