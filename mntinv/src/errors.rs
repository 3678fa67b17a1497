// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

/// Result type for inventory queries.
pub type InvResult<T = ()> = Result<T, InvError>;

/// Error type for inventory queries.
///
/// Every variant renders on a single line so it can be embedded in a status
/// message as-is.
#[derive(Debug, Error)]
pub enum InvError {
    /// The inventory tool could not be started.
    #[error("could not run {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The inventory tool ran but reported failure.
    #[error("{} exited with {}", program.display(), status_label(*status))]
    Command {
        program: PathBuf,
        status: Option<i32>,
    },

    /// A file backed source could not be read.
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn status_label(status: Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
