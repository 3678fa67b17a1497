// SPDX-License-Identifier: MIT

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Diagnostic verbosity. Diagnostics always go to stderr; stdout carries
/// only the status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

impl LogLevel {
    /// Maps the number of `-v` flags.
    pub fn from_occurrences(count: u8) -> Self {
        match count {
            0 => LogLevel::Quiet,
            1 => LogLevel::Normal,
            _ => LogLevel::Verbose,
        }
    }

    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "info",
            LogLevel::Verbose => "debug",
        }
    }
}

/// Builds the filter: `env` (the value of `RUST_LOG`) wins over `level`.
fn filter(level: LogLevel, env: Option<&str>) -> anyhow::Result<EnvFilter> {
    match env {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid {} {directives:?}", EnvFilter::DEFAULT_ENV)),
        None => EnvFilter::try_new(level.directive()).context("failed to create log filter"),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `level`; a malformed
/// `RUST_LOG` is an error.
pub fn init(level: LogLevel) -> anyhow::Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter(level, env.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(LogLevel::from_occurrences(0), LogLevel::Quiet);
        assert_eq!(LogLevel::from_occurrences(1), LogLevel::Normal);
        assert_eq!(LogLevel::from_occurrences(4), LogLevel::Verbose);
        assert_eq!(LogLevel::Verbose.directive(), "debug");
    }

    #[test]
    fn env_directives_override_level() {
        assert!(filter(LogLevel::Quiet, Some("mntcheck=debug")).is_ok());
        assert!(filter(LogLevel::Quiet, None).is_ok());

        let err = filter(LogLevel::Quiet, Some("mntcheck=loud")).unwrap_err();
        assert!(format!("{err:#}").contains("invalid RUST_LOG"));
    }
}
