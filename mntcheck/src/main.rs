// SPDX-License-Identifier: MIT

use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::warn;

use mntcheck::config::{Backend, CheckConfig, DEFAULT_CHECK_NAME};
use mntcheck::logging::{self, LogLevel};
use mntcheck::{Check, CheckVerdict};

#[derive(Parser)]
#[command(name = "check_mounts", version, about = "Local and NFS mount state check", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Check name printed at the start of the status line
    #[arg(long)]
    name: Option<String>,

    /// NFS probe timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Inventory backend
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Mount point to skip, may be repeated
    #[arg(long, value_name = "PATH")]
    exclude: Vec<PathBuf>,

    /// Run the NFS probe directly instead of through sudo
    #[arg(long)]
    no_sudo: bool,

    /// Print the inventory table on stderr before checking
    #[arg(long)]
    show_inventory: bool,

    /// Diagnostics on stderr, -vv for debug
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<CheckConfig> {
        let mut config = match &self.config {
            Some(path) => CheckConfig::from_file(path)?,
            None => CheckConfig::default(),
        };

        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if self.no_sudo {
            config.elevate = false;
        }
        config.exclude.extend(self.exclude.iter().cloned());

        config.validate()?;
        Ok(config)
    }

    /// Name for lines reported before a configuration is available.
    fn check_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_CHECK_NAME)
    }
}

fn report(name: &str, verdict: &CheckVerdict) -> ExitCode {
    println!("{}", verdict.render(name));
    // exit codes are 0..=3
    ExitCode::from(verdict.exit_code() as u8)
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let text = err.to_string();
            let reason = text.lines().next().unwrap_or_default();
            let verdict = CheckVerdict::unknown(format!(
                "invalid arguments: {}",
                reason.trim_start_matches("error: ")
            ));
            return report(DEFAULT_CHECK_NAME, &verdict);
        }
    };

    if let Err(err) = logging::init(LogLevel::from_occurrences(cli.verbose)) {
        eprintln!("check_mounts: logging disabled: {err:#}");
    }

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => {
            let verdict = CheckVerdict::unknown(format!("invalid configuration: {err:#}"));
            return report(cli.check_name(), &verdict);
        }
    };

    let check = Check::new(config);
    if cli.show_inventory {
        match check.summary() {
            Ok(summary) => eprintln!("{summary}"),
            Err(err) => warn!("inventory not shown: {err}"),
        }
    }

    let verdict = check.run();
    report(&check.config().name, &verdict)
}
