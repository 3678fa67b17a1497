// SPDX-License-Identifier: MIT

/// Message reported when every stage passed.
pub const ALL_OK_MESSAGE: &str = "all filesystems are in the appropriate mount state";

/// Monitoring severities, with the plugin exit code convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    pub fn exit_code(self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        }
    }
}

impl core::fmt::Display for Severity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// The single result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckVerdict {
    pub severity: Severity,
    pub message: String,
}

impl CheckVerdict {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn ok() -> Self {
        Self::new(Severity::Ok, ALL_OK_MESSAGE)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(Severity::Critical, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(Severity::Unknown, message)
    }

    pub fn exit_code(&self) -> i32 {
        self.severity.exit_code()
    }

    /// `<name> <SEVERITY> - <message>`, always a single line.
    ///
    /// The monitoring side keeps only the first line of output, so embedded
    /// line breaks are folded into spaces.
    pub fn render(&self, check_name: &str) -> String {
        format!(
            "{} {} - {}",
            single_line(check_name),
            self.severity,
            single_line(&self.message)
        )
    }
}

fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
