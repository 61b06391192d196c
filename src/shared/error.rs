use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow callers (shell scripts, CI systems) to distinguish a
/// user interrupt from a genuine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// The report was produced and written
    Success = 0,
    /// Source construction, cataloging or report writing failed
    ApplicationError = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// The run was interrupted by the user (SIGINT)
    Interrupted = 130,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::ApplicationError => write!(f, "Application Error (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::Interrupted => write!(f, "Interrupted (130)"),
        }
    }
}

/// Application-specific errors for SBOM generation.
///
/// Uses thiserror to derive Display and Error traits, keeping the
/// user-facing hint next to each variant.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Failed to construct source from user input {input:?}\nDetails: {details}\n\n💡 Hint: Check that the image exists locally or that the directory path is correct")]
    SourceConstruction { input: String, details: String },

    #[error("Cataloging task '{task}' failed")]
    Cataloging { task: String },

    #[error("Failed to write the report")]
    ReportWrite,

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid configuration in section '{section}': {reason}\n\n💡 Hint: {hint}")]
    InvalidConfig {
        section: String,
        reason: String,
        hint: String,
    },

    #[error("Invalid image reference: {reference}\nReason: {reason}\n\n💡 Hint: Use a reference such as 'alpine:3.19' or 'dir:/path/to/rootfs'")]
    InvalidImageReference { reference: String, reason: String },

    /// The worker finished cleanly but never handed over a result
    #[error("Cataloging completed without producing a report")]
    MissingResult,
}
