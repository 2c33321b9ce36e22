//! Error types for the Orbforge binary.
//!
//! [`CliError`] is the top-level error type that wraps every failure mode
//! between reading the command line and printing the report.

use orbforge_core::{ConfigError, DropError, PlanError};

/// Top-level error for the Orbforge binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The command line could not be understood.
    #[error("{message}\n\n{usage}", usage = crate::args::USAGE)]
    Usage {
        /// What was wrong with the arguments.
        message: String,
    },

    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Input validation or plan resolution failed.
    #[error("{source}")]
    Plan {
        /// The underlying plan error.
        #[from]
        source: PlanError,
    },

    /// Drop simulation or egg estimation failed.
    #[error("drop error: {source}")]
    Drops {
        /// The underlying drop error.
        #[from]
        source: DropError,
    },

    /// The report could not be serialized.
    #[error("failed to serialize report: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl CliError {
    /// Shorthand for a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}
