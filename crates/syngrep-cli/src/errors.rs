//! Error types and exit-code mapping for the CLI runtime.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

use syngrep_syntax::Position;

/// Errors surfaced by a syngrep run.
#[derive(Debug, Error)]
pub(crate) enum AppError {
    /// No command was supplied on the command line.
    #[error("need at least one command")]
    MissingCommand,

    /// More than one command was supplied; chaining is a deliberate
    /// non-feature, not a bug.
    #[error("command composability is not yet supported")]
    MultipleCommands,

    /// Pattern compilation or parser setup failed.
    #[error(transparent)]
    Pattern(#[from] syngrep_syntax::SyntaxError),

    /// A named path does not exist.
    #[error("no such path: {}", path.display())]
    MissingPath {
        /// The path that could not be found.
        path: PathBuf,
    },

    /// A path could not be read or traversed.
    #[error("cannot read {}: {source}", path.display())]
    Read {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// A corpus file contains syntax errors; the run aborts.
    #[error("cannot parse {}:{position}: {message}", path.display())]
    Unparsable {
        /// The file that failed to parse.
        path: PathBuf,
        /// Where the first syntax error starts.
        position: Position,
        /// Description of the first syntax error.
        message: String,
    },

    /// A match record could not be serialised for `--format json`.
    #[error("failed to serialise match record: {0}")]
    Serialise(#[from] serde_json::Error),

    /// Match output could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl AppError {
    /// Maps errors to process exit codes: a missing command is a usage
    /// error (2), everything else is a runtime failure (1).
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::MissingCommand => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}
