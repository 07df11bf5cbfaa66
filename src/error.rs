//! Error types for the Choria command line.

use thiserror::Error;

/// Errors raised while resolving, validating or dispatching a request.
///
/// `User` and `Abort` are the two kinds the top level translates into an
/// [`Outcome`]. `RequestFailed` and `RequestAborted` are the same two kinds for a
/// request that had already produced output; that output is printed first. Every
/// other variant propagates out of `RunContext::main`.
#[derive(Debug, Error)]
pub enum ChoriaError {
    /// Operator-actionable failure, reported on stderr.
    #[error("{0}")]
    User(String),

    /// Hard stop. Nothing further is printed for it.
    #[error("Aborted: {0}")]
    Abort(String),

    /// Request failed after printing part of its result.
    #[error("{reason}")]
    RequestFailed { output: String, reason: String },

    /// Request was stopped after printing part of its result.
    #[error("Aborted: {reason}")]
    RequestAborted { output: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not load DDL for agent {agent}: {reason}")]
    Ddl { agent: String, reason: String },

    #[error("Dispatch failed: {0}")]
    Dispatch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ChoriaError {
    fn from(err: config::ConfigError) -> Self {
        ChoriaError::Config(err.to_string())
    }
}

/// How a run ended, as seen by the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// A `User` error was reported on stderr. Still exits 0.
    UserFacingFailure(String),
    FatalAbort,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed | Outcome::UserFacingFailure(_) => 0,
            Outcome::FatalAbort => 1,
        }
    }
}
