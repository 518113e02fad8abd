//! Error types for analysis submissions.
//!
//! Both kinds end up as a single user-visible message. Missing sub-agents
//! or fields are not errors; see [`crate::analysis::extractor`].

use thiserror::Error;

/// Message used when the orchestrator fails without saying why.
pub const GENERIC_FAILURE: &str = "Failed to analyze competitor";

/// Why a submission did not produce a report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The competitor name was empty after trimming; no remote call was made.
    #[error("Please enter a competitor name")]
    Validation,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// The remote analysis failed, logically or in transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The orchestrator answered but reported a failure.
    #[error("{0}")]
    Rejected(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Cannot connect to orchestrator at {0}")]
    Connect(String),

    #[error("Orchestrator API error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to send request: {0}")]
    Transport(String),

    #[error("Failed to parse orchestrator response: {0}")]
    InvalidResponse(String),

    #[error("Failed to read saved response {path}: {message}")]
    Replay { path: String, message: String },
}
