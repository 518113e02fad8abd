//! Analysis session state.
//!
//! A session owns the outcome of the latest submission. The state machine
//! is `Idle -> Loading -> Success | Error -> Loading -> ...`; `Idle` is only
//! the state before the first submission. Because the outcome is a single
//! enum, a report and an error can never be held at the same time.

use crate::analysis::classify_threat;
use crate::error::{AnalysisError, SubmitError};
use crate::models::{CiReport, ExportedReport, ThreatLevel};
use crate::report::assemble_report;
use chrono::{DateTime, Utc};
use std::future::Future;
use tracing::{info, warn};

/// Something that can run a competitor analysis.
pub trait AnalysisBackend {
    fn analyze(
        &self,
        competitor: &str,
    ) -> impl Future<Output = Result<CiReport, AnalysisError>> + Send;
}

/// Where the session is in the request lifecycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    /// No submission has been made yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    Success(CiReport),
    Error(String),
}

/// Trim a competitor name, rejecting one that is empty afterwards.
pub fn validate_competitor(competitor: &str) -> Result<String, SubmitError> {
    let name = competitor.trim();
    if name.is_empty() {
        return Err(SubmitError::Validation);
    }
    Ok(name.to_string())
}

/// Single-owner container for the current analysis.
///
/// `submit` borrows the session mutably for the whole request, so a second
/// submission cannot start until the first resolves.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    competitor_name: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn report(&self) -> Option<&CiReport> {
        match self.state {
            SessionState::Success(ref report) => Some(report),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self.state {
            SessionState::Error(ref message) => Some(message),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    /// Trimmed competitor name of the latest accepted submission.
    pub fn competitor_name(&self) -> Option<&str> {
        self.competitor_name.as_deref()
    }

    /// Validate a submission and enter `Loading`, clearing any previous
    /// report or error. Returns the trimmed competitor name.
    ///
    /// An empty name is rejected without entering `Loading`; the validation
    /// message replaces whatever was shown before.
    pub fn begin(&mut self, competitor: &str) -> Result<String, SubmitError> {
        let name = match validate_competitor(competitor) {
            Ok(name) => name,
            Err(e) => {
                warn!("Rejected submission with an empty competitor name");
                self.state = SessionState::Error(e.to_string());
                return Err(e);
            }
        };

        self.state = SessionState::Loading;
        self.competitor_name = Some(name.clone());
        Ok(name)
    }

    /// Record the outcome of the in-flight request.
    pub fn complete(&mut self, outcome: Result<CiReport, AnalysisError>) {
        self.state = match outcome {
            Ok(report) => {
                info!(
                    "Analysis complete with {} sub-agent results",
                    report.sub_agent_results.len()
                );
                SessionState::Success(report)
            }
            Err(e) => {
                warn!("Analysis failed: {}", e);
                SessionState::Error(e.to_string())
            }
        };
    }

    /// Run one submission end to end.
    pub async fn submit<B: AnalysisBackend>(
        &mut self,
        competitor: &str,
        backend: &B,
    ) -> Result<CiReport, SubmitError> {
        let name = self.begin(competitor)?;

        info!("Starting analysis of {}", name);
        let outcome = backend.analyze(&name).await;
        self.complete(outcome.clone());

        outcome.map_err(SubmitError::Analysis)
    }

    /// Threat level of the current report (`Low` when there is none).
    pub fn threat_level(&self) -> ThreatLevel {
        classify_threat(self.report())
    }

    /// Assemble the export document for the current report, if any.
    pub fn export(&self, timestamp: DateTime<Utc>) -> Option<ExportedReport> {
        let report = self.report()?;
        let name = self.competitor_name()?;
        Some(assemble_report(name, timestamp, self.threat_level(), report))
    }
}
