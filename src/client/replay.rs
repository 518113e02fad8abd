//! Replay of a saved orchestrator response.
//!
//! Lets a report be rendered and exported again without calling the remote
//! workflow. The file holds the full response envelope, so it is judged
//! exactly like a live response.

use crate::client::orchestrator::OrchestratorEnvelope;
use crate::error::AnalysisError;
use crate::models::CiReport;
use crate::session::AnalysisBackend;
use std::path::PathBuf;
use tracing::info;

pub struct ReplayBackend {
    path: PathBuf,
}

impl ReplayBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl AnalysisBackend for ReplayBackend {
    async fn analyze(&self, competitor: &str) -> Result<CiReport, AnalysisError> {
        info!(
            "Replaying saved response for {} from {}",
            competitor,
            self.path.display()
        );

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AnalysisError::Replay {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;

        let envelope: OrchestratorEnvelope = serde_json::from_str(&content)
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

        envelope.into_report()
    }
}
