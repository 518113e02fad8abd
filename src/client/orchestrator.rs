//! HTTP client for the remote orchestrator.
//!
//! Sends one analysis request per submission and interprets the response
//! envelope. There is no retry: a failure is reported once and the user
//! may submit again.

use crate::error::{AnalysisError, GENERIC_FAILURE};
use crate::models::CiReport;
use crate::session::AnalysisBackend;
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Default instruction sent to the orchestrator; `{competitor}` is replaced.
pub const DEFAULT_INSTRUCTION_TEMPLATE: &str = "Perform a comprehensive competitive intelligence analysis of {competitor}. Cover their products and pricing, recent market signals and likely next moves, and current news from the web.";

/// Connection settings for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub endpoint: String,
    pub agent_id: String,
    pub user_id: String,
    pub timeout_seconds: u64,
    pub instruction_template: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/api/v1/agents/run".to_string(),
            agent_id: String::new(),
            user_id: "rivalscope".to_string(),
            timeout_seconds: 300,
            instruction_template: DEFAULT_INSTRUCTION_TEMPLATE.to_string(),
        }
    }
}

/// Request body for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub message: String,
    pub agent_id: String,
    pub user_id: String,
    pub session_id: String,
}

/// Top-level response from the orchestrator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrchestratorEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: Option<ResponseBody>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub result: Option<CiReport>,
    #[serde(default)]
    pub message: Option<String>,
}

impl OrchestratorEnvelope {
    /// Accept the report only when `success` is true, the status is
    /// `"success"` and a result is present.
    ///
    /// Otherwise the failure message is the response message, then the
    /// top-level error, then a generic message. Empty strings are skipped.
    pub fn into_report(self) -> Result<CiReport, AnalysisError> {
        let OrchestratorEnvelope {
            success,
            response,
            error,
        } = self;
        let ResponseBody {
            status,
            result,
            message,
        } = response.unwrap_or_default();

        if success && status.as_deref() == Some("success") {
            if let Some(report) = result {
                return Ok(report);
            }
        }

        let message = message
            .filter(|m| !m.is_empty())
            .or_else(|| error.filter(|e| !e.is_empty()))
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        Err(AnalysisError::Rejected(message))
    }
}

/// Build the instruction text for a competitor.
pub fn build_instruction(template: &str, competitor: &str) -> String {
    template.replace("{competitor}", competitor)
}

/// A session id unique per request, derived from the current time.
pub fn new_session_id() -> String {
    format!("session-{}", Utc::now().timestamp_millis())
}

/// Client for the remote orchestrator.
pub struct OrchestratorClient {
    config: OrchestratorConfig,
    http_client: reqwest::Client,
}

impl OrchestratorClient {
    pub fn new(config: OrchestratorConfig) -> Result<Self> {
        info!("Using orchestrator at {}", config.endpoint);

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Build the request for a competitor.
    pub fn build_request(&self, competitor: &str) -> AnalysisRequest {
        AnalysisRequest {
            message: build_instruction(&self.config.instruction_template, competitor),
            agent_id: self.config.agent_id.clone(),
            user_id: self.config.user_id.clone(),
            session_id: new_session_id(),
        }
    }

    async fn send(&self, request: &AnalysisRequest) -> Result<CiReport, AnalysisError> {
        debug!("Sending analysis request, session {}", request.session_id);

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnalysisError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    AnalysisError::Connect(self.config.endpoint.clone())
                } else {
                    AnalysisError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::Transport(e.to_string()))?;

        parse_response(status, &body)
    }
}

impl AnalysisBackend for OrchestratorClient {
    async fn analyze(&self, competitor: &str) -> Result<CiReport, AnalysisError> {
        let request = self.build_request(competitor);
        self.send(&request).await
    }
}

/// Interpret an HTTP response body.
///
/// A non-2xx status still yields the envelope's message when the body
/// parses; otherwise the status and raw body are reported.
pub fn parse_response(status: StatusCode, body: &str) -> Result<CiReport, AnalysisError> {
    match serde_json::from_str::<OrchestratorEnvelope>(body) {
        Ok(envelope) => envelope.into_report(),
        Err(_) if !status.is_success() => Err(AnalysisError::Http {
            status: status.as_u16(),
            body: body.to_string(),
        }),
        Err(e) => Err(AnalysisError::InvalidResponse(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> OrchestratorEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_successful_envelope() {
        let report = envelope(json!({
            "success": true,
            "response": {
                "status": "success",
                "result": {
                    "final_output": "done",
                    "sub_agent_results": [],
                    "summary": "ok",
                    "workflow_completed": true
                }
            }
        }))
        .into_report()
        .unwrap();

        assert_eq!(report.summary, "ok");
        assert!(report.workflow_completed);
    }

    #[test]
    fn test_error_status_uses_response_message() {
        let err = envelope(json!({
            "success": true,
            "response": {"status": "error", "message": "rate limited"}
        }))
        .into_report()
        .unwrap_err();

        assert_eq!(err, AnalysisError::Rejected("rate limited".to_string()));
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_message_fallbacks() {
        let err = envelope(json!({
            "success": false,
            "response": {"status": "error", "message": ""},
            "error": "agent not found"
        }))
        .into_report()
        .unwrap_err();
        assert_eq!(err.to_string(), "agent not found");

        let err = envelope(json!({"success": false})).into_report().unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_success_flag_required() {
        let err = envelope(json!({
            "success": false,
            "response": {"status": "success", "result": {}}
        }))
        .into_report()
        .unwrap_err();

        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_success_without_result_is_failure() {
        let err = envelope(json!({
            "success": true,
            "response": {"status": "success"}
        }))
        .into_report()
        .unwrap_err();

        assert_eq!(err.to_string(), GENERIC_FAILURE);
    }

    #[test]
    fn test_parse_response_http_error() {
        let err = parse_response(StatusCode::BAD_GATEWAY, "Bad Gateway").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Http {
                status: 502,
                body: "Bad Gateway".to_string()
            }
        );

        let err = parse_response(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"success": false, "error": "quota exceeded"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");

        let err = parse_response(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidResponse(_)));
    }

    #[test]
    fn test_build_request() {
        let client = OrchestratorClient::new(OrchestratorConfig {
            agent_id: "ci-workflow".to_string(),
            instruction_template: "Analyze {competitor} now".to_string(),
            ..Default::default()
        })
        .unwrap();

        let request = client.build_request("Acme Corp");

        assert_eq!(request.message, "Analyze Acme Corp now");
        assert_eq!(request.agent_id, "ci-workflow");
        assert_eq!(request.user_id, "rivalscope");
        assert!(request.session_id.starts_with("session-"));
    }

    #[test]
    fn test_default_instruction_mentions_competitor() {
        let message = build_instruction(DEFAULT_INSTRUCTION_TEMPLATE, "Globex");
        assert!(message.contains("Globex"));
        assert!(!message.contains("{competitor}"));
    }
}
