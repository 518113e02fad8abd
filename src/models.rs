//! Data models for competitive-intelligence reports.
//!
//! This module contains the shapes of the orchestrator payload (raw
//! sub-agent results and the combined report), typed views of the three
//! known sub-agent outputs, and the exported report document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Qualitative threat rating derived from the Market Signals analysis.
///
/// Never supplied by the orchestrator; see [`crate::analysis::classify_threat`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    /// No significant competitive pressure detected (also the default).
    #[default]
    Low,
    /// Moderate competitive pressure.
    Medium,
    /// Significant or major competitive pressure.
    High,
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreatLevel::Low => write!(f, "Low"),
            ThreatLevel::Medium => write!(f, "Medium"),
            ThreatLevel::High => write!(f, "High"),
        }
    }
}

impl ThreatLevel {
    /// Returns an emoji representation of the threat level.
    pub fn emoji(&self) -> &'static str {
        match self {
            ThreatLevel::Low => "🟢",
            ThreatLevel::Medium => "🟡",
            ThreatLevel::High => "🔴",
        }
    }
}

/// The sub-agents whose output shapes are known.
///
/// Outputs carry no discriminant of their own; the producing agent's name
/// is the only thing that identifies their shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownAgent {
    ProductIntelligence,
    MarketSignals,
    WebResearch,
}

impl KnownAgent {
    /// All known agents, in display order.
    pub const ALL: [KnownAgent; 3] = [
        KnownAgent::ProductIntelligence,
        KnownAgent::MarketSignals,
        KnownAgent::WebResearch,
    ];

    /// The exact label the orchestrator uses for this agent.
    pub fn name(&self) -> &'static str {
        match self {
            KnownAgent::ProductIntelligence => "Product Intelligence Agent",
            KnownAgent::MarketSignals => "Market Signals Agent",
            KnownAgent::WebResearch => "Web Research Agent",
        }
    }
}

impl fmt::Display for KnownAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One sub-agent's entry in the orchestrator result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAgentResult {
    /// Free-text label chosen by the remote workflow.
    #[serde(default, deserialize_with = "null_as_default")]
    pub agent_name: String,
    /// Status reported by the sub-agent (e.g. "success").
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Untyped output; its shape depends on `agent_name`.
    #[serde(default)]
    pub output: Value,
}

/// The combined report returned by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CiReport {
    /// The orchestrator's own final output, kept verbatim.
    #[serde(default)]
    pub final_output: Value,
    /// Results from each sub-agent, in the order the orchestrator sent them.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_agent_results: Vec<RawAgentResult>,
    /// Workflow summary text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    /// Whether the workflow ran to completion.
    #[serde(default, deserialize_with = "null_as_default")]
    pub workflow_completed: bool,
}

/// Output of the Product Intelligence Agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductIntelligence {
    #[serde(deserialize_with = "lenient")]
    pub product_overview: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub key_features: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub pricing_strategy: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub target_market: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub weaknesses: Vec<String>,
    /// Fraction, expected in [0, 1].
    #[serde(deserialize_with = "lenient")]
    pub confidence: Option<f64>,
}

impl ProductIntelligence {
    pub fn confidence_percent(&self) -> Option<i64> {
        self.confidence.map(as_percent)
    }
}

/// Output of the Market Signals Agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSignals {
    /// Prose assessment; the sole input to threat classification.
    #[serde(deserialize_with = "lenient")]
    pub threat_analysis: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub predicted_next_moves: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub recommended_strategies: Vec<String>,
    #[serde(deserialize_with = "lenient")]
    pub signals: Vec<MarketSignal>,
}

impl MarketSignals {
    /// The threat analysis text, if present and non-empty.
    pub fn threat_text(&self) -> Option<&str> {
        self.threat_analysis.as_deref().filter(|text| !text.is_empty())
    }
}

/// A single market signal observed by the Market Signals Agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketSignal {
    #[serde(deserialize_with = "lenient")]
    pub signal_type: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    /// Fraction, expected in [0, 1].
    #[serde(deserialize_with = "lenient")]
    pub relevance: Option<f64>,
}

impl MarketSignal {
    pub fn relevance_percent(&self) -> Option<i64> {
        self.relevance.map(as_percent)
    }
}

/// Output of the Web Research Agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebResearch {
    #[serde(deserialize_with = "lenient")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub findings: Vec<ResearchFinding>,
    #[serde(deserialize_with = "lenient")]
    pub sources: Vec<String>,
}

/// A single web research finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchFinding {
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub snippet: Option<String>,
    /// Fraction, expected in [0, 1].
    #[serde(deserialize_with = "lenient")]
    pub relevance: Option<f64>,
}

impl ResearchFinding {
    pub fn relevance_percent(&self) -> Option<i64> {
        self.relevance.map(as_percent)
    }
}

/// A known sub-agent's output, tagged by the agent that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutput {
    ProductIntelligence(ProductIntelligence),
    MarketSignals(MarketSignals),
    WebResearch(WebResearch),
}

#[cfg(test)]
impl AgentOutput {
    /// The agent this output belongs to.
    pub fn agent(&self) -> KnownAgent {
        match self {
            AgentOutput::ProductIntelligence(_) => KnownAgent::ProductIntelligence,
            AgentOutput::MarketSignals(_) => KnownAgent::MarketSignals,
            AgentOutput::WebResearch(_) => KnownAgent::WebResearch,
        }
    }
}

/// The exported report document.
///
/// Identity fields come first so readers see who and when before the
/// payload. Built once by [`crate::report::assemble_report`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedReport {
    pub competitor_name: String,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub timestamp: String,
    pub threat_level: ThreatLevel,
    #[serde(flatten)]
    pub report: CiReport,
}

/// Convert a fraction to a whole percentage (value × 100, rounded).
///
/// Halves round towards positive infinity, so -12.5 becomes -12.
pub fn as_percent(fraction: f64) -> i64 {
    (fraction * 100.0 + 0.5).floor() as i64
}

/// Deserialize a field, mapping an explicit `null` to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a display field, mapping `null` or a value of the wrong type
/// to the type's default so one bad field never discards its siblings.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_threat_level_ordering() {
        assert!(ThreatLevel::Low < ThreatLevel::Medium);
        assert!(ThreatLevel::Medium < ThreatLevel::High);
        assert_eq!(ThreatLevel::default(), ThreatLevel::Low);
    }

    #[test]
    fn test_threat_level_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ThreatLevel::High).unwrap(), json!("high"));
        assert_eq!(ThreatLevel::Medium.to_string(), "Medium");
    }

    #[test]
    fn test_known_agent_names() {
        assert_eq!(
            KnownAgent::ProductIntelligence.name(),
            "Product Intelligence Agent"
        );
        assert_eq!(KnownAgent::MarketSignals.name(), "Market Signals Agent");
        assert_eq!(KnownAgent::WebResearch.name(), "Web Research Agent");
    }

    #[test]
    fn test_ci_report_lenient_parsing() {
        let report: CiReport = serde_json::from_value(json!({
            "summary": null,
            "sub_agent_results": [{"agent_name": "Web Research Agent"}]
        }))
        .unwrap();

        assert_eq!(report.summary, "");
        assert!(!report.workflow_completed);
        assert!(report.final_output.is_null());
        assert_eq!(report.sub_agent_results.len(), 1);
        assert_eq!(report.sub_agent_results[0].status, "");
        assert!(report.sub_agent_results[0].output.is_null());
    }

    #[test]
    fn test_market_signals_null_lists() {
        let signals: MarketSignals = serde_json::from_value(json!({
            "threat_analysis": "",
            "recommended_strategies": null
        }))
        .unwrap();

        assert!(signals.recommended_strategies.is_empty());
        assert_eq!(signals.threat_text(), None);
    }

    #[test]
    fn test_mistyped_fields_keep_siblings() {
        let signals: MarketSignals = serde_json::from_value(json!({
            "threat_analysis": "We assess significant competitive pressure",
            "recommended_strategies": "Lock in renewals",
            "signals": [{"signal_type": "Pricing", "relevance": "high"}]
        }))
        .unwrap();

        assert_eq!(
            signals.threat_text(),
            Some("We assess significant competitive pressure")
        );
        assert!(signals.recommended_strategies.is_empty());
        assert_eq!(signals.signals.len(), 1);
        assert_eq!(signals.signals[0].signal_type.as_deref(), Some("Pricing"));
        assert_eq!(signals.signals[0].relevance, None);

        let product: ProductIntelligence = serde_json::from_value(json!({
            "product_overview": "Workflow suite",
            "confidence": "very"
        }))
        .unwrap();
        assert_eq!(product.product_overview.as_deref(), Some("Workflow suite"));
        assert_eq!(product.confidence_percent(), None);
    }

    #[test]
    fn test_percentages() {
        assert_eq!(as_percent(0.856), 86);
        assert_eq!(as_percent(0.5), 50);
        assert_eq!(as_percent(1.0), 100);
        assert_eq!(as_percent(0.004), 0);
        assert_eq!(as_percent(0.125), 13);
        assert_eq!(as_percent(-0.125), -12);

        let finding = ResearchFinding {
            relevance: Some(0.9),
            ..Default::default()
        };
        assert_eq!(finding.relevance_percent(), Some(90));
        assert_eq!(ProductIntelligence::default().confidence_percent(), None);
    }

    #[test]
    fn test_exported_report_field_order() {
        let exported = ExportedReport {
            competitor_name: "Acme".to_string(),
            timestamp: "2026-10-16T09:30:00.000Z".to_string(),
            threat_level: ThreatLevel::Medium,
            report: CiReport {
                summary: "done".to_string(),
                ..Default::default()
            },
        };

        let json = serde_json::to_string(&exported).unwrap();
        let name_pos = json.find("competitor_name").unwrap();
        let summary_pos = json.find("summary").unwrap();
        assert!(name_pos < summary_pos);
        assert!(json.contains("\"threat_level\":\"medium\""));
    }
}
