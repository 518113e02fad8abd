//! Sub-agent output extraction.
//!
//! The orchestrator returns an unordered list of sub-agent results whose
//! outputs are untyped. This module finds a result by its agent name and
//! turns the known outputs into typed views. Every function here is total:
//! a missing agent or a non-object output is `None`, never an error, and a
//! mistyped field inside an object falls back to its default.

use crate::models::{
    AgentOutput, CiReport, KnownAgent, MarketSignals, ProductIntelligence, RawAgentResult,
    WebResearch,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Typed views of all three known sub-agent outputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnownOutputs {
    pub product: Option<ProductIntelligence>,
    pub market: Option<MarketSignals>,
    pub web: Option<WebResearch>,
}

impl KnownOutputs {
    /// True when none of the known agents produced a usable output.
    pub fn is_empty(&self) -> bool {
        self.product.is_none() && self.market.is_none() && self.web.is_none()
    }
}

/// Find the output of the first result whose `agent_name` is exactly `agent_name`.
///
/// Matching is case-sensitive with no normalization. When several results
/// share the name, the earliest one wins.
pub fn find_agent_output<'a>(results: &'a [RawAgentResult], agent_name: &str) -> Option<&'a Value> {
    results
        .iter()
        .find(|result| result.agent_name == agent_name)
        .map(|result| &result.output)
}

/// Extract and type the output of a known agent.
pub fn extract_agent_output(report: &CiReport, agent: KnownAgent) -> Option<AgentOutput> {
    let value = find_agent_output(&report.sub_agent_results, agent.name())?;

    match agent {
        KnownAgent::ProductIntelligence => {
            typed_view(agent, value).map(AgentOutput::ProductIntelligence)
        }
        KnownAgent::MarketSignals => typed_view(agent, value).map(AgentOutput::MarketSignals),
        KnownAgent::WebResearch => typed_view(agent, value).map(AgentOutput::WebResearch),
    }
}

/// Output of the Product Intelligence Agent, if present.
pub fn product_intelligence(report: &CiReport) -> Option<ProductIntelligence> {
    match extract_agent_output(report, KnownAgent::ProductIntelligence)? {
        AgentOutput::ProductIntelligence(output) => Some(output),
        _ => None,
    }
}

/// Output of the Market Signals Agent, if present.
pub fn market_signals(report: &CiReport) -> Option<MarketSignals> {
    match extract_agent_output(report, KnownAgent::MarketSignals)? {
        AgentOutput::MarketSignals(output) => Some(output),
        _ => None,
    }
}

/// Output of the Web Research Agent, if present.
pub fn web_research(report: &CiReport) -> Option<WebResearch> {
    match extract_agent_output(report, KnownAgent::WebResearch)? {
        AgentOutput::WebResearch(output) => Some(output),
        _ => None,
    }
}

/// Extract all known outputs at once.
pub fn extract_known_outputs(report: &CiReport) -> KnownOutputs {
    KnownOutputs {
        product: product_intelligence(report),
        market: market_signals(report),
        web: web_research(report),
    }
}

/// Names of sub-agents in the report that are not one of the known agents.
pub fn unknown_agent_names(report: &CiReport) -> Vec<&str> {
    report
        .sub_agent_results
        .iter()
        .map(|result| result.agent_name.as_str())
        .filter(|name| !KnownAgent::ALL.iter().any(|agent| agent.name() == *name))
        .collect()
}

fn typed_view<T: DeserializeOwned>(agent: KnownAgent, value: &Value) -> Option<T> {
    if !value.is_object() {
        debug!("{} output is not an object, skipping", agent);
        return None;
    }

    match serde_json::from_value(value.clone()) {
        Ok(output) => Some(output),
        Err(e) => {
            debug!("{} output has an unexpected shape: {}", agent, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(agent_name: &str, output: Value) -> RawAgentResult {
        RawAgentResult {
            agent_name: agent_name.to_string(),
            status: "success".to_string(),
            output,
        }
    }

    fn report_with(results: Vec<RawAgentResult>) -> CiReport {
        CiReport {
            sub_agent_results: results,
            ..Default::default()
        }
    }

    #[test]
    fn test_find_in_empty_results() {
        assert!(find_agent_output(&[], "Market Signals Agent").is_none());
        assert!(find_agent_output(&[], "").is_none());
    }

    #[test]
    fn test_find_exact_match_only() {
        let results = vec![result("market signals agent", json!({"a": 1}))];

        assert!(find_agent_output(&results, "Market Signals Agent").is_none());
        assert!(find_agent_output(&results, "market signals agent").is_some());
        assert!(find_agent_output(&results, " market signals agent").is_none());
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let results = vec![
            result("Web Research Agent", json!({"order": 1})),
            result("Market Signals Agent", json!({"order": 2})),
            result("Web Research Agent", json!({"order": 3})),
        ];

        let output = find_agent_output(&results, "Web Research Agent").unwrap();
        assert_eq!(output["order"], 1);
    }

    #[test]
    fn test_typed_extraction() {
        let report = report_with(vec![
            result(
                "Product Intelligence Agent",
                json!({"key_features": ["SSO", "Audit log"], "confidence": 0.8}),
            ),
            result(
                "Market Signals Agent",
                json!({
                    "threat_analysis": "We assess significant competitive pressure",
                    "predicted_next_moves": "...",
                    "recommended_strategies": []
                }),
            ),
        ]);

        let outputs = extract_known_outputs(&report);
        let product = outputs.product.unwrap();
        assert_eq!(product.key_features, vec!["SSO", "Audit log"]);
        assert_eq!(product.confidence_percent(), Some(80));

        let market = outputs.market.unwrap();
        assert_eq!(
            market.threat_text(),
            Some("We assess significant competitive pressure")
        );
        assert!(outputs.web.is_none());
    }

    #[test]
    fn test_non_object_output_is_absent() {
        let report = report_with(vec![
            result("Market Signals Agent", json!("plain text output")),
            result("Web Research Agent", json!(null)),
        ]);

        assert!(market_signals(&report).is_none());
        assert!(web_research(&report).is_none());
        assert!(extract_known_outputs(&report).is_empty());
    }

    #[test]
    fn test_mistyped_field_keeps_section() {
        let report = report_with(vec![result(
            "Web Research Agent",
            json!({
                "summary": "Hiring push in EMEA",
                "findings": "not a list",
                "sources": ["https://example.com/jobs"]
            }),
        )]);

        let web = web_research(&report).unwrap();
        assert_eq!(web.summary.as_deref(), Some("Hiring push in EMEA"));
        assert!(web.findings.is_empty());
        assert_eq!(web.sources, vec!["https://example.com/jobs"]);
    }

    #[test]
    fn test_tagged_output() {
        let report = report_with(vec![result("Web Research Agent", json!({}))]);

        let output = extract_agent_output(&report, KnownAgent::WebResearch).unwrap();
        assert_eq!(output.agent(), KnownAgent::WebResearch);
        assert!(extract_agent_output(&report, KnownAgent::MarketSignals).is_none());
    }

    #[test]
    fn test_unknown_agent_names() {
        let report = report_with(vec![
            result("Web Research Agent", json!({})),
            result("Pricing Agent", json!({})),
        ]);

        assert_eq!(unknown_agent_names(&report), vec!["Pricing Agent"]);
    }
}
