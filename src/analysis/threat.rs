//! Threat classification.
//!
//! A keyword heuristic over the Market Signals Agent's `threat_analysis`
//! text. Tiers are tested in order with plain substring checks on the
//! lower-cased text; the first tier that matches wins.

use crate::analysis::extractor::find_agent_output;
use crate::models::{CiReport, KnownAgent, ThreatLevel};
use serde_json::Value;

const HIGH_KEYWORDS: [&str; 3] = ["high", "significant", "major"];
const MEDIUM_KEYWORDS: [&str; 2] = ["moderate", "medium"];

/// Classify the threat level of a report.
///
/// No report, no Market Signals output, or an empty analysis is `Low`.
/// Only `threat_analysis` is read; the other fields of the output are
/// never parsed here.
pub fn classify_threat(report: Option<&CiReport>) -> ThreatLevel {
    let text = report
        .and_then(|r| {
            find_agent_output(&r.sub_agent_results, KnownAgent::MarketSignals.name())
        })
        .and_then(|output| output.get("threat_analysis"))
        .and_then(Value::as_str);
    classify_threat_text(text)
}

/// Classify free-text threat analysis.
pub fn classify_threat_text(text: Option<&str>) -> ThreatLevel {
    let text = match text {
        Some(text) if !text.is_empty() => text.to_lowercase(),
        _ => return ThreatLevel::Low,
    };

    if HIGH_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        ThreatLevel::High
    } else if MEDIUM_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        ThreatLevel::Medium
    } else {
        ThreatLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawAgentResult;
    use serde_json::json;

    fn report_with_analysis(threat_analysis: &str) -> CiReport {
        CiReport {
            sub_agent_results: vec![RawAgentResult {
                agent_name: "Market Signals Agent".to_string(),
                status: "success".to_string(),
                output: json!({
                    "threat_analysis": threat_analysis,
                    "predicted_next_moves": "...",
                    "recommended_strategies": []
                }),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_significant_is_high() {
        let report = report_with_analysis("We assess significant competitive pressure");
        assert_eq!(classify_threat(Some(&report)), ThreatLevel::High);
    }

    #[test]
    fn test_moderate_is_medium() {
        let report = report_with_analysis("Moderate risk expected");
        assert_eq!(classify_threat(Some(&report)), ThreatLevel::Medium);
    }

    #[test]
    fn test_defaults_to_low() {
        assert_eq!(classify_threat(None), ThreatLevel::Low);
        assert_eq!(classify_threat(Some(&CiReport::default())), ThreatLevel::Low);
        assert_eq!(
            classify_threat(Some(&report_with_analysis(""))),
            ThreatLevel::Low
        );
        assert_eq!(classify_threat_text(None), ThreatLevel::Low);
    }

    #[test]
    fn test_missing_analysis_field_is_low() {
        let report = CiReport {
            sub_agent_results: vec![RawAgentResult {
                agent_name: "Market Signals Agent".to_string(),
                status: "success".to_string(),
                output: json!({"predicted_next_moves": "Major launch"}),
            }],
            ..Default::default()
        };
        assert_eq!(classify_threat(Some(&report)), ThreatLevel::Low);
    }

    #[test]
    fn test_mistyped_siblings_do_not_affect_level() {
        let with_output = |output: Value| CiReport {
            sub_agent_results: vec![RawAgentResult {
                agent_name: "Market Signals Agent".to_string(),
                status: "success".to_string(),
                output,
            }],
            ..Default::default()
        };

        let strategies_as_text = with_output(json!({
            "threat_analysis": "We assess significant competitive pressure",
            "recommended_strategies": "Lock in renewals"
        }));
        assert_eq!(classify_threat(Some(&strategies_as_text)), ThreatLevel::High);

        let relevance_as_text = with_output(json!({
            "threat_analysis": "We assess significant competitive pressure",
            "signals": [{"relevance": "high"}]
        }));
        assert_eq!(classify_threat(Some(&relevance_as_text)), ThreatLevel::High);

        let analysis_not_text = with_output(json!({"threat_analysis": ["major"]}));
        assert_eq!(classify_threat(Some(&analysis_not_text)), ThreatLevel::Low);
    }

    #[test]
    fn test_high_tier_takes_precedence() {
        assert_eq!(
            classify_threat_text(Some("moderate now, high later")),
            ThreatLevel::High
        );
        assert_eq!(
            classify_threat_text(Some("Medium term: major expansion")),
            ThreatLevel::High
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            classify_threat_text(Some("SIGNIFICANT growth")),
            classify_threat_text(Some("significant growth"))
        );
        assert_eq!(
            classify_threat_text(Some("SIGNIFICANT growth")),
            ThreatLevel::High
        );
    }

    #[test]
    fn test_substring_matching() {
        assert_eq!(
            classify_threat_text(Some("Their release highlights gaps")),
            ThreatLevel::High
        );
        assert_eq!(
            classify_threat_text(Some("Minimal overlap with our segment")),
            ThreatLevel::Low
        );
    }
}
