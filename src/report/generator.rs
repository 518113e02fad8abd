//! Report rendering for the terminal.
//!
//! This module renders an exported report as Markdown (or JSON). Each
//! sub-agent section is omitted when that agent's output is absent, and
//! optional fields inside a section are skipped individually.

use crate::analysis::{extract_known_outputs, unknown_agent_names};
use crate::models::{ExportedReport, MarketSignals, ProductIntelligence, WebResearch};
use crate::report::assembler::to_json;
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(exported: &ExportedReport, include_raw_output: bool) -> String {
    let outputs = extract_known_outputs(&exported.report);
    let mut output = String::new();

    output.push_str(&format!(
        "# Competitive Intelligence: {}\n\n",
        exported.competitor_name
    ));

    output.push_str(&generate_metadata_section(exported));
    output.push_str(&generate_summary_section(&exported.report.summary));

    if let Some(ref product) = outputs.product {
        output.push_str(&generate_product_section(product));
    }
    if let Some(ref market) = outputs.market {
        output.push_str(&generate_market_section(market));
    }
    if let Some(ref web) = outputs.web {
        output.push_str(&generate_web_section(web));
    }

    if outputs.is_empty() {
        output.push_str("*No sub-agent results were available for this report.*\n\n");
    }

    let others = unknown_agent_names(&exported.report);
    if !others.is_empty() {
        output.push_str("## Other Agents\n\n");
        for name in others {
            output.push_str(&format!("- {}\n", name));
        }
        output.push('\n');
    }

    if include_raw_output && !exported.report.final_output.is_null() {
        output.push_str(&generate_raw_output_section(&exported.report.final_output));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report (the export document itself).
pub fn generate_json_report(exported: &ExportedReport) -> Result<String> {
    to_json(exported)
}

fn generate_metadata_section(exported: &ExportedReport) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "- **Threat Level:** {} {}\n",
        exported.threat_level.emoji(),
        exported.threat_level
    ));
    section.push_str(&format!("- **Generated:** {}\n", exported.timestamp));
    section.push_str(&format!(
        "- **Workflow Completed:** {}\n",
        if exported.report.workflow_completed {
            "yes"
        } else {
            "no"
        }
    ));
    section.push_str(&format!(
        "- **Sub-agents Reporting:** {}\n\n",
        exported.report.sub_agent_results.len()
    ));

    section
}

fn generate_summary_section(summary: &str) -> String {
    if summary.is_empty() {
        return String::new();
    }

    format!("## Summary\n\n{}\n\n", summary)
}

fn generate_product_section(product: &ProductIntelligence) -> String {
    let mut section = String::new();

    section.push_str("## Product Intelligence\n\n");

    if let Some(percent) = product.confidence_percent() {
        section.push_str(&format!("*Confidence: {}%*\n\n", percent));
    }
    if let Some(ref overview) = product.product_overview {
        section.push_str(&format!("{}\n\n", overview));
    }

    push_list(&mut section, "Key Features", &product.key_features);

    if let Some(ref pricing) = product.pricing_strategy {
        section.push_str(&format!("**Pricing Strategy:** {}\n\n", pricing));
    }
    if let Some(ref market) = product.target_market {
        section.push_str(&format!("**Target Market:** {}\n\n", market));
    }

    push_list(&mut section, "Strengths", &product.strengths);
    push_list(&mut section, "Weaknesses", &product.weaknesses);

    section
}

fn generate_market_section(market: &MarketSignals) -> String {
    let mut section = String::new();

    section.push_str("## Market Signals\n\n");

    if let Some(text) = market.threat_text() {
        section.push_str(&format!("**Threat Analysis:** {}\n\n", text));
    }
    if let Some(ref moves) = market.predicted_next_moves {
        section.push_str(&format!("**Predicted Next Moves:** {}\n\n", moves));
    }

    if !market.signals.is_empty() {
        section.push_str("### Signals\n\n");
        for signal in &market.signals {
            let kind = signal.signal_type.as_deref().unwrap_or("Signal");
            let description = signal.description.as_deref().unwrap_or("");
            match signal.relevance_percent() {
                Some(percent) => section.push_str(&format!(
                    "- **{}** ({}% relevant): {}\n",
                    kind, percent, description
                )),
                None => section.push_str(&format!("- **{}**: {}\n", kind, description)),
            }
        }
        section.push('\n');
    }

    if !market.recommended_strategies.is_empty() {
        section.push_str("### Recommended Strategies\n\n");
        for (i, strategy) in market.recommended_strategies.iter().enumerate() {
            section.push_str(&format!("{}. {}\n", i + 1, strategy));
        }
        section.push('\n');
    }

    section
}

fn generate_web_section(web: &WebResearch) -> String {
    let mut section = String::new();

    section.push_str("## Web Research\n\n");

    if let Some(ref summary) = web.summary {
        section.push_str(&format!("{}\n\n", summary));
    }

    if !web.findings.is_empty() {
        section.push_str("### Findings\n\n");
        for finding in &web.findings {
            let title = finding.title.as_deref().unwrap_or("Untitled");
            let heading = match finding.url {
                Some(ref url) => format!("[{}]({})", title, url),
                None => title.to_string(),
            };

            section.push_str(&format!("- **{}**", heading));
            if let Some(percent) = finding.relevance_percent() {
                section.push_str(&format!(" ({}% relevant)", percent));
            }
            if let Some(ref snippet) = finding.snippet {
                section.push_str(&format!(": {}", snippet));
            }
            section.push('\n');
        }
        section.push('\n');
    }

    push_list(&mut section, "Sources", &web.sources);

    section
}

fn generate_raw_output_section(final_output: &serde_json::Value) -> String {
    let mut section = String::new();

    section.push_str("## Orchestrator Output\n\n");
    match final_output.as_str() {
        Some(text) => {
            section.push_str(text);
            section.push_str("\n\n");
        }
        None => {
            let pretty = serde_json::to_string_pretty(final_output).unwrap_or_default();
            section.push_str("```json\n");
            section.push_str(&pretty);
            section.push_str("\n```\n\n");
        }
    }

    section
}

fn push_list(section: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    section.push_str(&format!("**{}:**\n\n", title));
    for item in items {
        section.push_str(&format!("- {}\n", item));
    }
    section.push('\n');
}

fn generate_footer() -> String {
    "---\n\n*Report generated by rivalscope*\n".to_string()
}
