// Closing summary of a validation run

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::NetworkIdentity;
use crate::error::ValidationError;
use crate::report::ReconciliationReport;

/// Condensed view of a run, suitable for printing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub network: Option<NetworkIdentity>,
    pub timestamp: DateTime<Utc>,
    pub checks_passed: usize,
    pub checks_run: usize,
    pub will_change: Vec<String>,
    pub unchanged: usize,
    pub passed: bool,
    pub error: Option<String>,
}

/// Renders summaries as text or JSON
pub struct ReportFormatter;

impl ReportFormatter {
    /// Summarize a report and the run's outcome
    pub fn summarize(
        report: &ReconciliationReport,
        error: Option<&ValidationError>,
    ) -> ValidationSummary {
        let checks_run = report.verifications().count();
        let checks_passed = report.verifications().filter(|o| o.is_match()).count();
        ValidationSummary {
            network: report.network.clone(),
            timestamp: report.timestamp,
            checks_passed,
            checks_run,
            will_change: report.will_change().into_iter().map(String::from).collect(),
            unchanged: report.unchanged_count(),
            passed: error.is_none(),
            error: error.map(ToString::to_string),
        }
    }

    pub fn to_json(summary: &ValidationSummary) -> Result<String> {
        Ok(serde_json::to_string_pretty(summary)?)
    }

    pub fn to_text(summary: &ValidationSummary) -> String {
        let mut text = String::new();
        text.push_str("Validation summary\n");
        text.push_str("==================\n");
        match &summary.network {
            Some(network) => text.push_str(&format!("Network: {}\n", network)),
            None => text.push_str("Network: not confirmed\n"),
        }
        text.push_str(&format!(
            "Checks passed: {}/{}\n",
            summary.checks_passed, summary.checks_run
        ));
        text.push_str(&format!(
            "Bindings: {} will change, {} unchanged\n",
            summary.will_change.len(),
            summary.unchanged
        ));
        for name in &summary.will_change {
            text.push_str(&format!("  - {}\n", name));
        }
        match &summary.error {
            None => text.push_str("Result: PASSED\n"),
            Some(error) => text.push_str(&format!("Result: FAILED ({})\n", error)),
        }
        text
    }
}
