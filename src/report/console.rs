// Console rendering for operators

use std::io::{self, Write};

use log::warn;

use super::{ReconciliationReport, ReportEntry, Reporter, Subject, VerificationOutcome};
use crate::common::{normalize_hex, NetworkIdentity};
use crate::reconcile::BindingClassification;

pub const RESET: &str = "\x1b[0m";
pub const RED: &str = "\x1b[0;31m";
pub const GREEN: &str = "\x1b[0;32m";
pub const YELLOW: &str = "\x1b[1;33m";

/// Wrap `msg` in an ANSI colour code
pub fn paint(color: &str, msg: &str) -> String {
    format!("{}{}{}", color, msg, RESET)
}

/// Prints each entry as it arrives and keeps a full report
pub struct ConsoleReporter<W: Write> {
    out: W,
    report: ReconciliationReport,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(network: Option<NetworkIdentity>) -> Self {
        Self::new(io::stdout(), network)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, network: Option<NetworkIdentity>) -> Self {
        Self {
            out,
            report: ReconciliationReport::new(network),
        }
    }

    pub fn report(&self) -> &ReconciliationReport {
        &self.report
    }

    pub fn into_parts(self) -> (W, ReconciliationReport) {
        (self.out, self.report)
    }

    fn render(entry: &ReportEntry) -> String {
        match entry {
            ReportEntry::Verification(outcome) => Self::render_outcome(outcome),
            ReportEntry::Classification {
                name,
                classification: BindingClassification::WillChange { from, to },
            } => format!(
                "{} address will be updated.\nBefore {:?}\nAfter {:?}\n",
                name, from, to
            ),
            ReportEntry::Classification {
                name,
                classification: BindingClassification::Unchanged,
            } => format!("{} not updated\n", name),
        }
    }

    fn render_outcome(outcome: &VerificationOutcome) -> String {
        let comparison = outcome.comparison();
        let mut text = format!("{}:\n", comparison.action);
        match outcome {
            VerificationOutcome::Match(_) => {
                let line = format!("{} looks good! 😎", comparison.subject);
                text.push_str(&paint(GREEN, &line));
            }
            VerificationOutcome::Mismatch(_) => {
                let line = format!("{} looks wrong", comparison.subject);
                text.push_str(&paint(RED, &line));
                match comparison.subject {
                    Subject::FinalOwner | Subject::ManagerPointer => {
                        text.push_str(&format!(
                            "\nExpected {}\nFound    {}",
                            comparison.expected, comparison.actual
                        ));
                    }
                    // bytecode is too long to print usefully
                    Subject::DictatorCode | Subject::Binding(_) => {
                        text.push_str(&format!(
                            "\nExpected {} bytes of code, found {}",
                            normalize_hex(&comparison.expected).len() / 2,
                            normalize_hex(&comparison.actual).len() / 2
                        ));
                    }
                }
            }
        }
        text.push_str("\n\n");
        text
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn session_started(&mut self, network: &NetworkIdentity) {
        self.report.session_started(network);
    }

    fn record(&mut self, entry: &ReportEntry) {
        let text = Self::render(entry);
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("Failed to write report entry to console: {}", e);
        }
        self.report.record(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Address;

    fn rendered(entries: &[ReportEntry]) -> String {
        let mut reporter = ConsoleReporter::new(Vec::new(), None);
        for entry in entries {
            reporter.record(entry);
        }
        let (out, report) = reporter.into_parts();
        assert_eq!(report.entries.len(), entries.len());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_match_prints_looks_good() {
        let text = rendered(&[ReportEntry::Verification(VerificationOutcome::compare(
            Subject::DictatorCode,
            "Verifying AddressDictator source code against local build artifacts",
            "0x6080",
            "0x6080",
        ))]);
        assert!(text.starts_with(
            "Verifying AddressDictator source code against local build artifacts:\n"
        ));
        assert!(text.contains("Deployed AddressDictator code looks good!"));
        assert!(text.contains(GREEN));
    }

    #[test]
    fn test_mismatch_prints_looks_wrong() {
        let text = rendered(&[ReportEntry::Verification(VerificationOutcome::compare(
            Subject::FinalOwner,
            "Validating finalOwner",
            "0x01",
            "0x02",
        ))]);
        assert!(text.contains("finalOwner looks wrong"));
        assert!(text.contains("Expected 0x01"));
        assert!(text.contains(RED));
    }

    #[test]
    fn test_classification_lines() {
        let from = Address::from_low_u64_be(1);
        let to = Address::from_low_u64_be(2);
        let text = rendered(&[
            ReportEntry::Classification {
                name: "BondManager".to_string(),
                classification: BindingClassification::Unchanged,
            },
            ReportEntry::Classification {
                name: "StateCommitmentChain".to_string(),
                classification: BindingClassification::WillChange { from, to },
            },
        ]);
        assert!(text.contains("BondManager not updated\n"));
        assert!(text.contains("StateCommitmentChain address will be updated."));
        assert!(text.contains(&format!("Before {:?}", from)));
        assert!(text.contains(&format!("After {:?}", to)));
    }
}
