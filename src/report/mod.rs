// Reconciliation reporting
//
// Every comparison and classification the engine makes is recorded as a
// `ReportEntry` and handed to a `Reporter` before the engine acts on it, so a
// failed run still shows exactly how far it got.

pub mod console;

pub use console::ConsoleReporter;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{equal_hex, NetworkIdentity};
use crate::reconcile::BindingClassification;

/// What a check is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Subject {
    /// Code deployed at the dictator's own address
    DictatorCode,
    /// The dictator's `finalOwner()`
    FinalOwner,
    /// The dictator's `manager()`
    ManagerPointer,
    /// Code deployed at a binding's staged address
    Binding(String),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::DictatorCode => write!(f, "Deployed AddressDictator code"),
            Subject::FinalOwner => write!(f, "finalOwner"),
            Subject::ManagerPointer => write!(f, "addressManager"),
            Subject::Binding(name) => write!(f, "Deployed {} code", name),
        }
    }
}

/// The two values a check compared
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub subject: Subject,
    /// Human-readable description of the step
    pub action: String,
    /// Trusted value (artifact bytecode or operator-supplied address)
    pub expected: String,
    /// Value read from the chain
    pub actual: String,
}

/// Result of a single hex comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationOutcome {
    Match(Comparison),
    Mismatch(Comparison),
}

impl VerificationOutcome {
    /// Compare `expected` against `actual` with the hex comparator
    pub fn compare(
        subject: Subject,
        action: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let comparison = Comparison {
            subject,
            action: action.into(),
            expected: expected.into(),
            actual: actual.into(),
        };
        if equal_hex(&comparison.expected, &comparison.actual) {
            VerificationOutcome::Match(comparison)
        } else {
            VerificationOutcome::Mismatch(comparison)
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, VerificationOutcome::Match(_))
    }

    pub fn comparison(&self) -> &Comparison {
        match self {
            VerificationOutcome::Match(c) | VerificationOutcome::Mismatch(c) => c,
        }
    }

    pub fn description(&self) -> String {
        self.comparison().subject.to_string()
    }
}

/// One observable step of a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportEntry {
    Verification(VerificationOutcome),
    Classification {
        name: String,
        classification: BindingClassification,
    },
}

/// Sink for report entries
pub trait Reporter {
    /// Called once the operator has approved the network
    fn session_started(&mut self, _network: &NetworkIdentity) {}

    fn record(&mut self, entry: &ReportEntry);
}

/// Everything recorded during one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub network: Option<NetworkIdentity>,
    pub timestamp: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
}

impl ReconciliationReport {
    pub fn new(network: Option<NetworkIdentity>) -> Self {
        Self {
            network,
            timestamp: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// Outcomes of every comparison, in order
    pub fn verifications(&self) -> impl Iterator<Item = &VerificationOutcome> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Verification(outcome) => Some(outcome),
            _ => None,
        })
    }

    /// Classifications of every binding reached, in order
    pub fn classifications(&self) -> impl Iterator<Item = (&str, &BindingClassification)> {
        self.entries.iter().filter_map(|entry| match entry {
            ReportEntry::Classification {
                name,
                classification,
            } => Some((name.as_str(), classification)),
            _ => None,
        })
    }

    /// Names of bindings whose address will change
    pub fn will_change(&self) -> Vec<&str> {
        self.classifications()
            .filter(|(_, c)| c.is_change())
            .map(|(name, _)| name)
            .collect()
    }

    /// Number of bindings that keep their current address
    pub fn unchanged_count(&self) -> usize {
        self.classifications().filter(|(_, c)| !c.is_change()).count()
    }

    /// First failed comparison, if any
    pub fn first_mismatch(&self) -> Option<&Comparison> {
        self.verifications()
            .find(|outcome| !outcome.is_match())
            .map(VerificationOutcome::comparison)
    }
}

impl Reporter for ReconciliationReport {
    fn session_started(&mut self, network: &NetworkIdentity) {
        self.network = Some(network.clone());
    }

    fn record(&mut self, entry: &ReportEntry) {
        self.entries.push(entry.clone());
    }
}
