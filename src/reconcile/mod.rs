// Reconciliation engine
//
// Checks, in order and stopping at the first failure:
//   1. code at the dictator address matches the AddressDictator artifact
//   2. dictator.finalOwner() is the expected multisig
//   3. dictator.manager() is the expected AddressManager
//   4. for every staged binding, in dictator order: if the manager's current
//      address differs, the code at the staged address matches the artifact
//      registered for that name
//
// Classification and verification are interleaved per binding, so a
// mismatch on one binding leaves later bindings unread.

use ethers::types::Address;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactResolver, DICTATOR_ARTIFACT};
use crate::common::{to_hex, NamedBinding, SessionContext};
use crate::error::ValidationError;
use crate::ethereum::{AddressDictator, AddressManager, ChainReader};
use crate::report::{ReportEntry, Reporter, Subject, VerificationOutcome};

/// How a staged binding relates to the live registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingClassification {
    Unchanged,
    WillChange { from: Address, to: Address },
}

impl BindingClassification {
    /// Compare the manager's current address with the staged one
    pub fn classify(current: Address, staged: Address) -> Self {
        if current == staged {
            BindingClassification::Unchanged
        } else {
            BindingClassification::WillChange {
                from: current,
                to: staged,
            }
        }
    }

    pub fn is_change(&self) -> bool {
        matches!(self, BindingClassification::WillChange { .. })
    }
}

/// Addresses a run validates against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// AddressDictator under validation
    pub dictator: Address,
    /// AddressManager the dictator should point at, read for current bindings
    pub manager: Address,
    /// Multisig expected as the dictator's final owner
    pub expected_owner: Address,
}

/// Drives the verification pipeline for one approved session
pub struct Reconciler<'a, C: ChainReader + ?Sized> {
    reader: &'a C,
    resolver: &'a ArtifactResolver,
    session: &'a SessionContext,
}

impl<'a, C: ChainReader + ?Sized> Reconciler<'a, C> {
    pub fn new(reader: &'a C, resolver: &'a ArtifactResolver, session: &'a SessionContext) -> Self {
        Self {
            reader,
            resolver,
            session,
        }
    }

    /// Run every check, recording each outcome before acting on it
    pub async fn reconcile(
        &self,
        request: &ReconcileRequest,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ValidationError> {
        if !self.session.operator_approved() {
            return Err(ValidationError::UnapprovedNetwork {
                network: self.session.network_name().to_string(),
                chain_id: self.session.chain_id(),
            });
        }
        info!(
            "Reconciling dictator {:?} against manager {:?} on {}",
            request.dictator,
            request.manager,
            self.session.network()
        );

        let dictator = AddressDictator::new(self.reader, request.dictator)
            .map_err(|e| ValidationError::remote("AddressDictator", e))?;

        self.verify_dictator_code(request.dictator, reporter).await?;
        self.verify_final_owner(&dictator, request.expected_owner, reporter)
            .await?;
        self.verify_manager_pointer(&dictator, request.manager, reporter)
            .await?;

        let bindings = dictator
            .named_addresses()
            .await
            .map_err(|e| ValidationError::remote("AddressDictator.getNamedAddresses()", e))?;
        info!("Dictator stages {} named addresses", bindings.len());

        let manager = AddressManager::new(self.reader, request.manager)
            .map_err(|e| ValidationError::remote("Lib_AddressManager", e))?;

        for binding in &bindings {
            self.reconcile_binding(&manager, binding, reporter).await?;
        }

        info!("All {} bindings reconciled", bindings.len());
        Ok(())
    }

    async fn verify_dictator_code(
        &self,
        dictator: Address,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ValidationError> {
        let artifact = self.resolver.resolve(DICTATOR_ARTIFACT)?;
        self.verify_code(
            Subject::DictatorCode,
            "Verifying AddressDictator source code against local build artifacts",
            dictator,
            &artifact.deployed_bytecode,
            reporter,
        )
        .await
    }

    async fn verify_final_owner(
        &self,
        dictator: &AddressDictator<'_, C>,
        expected: Address,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ValidationError> {
        let actual = dictator
            .final_owner()
            .await
            .map_err(|e| ValidationError::remote("AddressDictator.finalOwner()", e))?;
        verify_address(
            Subject::FinalOwner,
            "Validating that finalOwner address in the AddressDictator matches multisig address",
            expected,
            actual,
            reporter,
        )
    }

    async fn verify_manager_pointer(
        &self,
        dictator: &AddressDictator<'_, C>,
        expected: Address,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ValidationError> {
        let actual = dictator
            .manager()
            .await
            .map_err(|e| ValidationError::remote("AddressDictator.manager()", e))?;
        verify_address(
            Subject::ManagerPointer,
            "Validating the AddressManager address in the AddressDictator",
            expected,
            actual,
            reporter,
        )
    }

    async fn reconcile_binding(
        &self,
        manager: &AddressManager<'_, C>,
        binding: &NamedBinding,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ValidationError> {
        let current = manager.get_address(&binding.name).await.map_err(|e| {
            ValidationError::remote(format!("Lib_AddressManager.getAddress({})", binding.name), e)
        })?;

        let classification = BindingClassification::classify(current, binding.address);
        reporter.record(&ReportEntry::Classification {
            name: binding.name.clone(),
            classification: classification.clone(),
        });

        if !classification.is_change() {
            info!("{} not updated", binding.name);
            return Ok(());
        }
        info!(
            "{} will change from {:?} to {:?}",
            binding.name, current, binding.address
        );

        let artifact = self.resolver.resolve(&binding.name)?;
        self.verify_code(
            Subject::Binding(binding.name.clone()),
            format!(
                "Verifying {} source code against local deployment artifacts",
                binding.name
            ),
            binding.address,
            &artifact.deployed_bytecode,
            reporter,
        )
        .await
    }

    async fn verify_code(
        &self,
        subject: Subject,
        action: impl Into<String>,
        address: Address,
        expected: &str,
        reporter: &mut dyn Reporter,
    ) -> Result<(), ValidationError> {
        let code = self
            .reader
            .deployed_code(address)
            .await
            .map_err(|e| ValidationError::remote(format!("code at {:?}", address), e))?;

        let outcome =
            VerificationOutcome::compare(subject.clone(), action, expected, to_hex(&code));
        record_outcome(outcome, reporter, || ValidationError::BytecodeMismatch { subject })
    }
}

fn verify_address(
    subject: Subject,
    action: &str,
    expected: Address,
    actual: Address,
    reporter: &mut dyn Reporter,
) -> Result<(), ValidationError> {
    let outcome = VerificationOutcome::compare(
        subject.clone(),
        action,
        format!("{:?}", expected),
        format!("{:?}", actual),
    );
    record_outcome(outcome, reporter, || ValidationError::AddressMismatch {
        subject,
        expected,
        actual,
    })
}

fn record_outcome<F>(
    outcome: VerificationOutcome,
    reporter: &mut dyn Reporter,
    on_mismatch: F,
) -> Result<(), ValidationError>
where
    F: FnOnce() -> ValidationError,
{
    let matched = outcome.is_match();
    reporter.record(&ReportEntry::Verification(outcome));
    if matched {
        Ok(())
    } else {
        let err = on_mismatch();
        warn!("{}", err);
        Err(err)
    }
}
