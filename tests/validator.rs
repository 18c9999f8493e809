mod common;

use std::cell::RefCell;
use std::fs;
use std::io::Cursor;

use tempfile::tempdir;

use common::*;
use dictator_verify::api::{ConfigManager, DictatorValidator};
use dictator_verify::artifact::ArtifactResolver;
use dictator_verify::common::{to_hex, NetworkIdentity};
use dictator_verify::confirm::TerminalConfirmation;
use dictator_verify::reconcile::ReconcileRequest;
use dictator_verify::report::{ConsoleReporter, ReconciliationReport};
use dictator_verify::ValidationError;

fn request() -> ReconcileRequest {
    ReconcileRequest {
        dictator: DICTATOR,
        manager: MANAGER,
        expected_owner: MULTISIG,
    }
}

#[tokio::test]
async fn test_gate_sees_the_endpoint_network() {
    let validator = DictatorValidator::new(MockChain::healthy(), resolver());
    let seen = RefCell::new(None);
    let gate = |network: &NetworkIdentity| {
        *seen.borrow_mut() = Some(network.clone());
        true
    };
    let mut report = ReconciliationReport::new(None);

    let session = validator
        .validate(&request(), &gate, &mut report)
        .await
        .unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.name, "goerli");
    assert_eq!(seen.chain_id, 5);
    assert!(session.operator_approved());
    assert_eq!(report.network, Some(seen));
}

#[tokio::test]
async fn test_denied_network_reads_nothing_else() {
    let validator = DictatorValidator::new(MockChain::healthy(), resolver());
    let mut report = ReconciliationReport::new(None);

    let err = validator
        .validate(&request(), &|_: &NetworkIdentity| false, &mut report)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ValidationError::UnapprovedNetwork { chain_id: 5, .. }
    ));
    assert_eq!(validator.reader().reads(), vec![Read::Network]);
    assert!(report.entries.is_empty());
}

#[tokio::test]
async fn test_terminal_gate_requires_exact_token() {
    let cases = [
        ("LGTM\n", true),
        ("lgtm\n", false),
        ("LGTM \n", false),
        ("\n", false),
    ];
    for (input, approved) in cases {
        let validator = DictatorValidator::new(MockChain::healthy(), resolver());
        let gate = TerminalConfirmation::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let mut report = ReconciliationReport::new(None);

        let result = validator.validate(&request(), &gate, &mut report).await;
        assert_eq!(result.is_ok(), approved, "input {:?}", input);
    }
}

#[tokio::test]
async fn test_console_output_for_a_change() {
    let mut chain = MockChain::healthy();
    chain.stage("BondManager", SCC_NEW, &BOND_MANAGER_CODE);
    let validator = DictatorValidator::new(chain, resolver());
    let mut reporter = ConsoleReporter::new(Vec::new(), None);

    validator
        .validate(&request(), &|_: &NetworkIdentity| true, &mut reporter)
        .await
        .unwrap();

    let (out, report) = reporter.into_parts();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Deployed AddressDictator code looks good!"));
    assert!(text.contains("finalOwner looks good!"));
    assert!(text.contains("addressManager looks good!"));
    assert!(text.contains("CanonicalTransactionChain not updated"));
    assert!(text.contains("BondManager address will be updated."));
    assert!(text.contains("Deployed BondManager code looks good!"));
    assert_eq!(report.will_change(), vec!["BondManager"]);
}

#[tokio::test]
async fn test_artifacts_loaded_from_disk() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let config = ConfigManager::builder()
        .artifacts_dir(dir.path())
        .build();

    let artifacts = [
        ("AddressDictator", to_hex(&DICTATOR_CODE)),
        ("CanonicalTransactionChain", to_hex(&CTC_CODE)),
        ("StateCommitmentChain", to_hex(&SCC_CODE)),
        ("BondManager", to_hex(&BOND_MANAGER_CODE)),
    ];
    let table = config.artifact_table();
    for (name, relative) in table.iter() {
        let bytecode = artifacts
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, code)| code.clone())
            .unwrap_or_else(|| "0x".to_string());
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(
            &path,
            serde_json::json!({ "contractName": name, "deployedBytecode": bytecode }).to_string(),
        )?;
    }

    let resolver = ArtifactResolver::load(&config.artifacts_dir, &table)?;
    let mut chain = MockChain::healthy();
    chain.stage("CanonicalTransactionChain", CTC_NEW, &CTC_CODE);
    let validator = DictatorValidator::new(chain, resolver);
    let mut report = ReconciliationReport::new(None);

    validator
        .validate(&request(), &|_: &NetworkIdentity| true, &mut report)
        .await?;
    assert_eq!(report.will_change(), vec!["CanonicalTransactionChain"]);
    Ok(())
}
