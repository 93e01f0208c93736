//! Submission retry and funding guard behavior against an in-memory node.

use std::time::Duration;

use ufc_nft_scripts::blockchain::{
    ensure_funded, query_balance_status, Account, BalanceStatus, BlockchainError, FundingOutcome,
    MoveArg, TransactionPayload,
};

mod common;
use common::{Harness, MockNode, SubmitBehavior, TEST_KEY};

fn create_collection_payload(harness: &Harness) -> TransactionPayload {
    TransactionPayload::entry_function(
        harness.ctx.contract_function("create_collection").unwrap(),
        vec![
            MoveArg::string("UFC Collection"),
            MoveArg::string("https://ufc.com/c"),
            MoveArg::string("desc"),
            MoveArg::U64(10_000),
        ],
    )
}

#[tokio::test]
async fn test_rate_limited_twice_then_success() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    harness
        .node
        .script([SubmitBehavior::RateLimit, SubmitBehavior::RateLimit]);

    let account = Account::from_private_key(TEST_KEY).unwrap();
    let result = harness
        .ctx
        .submitter()
        .submit_and_confirm(&account, &create_collection_payload(&harness))
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(harness.node.submit_attempts.load(std::sync::atomic::Ordering::SeqCst), 3);
    assert_eq!(
        harness.sleeper.delays(),
        vec![Duration::from_millis(10_000), Duration::from_millis(20_000)]
    );
    assert_eq!(harness.node.submitted_payloads().len(), 1);
}

#[tokio::test]
async fn test_rate_limit_exhaustion() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    harness.node.script([
        SubmitBehavior::RateLimit,
        SubmitBehavior::RateLimit,
        SubmitBehavior::RateLimit,
        SubmitBehavior::Accept,
    ]);

    let account = Account::from_private_key(TEST_KEY).unwrap();
    let err = harness
        .ctx
        .submitter()
        .submit(&account, &create_collection_payload(&harness))
        .await
        .unwrap_err();

    match err {
        BlockchainError::RateLimitExceeded { attempts, message } => {
            assert_eq!(attempts, 3);
            assert!(message.contains("429"));
        }
        other => panic!("expected RateLimitExceeded, got {:?}", other),
    }
    assert_eq!(harness.node.submit_attempts.load(std::sync::atomic::Ordering::SeqCst), 3);
    assert_eq!(harness.sleeper.delays().len(), 2);
}

#[tokio::test]
async fn test_other_errors_are_not_retried() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    harness
        .node
        .script([SubmitBehavior::Fail("HTTP 500: boom".to_string())]);

    let account = Account::from_private_key(TEST_KEY).unwrap();
    let err = harness
        .ctx
        .submitter()
        .submit(&account, &create_collection_payload(&harness))
        .await
        .unwrap_err();

    assert!(matches!(err, BlockchainError::Network(_)));
    assert_eq!(harness.node.submit_attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert!(harness.sleeper.delays().is_empty());
}

#[tokio::test]
async fn test_vm_failure_surfaces_as_transaction_failed() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    harness
        .node
        .script([SubmitBehavior::Abort("Move abort: ECOLLECTION_EXISTS".to_string())]);

    let account = Account::from_private_key(TEST_KEY).unwrap();
    let submitter = harness.ctx.submitter();
    let payload = create_collection_payload(&harness);

    let err = submitter.submit_and_confirm(&account, &payload).await.unwrap_err();
    match err {
        BlockchainError::TransactionFailed { vm_status, .. } => {
            assert!(vm_status.contains("ECOLLECTION_EXISTS"))
        }
        other => panic!("expected TransactionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_funding_guard_skips_faucet_above_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::with_node(dir.path(), MockNode::new().with_balance(Some(10_000_000)));
    let address = Account::from_private_key(TEST_KEY).unwrap().address();

    let outcome = ensure_funded(
        harness.node.as_ref(),
        harness.faucet.as_ref(),
        address,
        100_000_000,
    )
    .await
    .unwrap();

    assert_eq!(outcome, FundingOutcome::AlreadyFunded { balance: 10_000_000 });
    assert_eq!(harness.faucet.request_count(), 0);
}

#[tokio::test]
async fn test_funding_guard_requests_once_below_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::with_node(dir.path(), MockNode::new().with_balance(Some(9_999_999)));
    let address = Account::from_private_key(TEST_KEY).unwrap().address();

    let outcome = ensure_funded(
        harness.node.as_ref(),
        harness.faucet.as_ref(),
        address,
        100_000_000,
    )
    .await
    .unwrap();

    assert_eq!(outcome, FundingOutcome::Funded { amount: 100_000_000 });
    assert_eq!(
        *harness.faucet.requests.lock().unwrap(),
        vec![(address, 100_000_000)]
    );
}

#[tokio::test]
async fn test_missing_account_is_funded() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::with_node(dir.path(), MockNode::new().with_balance(None));
    let address = Account::from_private_key(TEST_KEY).unwrap().address();

    let status = query_balance_status(harness.node.as_ref(), address, 100_000_000)
        .await
        .unwrap();
    assert_eq!(status, BalanceStatus::AccountNotFound);

    ensure_funded(
        harness.node.as_ref(),
        harness.faucet.as_ref(),
        address,
        100_000_000,
    )
    .await
    .unwrap();
    assert_eq!(harness.faucet.request_count(), 1);
}
