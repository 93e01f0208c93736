//! End-to-end script runs over mocked clients and a temp working directory.

use std::fs;
use std::time::Duration;

use serde_json::{json, Value};

use ufc_nft_scripts::blockchain::BlockchainError;
use ufc_nft_scripts::persistence::read_identifier;
use ufc_nft_scripts::scripts::batch_mint::{self, BatchMintOptions};
use ufc_nft_scripts::scripts::collections::{self, CollectionBatchOptions};
use ufc_nft_scripts::scripts::deploy::deploy;
use ufc_nft_scripts::scripts::mint::{mint_nft, MintSpec};
use ufc_nft_scripts::scripts::series::{create_series, SeriesSpec};
use ufc_nft_scripts::scripts::set::{create_set, SetSpec};
use ufc_nft_scripts::scripts::token_uri::{self, UriUpdateOptions};

mod common;
use common::{Harness, SubmitBehavior, TEST_KEY};

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_series_set_mint_hand_off() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    harness.node.emit(
        "create_series",
        "0xabc::ufc_nft::SeriesCreatedEvent",
        json!({"series_id": "7"}),
    );
    harness.node.emit(
        "create_set",
        "0xabc::ufc_nft::SetCreatedEvent",
        json!({"set_id": 3}),
    );
    harness.node.emit(
        "mint_nft",
        "0xabc::ufc_nft::NFTMintedEvent",
        json!({"nft_id": "42"}),
    );

    let mut out = Vec::new();
    let series_id = create_series(&harness.ctx, Some(TEST_KEY), &SeriesSpec::default(), &mut out)
        .await
        .unwrap();
    assert_eq!(series_id.as_deref(), Some("7"));
    assert_eq!(read_identifier(&harness.ctx.config.files.series_id).unwrap(), "7");

    let set_id = create_set(&harness.ctx, Some(TEST_KEY), &SetSpec::default(), &mut out)
        .await
        .unwrap();
    assert_eq!(set_id.as_deref(), Some("3"));
    assert_eq!(read_identifier(&harness.ctx.config.files.set_id).unwrap(), "3");

    let outcome = mint_nft(&harness.ctx, Some(TEST_KEY), &MintSpec::default(), &mut out)
        .await
        .unwrap();
    assert_eq!(outcome.nft_id.as_deref(), Some("42"));
    assert!(outcome.metadata_hash.is_some());

    let functions: Vec<String> = harness
        .node
        .submitted_functions()
        .iter()
        .map(|f| f.rsplit("::").next().unwrap().to_string())
        .collect();
    assert_eq!(
        functions,
        vec!["create_series", "create_set", "mint_nft", "add_metadata"]
    );

    let payloads = harness.node.submitted_payloads();
    assert_eq!(payloads[1]["arguments"][0], "7");
    assert_eq!(payloads[2]["arguments"][1], "7");
    assert_eq!(payloads[2]["arguments"][2], "3");
    assert_eq!(payloads[3]["arguments"][0], "42");
}

#[tokio::test]
async fn test_set_requires_series_file_before_network() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());

    let mut out = Vec::new();
    let err = create_set(&harness.ctx, Some(TEST_KEY), &SetSpec::default(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, BlockchainError::Config(_)));
    assert_eq!(harness.node.call_count(), 0);
}

#[tokio::test]
async fn test_series_without_event_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());

    let mut out = Vec::new();
    let series_id = create_series(&harness.ctx, Some(TEST_KEY), &SeriesSpec::default(), &mut out)
        .await
        .unwrap();

    assert_eq!(series_id, None);
    assert!(!harness.ctx.config.files.series_id.exists());
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("No SeriesCreatedEvent found"));
}

#[tokio::test]
async fn test_collection_run_paces_and_records_failures() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    harness.node.script([
        SubmitBehavior::Accept,
        SubmitBehavior::Abort("EALREADY_EXISTS".to_string()),
        SubmitBehavior::Accept,
    ]);

    let options = CollectionBatchOptions {
        count: 3,
        results_path: dir.path().join("collection-creation-results.json"),
        ..CollectionBatchOptions::default()
    };

    let mut out = Vec::new();
    let report = collections::run(&harness.ctx, Some(TEST_KEY), &options, &mut out)
        .await
        .unwrap();

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.successful, 2);
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.collections[1].name, "UFC Fighters #2");
    assert_eq!(report.collections[1].hash, "");

    let delays = harness.sleeper.delays();
    assert_eq!(delays.len(), 2);
    assert!(delays[0] >= Duration::from_millis(8000) && delays[0] < Duration::from_millis(10_000));
    assert_eq!(delays[1], Duration::from_millis(5000));

    let json = read_json(&options.results_path);
    assert_eq!(json["summary"]["total"], 3);
    assert_eq!(json["summary"]["failed"], 1);

    let first = &harness.node.submitted_payloads()[0];
    assert_eq!(
        first["arguments"],
        json!([
            "UFC Fighters #1",
            "https://ipfs.io/ipfs/collection-metadata-1",
            "Official UFC Fighters Collection #1 - Featuring legendary fighters and champions",
            "1000",
            true
        ])
    );
}

fn write_batch_data(path: &std::path::Path, count: usize) {
    let items: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "collection": format!("UFC Fighters #{}", i),
                "recipient": format!("0x{:x}", i),
                "uri": format!("ipfs://token-{}", i),
            })
        })
        .collect();
    fs::write(path, json!({ "batchMintData": items }).to_string()).unwrap();
}

fn batch_options(dir: &std::path::Path, expected: usize) -> BatchMintOptions {
    BatchMintOptions {
        data_path: dir.join("batch-mint-data.json"),
        expected,
        results_path: dir.join("batch-mint-results.json"),
        error_path: dir.join("batch-mint-error.json"),
    }
}

#[tokio::test]
async fn test_batch_mint_writes_results() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    let options = batch_options(dir.path(), 6);
    write_batch_data(&options.data_path, 6);

    let mut out = Vec::new();
    let report = batch_mint::run(&harness.ctx, Some(TEST_KEY), &options, &mut out)
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.minted_tokens, 6);

    let json = read_json(&options.results_path);
    assert_eq!(json["success"], true);
    assert_eq!(json["mintedTokens"], 6);
    assert_eq!(json["collections"].as_array().unwrap().len(), 6);
    assert!(json["transactionHash"].as_str().unwrap().starts_with("0x"));
    assert!(!options.error_path.exists());

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("... and 1 more tokens"));
}

#[tokio::test]
async fn test_batch_mint_wrong_count_writes_error_report() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    let options = batch_options(dir.path(), 50);
    write_batch_data(&options.data_path, 2);

    let mut out = Vec::new();
    let err = batch_mint::run(&harness.ctx, Some(TEST_KEY), &options, &mut out)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Expected 50 items, got 2"));
    assert_eq!(harness.node.call_count(), 0);

    let json = read_json(&options.error_path);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("Expected 50 items"));
    assert!(!options.results_path.exists());
}

#[tokio::test]
async fn test_token_uri_update_reports() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());

    let mut options = UriUpdateOptions::new("0xe7997c", "ipfs://new").unwrap();
    options.results_path = dir.path().join("update-uri-result.json");
    options.error_path = dir.path().join("update-uri-error.json");

    let mut out = Vec::new();
    let report = token_uri::run(&harness.ctx, Some(TEST_KEY), &options, &mut out)
        .await
        .unwrap();
    assert_eq!(report.new_uri, "ipfs://new");

    let payload = &harness.node.submitted_payloads()[0];
    assert!(payload["function"]
        .as_str()
        .unwrap()
        .ends_with("::token::set_uri"));
    assert_eq!(payload["arguments"][1], "ipfs://new");

    let json = read_json(&options.results_path);
    assert_eq!(json["newUri"], "ipfs://new");
    assert!(json["digitalAssetAddress"]
        .as_str()
        .unwrap()
        .ends_with("e7997c"));
}

#[tokio::test]
async fn test_token_uri_failure_writes_error_report() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    harness
        .node
        .script([SubmitBehavior::Abort("EURI_NOT_MUTABLE".to_string())]);

    let mut options = UriUpdateOptions::new("0xe7997c", "ipfs://new").unwrap();
    options.results_path = dir.path().join("update-uri-result.json");
    options.error_path = dir.path().join("update-uri-error.json");

    let mut out = Vec::new();
    let err = token_uri::run(&harness.ctx, Some(TEST_KEY), &options, &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, BlockchainError::TransactionFailed { .. }));

    let json = read_json(&options.error_path);
    assert_eq!(json["success"], false);
    assert_eq!(json["digitalAssetAddress"], "0xe7997c");
    assert!(json["error"].as_str().unwrap().contains("EURI_NOT_MUTABLE"));
}

fn write_package(dir: &std::path::Path) -> std::path::PathBuf {
    let package = dir.join("build/UFC_NFT");
    fs::create_dir_all(package.join("bytecode_modules")).unwrap();
    fs::write(package.join("package-metadata.bcs"), [0x01, 0x02]).unwrap();
    fs::write(package.join("bytecode_modules/ufc_nft.mv"), [0xa1, 0x1c]).unwrap();
    fs::write(package.join("bytecode_modules/events.mv"), [0xe0]).unwrap();
    package
}

#[tokio::test]
async fn test_deploy_publishes_configured_module() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    let package = write_package(dir.path());

    let mut out = Vec::new();
    deploy(&harness.ctx, Some(TEST_KEY), &package, &[], &mut out)
        .await
        .unwrap();

    let payload = &harness.node.submitted_payloads()[0];
    assert!(payload["function"]
        .as_str()
        .unwrap()
        .ends_with("::code::publish_package_txn"));
    assert_eq!(payload["arguments"], json!(["0x0102", ["0xa11c"]]));
}

#[tokio::test]
async fn test_deploy_keeps_requested_module_order() {
    let dir = tempfile::tempdir().unwrap();
    let harness = Harness::new(dir.path());
    let package = write_package(dir.path());

    let modules = vec!["ufc_nft".to_string(), "events".to_string()];
    let mut out = Vec::new();
    deploy(&harness.ctx, Some(TEST_KEY), &package, &modules, &mut out)
        .await
        .unwrap();

    let payload = &harness.node.submitted_payloads()[0];
    assert_eq!(payload["arguments"][1], json!(["0xa11c", "0xe0"]));
    assert!(String::from_utf8(out)
        .unwrap()
        .contains("Publishing modules: ufc_nft, events"));
}
