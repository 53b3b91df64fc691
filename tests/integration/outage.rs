//! Integration test: node outages and pruned history.
//!
//! Failures abort the call without retry; blobs committed before the
//! failure stay on chain.

use skein_engine::EngineError;
use skein_integration_tests::{TestNetwork, test_data};
use skein_store::StoreError;

#[tokio::test]
async fn test_submit_while_down_commits_nothing() {
    let net = TestNetwork::new();
    let client = net.client(1000);

    net.take_down();
    let err = client
        .submit(&test_data(2500), "x", "text/plain")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::ChunkSubmit {
            index: 0,
            total: 3,
            source: StoreError::Rejected(_),
        }
    ));
    assert_eq!(net.blob_count(), 0);

    net.revive();
    let root = client.submit(&test_data(2500), "x", "text/plain").await.unwrap();
    assert_eq!(client.read(&root).await.unwrap(), test_data(2500));
}

#[tokio::test]
async fn test_read_while_down_then_recover() {
    let net = TestNetwork::new();
    let client = net.client(1000);
    let data = test_data(4200);
    let root = client.submit(&data, "x", "text/plain").await.unwrap();

    net.take_down();
    assert!(matches!(
        client.read(&root).await.unwrap_err(),
        EngineError::RootFetch { .. }
    ));

    net.revive();
    assert_eq!(client.read(&root).await.unwrap(), data);
}

#[tokio::test]
async fn test_resubmit_after_failure_leaves_orphans() {
    let net = TestNetwork::new();
    let client = net.client(1000);
    let data = test_data(3000);

    let first = client.submit(&data, "x", "text/plain").await.unwrap();
    assert_eq!(net.blob_count(), 4);

    // A second submission commits everything again; nothing is deduplicated.
    let second = client.submit(&data, "x", "text/plain").await.unwrap();
    assert_ne!(first, second);
    assert_eq!(net.blob_count(), 8);
}

#[tokio::test]
async fn test_pruned_chunk_fails_read() {
    let net = TestNetwork::new();
    let client = net.client(1000);
    let data = test_data(3000);

    let receipt = client
        .submit_with_receipt(&data, "x", "text/plain")
        .await
        .unwrap();
    // Chunks sit at heights 1..=3, the manifest at 4.
    assert_eq!(receipt.root.height, 4);

    assert_eq!(net.prune_below(2), 1);

    match client.read(&receipt.root).await.unwrap_err() {
        EngineError::ChunkFetch {
            index,
            locator,
            source,
        } => {
            assert_eq!(index, 0);
            assert_eq!(locator, receipt.chunks[0].to_string());
            assert!(matches!(source, StoreError::NotFound { .. }));
        }
        other => panic!("expected ChunkFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_pruned_manifest_fails_root_fetch() {
    let net = TestNetwork::new();
    let client = net.client(1000);
    let root = client
        .submit(&test_data(1500), "x", "text/plain")
        .await
        .unwrap();

    net.prune_below(root.height + 1);
    assert!(matches!(
        client.read(&root).await.unwrap_err(),
        EngineError::RootFetch {
            source: StoreError::NotFound { .. },
            ..
        }
    ));
}
