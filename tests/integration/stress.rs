//! Integration test: stress.
//!
//! Concurrent writers sharing one chain, then concurrent readers.
//! Verifies no payload is corrupted or mixed up under load.

use std::sync::Arc;

use skein_integration_tests::{TestNetwork, test_data_seeded};
use tokio::sync::Barrier;

/// 8 concurrent writers, each submitting 25 payloads, all read back.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(60000)]
async fn test_concurrent_writers() {
    let net = Arc::new(TestNetwork::new());
    let barrier = Arc::new(Barrier::new(8));
    let mut handles = Vec::new();

    for writer_id in 0..8usize {
        let net = net.clone();
        let barrier = barrier.clone();
        handles.push(tokio::spawn(async move {
            let client = net.client(512);
            barrier.wait().await;
            let mut roots = Vec::new();
            for j in 0..25usize {
                let seed = (writer_id * 1000 + j) as u32;
                let data = test_data_seeded(300 + j * 97, seed);
                let root = client
                    .submit(&data, &format!("w{writer_id}-{j:02}"), "text/plain")
                    .await
                    .unwrap();
                roots.push((root, seed, data.len()));
            }
            roots
        }));
    }

    let mut all = Vec::new();
    for h in handles {
        all.extend(h.await.unwrap());
    }
    assert_eq!(all.len(), 200);

    let reader = Arc::new(net.client(512));
    let mut checks = Vec::new();
    for (root, seed, len) in all {
        let reader = reader.clone();
        checks.push(tokio::spawn(async move {
            let got = reader.read(&root).await.unwrap();
            assert_eq!(got, test_data_seeded(len, seed), "mismatch at {root}");
        }));
    }
    for c in checks {
        c.await.unwrap();
    }
}

/// Heights stay unique across concurrent submitters.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ntest::timeout(30000)]
async fn test_concurrent_heights_unique() {
    let net = Arc::new(TestNetwork::new());
    let mut handles = Vec::new();

    for i in 0..16u32 {
        let net = net.clone();
        handles.push(tokio::spawn(async move {
            let client = net.client(256);
            client
                .submit_with_receipt(&test_data_seeded(700, i), "h", "text/plain")
                .await
                .unwrap()
        }));
    }

    let mut heights = Vec::new();
    for h in handles {
        let receipt = h.await.unwrap();
        heights.extend(receipt.chunks.iter().map(|l| l.height));
        heights.push(receipt.root.height);
    }

    let total = heights.len();
    heights.sort_unstable();
    heights.dedup();
    assert_eq!(heights.len(), total);
    assert_eq!(net.blob_count(), total);
}
