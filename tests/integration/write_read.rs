//! Integration test: write/read.
//!
//! One client submits, a separately configured client reads back from the
//! locator string alone.

use skein_engine::Inspection;
use skein_integration_tests::{TestNetwork, test_data, test_data_seeded};
use skein_types::{BlobLocator, DEFAULT_MAX_CHUNK_SIZE};

/// 3,200,000 bytes at the default limit: three chunks plus one manifest.
#[tokio::test]
async fn test_default_limit_three_chunk_payload() {
    let net = TestNetwork::new();
    let writer = net.client(DEFAULT_MAX_CHUNK_SIZE);
    let reader = net.client(DEFAULT_MAX_CHUNK_SIZE);
    let data = test_data(3_200_000);

    let root = writer
        .submit(&data, "big.bin", "application/octet-stream")
        .await
        .unwrap()
        .to_string();

    assert_eq!(net.blob_count(), 4);

    let root: BlobLocator = root.parse().unwrap();
    match reader.inspect(&root).await.unwrap() {
        Inspection::Manifest(m) => {
            let sizes: Vec<u64> = m.chunks.iter().map(|c| c.size).collect();
            assert_eq!(sizes, vec![1_500_000, 1_500_000, 200_000]);
            assert_eq!(m.size, 3_200_000);
        }
        other => panic!("expected manifest, got {other:?}"),
    }

    let got = reader.read(&root).await.unwrap();
    assert!(got == data, "reconstructed payload differs");
}

/// 500 bytes: one blob, no manifest.
#[tokio::test]
async fn test_small_payload_single_blob() {
    let net = TestNetwork::new();
    let writer = net.client(DEFAULT_MAX_CHUNK_SIZE);
    let data = test_data(500);

    let root = writer.submit(&data, "small", "text/plain").await.unwrap();

    assert_eq!(net.blob_count(), 1);
    assert_eq!(
        net.client(DEFAULT_MAX_CHUNK_SIZE).read(&root).await.unwrap(),
        data
    );
}

/// Reading never depends on the reader's own chunk size.
#[tokio::test]
async fn test_reader_chunk_size_is_irrelevant() {
    let net = TestNetwork::new();
    let writer = net.client(1000);
    let reader = net.client(7);
    let data = test_data(12_345);

    let root = writer.submit(&data, "x", "text/plain").await.unwrap();
    assert_eq!(reader.read(&root).await.unwrap(), data);
}

/// Many payloads of varying sizes, each read back by a fresh client.
#[tokio::test]
async fn test_varying_sizes() {
    let net = TestNetwork::new();
    let writer = net.client(4096);

    let mut written = Vec::new();
    for i in 0..40usize {
        let size = 1 + i * 997;
        let data = test_data_seeded(size, i as u32 + 1);
        let root = writer
            .submit(&data, &format!("obj-{i:03}"), "application/octet-stream")
            .await
            .unwrap();
        written.push((root.to_string(), data));
    }

    let reader = net.client(4096);
    for (root, expected) in &written {
        let root: BlobLocator = root.parse().unwrap();
        let got = reader.read(&root).await.unwrap();
        assert_eq!(&got, expected, "payload at {root} mismatch");
    }
}

/// Chunk count is ceil(len / limit) and the chain holds chunks + manifest.
#[tokio::test]
async fn test_blob_accounting() {
    let net = TestNetwork::new();
    let writer = net.client(1000);

    let cases = [(1usize, 1usize), (999, 1), (1000, 1), (1001, 3), (5000, 6), (5001, 7)];
    let mut expected_blobs = 0;
    for (i, (len, blobs)) in cases.into_iter().enumerate() {
        writer
            .submit(&test_data_seeded(len, i as u32), "acct", "text/plain")
            .await
            .unwrap();
        expected_blobs += blobs;
        assert_eq!(net.blob_count(), expected_blobs, "after {len} bytes");
    }
}

/// Inspect on a raw root sniffs its content.
#[tokio::test]
async fn test_inspect_raw_pdf() {
    let net = TestNetwork::new();
    let client = net.client(4096);
    let mut data = b"%PDF-1.7\n".to_vec();
    data.extend(test_data(100));

    let root = client.submit(&data, "doc.pdf", "application/pdf").await.unwrap();
    assert_eq!(
        client.inspect(&root).await.unwrap(),
        Inspection::Raw {
            size: data.len(),
            mime_type: "application/pdf".to_string(),
        }
    );
}
