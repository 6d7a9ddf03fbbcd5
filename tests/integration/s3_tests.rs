//! S3 stream tests against a local MinIO service.
//!
//! # Requirements
//!
//! A MinIO server must be listening on `http://localhost:9000` with the
//! default `minioadmin` credentials:
//! ```bash
//! docker run -d -p 9000:9000 minio/minio server /data
//! ```
//! Set `NITF_TEST_S3_ENDPOINT` to point the tests somewhere else.
//!
//! # Running the tests
//!
//! ```bash
//! cargo test --test integration s3_tests -- --ignored
//! ```
//!
//! These tests are marked as `#[ignore]` by default because they require an
//! external service to be running.
//!
//! `S3Stream` blocks on the runtime it is given, so every test drives it from
//! the plain test thread and only uses `block_on` for setup.

use std::env;
use std::time::Duration;

use aws_sdk_s3::primitives::ByteStream as ObjectBody;
use bytes::Bytes;
use tokio::runtime::Runtime;

use nitf_bandio::{BandSource, ByteStream, ErrorKind, S3Stream, StreamSource, Whence};

use super::test_utils::{expected_band, interleaved};

/// Default endpoint for a local MinIO container
const MINIO_ENDPOINT: &str = "http://localhost:9000";
const ENDPOINT_ENV: &str = "NITF_TEST_S3_ENDPOINT";
const MINIO_BUCKET: &str = "nitf-bandio-test";

/// MinIO default credentials
const MINIO_ACCESS_KEY: &str = "minioadmin";
const MINIO_SECRET_KEY: &str = "minioadmin";

fn minio_endpoint() -> String {
    env::var(ENDPOINT_ENV).unwrap_or_else(|_| MINIO_ENDPOINT.to_string())
}

/// Check if the MinIO service is reachable
async fn is_minio_available(endpoint: &str) -> bool {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
    {
        Ok(c) => c,
        Err(_) => return false,
    };

    client
        .get(format!("{}/minio/health/live", endpoint))
        .send()
        .await
        .map(|r| r.status().is_success())
        .unwrap_or(false)
}

/// Create an S3 client configured for MinIO
fn create_minio_client(endpoint: &str) -> aws_sdk_s3::Client {
    let creds = aws_sdk_s3::config::Credentials::new(
        MINIO_ACCESS_KEY,
        MINIO_SECRET_KEY,
        None,
        None,
        "test",
    );

    let config = aws_sdk_s3::Config::builder()
        .behavior_version_latest()
        .region(aws_sdk_s3::config::Region::new("us-east-1"))
        .endpoint_url(endpoint)
        .credentials_provider(creds)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Upload `data` under `key` and return the runtime and client to read it
/// back with, or `None` when MinIO is not running.
fn setup_object(key: &str, data: Vec<u8>) -> Option<(Runtime, aws_sdk_s3::Client)> {
    let runtime = Runtime::new().unwrap();
    let endpoint = minio_endpoint();
    if !runtime.block_on(is_minio_available(&endpoint)) {
        eprintln!("SKIPPED: MinIO is not available at {}", endpoint);
        return None;
    }

    let client = create_minio_client(&endpoint);
    runtime.block_on(async {
        // Already exists after the first run.
        let _ = client.create_bucket().bucket(MINIO_BUCKET).send().await;
        client
            .put_object()
            .bucket(MINIO_BUCKET)
            .key(key)
            .body(ObjectBody::from(Bytes::from(data)))
            .send()
            .await
            .unwrap();
    });

    Some((runtime, client))
}

fn open_stream(runtime: &Runtime, client: &aws_sdk_s3::Client, key: &str) -> S3Stream {
    S3Stream::open(client.clone(), runtime.handle().clone(), MINIO_BUCKET, key).unwrap()
}

// =============================================================================
// Byte-Stream Contract
// =============================================================================

#[test]
#[ignore]
fn test_s3_ranged_reads_and_seeks() {
    let data: Vec<u8> = (0..=255u8).collect();
    let Some((runtime, client)) = setup_object("ranged.ntf", data.clone()) else {
        return;
    };
    let mut stream = open_stream(&runtime, &client, "ranged.ntf");

    assert_eq!(stream.size().unwrap(), 256);
    assert_eq!(stream.identifier(), "s3://nitf-bandio-test/ranged.ntf");

    assert_eq!(stream.seek(100, Whence::Start).unwrap(), 100);
    let mut buf = [0u8; 8];
    stream.read(&mut buf).unwrap();
    assert_eq!(&buf, &data[100..108]);
    assert_eq!(stream.tell().unwrap(), 108);

    // A one-byte range is "bytes=n-n".
    let mut one = [0u8; 1];
    stream.read(&mut one).unwrap();
    assert_eq!(one[0], 108);

    assert_eq!(stream.seek(-6, Whence::End).unwrap(), 250);
    let mut tail = [0u8; 6];
    stream.read(&mut tail).unwrap();
    assert_eq!(&tail, &data[250..]);
    assert_eq!(stream.tell().unwrap(), 256);

    assert_eq!(stream.seek(-56, Whence::Current).unwrap(), 200);
    for offset in [0i64, 1, 128, 255, 256] {
        assert_eq!(stream.seek(offset, Whence::Start).unwrap(), offset as u64);
        assert_eq!(stream.tell().unwrap(), offset as u64);
    }
}

#[test]
#[ignore]
fn test_s3_read_past_end_fails() {
    let Some((runtime, client)) = setup_object("short.ntf", vec![1; 16]) else {
        return;
    };
    let mut stream = open_stream(&runtime, &client, "short.ntf");

    stream.seek(10, Whence::Start).unwrap();
    let mut buf = [0u8; 10];
    assert_eq!(stream.read(&mut buf).unwrap_err().kind(), ErrorKind::Read);
    // The failed read did not move the position.
    assert_eq!(stream.tell().unwrap(), 10);

    assert_eq!(stream.seek(17, Whence::Start).unwrap_err().kind(), ErrorKind::Seek);
    assert_eq!(stream.seek(-1, Whence::Start).unwrap_err().kind(), ErrorKind::Seek);
}

#[test]
#[ignore]
fn test_s3_is_read_only_and_closable() {
    let Some((runtime, client)) = setup_object("closed.ntf", vec![0; 4]) else {
        return;
    };
    let mut stream = open_stream(&runtime, &client, "closed.ntf");

    assert_eq!(stream.write(b"x").unwrap_err().kind(), ErrorKind::Write);

    stream.close().unwrap();
    let mut buf = [0u8; 1];
    assert_eq!(stream.read(&mut buf).unwrap_err().kind(), ErrorKind::InvalidObject);
    assert_eq!(stream.size().unwrap_err().kind(), ErrorKind::InvalidObject);
    stream.close().unwrap();
}

#[test]
#[ignore]
fn test_s3_missing_object() {
    let Some((runtime, client)) = setup_object("present.ntf", vec![0; 4]) else {
        return;
    };

    let err = S3Stream::open(
        client.clone(),
        runtime.handle().clone(),
        MINIO_BUCKET,
        "absent.ntf",
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OpeningResource);
    assert!(err.message().contains("absent.ntf"));
}

// =============================================================================
// Band Extraction
// =============================================================================

#[test]
#[ignore]
fn test_s3_interleaved_band() {
    let data = interleaved(3, 100, 2);
    let Some((runtime, client)) = setup_object("interleaved.ntf", data) else {
        return;
    };
    let mut stream = open_stream(&runtime, &client, "interleaved.ntf");
    let mut band = StreamSource::new(&mut stream, 2, 2, 2).unwrap();

    assert_eq!(band.size().unwrap(), 200);

    // Chunks of 7 split pixels between reads.
    let mut delivered = Vec::new();
    while delivered.len() < 200 {
        let len = (200 - delivered.len()).min(7);
        delivered.extend(band.read_vec(len).unwrap());
    }
    assert_eq!(delivered, expected_band(1, 100, 2));

    assert_eq!(band.read_vec(1).unwrap_err().kind(), ErrorKind::Read);
}
