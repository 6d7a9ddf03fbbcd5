use aws_sdk_s3::Client;
use tokio::runtime::Handle;
use tracing::{debug, trace};

use super::byte_stream::{resolve_seek, ByteStream, Whence};
use crate::error::{Error, Result};

/// S3-backed implementation of [`ByteStream`].
///
/// Reads byte ranges from an object in S3 or S3-compatible storage (MinIO,
/// etc.) with HTTP range requests. The object size is fetched once, on
/// creation, with a HEAD request. The stream is read-only.
///
/// The SDK is asynchronous while [`ByteStream`] is not, so every request is
/// driven to completion with [`Handle::block_on`] on the runtime the stream
/// was created with. Methods must therefore be called from a thread that is
/// not itself running inside that runtime (a plain thread, or
/// `tokio::task::spawn_blocking`).
#[derive(Debug)]
pub struct S3Stream {
    client: Client,
    runtime: Handle,
    bucket: String,
    key: String,
    size: u64,
    position: u64,
    identifier: String,
    closed: bool,
}

impl S3Stream {
    /// Open the object at `bucket`/`key`.
    ///
    /// Performs a HEAD request to learn the object size; a missing or
    /// inaccessible object fails with kind `OpeningResource`.
    pub fn open(
        client: Client,
        runtime: Handle,
        bucket: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self> {
        let bucket = bucket.into();
        let key = key.into();
        let identifier = format!("s3://{}/{}", bucket, key);

        let head = runtime
            .block_on(client.head_object().bucket(&bucket).key(&key).send())
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .map(|se| se.is_not_found())
                    .unwrap_or(false);
                if not_found {
                    Error::opening_resource(format!("object not found: {}", identifier))
                } else {
                    Error::opening_resource(format!("{}: {}", identifier, e))
                }
            })?;

        let size = head.content_length().unwrap_or(0).max(0) as u64;
        debug!(object = %identifier, size, "opened S3 stream");

        Ok(Self {
            client,
            runtime,
            bucket,
            key,
            size,
            position: 0,
            identifier,
            closed: false,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `s3://bucket/key`, for logging.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::invalid_object(format!("{} is closed", self.identifier)));
        }
        Ok(())
    }
}

impl ByteStream for S3Stream {
    fn read(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure_open()?;
        if buf.is_empty() {
            return Ok(());
        }

        let offset = self.position;
        let len = buf.len() as u64;
        if offset.saturating_add(len) > self.size {
            return Err(Error::read(format!(
                "{}: requested {} bytes at offset {}, object size is {}",
                self.identifier, len, offset, self.size
            )));
        }

        // "bytes=start-end", inclusive on both ends
        let range = format!("bytes={}-{}", offset, offset + len - 1);
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&self.key)
            .range(range);

        let data = self
            .runtime
            .block_on(async {
                let resp = request
                    .send()
                    .await
                    .map_err(|e| Error::read(format!("{}: {}", self.identifier, e)))?;
                resp.body
                    .collect()
                    .await
                    .map(|body| body.into_bytes())
                    .map_err(|e| Error::read(format!("{}: {}", self.identifier, e)))
            })?;

        if data.len() != buf.len() {
            return Err(Error::read(format!(
                "{}: range request returned {} bytes, expected {}",
                self.identifier,
                data.len(),
                buf.len()
            )));
        }

        buf.copy_from_slice(&data);
        self.position += len;
        trace!(object = %self.identifier, offset, len, "S3 range read");
        Ok(())
    }

    fn write(&mut self, _buf: &[u8]) -> Result<()> {
        self.ensure_open()?;
        Err(Error::write(format!("{} is read-only", self.identifier)))
    }

    fn seek(&mut self, offset: i64, whence: Whence) -> Result<u64> {
        self.ensure_open()?;
        self.position = resolve_seek(self.position, self.size, offset, whence)?;
        Ok(self.position)
    }

    fn tell(&mut self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.position)
    }

    fn size(&mut self) -> Result<u64> {
        self.ensure_open()?;
        Ok(self.size)
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            debug!(object = %self.identifier, "closed S3 stream");
        }
        self.closed = true;
        Ok(())
    }
}

/// Split an `s3://bucket/key` URI into bucket and key.
///
/// Returns `None` for anything else, including a URI with an empty bucket
/// or key.
pub fn parse_s3_uri(uri: &str) -> Option<(&str, &str)> {
    let rest = uri.strip_prefix("s3://")?;
    let (bucket, key) = rest.split_once('/')?;
    if bucket.is_empty() || key.is_empty() {
        return None;
    }
    Some((bucket, key))
}

/// Create an S3 client with optional custom endpoint and region.
///
/// Use a custom endpoint for S3-compatible services like MinIO:
/// ```ignore
/// let client = create_s3_client(Some("http://localhost:9000"), "us-east-1").await;
/// ```
pub async fn create_s3_client(endpoint_url: Option<&str>, region: &str) -> Client {
    let region = aws_config::Region::new(region.to_string());
    let mut config_loader =
        aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);

    if let Some(endpoint) = endpoint_url {
        config_loader = config_loader.endpoint_url(endpoint);
    }

    let sdk_config = config_loader.load().await;

    // S3-compatible services usually need path-style addressing
    let s3_config = if endpoint_url.is_some() {
        aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build()
    } else {
        aws_sdk_s3::config::Builder::from(&sdk_config).build()
    };

    Client::from_conf(s3_config)
}
