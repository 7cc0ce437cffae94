// src/store/mod.rs
use anyhow::{Context, Result};
use aws_sdk_s3::{config::Region, primitives::ByteStream, Client};
use tracing::info;

/// Build an S3 client pinned to `region`. Source and destination objects
/// may live in different regions, so each call constructs its own client.
async fn client_for(region: &str) -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}

/// Download the full body of `key` from `bucket`. A missing object or a
/// transport failure aborts the run.
pub async fn fetch_object(key: &str, bucket: &str, region: &str) -> Result<Vec<u8>> {
    let client = client_for(region).await;
    let object = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .with_context(|| format!("fetching s3://{}/{} ({})", bucket, key, region))?;
    let body = object
        .body
        .collect()
        .await
        .with_context(|| format!("reading body of s3://{}/{}", bucket, key))?;
    let bytes = body.into_bytes().to_vec();
    info!(bucket, key, bytes = bytes.len(), "fetched object");
    Ok(bytes)
}

/// Upload `bytes` to `key` in `bucket`, overwriting any existing object.
pub async fn store_object(bytes: Vec<u8>, key: &str, bucket: &str, region: &str) -> Result<()> {
    let len = bytes.len();
    let client = client_for(region).await;
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(bytes))
        .send()
        .await
        .with_context(|| format!("uploading s3://{}/{} ({})", bucket, key, region))?;
    info!(bucket, key, bytes = len, "stored object");
    Ok(())
}
