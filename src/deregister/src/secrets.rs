// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for secret retrieval.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SecretError {
    /// The object could not be retrieved at all.
    #[error("failed to retrieve secret s3://{bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    /// The object stream opened but could not be fully read.
    #[error("failed to read secret s3://{bucket}/{key}: {source}")]
    Read {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },
}

/// Reads secret material stored as an opaque blob.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    /// Reads the blob at `bucket`/`key` fully into memory.
    async fn fetch_secret(&self, bucket: &str, key: &str) -> Result<String, SecretError>;
}

/// A [SecretStore] backed by S3 `GetObject`.
#[derive(Clone, Debug)]
pub struct S3SecretStore {
    client: aws_sdk_s3::Client,
}

impl S3SecretStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl SecretStore for S3SecretStore {
    async fn fetch_secret(&self, bucket: &str, key: &str) -> Result<String, SecretError> {
        let object = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| SecretError::Fetch {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source: e.into(),
            })?;
        // `collect` consumes the body stream and releases the connection on
        // both the success and the failure path.
        let data = object
            .body
            .collect()
            .await
            .map_err(|e| SecretError::Read {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source: e.into(),
            })?;
        Ok(String::from_utf8_lossy(&data.into_bytes()).into_owned())
    }
}
