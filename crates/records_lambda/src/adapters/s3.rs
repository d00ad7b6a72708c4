use aws_sdk_s3::primitives::ByteStream;

use super::object_store::ObjectStore;
use super::{block_on, sdk_failure, StoreError};

#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    bucket: String,
    s3_client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(s3_client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            s3_client,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl ObjectStore for S3ObjectStore {
    fn write_object(&self, key: &str, body: &[u8]) -> Result<(), StoreError> {
        let request = self
            .s3_client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body.to_vec()));

        block_on(request.send())
            .map(|_| ())
            .map_err(|error| sdk_failure("PutObject", &error))
    }
}
