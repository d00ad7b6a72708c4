use chrono::{DateTime, Utc};

/// Timestamp suffix of archived object keys, microsecond precision.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H.%M.%S.%6f";

pub fn archive_object_key(record_id: &str, archived_at: DateTime<Utc>) -> String {
    format!(
        "{record_id}_{}.json",
        archived_at.format(ARCHIVE_TIMESTAMP_FORMAT)
    )
}

pub fn bucket_uri(bucket: &str) -> String {
    format!("s3://{}", bucket.trim_matches('/'))
}
