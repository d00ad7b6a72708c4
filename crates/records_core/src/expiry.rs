use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Number;
use thiserror::Error;

pub const DEFAULT_RETENTION_DAYS: i64 = 3;

/// Regions the insert handler is deployed to, with the timezone used to
/// stamp item expiry.
pub const REGION_TIMEZONES: &[(&str, Tz)] = &[("eu-west-1", chrono_tz::Europe::Dublin)];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no timezone configured for region '{region}'")]
pub struct UnmappedRegion {
    pub region: String,
}

pub fn timezone_for_region(region: &str) -> Option<Tz> {
    REGION_TIMEZONES
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, timezone)| *timezone)
}

/// How long inserted items live before the table's TTL reaper may purge them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    timezone: Tz,
    retention: TimeDelta,
}

impl ExpiryPolicy {
    pub fn new(timezone: Tz, retention: TimeDelta) -> Self {
        Self {
            timezone,
            retention,
        }
    }

    pub fn for_region(region: &str) -> Result<Self, UnmappedRegion> {
        let timezone = timezone_for_region(region).ok_or_else(|| UnmappedRegion {
            region: region.to_string(),
        })?;
        Ok(Self::new(timezone, TimeDelta::days(DEFAULT_RETENTION_DAYS)))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn retention(&self) -> TimeDelta {
        self.retention
    }

    pub fn expires_at(&self, now: DateTime<Utc>) -> DateTime<Tz> {
        now.with_timezone(&self.timezone) + self.retention
    }

    /// The `expiration_time` attribute value for an item written at `now`.
    pub fn expiration_time(&self, now: DateTime<Utc>) -> Result<Number, serde_json::Error> {
        epoch_seconds(&self.expires_at(now))
    }
}

/// UNIX epoch seconds with a six digit fraction, kept as exact decimal text.
pub fn epoch_seconds<Z: TimeZone>(at: &DateTime<Z>) -> Result<Number, serde_json::Error> {
    let micros = at.timestamp_micros();
    let sign = if micros < 0 { "-" } else { "" };
    let magnitude = micros.unsigned_abs();
    let seconds = magnitude / 1_000_000;
    let fraction = magnitude % 1_000_000;
    serde_json::from_str(&format!("{sign}{seconds}.{fraction:06}"))
}
