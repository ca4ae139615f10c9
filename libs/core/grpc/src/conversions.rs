//! Protobuf well-known type conversions
//!
//! ```ignore
//! use grpc_client::conversions::*;
//!
//! let ts = datetime_to_timestamp(Utc::now());
//! let back = timestamp_to_datetime(&ts)?;
//! ```

use chrono::{DateTime, Utc};
use prost_types::Timestamp;

/// Convert `DateTime<Utc>` to `google.protobuf.Timestamp`, keeping nanoseconds.
pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

/// Convert `google.protobuf.Timestamp` to `DateTime<Utc>`.
///
/// Out-of-range values are an error rather than a silent fallback.
pub fn timestamp_to_datetime(ts: &Timestamp) -> Result<DateTime<Utc>, String> {
    let nanos =
        u32::try_from(ts.nanos).map_err(|_| format!("Invalid timestamp nanos: {}", ts.nanos))?;
    DateTime::from_timestamp(ts.seconds, nanos)
        .ok_or_else(|| format!("Timestamp out of range: {}s {}ns", ts.seconds, ts.nanos))
}

pub fn opt_datetime_to_timestamp(dt: Option<DateTime<Utc>>) -> Option<Timestamp> {
    dt.map(datetime_to_timestamp)
}

pub fn opt_timestamp_to_datetime(ts: Option<&Timestamp>) -> Result<Option<DateTime<Utc>>, String> {
    ts.map(timestamp_to_datetime).transpose()
}
