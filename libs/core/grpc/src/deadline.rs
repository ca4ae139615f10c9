//! Caller deadlines carried in the `grpc-timeout` request header.
//!
//! The header value is at most eight ASCII digits followed by one unit:
//! `H` hours, `M` minutes, `S` seconds, `m` millis, `u` micros, `n` nanos.

use std::time::Duration;
use tonic::metadata::MetadataMap;

const GRPC_TIMEOUT_HEADER: &str = "grpc-timeout";
const MAX_TIMEOUT_DIGITS: usize = 8;

/// Deadline the caller attached to this request, if any.
///
/// A malformed header is treated as absent.
pub fn request_deadline(metadata: &MetadataMap) -> Option<Duration> {
    let raw = metadata.get(GRPC_TIMEOUT_HEADER)?.to_str().ok()?;
    parse_grpc_timeout(raw)
}

/// Parse a `grpc-timeout` header value.
pub fn parse_grpc_timeout(raw: &str) -> Option<Duration> {
    if raw.len() < 2 || !raw.is_ascii() {
        return None;
    }
    let (digits, unit) = raw.split_at(raw.len() - 1);
    if digits.len() > MAX_TIMEOUT_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;

    let duration = match unit {
        "H" => Duration::from_secs(value * 60 * 60),
        "M" => Duration::from_secs(value * 60),
        "S" => Duration::from_secs(value),
        "m" => Duration::from_millis(value),
        "u" => Duration::from_micros(value),
        "n" => Duration::from_nanos(value),
        _ => return None,
    };
    Some(duration)
}
