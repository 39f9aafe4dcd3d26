//! Deadline computation.
//!
//! Converts a relative timeout in seconds into the absolute
//! `{seconds, nanos}` pair the wire protocol carries. The value is
//! advisory metadata for the remote side; nothing in this client enforces
//! it locally.

use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use lamrpc::Deadline;

/// Computes the absolute deadline `now + seconds`.
///
/// Pure: same inputs, same output, no clock reads. Instants that would
/// fall before the UNIX epoch saturate to it, and an unrepresentable far
/// future falls back to `now`, rather than panicking on arithmetic.
pub fn compute(now: SystemTime, seconds: i64) -> Deadline {
    let target = if seconds >= 0 {
        now.checked_add(Duration::from_secs(seconds as u64)).unwrap_or(now)
    } else {
        now.checked_sub(Duration::from_secs(seconds.unsigned_abs())).unwrap_or(UNIX_EPOCH)
    };

    match target.duration_since(UNIX_EPOCH) {
        Ok(since) => Deadline {
            seconds: since.as_secs() as i64,
            nanos: since.subsec_nanos() as i64,
        },
        // Before the epoch: saturate rather than go negative.
        Err(_) => Deadline { seconds: 0, nanos: 0 },
    }
}
