// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use std::time::{Duration, SystemTime};

/// Gets the signed number of whole seconds since the unix epoch
///
/// Rounds towards negative infinity, so 0.5 seconds before the epoch is -1.
#[must_use]
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(e) => {
            let before = e.duration();
            let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);

            if before.subsec_nanos() > 0 {
                secs.saturating_neg().saturating_sub(1)
            } else {
                secs.saturating_neg()
            }
        }
    }
}

/// Gets the time bucket a point in time falls into
///
/// `width_secs` needs to be positive.
#[must_use]
pub fn bucket_of(time: SystemTime, width_secs: i64) -> i64 {
    debug_assert!(width_secs > 0, "bucket width must be positive");
    unix_seconds(time).div_euclid(width_secs)
}

/// Gets the elapsed time from `start` to `end`, or zero if `end` is earlier
#[must_use]
pub fn elapsed(start: SystemTime, end: SystemTime) -> Duration {
    end.duration_since(start).unwrap_or_default()
}
