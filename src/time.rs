// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Millisecond wall clock used for fragment naming and open-at.

#[cfg(test)]
use std::sync::atomic::{AtomicU64, Ordering};

// u64::MAX means "no override"; a frozen clock makes same-millisecond
// fragment ordering testable without sleeps
#[cfg(test)]
static CLOCK_OVERRIDE_MS: AtomicU64 = AtomicU64::new(u64::MAX);

/// Unix timestamp in milliseconds
///
/// This is the timestamp sessions are opened at and fragments are named by.
pub(crate) fn now_millis() -> u64 {
    #[cfg(test)]
    {
        let frozen = CLOCK_OVERRIDE_MS.load(Ordering::Relaxed);
        if frozen != u64::MAX {
            return frozen;
        }
    }

    // A clock before the epoch reads as 0 rather than failing
    std::time::SystemTime::now()
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .map_or(0, |elapsed| {
            u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
        })
}

/// Freezes [`now_millis`] at `frozen_ms` for the whole test binary;
/// `None` resumes the real clock.
#[cfg(test)]
pub(crate) fn freeze_clock_for_test(frozen_ms: Option<u64>) {
    CLOCK_OVERRIDE_MS.store(frozen_ms.unwrap_or(u64::MAX), Ordering::Relaxed);
}
