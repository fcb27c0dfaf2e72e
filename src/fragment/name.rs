// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use rand::Rng;

const TIMESTAMP_DIGITS: usize = 20;
const MIN_SUFFIX_LEN: usize = 8;

/// Name of one metadata fragment file: `__<timestamp>_<suffix>`
///
/// The timestamp is the producing session's open time in milliseconds,
/// zero-padded to 20 digits; the suffix is a random lowercase-hex token.
/// Because the timestamp has fixed width, lexicographic filename order
/// equals `(timestamp, suffix)` order, which is the fold order.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FragmentName {
    /// Millisecond timestamp of the producing session's open
    pub timestamp: u64,

    /// Random tie-breaking token (lowercase hex, at least 8 characters)
    pub suffix: String,
}

impl FragmentName {
    /// Generates a name at `timestamp` with a fresh random suffix.
    #[must_use]
    pub fn generate(timestamp: u64) -> Self {
        let token: u64 = rand::rng().random();

        Self {
            timestamp,
            suffix: format!("{token:016x}"),
        }
    }

    /// Parses a directory entry name.
    ///
    /// Returns `None` for anything the fragment writer does not produce
    /// (temp files, foreign files), so listings can simply skip them.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("__")?;

        let timestamp = rest.get(..TIMESTAMP_DIGITS)?;
        if !timestamp.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let suffix = rest.get(TIMESTAMP_DIGITS..)?.strip_prefix('_')?;
        if suffix.len() < MIN_SUFFIX_LEN
            || !suffix
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return None;
        }

        Some(Self {
            timestamp: timestamp.parse().ok()?,
            suffix: suffix.to_string(),
        })
    }
}

impl std::fmt::Display for FragmentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__{:020}_{}", self.timestamp, self.suffix)
    }
}
