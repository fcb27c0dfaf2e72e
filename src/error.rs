// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::coding::{DecodeError, EncodeError};

/// Represents errors that can occur in the metadata subsystem
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(std::io::Error),

    /// Serialization failed
    Encode(EncodeError),

    /// Deserialization failed
    ///
    /// Points to a corrupt (or truncated) metadata fragment.
    Decode(DecodeError),

    /// An argument failed validation
    InvalidArgument(&'static str),

    /// The operation requires a different session state or mode
    InvalidMode(&'static str),

    /// Encryption key absent, wrong, or mismatched with the on-disk state
    EncryptionMismatch(&'static str),

    /// Authenticated decryption failed
    AuthenticationFailed,

    /// Enumeration index past the number of keys (index, number of keys)
    OutOfRange((u64, u64)),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MetadataError: {self:?}")
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<EncodeError> for Error {
    fn from(value: EncodeError) -> Self {
        Self::Encode(value)
    }
}

impl From<DecodeError> for Error {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

/// Metadata result
pub type Result<T> = std::result::Result<T, Error>;
