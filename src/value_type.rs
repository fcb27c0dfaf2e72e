// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Element type of a metadata value
///
/// Payloads are flat little-endian arrays of one of these primitive types;
/// the size of one element is fixed per tag.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Datatype {
    /// Signed 8-bit integer
    Int8,

    /// Unsigned 8-bit integer
    Uint8,

    /// Signed 16-bit integer
    Int16,

    /// Unsigned 16-bit integer
    Uint16,

    /// Signed 32-bit integer
    Int32,

    /// Unsigned 32-bit integer
    Uint32,

    /// Signed 64-bit integer
    Int64,

    /// Unsigned 64-bit integer
    Uint64,

    /// IEEE 754 single precision float
    Float32,

    /// IEEE 754 double precision float
    Float64,

    /// Single byte character (also the type carried by deletion markers)
    Char,

    /// Reserved wildcard sentinel
    ///
    /// Never valid for storage; rejected at the write boundary and by the
    /// wire codec.
    Any,
}

impl Datatype {
    /// Returns the size of one element in bytes.
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 | Self::Char => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float32 => 4,
            Self::Int64 | Self::Uint64 | Self::Float64 => 8,
            Self::Any => 0,
        }
    }

    /// Returns `true` if values of this type may be persisted.
    #[must_use]
    pub fn is_storable(self) -> bool {
        self != Self::Any
    }
}

impl TryFrom<u8> for Datatype {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Int8),
            1 => Ok(Self::Uint8),
            2 => Ok(Self::Int16),
            3 => Ok(Self::Uint16),
            4 => Ok(Self::Int32),
            5 => Ok(Self::Uint32),
            6 => Ok(Self::Int64),
            7 => Ok(Self::Uint64),
            8 => Ok(Self::Float32),
            9 => Ok(Self::Float64),
            10 => Ok(Self::Char),
            _ => Err(()),
        }
    }
}

impl From<Datatype> for u8 {
    fn from(value: Datatype) -> Self {
        match value {
            Datatype::Int8 => 0,
            Datatype::Uint8 => 1,
            Datatype::Int16 => 2,
            Datatype::Uint16 => 3,
            Datatype::Int32 => 4,
            Datatype::Uint32 => 5,
            Datatype::Int64 => 6,
            Datatype::Uint64 => 7,
            Datatype::Float32 => 8,
            Datatype::Float64 => 9,
            Datatype::Char => 10,
            Datatype::Any => 255,
        }
    }
}
