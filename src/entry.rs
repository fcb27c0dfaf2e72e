// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    coding::{Decode, DecodeError, Encode, EncodeError},
    value_type::Datatype,
    Slice,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// User-provided metadata key (UTF-8, non-empty)
pub type MetaKey = Slice;

/// Raw little-endian value payload
pub type Payload = Slice;

/// A typed metadata value
///
/// `count` elements of `datatype`, stored as `count * datatype.size()`
/// little-endian bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypedValue {
    /// Element type
    pub datatype: Datatype,

    /// Number of elements (not bytes)
    pub count: u32,

    /// Raw element bytes
    pub payload: Payload,
}

/// Value side of a metadata entry
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MetadataValue {
    /// A live value
    Value(TypedValue),

    /// Deletion marker for the key
    ///
    /// Dominates earlier values for the same key in the fold.
    Tombstone,
}

/// One key/value mutation inside a fragment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetadataEntry {
    /// Key bytes
    pub key: MetaKey,

    /// Value or tombstone
    pub value: MetadataValue,
}

impl MetadataEntry {
    /// Creates a new value entry.
    ///
    /// # Panics
    ///
    /// Panics if the key is empty; the session API validates before this point.
    #[must_use]
    pub fn new_value<K: Into<MetaKey>, P: Into<Payload>>(
        key: K,
        datatype: Datatype,
        count: u32,
        payload: P,
    ) -> Self {
        let key = key.into();
        assert!(!key.is_empty(), "key may not be empty");

        Self {
            key,
            value: MetadataValue::Value(TypedValue {
                datatype,
                count,
                payload: payload.into(),
            }),
        }
    }

    /// Creates a new tombstone entry.
    ///
    /// # Panics
    ///
    /// Panics if the key is empty; the session API validates before this point.
    #[must_use]
    pub fn new_tombstone<K: Into<MetaKey>>(key: K) -> Self {
        let key = key.into();
        assert!(!key.is_empty(), "key may not be empty");

        Self {
            key,
            value: MetadataValue::Tombstone,
        }
    }

    /// Returns `true` if the entry marks its key as deleted.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.value == MetadataValue::Tombstone
    }
}

impl Encode for MetadataEntry {
    fn encode_into<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        writer.write_u8(u8::from(self.is_tombstone()))?;

        // NOTE: Keys are limited to 32-bit length
        #[allow(clippy::cast_possible_truncation)]
        writer.write_u32::<LittleEndian>(self.key.len() as u32)?;
        writer.write_all(&self.key)?;

        match &self.value {
            MetadataValue::Value(value) => {
                writer.write_u8(u8::from(value.datatype))?;
                writer.write_u32::<LittleEndian>(value.count)?;
                writer.write_all(&value.payload)?;
            }
            MetadataValue::Tombstone => {
                writer.write_u8(u8::from(Datatype::Char))?;
                writer.write_u32::<LittleEndian>(0)?;
            }
        }

        Ok(())
    }
}

/// The tag byte of a tombstone is validated against the type registry but
/// not required to be `Char`: the writer always stamps `Char`, and a
/// tombstone carries no payload, so any storable tag decodes to the same
/// deletion marker.
impl Decode for MetadataEntry {
    fn decode_from<R: Read>(reader: &mut R) -> Result<Self, DecodeError> {
        let tombstone = reader.read_u8()?;
        if tombstone > 1 {
            return Err(DecodeError::InvalidEntry("tombstone flag"));
        }

        let key_len = reader.read_u32::<LittleEndian>()?;
        if key_len == 0 {
            return Err(DecodeError::InvalidEntry("empty key"));
        }
        let key = Slice::from_reader(reader, key_len as usize)?;

        let raw_type = reader.read_u8()?;
        let datatype = Datatype::try_from(raw_type)
            .map_err(|()| DecodeError::InvalidTag(("Datatype", raw_type)))?;

        let count = reader.read_u32::<LittleEndian>()?;

        if tombstone == 1 {
            if count != 0 {
                return Err(DecodeError::InvalidEntry("tombstone with payload"));
            }

            return Ok(Self {
                key,
                value: MetadataValue::Tombstone,
            });
        }

        if count == 0 {
            return Err(DecodeError::InvalidEntry("zero count"));
        }

        let payload_len = u64::from(count) * datatype.size() as u64;
        let payload_len = usize::try_from(payload_len)
            .map_err(|_| DecodeError::InvalidEntry("payload length overflow"))?;
        let payload = Slice::from_reader(reader, payload_len)?;

        Ok(Self {
            key,
            value: MetadataValue::Value(TypedValue {
                datatype,
                count,
                payload,
            }),
        })
    }
}
