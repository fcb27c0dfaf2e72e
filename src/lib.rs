// Copyright (c) 2026-present, array-meta contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versioned key/value metadata sidecar for multi-dimensional array storage.
//!
//! ##### NOTE
//!
//! > This crate only provides the metadata subsystem of an array storage
//! > engine, not the array data path itself. Arrays are treated as opaque
//! > directories; only their metadata side-channel is managed here.
//!
//! ##### About
//!
//! Every array carries a small key/value store for user metadata: typed
//! scalars or short vectors of primitive types, identified by UTF-8 keys.
//!
//! Mutations are never applied in place. Each write session stages its
//! `put`s and `delete`s in memory and, on close, commits them as one
//! immutable, timestamp-named *fragment* file. Read sessions list the
//! fragment directory, keep the fragments at or before their open
//! timestamp, and fold them oldest-first into a snapshot: a later entry
//! shadows an earlier one, a tombstone deletes its key. Opening at an
//! older timestamp time-travels; consolidation fuses many fragments into
//! one without changing the visible state.
//!
//! Fragments can be encrypted at rest with AES-256-GCM; a session carrying
//! a key transparently seals everything it writes and verifies everything
//! it reads.
//!
//! # Example usage
//!
//! ```
//! use array_meta::{Array, Datatype, Mode};
//! #
//! # let dir = tempfile::tempdir()?;
//! # let path = dir.path();
//!
//! // Stage some metadata in a write session
//! let mut array = Array::new(path);
//! array.open(Mode::Write)?;
//! array.put_metadata("ticks", Datatype::Int32, 1, &5i32.to_le_bytes())?;
//! array.put_metadata("scale", Datatype::Float64, 1, &0.5f64.to_le_bytes())?;
//! array.close()?;
//!
//! // Read it back from a snapshot frozen at open time
//! array.open(Mode::Read)?;
//! assert_eq!(2, array.metadata_num()?);
//!
//! let value = array.metadata("ticks")?.expect("was just written");
//! assert_eq!(Datatype::Int32, value.datatype);
//! assert_eq!(5i32.to_le_bytes().as_slice(), &*value.payload);
//!
//! // Keys enumerate in lexicographic order
//! let (key, _) = array.metadata_at_index(1)?;
//! assert_eq!(*key, "ticks");
//! array.close()?;
//! #
//! # Ok::<(), array_meta::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]

mod array;
mod coding;
mod consolidate;
mod crypto;
mod entry;
mod error;
mod fragment;
mod slice;
mod snapshot;
mod staged;
mod time;
mod value_type;

pub mod vfs;

pub use {
    array::{Array, Mode, METADATA_FOLDER},
    coding::{DecodeError, EncodeError},
    consolidate::{consolidate_metadata, consolidate_metadata_with_key},
    crypto::{EncryptionKey, EncryptionType},
    entry::{MetaKey, MetadataEntry, MetadataValue, Payload, TypedValue},
    error::{Error, Result},
    fragment::FragmentName,
    slice::Slice,
    snapshot::Snapshot,
    value_type::Datatype,
};
