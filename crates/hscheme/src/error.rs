// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy shared by every component of the scheme.

use crate::meta::GroupVersionKind;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Longest payload excerpt carried in envelope errors.
const SNIPPET_LEN: usize = 128;

/// Errors raised by registration, conversion, copy and codec operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Payload is not a parsable envelope.
    #[error("couldn't get group/version/kind: malformed envelope: {source}")]
    MalformedEnvelope {
        #[source]
        source: serde_json::Error,
    },

    /// Envelope has no version and the canonical version is not blank.
    #[error("version not set in '{data}'")]
    MissingVersion { data: String },

    /// Envelope has no kind.
    #[error("kind not set in '{data}'")]
    MissingKind { data: String },

    /// Envelope has no group.
    #[error("group not set in '{data}'")]
    MissingGroup { data: String },

    /// Nothing registered under this (group, version, kind).
    #[error("no kind is registered for {gvk}")]
    UnknownKind { gvk: GroupVersionKind },

    /// Encoding was asked for a type the registry cannot decode again.
    #[error("type {type_name} is not registered and cannot be encoded to version {version:?}")]
    UnregisteredType { type_name: String, version: String },

    /// Object's type is not registered.
    #[error("type {type_name} is not registered")]
    NotRegistered { type_name: String },

    /// (group, version, kind) or (type, group, version) already taken.
    #[error("duplicate kind registration for {gvk}: {existing} conflicts with {new}")]
    DuplicateKind {
        gvk: GroupVersionKind,
        existing: String,
        new: String,
    },

    /// A conversion function is already registered for this ordered pair.
    #[error("duplicate conversion function from {src} to {dst}")]
    DuplicateConversion { src: String, dst: String },

    /// A deep-copy function is already registered for this type.
    #[error("duplicate deep-copy function for {type_name}")]
    DuplicateDeepCopy { type_name: String },

    /// A defaulting function is already registered for this type.
    #[error("duplicate defaulting function for {type_name}")]
    DuplicateDefaulting { type_name: String },

    /// Resource name or scope already mapped differently.
    #[error("resource {resource:?} already maps to {existing}, cannot map it to {new}")]
    DuplicateResource {
        resource: String,
        existing: String,
        new: String,
    },

    /// A mapper is already registered for the group.
    #[error("a rest mapper is already registered for group {group:?}")]
    DuplicateRestMapper { group: String },

    /// Structural conversion is impossible and no custom function applies.
    #[error("no conversion path from {src} to {dst} at '{path}': {reason}")]
    NoConversionPath {
        src: String,
        dst: String,
        path: String,
        reason: String,
    },

    /// Opaque type reached during deep copy without a registered function.
    #[error("no deep-copy function for opaque type {type_name} at '{path}'")]
    NoDeepCopyFunc { type_name: String, path: String },

    /// Scope used outside of a running conversion.
    #[error("scope is not attached to a running conversion")]
    NoActiveScope,

    /// Meta factory could not find a required field.
    #[error("couldn't find field {field:?} in {type_name}")]
    FieldNotFound { field: String, type_name: String },

    /// Resource name not known to the mapper.
    #[error("no kind is mapped for resource {resource:?}")]
    UnknownResource { resource: String },

    /// No mapper registered for the group.
    #[error("no rest mapper is registered for group {group:?}")]
    NoRestMapper { group: String },

    /// Decode target given no bytes.
    #[error("empty input")]
    EmptyInput,

    /// Body could not be marshalled or unmarshalled.
    #[error("json body error: {0}")]
    Json(#[source] serde_json::Error),

    /// A custom conversion function rejected its input.
    #[error("converting {src} to {dst} failed: {message}")]
    ConversionFailed {
        src: String,
        dst: String,
        message: String,
    },
}

impl Error {
    /// Duplicate registrations: fatal at start-up, never retried.
    pub fn is_registration_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateKind { .. }
                | Self::DuplicateConversion { .. }
                | Self::DuplicateDeepCopy { .. }
                | Self::DuplicateDefaulting { .. }
                | Self::DuplicateResource { .. }
                | Self::DuplicateRestMapper { .. }
        )
    }

    /// Type (or group) missing from a registry.
    pub fn is_not_registered(&self) -> bool {
        matches!(
            self,
            Self::NotRegistered { .. }
                | Self::UnregisteredType { .. }
                | Self::UnknownKind { .. }
                | Self::NoRestMapper { .. }
        )
    }

    pub(crate) fn missing_version(data: &[u8]) -> Self {
        Self::MissingVersion {
            data: snippet(data),
        }
    }

    pub(crate) fn missing_kind(data: &[u8]) -> Self {
        Self::MissingKind {
            data: snippet(data),
        }
    }

    pub(crate) fn missing_group(data: &[u8]) -> Self {
        Self::MissingGroup {
            data: snippet(data),
        }
    }
}

fn snippet(data: &[u8]) -> String {
    let text = String::from_utf8_lossy(data);
    if text.chars().count() <= SNIPPET_LEN {
        return text.into_owned();
    }
    let mut out: String = text.chars().take(SNIPPET_LEN).collect();
    out.push_str("...");
    out
}
