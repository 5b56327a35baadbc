// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The `v1` wire representation.
//!
//! `Hello` mirrors the internal type field for field and converts through the
//! derived hub functions; its `text2` field is spelled `test` on the wire.
//! `Namespace` nests its finalizers and phase and converts through hand
//! written functions.

mod conversion;
mod defaults;

pub use conversion::conversion_funcs;
pub use defaults::{defaulting_funcs, DEFAULT_HELLO_TEXT};

use crate::api::{ListMeta, ObjectMeta};
use crate::GROUP;
use hscheme::{Object, Reflect, Result, Scheme, TypeMeta};
use serde::{Deserialize, Serialize};

pub const VERSION: &str = "v1";

pub const PHASE_ACTIVE: &str = "Active";
pub const PHASE_TERMINATING: &str = "Terminating";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
#[scheme(hub = "crate::Hello")]
pub struct Hello {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(rename = "test", default, skip_serializing_if = "String::is_empty")]
    pub text2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
pub struct HelloList {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Vec<Hello>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
pub struct Namespace {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: NamespaceSpec,
    #[serde(default)]
    pub status: NamespaceStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct NamespaceSpec {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub finalizers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct NamespaceStatus {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phase: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
pub struct Status {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default)]
    pub code: i32,
}

/// Register the `v1` types with their conversion and defaulting functions.
pub fn install(scheme: &mut Scheme) -> Result<()> {
    scheme.add_known_type::<Hello>(GROUP, VERSION)?;
    scheme.add_known_type::<HelloList>(GROUP, VERSION)?;
    scheme.add_known_type::<Namespace>(GROUP, VERSION)?;
    scheme.add_known_type::<Status>(GROUP, VERSION)?;
    scheme.add_conversion_funcs(conversion_funcs())?;
    scheme.add_defaulting_funcs(defaulting_funcs())
}
