// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Internal (canonical) representation of the group.

use crate::api::{ListMeta, ObjectMeta};
use hscheme::{Object, Reflect, TypeMeta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
pub struct Hello {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
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

/// Root-scoped grouping of namespaced objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
pub struct Namespace {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub finalizers: Vec<String>,
    #[serde(default)]
    pub phase: String,
}

/// Outcome of an API call; never exposed as a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
pub struct Status {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub code: i32,
}
