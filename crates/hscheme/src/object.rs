// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Top-level registrable objects.

use crate::error::Result;
use crate::reflect::{Reflect, Struct};
use std::any::Any;
use std::fmt;

/// A top-level value that can be registered under a (group, version, kind),
/// marshalled to the wire and rebuilt from it.
///
/// Derive it with `#[derive(Reflect, Object)]` on a struct that also derives
/// `Default`, `Debug`, `Serialize` and `Deserialize`.
pub trait Object: Struct + fmt::Debug {
    /// Kind used when registering without an explicit name.
    fn default_kind() -> &'static str
    where
        Self: Sized;

    /// Zero value of the same concrete type.
    fn new_empty(&self) -> Box<dyn Object>;

    /// Marshal the whole object, type metadata included.
    fn encode_json(&self) -> Result<Vec<u8>>;

    /// Replace the object with the unmarshalled payload.
    fn decode_json(&mut self, data: &[u8]) -> Result<()>;

    fn as_reflect(&self) -> &dyn Reflect;

    fn as_reflect_mut(&mut self) -> &mut dyn Reflect;

    fn as_struct_mut(&mut self) -> &mut dyn Struct;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl dyn Object {
    pub fn is<T: Object>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Object>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Object>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    /// Take ownership of the concrete object.
    pub fn downcast<T: Object>(self: Box<Self>) -> Option<Box<T>> {
        self.into_any().downcast::<T>().ok()
    }
}
