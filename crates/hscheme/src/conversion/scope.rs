// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{Converter, FieldMatchingFlags};
use crate::error::{Error, Result};
use crate::reflect::{render_path, PathSegment, Walker};
use crate::Reflect;
use std::any::Any;

/// Version reported for types the registry does not know.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Versions on both sides of a conversion. Empty means canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Meta {
    pub src_version: String,
    pub dest_version: String,
}

impl Meta {
    pub fn new(src_version: &str, dest_version: &str) -> Self {
        Self {
            src_version: src_version.to_string(),
            dest_version: dest_version.to_string(),
        }
    }
}

/// Context handed to every custom conversion function.
///
/// Carries the conversion [`Meta`], the current field matching policy and the
/// path of the value being converted. Nested values are converted with
/// [`Scope::convert`], which applies registered functions the same way the
/// top-level call does.
pub struct Scope<'c> {
    converter: &'c Converter,
    meta: Meta,
    flags: FieldMatchingFlags,
    path: Vec<PathSegment>,
    attached: bool,
}

impl<'c> Scope<'c> {
    /// A scope outside of any conversion; [`Scope::convert`] on it fails with
    /// [`Error::NoActiveScope`].
    pub fn detached(converter: &'c Converter, meta: Meta) -> Self {
        Self {
            converter,
            meta,
            flags: FieldMatchingFlags::DEST_FROM_SOURCE,
            path: Vec::new(),
            attached: false,
        }
    }

    pub(crate) fn attached(converter: &'c Converter, meta: Meta, flags: FieldMatchingFlags) -> Self {
        Self {
            converter,
            meta,
            flags,
            path: Vec::new(),
            attached: true,
        }
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn flags(&self) -> FieldMatchingFlags {
        self.flags
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Path of the value currently being converted.
    pub fn path_string(&self) -> String {
        render_path(&self.path)
    }

    /// Convert a nested value with the current meta and the given flags.
    pub fn convert<A: Reflect, B: Reflect>(
        &mut self,
        src: &A,
        dst: &mut B,
        flags: FieldMatchingFlags,
    ) -> Result<()> {
        self.convert_dyn(src, dst, flags)
    }

    pub fn convert_dyn(
        &mut self,
        src: &dyn Reflect,
        dst: &mut dyn Reflect,
        flags: FieldMatchingFlags,
    ) -> Result<()> {
        if !self.attached {
            return Err(Error::NoActiveScope);
        }
        let saved = std::mem::replace(&mut self.flags, flags);
        let result = self.walk(src, dst);
        self.flags = saved;
        result
    }

    /// Error for a custom function rejecting its input.
    pub fn failure(&self, src: &dyn Reflect, dst: &dyn Reflect, message: impl Into<String>) -> Error {
        Error::ConversionFailed {
            src: src.type_name().to_string(),
            dst: dst.type_name().to_string(),
            message: format!("{} (at '{}')", message.into(), self.path_string()),
        }
    }
}

impl Walker for Scope<'_> {
    fn walk(&mut self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<()> {
        let converter = self.converter;
        let key = (Any::type_id(src.as_any()), Any::type_id(dst.as_any()));
        if let Some(func) = converter.func_for(key.0, key.1) {
            log::trace!(
                "conversion {} -> {} at '{}'",
                func.src_name(),
                func.dst_name(),
                self.path_string()
            );
            return func.call(src.as_any(), dst.as_any_mut(), self);
        }
        dst.fill_from(src, self)
    }

    fn flags(&self) -> FieldMatchingFlags {
        self.flags
    }

    fn path(&self) -> &[PathSegment] {
        &self.path
    }

    fn path_mut(&mut self) -> &mut Vec<PathSegment> {
        &mut self.path
    }

    fn opaque(&self, src: &str, dst: &str) -> Error {
        self.mismatch(src, dst, "opaque type requires a registered conversion function")
    }
}
