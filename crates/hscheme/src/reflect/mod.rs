// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural reflection for registered types.
//!
//! The conversion and deep-copy engines never look at concrete types directly:
//! they walk values through [`Reflect`], which exposes a value as a leaf, a
//! struct with named fields, a sequence, a string-keyed map, an optional value
//! or an opaque leaf that needs a registered function.
//!
//! # Implementations
//!
//! - Structs: `#[derive(Reflect)]`
//! - Primitives, `String`, `serde_json::Value`: copied by value
//! - `Vec<T>`, `Option<T>`, `Box<T>`, `HashMap<String, T>`,
//!   `BTreeMap<String, T>`: rebuilt into fresh storage
//! - Clone-able leaf types of your own: [`impl_reflect_value!`](crate::impl_reflect_value)
//! - Types with hidden state: [`impl_reflect_opaque!`](crate::impl_reflect_opaque)
//!
//! # Traversal
//!
//! A [`Walker`] drives a traversal. For every (source, destination) pair it
//! either applies a registered function or calls
//! [`Reflect::fill_from`], which rebuilds the destination from the source and
//! hands nested values back to the walker.

mod impls;

use crate::conversion::FieldMatchingFlags;
use crate::error::{Error, Result};
use std::any::Any;
use std::fmt::Write as _;

/// Structural view of a value.
pub enum ReflectRef<'a> {
    /// Leaf copied by value
    Value,
    /// Struct with named fields
    Struct(&'a dyn Struct),
    /// Ordered elements
    Seq(Vec<&'a dyn Reflect>),
    /// String-keyed entries
    Map(Vec<(&'a str, &'a dyn Reflect)>),
    /// Present or absent value
    Optional(Option<&'a dyn Reflect>),
    /// Leaf that only a registered function may copy or convert
    Opaque,
}

/// Mutable structural view of a value.
pub enum ReflectMut<'a> {
    Value,
    Struct(&'a mut dyn Struct),
    Seq(Vec<&'a mut dyn Reflect>),
    Map(Vec<(&'a str, &'a mut dyn Reflect)>),
    Optional(Option<&'a mut dyn Reflect>),
    Opaque,
}

/// A value the scheme engines can walk.
pub trait Reflect: Any + Send + Sync {
    /// Fully qualified type name, for diagnostics.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn reflect_ref(&self) -> ReflectRef<'_>;

    fn reflect_mut(&mut self) -> ReflectMut<'_>;

    /// Rebuild `self` from `src`, recursing through `walker` for nested values.
    ///
    /// Fails with [`Error::NoConversionPath`] when the shapes are incompatible.
    /// On failure `self` may be partially written.
    fn fill_from(&mut self, src: &dyn Reflect, walker: &mut dyn Walker) -> Result<()>;
}

impl dyn Reflect {
    pub fn is<T: Reflect>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Reflect>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Named-field access, generated by `#[derive(Reflect)]`.
pub trait Struct: Reflect {
    /// Field names in declaration order.
    fn field_names(&self) -> &'static [&'static str];

    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Reflect>;

    /// Field may be absent from a conversion source.
    fn is_optional_field(&self, name: &str) -> bool;

    /// Some fields are hidden from reflection (`#[scheme(skip)]`), so the
    /// struct cannot be copied field by field.
    fn has_skipped_fields(&self) -> bool {
        false
    }
}

// ----------------------------------------------------------------------------
// Traversal
// ----------------------------------------------------------------------------

/// One step of the path from the root value to the value being walked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(&'static str),
    Index(usize),
    Key(String),
}

/// Render a walk path as `metadata.labels["app"].items[0]`.
pub fn render_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Field(name) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(name);
            }
            PathSegment::Index(index) => {
                let _ = write!(out, "[{index}]");
            }
            PathSegment::Key(key) => {
                let _ = write!(out, "[{key:?}]");
            }
        }
    }
    out
}

/// Drives a structural traversal of a (source, destination) pair.
pub trait Walker {
    /// Convert or copy `src` into `dst`, applying registered functions first.
    fn walk(&mut self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<()>;

    /// Field matching policy for struct fills.
    fn flags(&self) -> FieldMatchingFlags;

    fn path(&self) -> &[PathSegment];

    fn path_mut(&mut self) -> &mut Vec<PathSegment>;

    /// Error for an opaque leaf reached without a registered function.
    fn opaque(&self, src: &str, dst: &str) -> Error;

    /// Walk a nested value, recording `segment` in the path.
    fn walk_at(&mut self, segment: PathSegment, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<()> {
        self.path_mut().push(segment);
        let result = self.walk(src, dst);
        self.path_mut().pop();
        result
    }

    /// Error for incompatible shapes at the current path.
    fn mismatch(&self, src: &str, dst: &str, reason: &str) -> Error {
        Error::NoConversionPath {
            src: src.to_string(),
            dst: dst.to_string(),
            path: render_path(self.path()),
            reason: reason.to_string(),
        }
    }
}

fn missing_field(walker: &mut dyn Walker, name: &'static str, src: &str, dst: &str, reason: &str) -> Error {
    walker.path_mut().push(PathSegment::Field(name));
    let err = walker.mismatch(src, dst, reason);
    walker.path_mut().pop();
    err
}

/// Field-by-name struct fill used by `#[derive(Reflect)]`.
///
/// Destination-driven by default: every destination field needs a source
/// field of the same name unless it is optional or the walker's flags say
/// otherwise.
pub fn fill_struct(dst: &mut dyn Struct, src: &dyn Reflect, walker: &mut dyn Walker) -> Result<()> {
    let ReflectRef::Struct(source) = src.reflect_ref() else {
        return Err(walker.mismatch(src.type_name(), dst.type_name(), "source is not a struct"));
    };

    let flags = walker.flags();
    let source_driven = flags.contains(FieldMatchingFlags::SOURCE_TO_DEST);
    let ignore_missing = flags.contains(FieldMatchingFlags::IGNORE_MISSING_FIELDS);

    for &name in dst.field_names() {
        let Some(value) = source.field(name) else {
            if ignore_missing || source_driven || dst.is_optional_field(name) {
                continue;
            }
            return Err(missing_field(
                walker,
                name,
                source.type_name(),
                dst.type_name(),
                "destination field has no source counterpart",
            ));
        };
        if let Some(slot) = dst.field_mut(name) {
            walker.walk_at(PathSegment::Field(name), value, slot)?;
        }
    }

    if source_driven && !ignore_missing {
        for &name in source.field_names() {
            if dst.field(name).is_none() {
                return Err(missing_field(
                    walker,
                    name,
                    source.type_name(),
                    dst.type_name(),
                    "source field has no destination counterpart",
                ));
            }
        }
    }
    Ok(())
}
