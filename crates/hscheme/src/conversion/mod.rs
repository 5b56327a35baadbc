// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion engine.
//!
//! Converts a value of one type into a value of another. For every
//! (source, destination) pair met during the walk, a registered
//! [`ConversionFunc`] for exactly that ordered pair of types wins; otherwise
//! the destination is rebuilt structurally from the source, field by field,
//! by name.
//!
//! Custom functions receive an explicit [`Scope`] carrying the source and
//! destination versions and a handle back to the engine for nested values.

mod flags;
mod scope;

pub use flags::FieldMatchingFlags;
pub use scope::{Meta, Scope, UNKNOWN_VERSION};

use crate::error::{Error, Result};
use crate::Reflect;
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

type ErasedConversionFn = dyn Fn(&dyn Any, &mut dyn Any, &mut Scope<'_>) -> Result<()> + Send + Sync;

fn erase<F>(func: F) -> Arc<ErasedConversionFn>
where
    F: Fn(&dyn Any, &mut dyn Any, &mut Scope<'_>) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// A conversion function for one ordered pair of types.
#[derive(Clone)]
pub struct ConversionFunc {
    src: TypeId,
    dst: TypeId,
    src_name: &'static str,
    dst_name: &'static str,
    func: Arc<ErasedConversionFn>,
}

impl ConversionFunc {
    /// Wrap a typed function converting `A` into `B`.
    ///
    /// ```ignore
    /// ConversionFunc::new(|src: &v1::Widget, dst: &mut Widget, scope| {
    ///     dst.display_name = src.name.to_uppercase();
    ///     scope.convert(&src.spec, &mut dst.spec, FieldMatchingFlags::DEST_FROM_SOURCE)
    /// })
    /// ```
    pub fn new<A, B, F>(func: F) -> Self
    where
        A: Reflect,
        B: Reflect,
        F: Fn(&A, &mut B, &mut Scope<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let src_name = std::any::type_name::<A>();
        let dst_name = std::any::type_name::<B>();
        let erased = erase(move |src, dst, scope| {
            match (src.downcast_ref::<A>(), dst.downcast_mut::<B>()) {
                (Some(src), Some(dst)) => func(src, dst, scope),
                _ => Err(Error::NoConversionPath {
                    src: src_name.to_string(),
                    dst: dst_name.to_string(),
                    path: scope.path_string(),
                    reason: "conversion function called with foreign types".to_string(),
                }),
            }
        });
        Self {
            src: TypeId::of::<A>(),
            dst: TypeId::of::<B>(),
            src_name,
            dst_name,
            func: erased,
        }
    }

    /// Ordered (source, destination) type pair.
    pub fn key(&self) -> (TypeId, TypeId) {
        (self.src, self.dst)
    }

    pub fn src_name(&self) -> &'static str {
        self.src_name
    }

    pub fn dst_name(&self) -> &'static str {
        self.dst_name
    }

    pub(crate) fn call(&self, src: &dyn Any, dst: &mut dyn Any, scope: &mut Scope<'_>) -> Result<()> {
        (self.func)(src, dst, scope)
    }
}

impl fmt::Debug for ConversionFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionFunc")
            .field("src", &self.src_name)
            .field("dst", &self.dst_name)
            .finish()
    }
}

/// Registered conversion functions and the walk entry point.
#[derive(Debug, Default)]
pub struct Converter {
    funcs: HashMap<(TypeId, TypeId), ConversionFunc>,
}

impl Converter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a batch of conversion functions.
    ///
    /// Atomic: if any pair is already registered, or appears twice in the
    /// batch, nothing is installed and [`Error::DuplicateConversion`] is
    /// returned.
    pub fn add_conversion_funcs<I>(&mut self, funcs: I) -> Result<()>
    where
        I: IntoIterator<Item = ConversionFunc>,
    {
        let funcs: Vec<ConversionFunc> = funcs.into_iter().collect();
        let mut seen = HashSet::with_capacity(funcs.len());
        for func in &funcs {
            if self.funcs.contains_key(&func.key()) || !seen.insert(func.key()) {
                return Err(Error::DuplicateConversion {
                    src: func.src_name.to_string(),
                    dst: func.dst_name.to_string(),
                });
            }
        }
        for func in funcs {
            log::debug!(
                "registered conversion {} -> {}",
                func.src_name,
                func.dst_name
            );
            self.funcs.insert(func.key(), func);
        }
        Ok(())
    }

    pub fn has_conversion_func(&self, src: TypeId, dst: TypeId) -> bool {
        self.funcs.contains_key(&(src, dst))
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    pub(crate) fn func_for(&self, src: TypeId, dst: TypeId) -> Option<&ConversionFunc> {
        self.funcs.get(&(src, dst))
    }

    /// Convert `src` into `dst`.
    ///
    /// On error `dst` may be partially written and should be discarded.
    pub fn convert(
        &self,
        src: &dyn Reflect,
        dst: &mut dyn Reflect,
        flags: FieldMatchingFlags,
        meta: Meta,
    ) -> Result<()> {
        let mut scope = Scope::attached(self, meta, flags);
        scope.convert_dyn(src, dst, flags)
    }
}
