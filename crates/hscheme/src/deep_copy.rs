// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Deep copy engine.
//!
//! Produces object graphs that share no storage with their source. Structs,
//! sequences, maps and options are rebuilt through reflection; types with
//! hidden state, and structs with `#[scheme(skip)]` fields, must register a
//! [`DeepCopyFunc`].

use crate::conversion::FieldMatchingFlags;
use crate::error::{Error, Result};
use crate::reflect::{render_path, PathSegment, ReflectRef, Walker};
use crate::{Object, Reflect};
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

type ErasedCopyFn = dyn Fn(&dyn Any, &mut dyn Any, &Cloner) -> Result<()> + Send + Sync;

fn erase<F>(func: F) -> Arc<ErasedCopyFn>
where
    F: Fn(&dyn Any, &mut dyn Any, &Cloner) -> Result<()> + Send + Sync + 'static,
{
    Arc::new(func)
}

/// A deep-copy function for one type.
#[derive(Clone)]
pub struct DeepCopyFunc {
    type_id: TypeId,
    type_name: &'static str,
    func: Arc<ErasedCopyFn>,
}

impl DeepCopyFunc {
    /// Wrap a typed copy function. The [`Cloner`] argument copies nested
    /// reflectable values.
    pub fn new<T, F>(func: F) -> Self
    where
        T: Reflect,
        F: Fn(&T, &mut T, &Cloner) -> Result<()> + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<T>();
        let erased = erase(move |src, dst, cloner| {
            match (src.downcast_ref::<T>(), dst.downcast_mut::<T>()) {
                (Some(src), Some(dst)) => func(src, dst, cloner),
                _ => Err(Error::NoDeepCopyFunc {
                    type_name: type_name.to_string(),
                    path: "<root>".to_string(),
                }),
            }
        });
        Self {
            type_id: TypeId::of::<T>(),
            type_name,
            func: erased,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for DeepCopyFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepCopyFunc")
            .field("type", &self.type_name)
            .finish()
    }
}

/// Registered deep-copy functions.
#[derive(Debug, Default)]
pub struct Cloner {
    funcs: HashMap<TypeId, DeepCopyFunc>,
}

impl Cloner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a batch of deep-copy functions; atomic like conversion
    /// registration.
    pub fn add_deep_copy_funcs<I>(&mut self, funcs: I) -> Result<()>
    where
        I: IntoIterator<Item = DeepCopyFunc>,
    {
        let funcs: Vec<DeepCopyFunc> = funcs.into_iter().collect();
        let mut seen = HashSet::with_capacity(funcs.len());
        for func in &funcs {
            if self.funcs.contains_key(&func.type_id) || !seen.insert(func.type_id) {
                return Err(Error::DuplicateDeepCopy {
                    type_name: func.type_name.to_string(),
                });
            }
        }
        for func in funcs {
            log::debug!("registered deep copy for {}", func.type_name);
            self.funcs.insert(func.type_id, func);
        }
        Ok(())
    }

    pub fn has_deep_copy_func(&self, type_id: TypeId) -> bool {
        self.funcs.contains_key(&type_id)
    }

    /// Copy a registered object into a fresh instance of the same type.
    pub fn deep_copy(&self, obj: &dyn Object) -> Result<Box<dyn Object>> {
        let mut out = obj.new_empty();
        self.copy_into(obj.as_reflect(), out.as_reflect_mut())?;
        Ok(out)
    }

    /// Copy any reflectable value.
    pub fn deep_copy_value<T: Reflect + Default>(&self, value: &T) -> Result<T> {
        let mut out = T::default();
        self.copy_into(value, &mut out)?;
        Ok(out)
    }

    fn copy_into(&self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<()> {
        let mut walker = CopyWalker {
            cloner: self,
            path: Vec::new(),
        };
        walker.walk(src, dst)
    }
}

struct CopyWalker<'c> {
    cloner: &'c Cloner,
    path: Vec<PathSegment>,
}

impl Walker for CopyWalker<'_> {
    fn walk(&mut self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<()> {
        let type_id = Any::type_id(dst.as_any());
        if Any::type_id(src.as_any()) == type_id {
            if let Some(func) = self.cloner.funcs.get(&type_id) {
                return (func.func)(src.as_any(), dst.as_any_mut(), self.cloner);
            }
        }
        if let ReflectRef::Struct(fields) = src.reflect_ref() {
            if fields.has_skipped_fields() {
                return Err(Error::NoDeepCopyFunc {
                    type_name: src.type_name().to_string(),
                    path: render_path(&self.path),
                });
            }
        }
        dst.fill_from(src, self)
    }

    fn flags(&self) -> FieldMatchingFlags {
        FieldMatchingFlags::DEST_FROM_SOURCE
    }

    fn path(&self) -> &[PathSegment] {
        &self.path
    }

    fn path_mut(&mut self) -> &mut Vec<PathSegment> {
        &mut self.path
    }

    fn opaque(&self, _src: &str, dst: &str) -> Error {
        Error::NoDeepCopyFunc {
            type_name: dst.to_string(),
            path: render_path(&self.path),
        }
    }
}
