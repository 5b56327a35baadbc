// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Defaulting functions applied to freshly decoded versioned objects.

use crate::error::{Error, Result};
use crate::reflect::{Reflect, ReflectMut};
use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

type ErasedDefaultFn = dyn Fn(&mut dyn Any) + Send + Sync;

/// Fills unset fields of one type.
#[derive(Clone)]
pub struct DefaultingFunc {
    type_id: TypeId,
    type_name: &'static str,
    func: Arc<ErasedDefaultFn>,
}

impl DefaultingFunc {
    pub fn new<T, F>(func: F) -> Self
    where
        T: Reflect,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        let func: Arc<ErasedDefaultFn> = Arc::new(move |value: &mut dyn Any| {
            if let Some(value) = value.downcast_mut::<T>() {
                func(value);
            }
        });
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            func,
        }
    }
}

impl fmt::Debug for DefaultingFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultingFunc")
            .field("type", &self.type_name)
            .finish()
    }
}

/// Registered defaulting functions.
#[derive(Debug, Default)]
pub struct Defaulter {
    funcs: HashMap<TypeId, DefaultingFunc>,
}

impl Defaulter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a batch; atomic, one function per type.
    pub fn add_defaulting_funcs<I>(&mut self, funcs: I) -> Result<()>
    where
        I: IntoIterator<Item = DefaultingFunc>,
    {
        let funcs: Vec<DefaultingFunc> = funcs.into_iter().collect();
        let mut seen = HashSet::with_capacity(funcs.len());
        for func in &funcs {
            if self.funcs.contains_key(&func.type_id) || !seen.insert(func.type_id) {
                return Err(Error::DuplicateDefaulting {
                    type_name: func.type_name.to_string(),
                });
            }
        }
        for func in funcs {
            log::debug!("registered defaulting for {}", func.type_name);
            self.funcs.insert(func.type_id, func);
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Apply defaults to `value` and everything it contains, outermost first.
    pub fn apply(&self, value: &mut dyn Reflect) {
        if self.funcs.is_empty() {
            return;
        }
        self.visit(value);
    }

    fn visit(&self, value: &mut dyn Reflect) {
        if let Some(func) = self.funcs.get(&Any::type_id(value.as_any())) {
            (func.func)(value.as_any_mut());
        }
        match value.reflect_mut() {
            ReflectMut::Struct(fields) => {
                for &name in fields.field_names() {
                    if let Some(field) = fields.field_mut(name) {
                        self.visit(field);
                    }
                }
            }
            ReflectMut::Seq(items) => items.into_iter().for_each(|item| self.visit(item)),
            ReflectMut::Map(entries) => entries.into_iter().for_each(|(_, v)| self.visit(v)),
            ReflectMut::Optional(Some(inner)) => self.visit(inner),
            ReflectMut::Optional(None) | ReflectMut::Value | ReflectMut::Opaque => {}
        }
    }
}
