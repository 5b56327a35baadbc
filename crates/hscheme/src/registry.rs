// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: (group, version, kind) to concrete type and back.

use crate::error::{Error, Result};
use crate::meta::GroupVersionKind;
use crate::Object;
use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Copy)]
struct KnownType {
    type_id: TypeId,
    type_name: &'static str,
    factory: fn() -> Box<dyn Object>,
}

fn new_boxed<T: Object + Default>() -> Box<dyn Object> {
    Box::new(T::default())
}

/// Registered types, keyed both ways.
///
/// A type may be registered under several (group, version, kind) triples; the
/// first registration is the one reported by [`TypeRegistry::object_type_meta`].
#[derive(Default)]
pub struct TypeRegistry {
    gvk_to_type: HashMap<GroupVersionKind, KnownType>,
    type_to_gvk: HashMap<TypeId, Vec<GroupVersionKind>>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its default kind.
    pub fn add_known_type<T: Object + Default>(&mut self, group: &str, version: &str) -> Result<()> {
        self.add_known_type_with_name::<T>(group, version, T::default_kind())
    }

    /// Register `T` under an explicit kind.
    ///
    /// Fails with [`Error::DuplicateKind`] if the triple already maps to
    /// another type, or if `T` already has another kind in this
    /// (group, version). Registering the same mapping again is a no-op.
    pub fn add_known_type_with_name<T: Object + Default>(
        &mut self,
        group: &str,
        version: &str,
        kind: &str,
    ) -> Result<()> {
        let gvk = GroupVersionKind::new(group, version, kind);
        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        if let Some(existing) = self.gvk_to_type.get(&gvk) {
            if existing.type_id == type_id {
                return Ok(());
            }
            return Err(Error::DuplicateKind {
                gvk,
                existing: existing.type_name.to_string(),
                new: type_name.to_string(),
            });
        }

        let same_version = self
            .type_to_gvk
            .get(&type_id)
            .and_then(|kinds| kinds.iter().find(|k| k.group == group && k.version == version));
        if let Some(other) = same_version {
            return Err(Error::DuplicateKind {
                gvk,
                existing: format!("{type_name} (kind {})", other.kind),
                new: format!("{type_name} (kind {kind})"),
            });
        }

        log::debug!("registered {type_name} as {gvk}");
        self.type_to_gvk.entry(type_id).or_default().push(gvk.clone());
        self.gvk_to_type.insert(
            gvk,
            KnownType {
                type_id,
                type_name,
                factory: new_boxed::<T>,
            },
        );
        Ok(())
    }

    /// Zero value of the type registered under `gvk`.
    pub fn new_object(&self, gvk: &GroupVersionKind) -> Result<Box<dyn Object>> {
        match self.gvk_to_type.get(gvk) {
            Some(known) => Ok((known.factory)()),
            None => Err(Error::UnknownKind { gvk: gvk.clone() }),
        }
    }

    /// First (group, version, kind) the object's type was registered under.
    pub fn object_type_meta(&self, obj: &dyn Object) -> Result<&GroupVersionKind> {
        self.object_kinds(obj)?
            .first()
            .ok_or_else(|| not_registered(obj))
    }

    /// Every (group, version, kind) the object's type was registered under.
    pub fn object_kinds(&self, obj: &dyn Object) -> Result<&[GroupVersionKind]> {
        self.kinds_of(Any::type_id(obj.as_any()))
            .ok_or_else(|| not_registered(obj))
    }

    pub fn kinds_of(&self, type_id: TypeId) -> Option<&[GroupVersionKind]> {
        self.type_to_gvk
            .get(&type_id)
            .filter(|kinds| !kinds.is_empty())
            .map(Vec::as_slice)
    }

    /// Registration of `type_id` inside a given (group, version).
    pub fn kind_in(&self, type_id: TypeId, group: &str, version: &str) -> Option<&GroupVersionKind> {
        self.kinds_of(type_id)?
            .iter()
            .find(|k| k.group == group && k.version == version)
    }

    /// Version of the first registration of `type_id`.
    pub fn version_of(&self, type_id: TypeId) -> Option<&str> {
        self.kinds_of(type_id)?.first().map(|k| k.version.as_str())
    }

    pub fn is_registered(&self, type_id: TypeId) -> bool {
        self.kinds_of(type_id).is_some()
    }

    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.gvk_to_type.contains_key(gvk)
    }

    /// Kind names registered for (group, version).
    pub fn known_types(&self, group: &str, version: &str) -> BTreeSet<String> {
        self.gvk_to_type
            .keys()
            .filter(|k| k.group == group && k.version == version)
            .map(|k| k.kind.clone())
            .collect()
    }

    /// Every registered (group, version, kind), sorted.
    pub fn all_kinds(&self) -> BTreeSet<GroupVersionKind> {
        self.gvk_to_type.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.gvk_to_type.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gvk_to_type.is_empty()
    }
}

fn not_registered(obj: &dyn Object) -> Error {
    Error::NotRegistered {
        type_name: obj.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Reflect, TypeMeta};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize, Reflect, Object)]
    struct Alpha {
        #[serde(flatten)]
        type_meta: TypeMeta,
    }

    #[derive(Debug, Default, Serialize, Deserialize, Reflect, Object)]
    #[scheme(kind = "Gamma")]
    struct Beta {
        #[serde(flatten)]
        type_meta: TypeMeta,
        value: u32,
    }

    #[test]
    fn test_register_and_create() {
        let mut registry = TypeRegistry::new();
        registry.add_known_type::<Alpha>("g", "v1").expect("register");
        registry.add_known_type::<Beta>("g", "v1").expect("register");

        let gvk = GroupVersionKind::new("g", "v1", "Gamma");
        assert!(registry.recognizes(&gvk));
        let obj = registry.new_object(&gvk).expect("new");
        assert!(obj.is::<Beta>());

        let known = registry.known_types("g", "v1");
        assert_eq!(known.into_iter().collect::<Vec<_>>(), vec!["Alpha", "Gamma"]);
        assert!(registry.known_types("g", "v2").is_empty());
    }

    #[test]
    fn test_unknown_kind() {
        let registry = TypeRegistry::new();
        let err = registry
            .new_object(&GroupVersionKind::new("g", "v1", "Nope"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownKind { .. }));
    }

    #[test]
    fn test_duplicate_kind_with_other_type() {
        let mut registry = TypeRegistry::new();
        registry
            .add_known_type_with_name::<Alpha>("g", "v1", "Thing")
            .expect("register");
        let err = registry
            .add_known_type_with_name::<Beta>("g", "v1", "Thing")
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKind { .. }));
        assert!(err.is_registration_conflict());
        let obj = registry
            .new_object(&GroupVersionKind::new("g", "v1", "Thing"))
            .expect("new");
        assert!(obj.is::<Alpha>());
    }

    #[test]
    fn test_identical_registration_is_idempotent() {
        let mut registry = TypeRegistry::new();
        registry.add_known_type::<Alpha>("g", "v1").expect("first");
        registry.add_known_type::<Alpha>("g", "v1").expect("second");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.kinds_of(TypeId::of::<Alpha>()).map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_same_type_two_kinds_in_one_version() {
        let mut registry = TypeRegistry::new();
        registry
            .add_known_type_with_name::<Alpha>("g", "v1", "One")
            .expect("register");
        let err = registry
            .add_known_type_with_name::<Alpha>("g", "v1", "Two")
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKind { .. }));
    }

    #[test]
    fn test_object_type_meta_first_registration() {
        let mut registry = TypeRegistry::new();
        registry.add_known_type::<Alpha>("g", "").expect("internal");
        registry.add_known_type::<Alpha>("other", "v1").expect("other group");

        let obj = Alpha::default();
        let gvk = registry.object_type_meta(&obj).expect("meta");
        assert_eq!(gvk, &GroupVersionKind::new("g", "", "Alpha"));
        assert_eq!(registry.object_kinds(&obj).map(<[_]>::len).ok(), Some(2));
        assert_eq!(registry.version_of(TypeId::of::<Alpha>()), Some(""));
        assert!(registry
            .kind_in(TypeId::of::<Alpha>(), "other", "v1")
            .is_some());
    }

    #[test]
    fn test_unregistered_object() {
        let registry = TypeRegistry::new();
        let err = registry.object_type_meta(&Beta::default()).unwrap_err();
        assert!(matches!(err, Error::NotRegistered { .. }));
        assert!(err.is_not_registered());
    }
}
