// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The scheme: registry, engines and meta factory behind one object.
//!
//! Built once at start-up through `&mut Scheme`, then frozen in an `Arc` and
//! shared read-only. The codec operations live in [`crate::codec`].

use crate::config::SchemeConfig;
use crate::conversion::{ConversionFunc, Converter, FieldMatchingFlags, Meta, UNKNOWN_VERSION};
use crate::deep_copy::{Cloner, DeepCopyFunc};
use crate::defaults::{DefaultingFunc, Defaulter};
use crate::error::{Error, Result};
use crate::meta::{GroupVersionKind, MetaFactory, SimpleMetaFactory, TypeMeta};
use crate::registry::TypeRegistry;
use crate::{Object, Reflect};
use std::any::{Any, TypeId};
use std::collections::BTreeSet;
use std::fmt;

/// Versioned object scheme.
pub struct Scheme {
    pub(crate) registry: TypeRegistry,
    pub(crate) converter: Converter,
    pub(crate) cloner: Cloner,
    pub(crate) defaulter: Defaulter,
    pub(crate) meta_factory: Box<dyn MetaFactory>,
    pub(crate) internal_version: String,
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheme")
            .field("internal_version", &self.internal_version)
            .field("known_types", &self.registry.len())
            .field("conversion_funcs", &self.converter.len())
            .finish_non_exhaustive()
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Self::new("")
    }
}

impl Scheme {
    /// Empty scheme whose canonical version is `internal_version`.
    pub fn new(internal_version: &str) -> Self {
        Self {
            registry: TypeRegistry::new(),
            converter: Converter::new(),
            cloner: Cloner::new(),
            defaulter: Defaulter::new(),
            meta_factory: Box::new(SimpleMetaFactory::default()),
            internal_version: internal_version.to_string(),
        }
    }

    /// Empty scheme using the configured canonical version and meta fields.
    pub fn from_config(config: &SchemeConfig) -> Self {
        Self::new(&config.internal_version)
            .with_meta_factory(Box::new(SimpleMetaFactory::from(&config.meta)))
    }

    #[must_use]
    pub fn with_meta_factory(mut self, meta_factory: Box<dyn MetaFactory>) -> Self {
        self.meta_factory = meta_factory;
        self
    }

    pub fn internal_version(&self) -> &str {
        &self.internal_version
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn converter(&self) -> &Converter {
        &self.converter
    }

    pub fn cloner(&self) -> &Cloner {
        &self.cloner
    }

    pub fn meta_factory(&self) -> &dyn MetaFactory {
        self.meta_factory.as_ref()
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    pub fn add_known_type<T: Object + Default>(&mut self, group: &str, version: &str) -> Result<()> {
        self.registry.add_known_type::<T>(group, version)
    }

    pub fn add_known_type_with_name<T: Object + Default>(
        &mut self,
        group: &str,
        version: &str,
        kind: &str,
    ) -> Result<()> {
        self.registry.add_known_type_with_name::<T>(group, version, kind)
    }

    pub fn add_conversion_funcs<I>(&mut self, funcs: I) -> Result<()>
    where
        I: IntoIterator<Item = ConversionFunc>,
    {
        self.converter.add_conversion_funcs(funcs)
    }

    pub fn add_deep_copy_funcs<I>(&mut self, funcs: I) -> Result<()>
    where
        I: IntoIterator<Item = DeepCopyFunc>,
    {
        self.cloner.add_deep_copy_funcs(funcs)
    }

    pub fn add_defaulting_funcs<I>(&mut self, funcs: I) -> Result<()>
    where
        I: IntoIterator<Item = DefaultingFunc>,
    {
        self.defaulter.add_defaulting_funcs(funcs)
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn new_object(&self, gvk: &GroupVersionKind) -> Result<Box<dyn Object>> {
        self.registry.new_object(gvk)
    }

    pub fn object_type_meta(&self, obj: &dyn Object) -> Result<GroupVersionKind> {
        self.registry.object_type_meta(obj).cloned()
    }

    pub fn known_types(&self, group: &str, version: &str) -> BTreeSet<String> {
        self.registry.known_types(group, version)
    }

    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.registry.recognizes(gvk)
    }

    /// Envelope metadata of a payload.
    pub fn data_type_meta(&self, data: &[u8]) -> Result<TypeMeta> {
        self.meta_factory.interpret(data)
    }

    /// Write `meta` into an object's type-metadata fields.
    pub fn set_type_meta(&self, meta: &TypeMeta, obj: &mut dyn Object) -> Result<()> {
        self.meta_factory.update(meta, obj.as_struct_mut())
    }

    /// Blank an object's type-metadata fields.
    pub fn clear_type_meta(&self, obj: &mut dyn Object) -> Result<()> {
        self.set_type_meta(&TypeMeta::default(), obj)
    }

    // ------------------------------------------------------------------------
    // Conversion and copy
    // ------------------------------------------------------------------------

    /// Scope meta for a pair of types; unregistered types report
    /// [`UNKNOWN_VERSION`].
    pub fn conversion_meta(&self, src: TypeId, dst: TypeId) -> Meta {
        Meta::new(
            self.registry.version_of(src).unwrap_or(UNKNOWN_VERSION),
            self.registry.version_of(dst).unwrap_or(UNKNOWN_VERSION),
        )
    }

    /// Convert `src` into `dst`; on error `dst` should be discarded.
    pub fn convert(&self, src: &dyn Reflect, dst: &mut dyn Reflect) -> Result<()> {
        let meta = self.conversion_meta(Any::type_id(src.as_any()), Any::type_id(dst.as_any()));
        log::debug!(
            "converting {} ({:?}) into {} ({:?})",
            src.type_name(),
            meta.src_version,
            dst.type_name(),
            meta.dest_version
        );
        self.converter
            .convert(src, dst, FieldMatchingFlags::DEST_FROM_SOURCE, meta)
    }

    /// Convert an object into a new object of `dest_version` (same group and kind).
    pub fn convert_to_version(&self, obj: &dyn Object, dest_version: &str) -> Result<Box<dyn Object>> {
        let gvk = self
            .registry
            .object_type_meta(obj)
            .map_err(|_| Error::UnregisteredType {
                type_name: obj.type_name().to_string(),
                version: dest_version.to_string(),
            })?
            .clone();
        let mut out = self.new_object(&gvk.with_version(dest_version))?;
        self.converter.convert(
            obj.as_reflect(),
            out.as_reflect_mut(),
            FieldMatchingFlags::DEST_FROM_SOURCE,
            Meta::new(&gvk.version, dest_version),
        )?;
        Ok(out)
    }

    pub fn deep_copy(&self, obj: &dyn Object) -> Result<Box<dyn Object>> {
        self.cloner.deep_copy(obj)
    }

    pub(crate) fn apply_defaults(&self, obj: &mut dyn Object) {
        self.defaulter.apply(obj.as_reflect_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, crate::Reflect, crate::Object)]
    struct Internal {
        #[serde(flatten)]
        type_meta: TypeMeta,
        text: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, crate::Reflect, crate::Object)]
    #[scheme(kind = "Internal")]
    struct External {
        #[serde(flatten)]
        type_meta: TypeMeta,
        text: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, crate::Reflect)]
    struct Loose {
        text: String,
    }

    fn scheme() -> Scheme {
        let mut scheme = Scheme::new("");
        scheme.add_known_type::<Internal>("g", "").expect("internal");
        scheme.add_known_type::<External>("g", "v1").expect("external");
        scheme
    }

    #[test]
    fn test_convert_reports_versions() {
        let mut scheme = scheme();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = Arc::clone(&seen);
        scheme
            .add_conversion_funcs([ConversionFunc::new(
                move |src: &External, dst: &mut Internal, scope| {
                    if let Ok(mut seen) = record.lock() {
                        seen.push(scope.meta().clone());
                    }
                    dst.text.clone_from(&src.text);
                    Ok(())
                },
            )])
            .expect("register");

        let mut out = Internal::default();
        scheme
            .convert(
                &External {
                    text: "x".into(),
                    ..Default::default()
                },
                &mut out,
            )
            .expect("convert");
        assert_eq!(out.text, "x");
        let seen = seen.lock().expect("lock");
        assert_eq!(seen.as_slice(), &[Meta::new("v1", "")]);
    }

    #[test]
    fn test_unregistered_types_report_unknown_version() {
        let scheme = scheme();
        let meta = scheme.conversion_meta(TypeId::of::<Loose>(), TypeId::of::<Internal>());
        assert_eq!(meta, Meta::new(UNKNOWN_VERSION, ""));

        let mut out = Loose::default();
        scheme
            .convert(
                &Internal {
                    text: "t".into(),
                    ..Default::default()
                },
                &mut out,
            )
            .expect("convert");
        assert_eq!(out.text, "t");
    }

    #[test]
    fn test_convert_to_version() {
        let scheme = scheme();
        let out = scheme
            .convert_to_version(
                &Internal {
                    text: "hi".into(),
                    ..Default::default()
                },
                "v1",
            )
            .expect("convert");
        let out = out.downcast::<External>().expect("external");
        assert_eq!(out.text, "hi");

        let err = scheme.convert_to_version(&External::default(), "v9").unwrap_err();
        assert!(matches!(err, Error::UnknownKind { .. }));
    }

    #[test]
    fn test_set_and_clear_type_meta() {
        let scheme = scheme();
        let mut obj = Internal::default();
        scheme
            .set_type_meta(&TypeMeta::new("g", "v1", "Internal"), &mut obj)
            .expect("set");
        assert_eq!(obj.type_meta.kind, "Internal");
        scheme.clear_type_meta(&mut obj).expect("clear");
        assert!(obj.type_meta.is_empty());
    }
}
