// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type metadata: the (group, version, kind) triple carried on the wire and
//! the factory that reads it from payloads and writes it into objects.

use crate::error::{Error, Result};
use crate::reflect::{ReflectMut, ReflectRef, Struct};
use crate::Reflect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Embedded type metadata of every registered object.
///
/// Blank on every in-memory object handed out by the codec; only set while an
/// object is being marshalled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct TypeMeta {
    #[serde(rename = "apiGroup", skip_serializing_if = "String::is_empty")]
    pub api_group: String,
    #[serde(rename = "apiVersion", skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl TypeMeta {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            api_group: group.to_string(),
            api_version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.api_group.is_empty() && self.api_version.is_empty() && self.kind.is_empty()
    }

    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::new(&self.api_group, &self.api_version, &self.kind)
    }
}

impl From<&GroupVersionKind> for TypeMeta {
    fn from(gvk: &GroupVersionKind) -> Self {
        Self::new(&gvk.group, &gvk.version, &gvk.kind)
    }
}

/// Registry key of a concrete type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: &str, version: &str, kind: &str) -> Self {
        Self {
            group: group.to_string(),
            version: version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Same group and kind, another version.
    pub fn with_version(&self, version: &str) -> Self {
        Self {
            group: self.group.clone(),
            version: version.to_string(),
            kind: self.kind.clone(),
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}

// ----------------------------------------------------------------------------
// MetaFactory
// ----------------------------------------------------------------------------

/// Reads envelope metadata from payloads and writes it into objects.
pub trait MetaFactory: Send + Sync {
    /// Extract (group, version, kind) from a wire payload.
    ///
    /// Missing keys yield empty strings; only an unparsable payload fails.
    fn interpret(&self, data: &[u8]) -> Result<TypeMeta>;

    /// Write `meta` into the object's type-metadata fields.
    fn update(&self, meta: &TypeMeta, obj: &mut dyn Struct) -> Result<()>;
}

/// Envelope view of a payload; every other key is skipped.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "apiGroup", default)]
    api_group: String,
    #[serde(rename = "apiVersion", default)]
    api_version: String,
    #[serde(default)]
    kind: String,
}

/// Field-name driven [`MetaFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleMetaFactory {
    /// Name of the group field (optional on objects)
    pub group_field: String,
    /// Name of the version field (optional on objects)
    pub version_field: String,
    /// Name of the kind field (mandatory on objects)
    pub kind_field: String,
    /// Embedded structs searched for the fields, first match wins
    pub base_fields: Vec<String>,
}

impl Default for SimpleMetaFactory {
    fn default() -> Self {
        Self {
            group_field: "api_group".to_string(),
            version_field: "api_version".to_string(),
            kind_field: "kind".to_string(),
            base_fields: vec!["type_meta".to_string()],
        }
    }
}

impl SimpleMetaFactory {
    /// Locate the struct holding the metadata fields: an embedded base field
    /// when one exists, otherwise the object itself.
    fn target<'a>(&self, obj: &'a mut dyn Struct) -> Result<&'a mut dyn Struct> {
        let base = self.base_fields.iter().find(|name| {
            matches!(
                obj.field(name).map(Reflect::reflect_ref),
                Some(ReflectRef::Struct(_))
            )
        });
        let Some(base) = base else {
            return Ok(obj);
        };
        let type_name = obj.type_name();
        match obj.field_mut(base).map(Reflect::reflect_mut) {
            Some(ReflectMut::Struct(inner)) => Ok(inner),
            _ => Err(Error::FieldNotFound {
                field: base.clone(),
                type_name: type_name.to_string(),
            }),
        }
    }
}

fn string_field<'a>(obj: &'a mut dyn Struct, name: &str) -> Option<&'a mut String> {
    obj.field_mut(name)
        .and_then(|field| field.as_any_mut().downcast_mut::<String>())
}

impl MetaFactory for SimpleMetaFactory {
    fn interpret(&self, data: &[u8]) -> Result<TypeMeta> {
        let envelope: Envelope =
            serde_json::from_slice(data).map_err(|source| Error::MalformedEnvelope { source })?;
        Ok(TypeMeta {
            api_group: envelope.api_group,
            api_version: envelope.api_version,
            kind: envelope.kind,
        })
    }

    fn update(&self, meta: &TypeMeta, obj: &mut dyn Struct) -> Result<()> {
        let target = self.target(obj)?;
        let type_name = target.type_name();

        let Some(kind) = string_field(target, &self.kind_field) else {
            return Err(Error::FieldNotFound {
                field: self.kind_field.clone(),
                type_name: type_name.to_string(),
            });
        };
        kind.clone_from(&meta.kind);

        if let Some(version) = string_field(target, &self.version_field) {
            version.clone_from(&meta.api_version);
        }
        if let Some(group) = string_field(target, &self.group_field) {
            group.clone_from(&meta.api_group);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Reflect)]
    struct Embedded {
        type_meta: TypeMeta,
        name: String,
    }

    #[derive(Debug, Default, Reflect)]
    struct Flat {
        api_version: String,
        kind: String,
        value: i32,
    }

    #[derive(Debug, Default, Reflect)]
    struct NoKind {
        api_version: String,
    }

    #[test]
    fn test_interpret_reads_envelope() {
        let factory = SimpleMetaFactory::default();
        let meta = factory
            .interpret(br#"{"apiGroup":"g","apiVersion":"v1","kind":"Widget","spec":{"x":1}}"#)
            .expect("interpret");
        assert_eq!(meta, TypeMeta::new("g", "v1", "Widget"));
    }

    #[test]
    fn test_interpret_missing_keys_are_blank() {
        let factory = SimpleMetaFactory::default();
        let meta = factory.interpret(br#"{"other":true}"#).expect("interpret");
        assert!(meta.is_empty());
    }

    #[test]
    fn test_interpret_malformed() {
        let factory = SimpleMetaFactory::default();
        let err = factory.interpret(b"{not json").unwrap_err();
        assert!(matches!(err, Error::MalformedEnvelope { .. }));
    }

    #[test]
    fn test_update_embedded() {
        let factory = SimpleMetaFactory::default();
        let mut obj = Embedded::default();
        factory
            .update(&TypeMeta::new("g", "v2", "Embedded"), &mut obj)
            .expect("update");
        assert_eq!(obj.type_meta, TypeMeta::new("g", "v2", "Embedded"));

        factory.update(&TypeMeta::default(), &mut obj).expect("reset");
        assert!(obj.type_meta.is_empty());
    }

    #[test]
    fn test_update_flat_without_group_field() {
        let factory = SimpleMetaFactory::default();
        let mut obj = Flat::default();
        factory
            .update(&TypeMeta::new("g", "v1", "Flat"), &mut obj)
            .expect("update");
        assert_eq!(obj.kind, "Flat");
        assert_eq!(obj.api_version, "v1");
        assert_eq!(obj.value, 0);
    }

    #[test]
    fn test_update_requires_kind() {
        let factory = SimpleMetaFactory::default();
        let mut obj = NoKind::default();
        let err = factory
            .update(&TypeMeta::new("g", "v1", "NoKind"), &mut obj)
            .unwrap_err();
        assert!(matches!(err, Error::FieldNotFound { ref field, .. } if field == "kind"));
    }

    #[test]
    fn test_custom_field_names() {
        #[derive(Debug, Default, Reflect)]
        struct Header {
            my_kind: String,
        }
        #[derive(Debug, Default, Reflect)]
        struct Custom {
            header: Header,
        }

        let factory = SimpleMetaFactory {
            group_field: "my_group".into(),
            version_field: "my_version".into(),
            kind_field: "my_kind".into(),
            base_fields: vec!["missing".into(), "header".into()],
        };
        let mut obj = Custom::default();
        factory
            .update(&TypeMeta::new("g", "v1", "Custom"), &mut obj)
            .expect("update");
        assert_eq!(obj.header.my_kind, "Custom");
    }

    #[test]
    fn test_gvk_display() {
        let gvk = GroupVersionKind::new("experimental", "v1", "Hello");
        assert_eq!(gvk.to_string(), "experimental/v1, Kind=Hello");
        assert_eq!(gvk.with_version("").version, "");
    }
}
