// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire codec: tagged JSON envelopes in, canonical objects out, and back.
//!
//! Objects returned by [`Scheme::decode`] and filled by
//! [`Scheme::decode_into`] always carry blank type metadata. The metadata is
//! only set while [`Scheme::encode_to_version`] marshals an object and is
//! reset before it returns, whether marshalling succeeded or not.

use crate::conversion::{FieldMatchingFlags, Meta};
use crate::error::{Error, Result};
use crate::meta::{GroupVersionKind, TypeMeta};
use crate::scheme::Scheme;
use crate::Object;
use std::any::Any;
use std::sync::Arc;

impl Scheme {
    /// Decode a payload into a new object of the canonical version.
    pub fn decode(&self, data: &[u8]) -> Result<Box<dyn Object>> {
        let meta = self.meta_factory.interpret(data)?;
        if meta.api_version.is_empty() && !self.internal_version.is_empty() {
            return Err(Error::missing_version(data));
        }
        if meta.kind.is_empty() {
            return Err(Error::missing_kind(data));
        }
        if meta.api_group.is_empty() {
            return Err(Error::missing_group(data));
        }

        let gvk = meta.gvk();
        let mut obj = self.new_object(&gvk)?;
        obj.decode_json(data)?;
        self.apply_defaults(obj.as_mut());
        self.clear_type_meta(obj.as_mut())?;

        if gvk.version == self.internal_version {
            log::debug!("decoded {gvk}");
            return Ok(obj);
        }

        let mut out = self.new_object(&gvk.with_version(&self.internal_version))?;
        self.converter.convert(
            obj.as_reflect(),
            out.as_reflect_mut(),
            FieldMatchingFlags::DEST_FROM_SOURCE,
            Meta::new(&gvk.version, &self.internal_version),
        )?;
        self.clear_type_meta(out.as_mut())?;
        log::debug!(
            "decoded {gvk} into internal version {:?}",
            self.internal_version
        );
        Ok(out)
    }

    /// Decode a payload into an existing object.
    ///
    /// Envelope fields missing from the payload default to the target's own
    /// registration, so payloads without metadata can be decoded when the
    /// caller knows what they contain.
    pub fn decode_into(&self, data: &[u8], target: &mut dyn Object) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut data_meta = self.meta_factory.interpret(data)?;
        let target_gvk = self.registry.object_type_meta(target)?;

        if data_meta.api_version.is_empty() {
            data_meta.api_version.clone_from(&target_gvk.version);
        }
        if data_meta.kind.is_empty() {
            data_meta.kind.clone_from(&target_gvk.kind);
        }
        if data_meta.api_group.is_empty() {
            data_meta.api_group.clone_from(&target_gvk.group);
        }

        let data_gvk = data_meta.gvk();
        let mut external = self.new_object(&data_gvk)?;
        external.decode_json(data)?;
        self.apply_defaults(external.as_mut());

        self.converter.convert(
            external.as_reflect(),
            target.as_reflect_mut(),
            FieldMatchingFlags::DEST_FROM_SOURCE,
            Meta::new(&data_gvk.version, &target_gvk.version),
        )?;
        self.clear_type_meta(target)?;
        log::debug!("decoded {data_gvk} into {}", target.type_name());
        Ok(())
    }

    /// Encode an object as `dest_version`.
    ///
    /// The object's type metadata is blank again when this returns. When the
    /// object is already of `dest_version` it is marshalled in place, which is
    /// why it is borrowed mutably.
    pub fn encode_to_version(&self, obj: &mut dyn Object, dest_version: &str) -> Result<Vec<u8>> {
        let gvk = match self.registry.object_type_meta(obj) {
            Ok(gvk) => gvk.clone(),
            Err(_) => {
                return Err(Error::UnregisteredType {
                    type_name: obj.type_name().to_string(),
                    version: dest_version.to_string(),
                })
            }
        };

        if gvk.version == dest_version {
            return self.marshal_with_meta(obj, &TypeMeta::from(&gvk));
        }

        let mut out = self.new_object(&gvk.with_version(dest_version))?;
        self.converter.convert(
            obj.as_reflect(),
            out.as_reflect_mut(),
            FieldMatchingFlags::DEST_FROM_SOURCE,
            Meta::new(&gvk.version, dest_version),
        )?;

        let out_gvk = self.output_kind(out.as_ref(), &gvk.group, dest_version)?;
        log::debug!("encoding {gvk} as {out_gvk}");
        self.marshal_with_meta(out.as_mut(), &TypeMeta::from(&out_gvk))
    }

    /// Kind of a converted object, taken from its own registration in the
    /// source group.
    fn output_kind(&self, out: &dyn Object, group: &str, version: &str) -> Result<GroupVersionKind> {
        self.registry
            .kind_in(Any::type_id(out.as_any()), group, version)
            .cloned()
            .ok_or_else(|| Error::NotRegistered {
                type_name: out.type_name().to_string(),
            })
    }

    fn marshal_with_meta(&self, obj: &mut dyn Object, meta: &TypeMeta) -> Result<Vec<u8>> {
        let result = self
            .set_type_meta(meta, obj)
            .and_then(|()| obj.encode_json());
        let reset = self.clear_type_meta(obj);
        let data = result?;
        reset?;
        Ok(data)
    }
}

/// Codec bound to one external version.
#[derive(Debug, Clone)]
pub struct Codec {
    scheme: Arc<Scheme>,
    version: String,
}

impl Codec {
    pub fn new(scheme: Arc<Scheme>, version: &str) -> Self {
        Self {
            scheme,
            version: version.to_string(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn scheme(&self) -> &Arc<Scheme> {
        &self.scheme
    }

    pub fn encode(&self, obj: &mut dyn Object) -> Result<Vec<u8>> {
        self.scheme.encode_to_version(obj, &self.version)
    }

    pub fn decode(&self, data: &[u8]) -> Result<Box<dyn Object>> {
        self.scheme.decode(data)
    }

    pub fn decode_into(&self, data: &[u8], target: &mut dyn Object) -> Result<()> {
        self.scheme.decode_into(data, target)
    }
}

impl Scheme {
    /// Codec encoding to `version`; the scheme must already be shared.
    pub fn codec_for(self: &Arc<Self>, version: &str) -> Codec {
        Codec::new(Arc::clone(self), version)
    }
}
