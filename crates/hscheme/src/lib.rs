// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hscheme - Versioned object scheme
//!
//! A runtime registry of API types with their (group, version, kind), and the
//! machinery to move objects between an internal canonical representation and
//! any number of external wire versions.
//!
//! ## Quick Start
//!
//! ```rust
//! use hscheme::{Object, Reflect, Result, Scheme, TypeMeta};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
//! struct Widget {
//!     #[serde(flatten)]
//!     type_meta: TypeMeta,
//!     name: String,
//! }
//!
//! mod v1 {
//!     use hscheme::{Object, Reflect, TypeMeta};
//!     use serde::{Deserialize, Serialize};
//!
//!     #[derive(Debug, Default, Serialize, Deserialize, Reflect, Object)]
//!     #[scheme(kind = "Widget")]
//!     pub struct Widget {
//!         #[serde(flatten)]
//!         pub type_meta: TypeMeta,
//!         pub name: String,
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let mut scheme = Scheme::new("");
//!     scheme.add_known_type::<Widget>("demo", "")?;
//!     scheme.add_known_type::<v1::Widget>("demo", "v1")?;
//!
//!     let mut widget = Widget { name: "w".into(), ..Default::default() };
//!     let data = scheme.encode_to_version(&mut widget, "v1")?;
//!     let decoded = scheme.decode(&data)?;
//!     assert_eq!(decoded.downcast_ref::<Widget>(), Some(&widget));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |   Codec: decode / decode_into / encode_to_version / Codec          |
//! +---------------------------------------------------------------------+
//! |   Scheme: TypeRegistry | MetaFactory | Defaulter                   |
//! +---------------------------------------------------------------------+
//! |   Engines: Converter + Scope | Cloner                               |
//! +---------------------------------------------------------------------+
//! |   Reflection: Reflect | Struct | Walker  (derive: hscheme-codegen) |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Scheme`] | Registry, engines and meta factory; built once, shared via `Arc` |
//! | [`ConversionFunc`] | Custom conversion for one ordered pair of types |
//! | [`Scope`] | Context of a running conversion, passed to custom functions |
//! | [`DefaultRestMapper`] | Resource name to kind, kind to scope |
//! | [`SchemeConfig`] | TOML configuration for schemes and mappers |
//!
//! Conversions always go through the canonical version: external versions
//! convert to and from it, never to each other.

// Allow the derive macros to work inside this crate
extern crate self as hscheme;

/// Wire codec (decode, decode into, encode to version).
pub mod codec;
/// Scheme and mapper configuration (TOML).
pub mod config;
/// Conversion engine (converter, scope, conversion functions).
pub mod conversion;
/// Deep copy engine.
pub mod deep_copy;
/// Defaulting functions for decoded objects.
pub mod defaults;
/// Error taxonomy.
pub mod error;
/// Resource name and scope mapping.
pub mod mapper;
/// Type metadata and the meta factory.
pub mod meta;
/// Registrable top-level objects.
pub mod object;
/// Structural reflection used by the engines.
pub mod reflect;
/// Type registry.
pub mod registry;
/// The scheme.
pub mod scheme;

pub use codec::Codec;
pub use config::{ConfigError, GroupConfig, MetaFieldsConfig, SchemeConfig};
pub use conversion::{ConversionFunc, Converter, FieldMatchingFlags, Meta, Scope, UNKNOWN_VERSION};
pub use deep_copy::{Cloner, DeepCopyFunc};
pub use defaults::{Defaulter, DefaultingFunc};
pub use error::{Error, Result};
pub use mapper::{DefaultRestMapper, RestMappers, RestMapping, RestScope};
pub use meta::{GroupVersionKind, MetaFactory, SimpleMetaFactory, TypeMeta};
pub use object::Object; // Trait (for type bounds)
pub use reflect::{PathSegment, Reflect, ReflectMut, ReflectRef, Struct, Walker};
pub use registry::TypeRegistry;
pub use scheme::Scheme;

pub use hscheme_codegen::{Object, Reflect}; // Derive macros (#[derive(hscheme::Reflect, hscheme::Object)])

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
