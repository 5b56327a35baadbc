// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hscheme-experimental - The `experimental` API group
//!
//! Internal and `v1` representations of the group's kinds, registered on an
//! [`hscheme::Scheme`] together with their conversion, deep-copy and
//! defaulting functions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use hscheme::Scheme;
//! use std::sync::Arc;
//!
//! fn main() -> hscheme::Result<()> {
//!     let mut scheme = Scheme::new("");
//!     hscheme_experimental::install(&mut scheme)?;
//!     let mapper = hscheme_experimental::rest_mapper(&scheme)?;
//!     let scheme = Arc::new(scheme);
//!     let codec = scheme.codec_for(hscheme_experimental::v1::VERSION);
//!
//!     let gvk = mapper.kind_for("hellos")?;
//!     let mut hello = scheme.new_object(&gvk.with_version(scheme.internal_version()))?;
//!     let data = codec.encode(hello.as_mut())?;
//!     println!("{}", String::from_utf8_lossy(&data));
//!     Ok(())
//! }
//! ```
//!
//! | Kind | Scope | Resources |
//! |------|-------|-----------|
//! | `Hello` | namespace | `hellos`, `hello` |
//! | `HelloList` | namespace | `hellolists`, `hellolist` |
//! | `Namespace` | root | `namespaces`, `namespace` |
//! | `Status` | - | not exposed |

/// Metadata types shared by every version.
pub mod api;
/// External `v1` representation.
pub mod v1;

mod types;

pub use api::{ListMeta, ObjectMeta, Time};
pub use types::{Hello, HelloList, Namespace, Status};

use hscheme::{DefaultRestMapper, GroupConfig, Result, Scheme};

pub const GROUP: &str = "experimental";

/// Kinds addressed without a namespace.
pub const ROOT_SCOPED_KINDS: &[&str] = &["Namespace"];

/// Kinds never exposed as resources.
pub const IGNORED_KINDS: &[&str] = &["Status"];

/// Register the whole group: internal types under the scheme's internal
/// version, the `v1` types and every function they need.
pub fn install(scheme: &mut Scheme) -> Result<()> {
    let internal = scheme.internal_version().to_string();
    scheme.add_known_type::<Hello>(GROUP, &internal)?;
    scheme.add_known_type::<HelloList>(GROUP, &internal)?;
    scheme.add_known_type::<Namespace>(GROUP, &internal)?;
    scheme.add_known_type::<Status>(GROUP, &internal)?;

    scheme.add_conversion_funcs(api::conversion_funcs())?;
    scheme.add_deep_copy_funcs(api::deep_copy_funcs())?;
    v1::install(scheme)?;

    log::debug!(
        "installed group {GROUP}: {} internal kinds",
        scheme.known_types(GROUP, &internal).len()
    );
    Ok(())
}

/// Resource mapper of the group's external versions.
pub fn rest_mapper(scheme: &Scheme) -> Result<DefaultRestMapper> {
    DefaultRestMapper::from_scheme(scheme, GROUP, &[v1::VERSION], ROOT_SCOPED_KINDS, IGNORED_KINDS)
}

/// Configuration entry equivalent to [`rest_mapper`].
pub fn group_config() -> GroupConfig {
    let mut group = GroupConfig::new(GROUP, &[v1::VERSION]);
    for kind in ROOT_SCOPED_KINDS {
        group = group.root_scoped(*kind);
    }
    for kind in IGNORED_KINDS {
        group = group.ignore(*kind);
    }
    group
}
