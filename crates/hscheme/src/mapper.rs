// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resource mapping: resource names to kinds, and kinds to scopes.
//!
//! Routing layers address objects by resource name (`hellos`, `namespaces`).
//! A [`DefaultRestMapper`] knows, for one group, which kind each resource
//! name denotes and whether that kind lives at the root or inside a
//! namespace. [`RestMappers`] keeps one mapper per group.

use crate::config::SchemeConfig;
use crate::error::{Error, Result};
use crate::meta::GroupVersionKind;
use crate::scheme::Scheme;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Where objects of a kind live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestScope {
    /// Cluster-wide, addressed without a namespace
    Root,
    /// Addressed inside a namespace
    Namespace,
}

impl RestScope {
    pub fn name(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Namespace => "namespace",
        }
    }

    /// Path parameter carrying the namespace, if any.
    pub fn param_name(self) -> Option<&'static str> {
        match self {
            Self::Root => None,
            Self::Namespace => Some("namespaces"),
        }
    }
}

impl fmt::Display for RestScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a router needs to serve a kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestMapping {
    pub resource: String,
    pub gvk: GroupVersionKind,
    pub scope: RestScope,
}

/// Plural and singular resource names of a kind.
///
/// `mixed_case` only lowers the first letter (`ReplicationController` becomes
/// `replicationController`), otherwise the whole kind is lowered.
pub fn kind_to_resource(kind: &str, mixed_case: bool) -> (String, String) {
    if kind.is_empty() {
        return (String::new(), String::new());
    }
    let singular = if mixed_case {
        let mut chars = kind.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        kind.to_lowercase()
    };
    let plural = if singular.ends_with('s') {
        format!("{singular}es")
    } else if let Some(stem) = singular.strip_suffix('y') {
        format!("{stem}ies")
    } else {
        format!("{singular}s")
    };
    (plural, singular)
}

/// Resource mapper for one group.
#[derive(Debug, Clone, Default)]
pub struct DefaultRestMapper {
    group: String,
    versions: Vec<String>,
    /// resource name -> (group, version, kind), first version wins
    mapping: HashMap<String, GroupVersionKind>,
    /// (group, version, kind) -> plural resource name
    reverse: HashMap<GroupVersionKind, String>,
    /// kind -> scope
    scopes: HashMap<String, RestScope>,
}

impl DefaultRestMapper {
    /// Empty mapper; `versions` is the preference order for lookups.
    pub fn new(group: &str, versions: &[&str]) -> Self {
        Self {
            group: group.to_string(),
            versions: versions.iter().map(|v| (*v).to_string()).collect(),
            ..Self::default()
        }
    }

    /// Mapper covering every kind the scheme knows in `group` for `versions`.
    ///
    /// Kinds in `root_scoped` map to [`RestScope::Root`], `ignored` kinds are
    /// left out, everything else is namespaced.
    pub fn from_scheme(
        scheme: &Scheme,
        group: &str,
        versions: &[&str],
        root_scoped: &[&str],
        ignored: &[&str],
    ) -> Result<Self> {
        let mut mapper = Self::new(group, versions);
        for version in versions {
            for kind in scheme.known_types(group, version) {
                if ignored.contains(&kind.as_str()) {
                    continue;
                }
                let scope = if root_scoped.contains(&kind.as_str()) {
                    RestScope::Root
                } else {
                    RestScope::Namespace
                };
                mapper.add(scope, &kind, version, false)?;
            }
        }
        log::debug!(
            "rest mapper for group {group:?}: {} resources",
            mapper.mapping.len()
        );
        Ok(mapper)
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Map a kind of `version` under its plural and singular resource names.
    /// With `mixed_case` the lowercase forms are mapped as well.
    ///
    /// A resource name already mapped to a different kind, or a kind already
    /// mapped with a different scope, is [`Error::DuplicateResource`]. The
    /// same kind added for another version keeps the first version's mapping.
    pub fn add(&mut self, scope: RestScope, kind: &str, version: &str, mixed_case: bool) -> Result<()> {
        let gvk = GroupVersionKind::new(&self.group, version, kind);
        let (plural, singular) = kind_to_resource(kind, mixed_case);

        if let Some(existing) = self.scopes.get(kind) {
            if *existing != scope {
                return Err(Error::DuplicateResource {
                    resource: plural,
                    existing: format!("{kind} ({existing})"),
                    new: format!("{kind} ({scope})"),
                });
            }
        }
        // Mixed-case names are also served in lowercase
        let mut resources = vec![plural.clone(), singular];
        for i in 0..resources.len() {
            let lower = resources[i].to_lowercase();
            if !resources.contains(&lower) {
                resources.push(lower);
            }
        }
        for resource in &resources {
            if let Some(existing) = self.mapping.get(resource) {
                if existing.kind != kind {
                    return Err(Error::DuplicateResource {
                        resource: resource.clone(),
                        existing: existing.kind.clone(),
                        new: kind.to_string(),
                    });
                }
            }
        }

        for resource in resources {
            self.mapping.entry(resource).or_insert_with(|| gvk.clone());
        }
        self.reverse.insert(gvk, plural);
        self.scopes.insert(kind.to_string(), scope);
        Ok(())
    }

    /// Kind served under a resource name (plural or singular, any case).
    pub fn kind_for(&self, resource: &str) -> Result<GroupVersionKind> {
        self.mapping
            .get(resource)
            .or_else(|| self.mapping.get(&resource.to_lowercase()))
            .cloned()
            .ok_or_else(|| Error::UnknownResource {
                resource: resource.to_string(),
            })
    }

    pub fn scope_for(&self, kind: &str) -> Result<RestScope> {
        self.scopes.get(kind).copied().ok_or_else(|| Error::UnknownKind {
            gvk: GroupVersionKind::new(&self.group, "", kind),
        })
    }

    /// Plural resource name of a kind, in the preferred version.
    pub fn resource_for(&self, kind: &str) -> Result<String> {
        self.rest_mapping(kind).map(|m| m.resource)
    }

    /// Mapping of a kind in the first preferred version that has it.
    pub fn rest_mapping(&self, kind: &str) -> Result<RestMapping> {
        let scope = self.scope_for(kind)?;
        self.versions
            .iter()
            .find_map(|version| {
                let gvk = GroupVersionKind::new(&self.group, version, kind);
                self.reverse.get(&gvk).map(|resource| RestMapping {
                    resource: resource.clone(),
                    gvk,
                    scope,
                })
            })
            .ok_or_else(|| Error::UnknownKind {
                gvk: GroupVersionKind::new(&self.group, "", kind),
            })
    }

    /// Resource names and kinds, sorted by resource.
    pub fn resources(&self) -> BTreeMap<&str, &GroupVersionKind> {
        self.mapping.iter().map(|(r, gvk)| (r.as_str(), gvk)).collect()
    }
}

/// One resource mapper per group.
#[derive(Debug, Clone, Default)]
pub struct RestMappers {
    mappers: HashMap<String, DefaultRestMapper>,
}

impl RestMappers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mappers for every group of the configuration.
    pub fn from_config(scheme: &Scheme, config: &SchemeConfig) -> Result<Self> {
        let mut mappers = Self::new();
        for group in &config.groups {
            let versions: Vec<&str> = group.versions.iter().map(String::as_str).collect();
            let root: Vec<&str> = group.root_scoped_kinds.iter().map(String::as_str).collect();
            let ignored: Vec<&str> = group.ignored_kinds.iter().map(String::as_str).collect();
            let mapper = DefaultRestMapper::from_scheme(scheme, &group.name, &versions, &root, &ignored)?;
            mappers.register(mapper)?;
        }
        Ok(mappers)
    }

    /// Register a mapper under its group; one mapper per group.
    pub fn register(&mut self, mapper: DefaultRestMapper) -> Result<()> {
        if self.mappers.contains_key(mapper.group()) {
            return Err(Error::DuplicateRestMapper {
                group: mapper.group().to_string(),
            });
        }
        self.mappers.insert(mapper.group().to_string(), mapper);
        Ok(())
    }

    pub fn get(&self, group: &str) -> Result<&DefaultRestMapper> {
        self.mappers.get(group).ok_or_else(|| Error::NoRestMapper {
            group: group.to_string(),
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.mappers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_resource() {
        assert_eq!(
            kind_to_resource("Hello", false),
            ("hellos".to_string(), "hello".to_string())
        );
        assert_eq!(
            kind_to_resource("Status", false),
            ("statuses".to_string(), "status".to_string())
        );
        assert_eq!(
            kind_to_resource("Policy", false),
            ("policies".to_string(), "policy".to_string())
        );
        assert_eq!(
            kind_to_resource("ReplicationController", true),
            (
                "replicationControllers".to_string(),
                "replicationController".to_string()
            )
        );
        assert_eq!(kind_to_resource("", false), (String::new(), String::new()));
    }

    #[test]
    fn test_add_and_lookup() {
        let mut mapper = DefaultRestMapper::new("experimental", &["v1"]);
        mapper
            .add(RestScope::Namespace, "Hello", "v1", false)
            .expect("add");
        mapper
            .add(RestScope::Root, "Namespace", "v1", false)
            .expect("add");

        let gvk = mapper.kind_for("hellos").expect("plural");
        assert_eq!(gvk, GroupVersionKind::new("experimental", "v1", "Hello"));
        assert_eq!(mapper.kind_for("hello").expect("singular"), gvk);
        assert_eq!(mapper.kind_for("Hellos").expect("case"), gvk);
        assert_eq!(mapper.scope_for("Hello").expect("scope"), RestScope::Namespace);
        assert_eq!(mapper.scope_for("Namespace").expect("scope"), RestScope::Root);
        assert_eq!(mapper.resource_for("Namespace").expect("resource"), "namespaces");
        assert!(matches!(
            mapper.kind_for("widgets"),
            Err(Error::UnknownResource { .. })
        ));
        assert!(matches!(mapper.scope_for("Widget"), Err(Error::UnknownKind { .. })));
    }

    #[test]
    fn test_mixed_case_names_resolve_in_lowercase() {
        let mut mapper = DefaultRestMapper::new("core", &["v1"]);
        mapper
            .add(RestScope::Namespace, "ReplicationController", "v1", true)
            .expect("add");

        let gvk = GroupVersionKind::new("core", "v1", "ReplicationController");
        for resource in [
            "replicationControllers",
            "replicationController",
            "replicationcontrollers",
            "replicationcontroller",
            "ReplicationControllers",
        ] {
            assert_eq!(mapper.kind_for(resource).expect(resource), gvk);
        }
        assert_eq!(
            mapper.resource_for("ReplicationController").expect("resource"),
            "replicationControllers"
        );

        let err = mapper
            .add(RestScope::Namespace, "Replicationcontroller", "v1", false)
            .unwrap_err();
        match err {
            Error::DuplicateResource { resource, existing, .. } => {
                assert_eq!(resource, "replicationcontrollers");
                assert_eq!(existing, "ReplicationController");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_version_wins() {
        let mut mapper = DefaultRestMapper::new("g", &["v2", "v1"]);
        mapper.add(RestScope::Namespace, "Thing", "v2", false).expect("v2");
        mapper.add(RestScope::Namespace, "Thing", "v1", false).expect("v1");
        assert_eq!(mapper.kind_for("things").expect("kind").version, "v2");
        let mapping = mapper.rest_mapping("Thing").expect("mapping");
        assert_eq!(mapping.gvk.version, "v2");
        assert_eq!(mapping.scope.param_name(), Some("namespaces"));
    }

    #[test]
    fn test_conflicting_mappings() {
        let mut mapper = DefaultRestMapper::new("g", &["v1"]);
        mapper.add(RestScope::Namespace, "Thing", "v1", false).expect("add");
        let err = mapper
            .add(RestScope::Root, "Thing", "v1", false)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateResource { .. }));

        // Lower-cased, THING claims the resource names of Thing.
        let err = mapper
            .add(RestScope::Namespace, "THING", "v1", false)
            .unwrap_err();
        assert!(err.is_registration_conflict());
    }

    #[test]
    fn test_mapper_registry() {
        let mut mappers = RestMappers::new();
        mappers
            .register(DefaultRestMapper::new("g", &["v1"]))
            .expect("register");
        assert!(mappers.get("g").is_ok());
        assert!(matches!(mappers.get("h"), Err(Error::NoRestMapper { .. })));
        assert!(matches!(
            mappers.register(DefaultRestMapper::new("g", &["v2"])),
            Err(Error::DuplicateRestMapper { .. })
        ));
        assert_eq!(mappers.groups().collect::<Vec<_>>(), vec!["g"]);
    }
}
