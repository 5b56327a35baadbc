// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scheme configuration.
//!
//! Supports both programmatic and file-based configuration. A file looks
//! like:
//!
//! ```toml
//! internal_version = ""
//!
//! [meta]
//! kind_field = "kind"
//! base_fields = ["type_meta"]
//!
//! [[groups]]
//! name = "experimental"
//! versions = ["v1"]
//! root_scoped_kinds = ["Namespace"]
//! ignored_kinds = ["Status"]
//! ```

use crate::meta::SimpleMetaFactory;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Scheme configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// Canonical (hub) version; empty by convention.
    #[serde(default)]
    pub internal_version: String,

    /// Names of the type-metadata fields on objects.
    #[serde(default)]
    pub meta: MetaFieldsConfig,

    /// API groups served through resource mappers.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

/// Field names the meta factory reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaFieldsConfig {
    #[serde(default = "default_group_field")]
    pub group_field: String,

    #[serde(default = "default_version_field")]
    pub version_field: String,

    #[serde(default = "default_kind_field")]
    pub kind_field: String,

    /// Embedded structs searched for the fields, in order.
    #[serde(default = "default_base_fields")]
    pub base_fields: Vec<String>,
}

fn default_group_field() -> String {
    "api_group".to_string()
}

fn default_version_field() -> String {
    "api_version".to_string()
}

fn default_kind_field() -> String {
    "kind".to_string()
}

fn default_base_fields() -> Vec<String> {
    vec!["type_meta".to_string()]
}

impl Default for MetaFieldsConfig {
    fn default() -> Self {
        Self {
            group_field: default_group_field(),
            version_field: default_version_field(),
            kind_field: default_kind_field(),
            base_fields: default_base_fields(),
        }
    }
}

impl From<&MetaFieldsConfig> for SimpleMetaFactory {
    fn from(config: &MetaFieldsConfig) -> Self {
        Self {
            group_field: config.group_field.clone(),
            version_field: config.version_field.clone(),
            kind_field: config.kind_field.clone(),
            base_fields: config.base_fields.clone(),
        }
    }
}

/// One API group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    pub name: String,

    /// External versions, preferred first.
    pub versions: Vec<String>,

    /// Kinds addressed without a namespace.
    #[serde(default)]
    pub root_scoped_kinds: Vec<String>,

    /// Kinds never exposed as resources.
    #[serde(default)]
    pub ignored_kinds: Vec<String>,
}

impl GroupConfig {
    pub fn new(name: impl Into<String>, versions: &[&str]) -> Self {
        Self {
            name: name.into(),
            versions: versions.iter().map(|v| (*v).to_string()).collect(),
            root_scoped_kinds: Vec::new(),
            ignored_kinds: Vec::new(),
        }
    }

    #[must_use]
    pub fn root_scoped(mut self, kind: impl Into<String>) -> Self {
        self.root_scoped_kinds.push(kind.into());
        self
    }

    #[must_use]
    pub fn ignore(mut self, kind: impl Into<String>) -> Self {
        self.ignored_kinds.push(kind.into());
        self
    }
}

impl SchemeConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Add a group.
    pub fn add_group(&mut self, group: GroupConfig) {
        self.groups.push(group);
    }

    pub fn group(&self, name: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.meta.kind_field.is_empty() {
            return Err(ConfigError::Invalid("Empty kind field name".into()));
        }

        let mut names = HashSet::new();
        for (i, group) in self.groups.iter().enumerate() {
            if group.name.is_empty() {
                return Err(ConfigError::Invalid(format!("Group {} has no name", i)));
            }
            if !names.insert(group.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "Group {} is configured twice",
                    group.name
                )));
            }
            if group.versions.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Group {} has no versions",
                    group.name
                )));
            }
            if group.versions.iter().any(|v| *v == self.internal_version) {
                return Err(ConfigError::Invalid(format!(
                    "Group {} lists the internal version {:?} as an external version",
                    group.name, self.internal_version
                )));
            }
            if let Some(kind) = group
                .root_scoped_kinds
                .iter()
                .find(|k| group.ignored_kinds.contains(k))
            {
                return Err(ConfigError::Invalid(format!(
                    "Group {} both roots and ignores kind {}",
                    group.name, kind
                )));
            }
        }

        Ok(())
    }
}
