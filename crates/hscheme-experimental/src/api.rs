// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Metadata types shared by every version of the group.

use chrono::{DateTime, Utc};
use hscheme::{ConversionFunc, DeepCopyFunc, Reflect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Timestamp written on the wire as RFC 3339. Fractional seconds appear
/// only when non-zero and survive a round trip.
///
/// Opaque to reflection: conversions and deep copies go through the
/// functions returned by [`conversion_funcs`] and [`deep_copy_funcs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(pub DateTime<Utc>);

hscheme::impl_reflect_opaque!(Time);

impl Time {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Seconds since the Unix epoch; `None` when out of range.
    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(Self)
    }

    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Metadata of every persisted object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uid: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<Time>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl ObjectMeta {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// Metadata of list objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[serde(default, rename_all = "camelCase")]
pub struct ListMeta {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub self_link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_version: String,
}

/// Timestamps are copied by value in every conversion.
pub fn conversion_funcs() -> Vec<ConversionFunc> {
    vec![ConversionFunc::new(|src: &Time, dst: &mut Time, _scope| {
        *dst = *src;
        Ok(())
    })]
}

pub fn deep_copy_funcs() -> Vec<DeepCopyFunc> {
    vec![DeepCopyFunc::new(|src: &Time, dst: &mut Time, _cloner| {
        *dst = *src;
        Ok(())
    })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use hscheme::{Cloner, Converter, Error, FieldMatchingFlags, Meta};

    #[test]
    fn test_time_wire_format() {
        let time = Time::from_unix(1_700_000_000).expect("time");
        let json = serde_json::to_string(&time).expect("serialize");
        assert_eq!(json, "\"2023-11-14T22:13:20Z\"");
        let back: Time = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, time);
        assert_eq!(back.unix(), 1_700_000_000);
    }

    #[test]
    fn test_time_keeps_fractional_seconds() {
        let time = Time(DateTime::from_timestamp(1, 500_000_000).expect("time"));
        let json = serde_json::to_string(&time).expect("serialize");
        assert!(json.starts_with("\"1970-01-01T00:00:01.5"), "{json}");
        let back: Time = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, time);
        assert_eq!(back.unix(), 1);
    }

    #[test]
    fn test_time_needs_registered_functions() {
        let meta = ObjectMeta {
            creation_timestamp: Time::from_unix(42),
            ..ObjectMeta::named("a")
        };

        let err = Cloner::new().deep_copy_value(&meta).unwrap_err();
        assert!(matches!(err, Error::NoDeepCopyFunc { .. }));

        let mut cloner = Cloner::new();
        cloner.add_deep_copy_funcs(deep_copy_funcs()).expect("register");
        assert_eq!(cloner.deep_copy_value(&meta).expect("copy"), meta);

        let mut out = ObjectMeta::default();
        let err = Converter::new()
            .convert(&meta, &mut out, FieldMatchingFlags::DEST_FROM_SOURCE, Meta::new("", ""))
            .unwrap_err();
        assert!(matches!(err, Error::NoConversionPath { .. }));

        let mut converter = Converter::new();
        converter.add_conversion_funcs(conversion_funcs()).expect("register");
        converter
            .convert(&meta, &mut out, FieldMatchingFlags::DEST_FROM_SOURCE, Meta::new("", ""))
            .expect("convert");
        assert_eq!(out, meta);
    }
}
