// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end properties of a scheme: registry integrity, codec round trips,
//! metadata blanking, conversion symmetry and deep copy independence.

use hscheme::{
    ConversionFunc, Error, FieldMatchingFlags, GroupVersionKind, Meta, Object, Reflect, Scheme,
    Scope, TypeMeta,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::TypeId;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
struct Internal {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
struct External {
    #[serde(flatten)]
    type_meta: TypeMeta,
    #[serde(default)]
    text: String,
}

/// Object without type-metadata fields; it cannot be marshalled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
struct Headless {
    text: String,
}

fn scheme() -> Scheme {
    let mut scheme = Scheme::new("");
    scheme.add_known_type::<Internal>("g", "").expect("internal");
    scheme
        .add_known_type_with_name::<External>("g", "v1", "Internal")
        .expect("external");
    scheme
}

#[test]
fn test_encode_decode_without_custom_functions() {
    let scheme = scheme();
    let mut obj = Internal {
        text: "hi".into(),
        ..Default::default()
    };

    let data = scheme.encode_to_version(&mut obj, "v1").expect("encode");
    let envelope = scheme.data_type_meta(&data).expect("envelope");
    assert_eq!(envelope, TypeMeta::new("g", "v1", "Internal"));

    let body: External = serde_json::from_slice(&data).expect("body");
    assert_eq!(body.text, "hi");

    let decoded = scheme.decode(&data).expect("decode");
    assert_eq!(
        decoded.downcast_ref::<Internal>(),
        Some(&Internal {
            text: "hi".into(),
            ..Default::default()
        })
    );
}

#[test]
fn test_decode_missing_kind() {
    let scheme = scheme();
    let err = scheme
        .decode(br#"{"apiGroup":"g","apiVersion":"v1","text":"x"}"#)
        .unwrap_err();
    assert!(matches!(err, Error::MissingKind { .. }));

    let err = scheme.decode(br#"{"apiVersion":"v1","kind":"Internal"}"#).unwrap_err();
    assert!(matches!(err, Error::MissingGroup { .. }));

    let err = scheme.decode(b"not json").unwrap_err();
    assert!(matches!(err, Error::MalformedEnvelope { .. }));
}

#[test]
fn test_duplicate_pair_in_batch_installs_nothing() {
    let mut scheme = scheme();
    let err = scheme
        .add_conversion_funcs([
            ConversionFunc::new(|src: &External, dst: &mut Internal, _scope| {
                dst.text.clone_from(&src.text);
                Ok(())
            }),
            ConversionFunc::new(|_src: &External, _dst: &mut Internal, _scope| Ok(())),
        ])
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateConversion { .. }));
    assert!(!scheme
        .converter()
        .has_conversion_func(TypeId::of::<External>(), TypeId::of::<Internal>()));
    assert!(scheme.converter().is_empty());
}

#[test]
fn test_round_trip_random_values() {
    let scheme = scheme();
    let mut rng = fastrand::Rng::with_seed(42);

    for _ in 0..100 {
        let len = rng.usize(0..40);
        let text: String = (0..len).map(|_| rng.char('\u{20}'..'\u{2fff}')).collect();
        let original = Internal {
            text,
            ..Default::default()
        };

        for version in ["", "v1"] {
            let mut obj = original.clone();
            let data = scheme.encode_to_version(&mut obj, version).expect("encode");
            assert!(obj.type_meta.is_empty(), "meta left set after encode");
            let decoded = scheme.decode(&data).expect("decode");
            assert_eq!(decoded.downcast_ref::<Internal>(), Some(&original));
        }
    }
}

#[test]
fn test_encode_failure_leaves_object_untouched() {
    let mut scheme = scheme();
    scheme.add_known_type::<Headless>("g", "").expect("headless");

    let mut obj = Headless { text: "x".into() };
    let err = scheme.encode_to_version(&mut obj, "").unwrap_err();
    assert!(matches!(err, Error::FieldNotFound { .. }));
    assert_eq!(obj.text, "x");

    let mut loose = External::default();
    let mut unregistered = Scheme::new("");
    unregistered.add_known_type::<Internal>("g", "").expect("internal");
    let err = unregistered.encode_to_version(&mut loose, "v1").unwrap_err();
    assert!(matches!(err, Error::UnregisteredType { .. }));
    assert!(err.is_not_registered());
}

#[test]
fn test_registry_integrity() {
    let mut scheme = scheme();
    scheme.add_known_type::<Internal>("g", "").expect("identical mapping");

    let err = scheme
        .add_known_type_with_name::<Headless>("g", "v1", "Internal")
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateKind { .. }));
    assert!(err.is_registration_conflict());

    let gvk = GroupVersionKind::new("g", "v1", "Internal");
    let obj = scheme.new_object(&gvk).expect("new object");
    assert!(obj.is::<External>());
    assert_eq!(scheme.object_type_meta(obj.as_ref()).expect("gvk"), gvk);
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
struct Disk {
    name: String,
    size_mb: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
struct Volume {
    name: String,
    size_kb: u64,
}

#[test]
fn test_custom_conversion_symmetry() {
    let mut scheme = Scheme::new("");
    scheme
        .add_conversion_funcs([
            ConversionFunc::new(|src: &Disk, dst: &mut Volume, scope| {
                scope.convert(&src.name, &mut dst.name, FieldMatchingFlags::DEST_FROM_SOURCE)?;
                dst.size_kb = src.size_mb * 1024;
                Ok(())
            }),
            ConversionFunc::new(|src: &Volume, dst: &mut Disk, scope| {
                if src.size_kb % 1024 != 0 {
                    return Err(scope.failure(src, &*dst, "size is not a whole number of megabytes"));
                }
                dst.name.clone_from(&src.name);
                dst.size_mb = src.size_kb / 1024;
                Ok(())
            }),
        ])
        .expect("register");

    let mut rng = fastrand::Rng::with_seed(3);
    for _ in 0..50 {
        let disk = Disk {
            name: format!("disk-{}", rng.u16(..)),
            size_mb: rng.u64(0..1 << 20),
        };
        let mut volume = Volume::default();
        scheme.convert(&disk, &mut volume).expect("to volume");
        let mut back = Disk::default();
        scheme.convert(&volume, &mut back).expect("to disk");
        assert_eq!(back, disk);
    }

    let err = scheme
        .convert(
            &Volume {
                name: "odd".into(),
                size_kb: 1000,
            },
            &mut Disk::default(),
        )
        .unwrap_err();
    assert!(matches!(err, Error::ConversionFailed { .. }));
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
struct Lines {
    text: Vec<String>,
}

#[test]
fn test_incompatible_shapes_have_no_path() {
    let scheme = Scheme::new("");
    let mut out = Lines::default();
    let err = scheme
        .convert(
            &Internal {
                text: "x".into(),
                ..Default::default()
            },
            &mut out,
        )
        .unwrap_err();
    match err {
        Error::NoConversionPath { path, .. } => assert_eq!(path, "text"),
        other => panic!("unexpected error: {other}"),
    }

    let mut out = Disk::default();
    let err = scheme
        .convert(
            &Volume {
                name: "v".into(),
                size_kb: 1,
            },
            &mut out,
        )
        .unwrap_err();
    assert!(matches!(err, Error::NoConversionPath { .. }));
}

#[test]
fn test_detached_scope_cannot_convert() {
    let scheme = Scheme::new("");
    let mut scope = Scope::detached(scheme.converter(), Meta::new("v1", ""));
    let mut out = String::new();
    let err = scope
        .convert(&"x".to_string(), &mut out, FieldMatchingFlags::DEST_FROM_SOURCE)
        .unwrap_err();
    assert!(matches!(err, Error::NoActiveScope));
    assert_eq!(scope.meta().src_version, "v1");
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect, Object)]
struct Inventory {
    #[serde(flatten)]
    type_meta: TypeMeta,
    shelves: Vec<Vec<String>>,
    stock: HashMap<String, Vec<u32>>,
    note: Option<Vec<String>>,
    payload: Value,
}

#[test]
fn test_deep_copy_independence() {
    let mut scheme = Scheme::new("");
    scheme.add_known_type::<Inventory>("g", "").expect("register");

    let mut stock = HashMap::new();
    stock.insert("apples".to_string(), vec![1, 2, 3]);
    let original = Inventory {
        shelves: vec![vec!["a".into(), "b".into()], vec![]],
        stock,
        note: Some(Vec::new()),
        payload: serde_json::json!({"nested": [1, 2]}),
        ..Default::default()
    };

    let mut copy = scheme
        .deep_copy(&original)
        .expect("copy")
        .downcast::<Inventory>()
        .expect("inventory");
    assert_eq!(*copy, original);

    copy.shelves[0][0].push('!');
    copy.shelves[1].push("c".into());
    copy.stock.get_mut("apples").expect("apples").push(4);
    copy.note.as_mut().expect("note").push("n".into());
    copy.payload["nested"][0] = Value::from(9);

    assert_eq!(original.shelves, vec![vec!["a".to_string(), "b".to_string()], vec![]]);
    assert_eq!(original.stock["apples"], vec![1, 2, 3]);
    assert_eq!(original.note, Some(Vec::new()));
    assert_eq!(original.payload, serde_json::json!({"nested": [1, 2]}));
}
