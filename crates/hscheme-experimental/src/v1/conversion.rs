// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{Hello, Namespace, PHASE_ACTIVE, PHASE_TERMINATING};
use hscheme::{ConversionFunc, FieldMatchingFlags};

fn known_phase(phase: &str) -> bool {
    phase.is_empty() || phase == PHASE_ACTIVE || phase == PHASE_TERMINATING
}

/// Conversion functions between `v1` and the internal representation.
///
/// `HelloList` and `Status` have the same shape in both representations and
/// are converted structurally.
pub fn conversion_funcs() -> Vec<ConversionFunc> {
    let mut funcs = Hello::hub_conversion_funcs();

    funcs.push(ConversionFunc::new(
        |src: &Namespace, dst: &mut crate::Namespace, scope| {
            if !known_phase(&src.status.phase) {
                return Err(scope.failure(
                    src,
                    &*dst,
                    format!("unknown namespace phase {:?}", src.status.phase),
                ));
            }
            scope.convert(&src.type_meta, &mut dst.type_meta, FieldMatchingFlags::DEST_FROM_SOURCE)?;
            scope.convert(&src.metadata, &mut dst.metadata, FieldMatchingFlags::DEST_FROM_SOURCE)?;
            dst.finalizers.clone_from(&src.spec.finalizers);
            dst.phase.clone_from(&src.status.phase);
            Ok(())
        },
    ));

    funcs.push(ConversionFunc::new(
        |src: &crate::Namespace, dst: &mut Namespace, scope| {
            scope.convert(&src.type_meta, &mut dst.type_meta, FieldMatchingFlags::DEST_FROM_SOURCE)?;
            scope.convert(&src.metadata, &mut dst.metadata, FieldMatchingFlags::DEST_FROM_SOURCE)?;
            dst.spec.finalizers.clone_from(&src.finalizers);
            dst.status.phase.clone_from(&src.phase);
            Ok(())
        },
    ));

    funcs
}
