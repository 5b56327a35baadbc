// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{Hello, Namespace, PHASE_ACTIVE};
use hscheme::DefaultingFunc;

pub const DEFAULT_HELLO_TEXT: &str = "should enter some text here.";

/// Defaults applied to decoded `v1` objects before conversion.
pub fn defaulting_funcs() -> Vec<DefaultingFunc> {
    vec![
        DefaultingFunc::new(|obj: &mut Hello| {
            if obj.text.is_empty() {
                obj.text = DEFAULT_HELLO_TEXT.to_string();
            }
        }),
        DefaultingFunc::new(|obj: &mut Namespace| {
            if obj.status.phase.is_empty() {
                obj.status.phase = PHASE_ACTIVE.to_string();
            }
        }),
    ]
}
