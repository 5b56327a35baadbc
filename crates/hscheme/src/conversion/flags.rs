// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// How struct fields are matched during a structural conversion.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldMatchingFlags(u8);

impl FieldMatchingFlags {
    /// Every destination field needs a source field of the same name.
    pub const DEST_FROM_SOURCE: Self = Self(0);
    /// Every source field needs a destination field of the same name.
    pub const SOURCE_TO_DEST: Self = Self(1);
    /// Missing counterparts are skipped instead of failing.
    pub const IGNORE_MISSING_FIELDS: Self = Self(2);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if every bit of `other` is set. `DEST_FROM_SOURCE` is the empty set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_source_to_dest(self) -> bool {
        self.contains(Self::SOURCE_TO_DEST)
    }

    pub const fn ignores_missing_fields(self) -> bool {
        self.contains(Self::IGNORE_MISSING_FIELDS)
    }
}

impl BitOr for FieldMatchingFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldMatchingFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for FieldMatchingFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.is_source_to_dest() {
            names.push("SOURCE_TO_DEST");
        } else {
            names.push("DEST_FROM_SOURCE");
        }
        if self.ignores_missing_fields() {
            names.push("IGNORE_MISSING_FIELDS");
        }
        write!(f, "FieldMatchingFlags({})", names.join(" | "))
    }
}
