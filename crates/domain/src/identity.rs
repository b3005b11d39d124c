// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A normalized phone-number identity.
///
/// Phone numbers are the sole participant identity in the marketplace and
/// are accepted as asserted, unauthenticated strings. Equality of identities
/// is defined as equality of the normalized form; every access-control check
/// in the system compares `PhoneNumber` values and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber {
    /// The normalized value (`+` followed by the retained digits).
    value: String,
}

impl PhoneNumber {
    /// Canonicalizes a freeform identity string into a stable key.
    ///
    /// The input is trimmed; if it already starts with `+` it is kept as-is,
    /// otherwise all non-digit characters are stripped and a `+` is
    /// prepended. Total function: malformed input normalizes to `+` plus
    /// whatever digits remain, possibly none.
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let trimmed: &str = raw.trim();
        if trimmed.starts_with('+') {
            return Self {
                value: trimmed.to_owned(),
            };
        }
        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        Self {
            value: format!("+{digits}"),
        }
    }

    /// Returns the normalized value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}
