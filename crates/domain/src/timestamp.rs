// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;

/// Epoch seconds, the only clock representation used by the marketplace.
///
/// Timestamps are sampled once at the adapter boundary and passed into the
/// pure transition function, so a whole transition observes a single instant.
pub type Timestamp = i64;

/// Returns the current time as epoch seconds.
#[must_use]
pub fn now() -> Timestamp {
    OffsetDateTime::now_utc().unix_timestamp()
}
