// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod identity;
mod timestamp;
mod types;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types
pub use error::DomainError;
pub use identity::PhoneNumber;
pub use timestamp::{Timestamp, now};
pub use types::{
    ProgressUpdate, Proposal, Reputation, Role, Submission, Task, TaskId, TaskStatus, User,
};
pub use validation::{validate_budget, validate_price};
