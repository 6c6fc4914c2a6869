//! Typed storage operations, one module per table.
//!
//! Handlers never build queries themselves: lists and lookups take the
//! caller's [`crate::policy::Scope`] so that visibility is applied in exactly
//! one place, and writes take plain field structs.

pub mod courses;
pub mod lessons;
pub mod payments;
pub mod subscriptions;
pub mod users;

use chrono::{NaiveDateTime, Utc};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
