//! Tri-state fields for partial updates.

use serde::{Deserialize, Deserializer};

/// Deserialize a nullable field of a partial update so that an explicit
/// `null` is not mistaken for an absent key.
///
/// Pair with `#[serde(default)]`: an absent key stays `None` (keep the stored
/// value), `null` becomes `Some(None)` (clear it) and a value becomes
/// `Some(Some(value))`.
///
/// # Example
/// ```rust,ignore
/// #[derive(Deserialize)]
/// pub struct UpdateLesson {
///     #[serde(default, deserialize_with = "nullable::deserialize")]
///     pub video_url: Option<Option<String>>,
/// }
/// ```
///
/// # Errors
/// Propagates the inner value's deserialization error.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
