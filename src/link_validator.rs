//! Rejects links to anything but YouTube in free-text fields.
//!
//! The check is a heuristic over dotted tokens, not a URL parser: every token
//! shaped like `label.rest` (optionally prefixed by `http://`, `https://` or
//! `www.`) contributes its first label, and every such label must contain
//! `youtube`. It over-matches (`e.g.` or a version like `v1.2` count as links)
//! and a scheme followed by `www.` captures `www` as the label, so
//! `https://www.youtube.com` is rejected while `https://youtube.com` passes.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use validator::ValidationError;

/// Substring every linked host label must contain.
pub const ALLOWED_HOST: &str = "youtube";

/// Message attached to every rejection, whichever field triggered it.
pub const FOREIGN_LINK_MESSAGE: &str = "Links to third-party resources are not allowed.";

static LINK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?://|www\.)?([^\s./?#]+)(?:\.[^\s./?#]+)").expect("valid link regex")
});

/// A record whose text fields can be looked up by name.
pub trait TextFields {
    /// The text stored under `name`, or `None` when the field is absent or not text.
    fn text_field(&self, name: &str) -> Option<&str>;
}

impl TextFields for Map<String, Value> {
    fn text_field(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

/// Link check over a fixed set of field names.
#[derive(Debug, Clone, Copy)]
pub struct LinkValidator {
    fields: &'static [&'static str],
}

impl LinkValidator {
    #[must_use]
    pub const fn new(fields: &'static [&'static str]) -> Self {
        Self { fields }
    }

    /// Check every configured field of `record`. Missing fields pass.
    ///
    /// # Errors
    /// Returns a `links` validation error if any field links outside YouTube.
    pub fn validate<T: TextFields + ?Sized>(&self, record: &T) -> Result<(), ValidationError> {
        let offending = self
            .fields
            .iter()
            .filter_map(|field| record.text_field(field).map(|text| (field, text)))
            .find(|(_, text)| contains_foreign_link(text));

        match offending {
            Some((field, _)) => {
                let mut error = ValidationError::new("links")
                    .with_message(Cow::Borrowed(FOREIGN_LINK_MESSAGE));
                error.add_param(Cow::Borrowed("field"), field);
                Err(error)
            }
            None => Ok(()),
        }
    }
}

/// Whether `text` mentions a host label without [`ALLOWED_HOST`] in it.
#[must_use]
pub fn contains_foreign_link(text: &str) -> bool {
    LINK_PATTERN
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .any(|label| !label.as_str().contains(ALLOWED_HOST))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const DESCRIPTION_ONLY: LinkValidator = LinkValidator::new(&["description"]);

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn youtube_link_passes() {
        let data = record(json!({ "description": "see https://youtube.com/x" }));

        assert!(DESCRIPTION_ONLY.validate(&data).is_ok());
    }

    #[test]
    fn foreign_link_is_rejected_with_the_shared_message() {
        let data = record(json!({ "description": "see https://evil.example/x" }));

        let error = DESCRIPTION_ONLY
            .validate(&data)
            .expect_err("foreign link should be rejected");
        assert_eq!(error.code, "links");
        assert_eq!(error.message.as_deref(), Some(FOREIGN_LINK_MESSAGE));
    }

    #[test]
    fn text_without_links_passes() {
        assert!(!contains_foreign_link("Intro to Rust"));
        assert!(!contains_foreign_link("Ends with a full stop. Then more words"));
        assert!(!contains_foreign_link(""));
    }

    #[test]
    fn bare_www_prefix_is_allowed_for_youtube() {
        assert!(!contains_foreign_link("watch www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn scheme_followed_by_www_captures_www() {
        assert!(contains_foreign_link("https://www.youtube.com/watch?v=abc"));
    }

    #[test]
    fn any_dotted_token_counts_as_a_link() {
        assert!(contains_foreign_link("released in v1.2"));
        assert!(contains_foreign_link("a language, e.g. Rust"));
    }

    #[test]
    fn every_link_must_be_allowed() {
        assert!(contains_foreign_link(
            "https://youtube.com/a and https://vimeo.com/b"
        ));
    }

    #[test]
    fn only_configured_fields_are_checked() {
        let data = record(json!({
            "name": "https://evil.example",
            "description": "clean"
        }));

        assert!(DESCRIPTION_ONLY.validate(&data).is_ok());
        assert!(LinkValidator::new(&["name", "description"])
            .validate(&data)
            .is_err());
    }

    #[test]
    fn missing_and_non_text_fields_pass() {
        let data = record(json!({ "description": 42 }));

        assert!(DESCRIPTION_ONLY.validate(&data).is_ok());
        assert!(DESCRIPTION_ONLY.validate(&Map::new()).is_ok());
    }
}
