//! Workflow error types.
//!
//! Only two conditions escape [`crate::DocumentLinker::submit`] as errors:
//! a submission that fails validation, and a submission attempted while
//! another is still running. Everything that goes wrong after the first
//! network call is recorded per call and reported in the summary.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use ims_client::ApiError;

/// Per-field validation messages, keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// An empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message per field wins.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// The message for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has a message.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Field names with messages, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// `(field, message)` pairs in sorted field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Errors returned by the workflow before any network call is made.
#[derive(Debug, thiserror::Error)]
pub enum LinkingError {
    /// The submission failed validation.
    #[error("submission rejected: {0}")]
    Validation(FieldErrors),

    /// Another submission is still running on this linker.
    #[error("a submission is already in progress")]
    Busy,
}

/// Why a single create or link call failed.
#[derive(Debug, thiserror::Error)]
pub enum CallFailure {
    /// The API call returned an error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The call did not settle within the configured timeout.
    #[error("call timed out after {0:?}")]
    TimedOut(Duration),
}
