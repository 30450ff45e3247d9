//! # Error Types
//!
//! Parse and construction errors for the core domain types, built with
//! `thiserror`. Each variant carries the rejected input so that operators
//! can diagnose bad CLI arguments or malformed payloads without guesswork.

use thiserror::Error;

/// Validation errors raised while constructing core domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An identifier was not a positive integer.
    #[error("invalid {kind} identifier: \"{input}\" (expected a positive integer)")]
    InvalidIdentifier {
        /// Which identifier family was being parsed.
        kind: &'static str,
        /// The rejected input.
        input: String,
    },

    /// A target was not written as `<category>:<subcategory>`.
    #[error("invalid target: \"{0}\" (expected <categoryId>:<subcategoryId>)")]
    InvalidTarget(String),

    /// Applicability was not one of the supported values.
    #[error("invalid applicability: \"{0}\" (expected mandatory or selective)")]
    InvalidApplicability(String),
}
