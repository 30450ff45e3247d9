//! # ims-linking — Linked Document Creation
//!
//! Files one document under several (category, subcategory) locations and
//! links the copies to each other:
//!
//! - **Validation** (`validation.rs`): per-field checks on the raw form,
//!   run before any network call.
//!
//! - **Targets** (`targets.rs`): primary location plus checked additional
//!   categories, deduplicated, with a configurable fallback for categories
//!   that have no checked subcategory.
//!
//! - **Creation** (`creation.rs`): one create call per target through a
//!   bounded settle-all window. A failed target never cancels its siblings.
//!
//! - **Resolution** (`resolution.rs`): re-reads the document list and
//!   matches each created row by name and target, retrying with backoff
//!   while rows are missing.
//!
//! - **Links** (`links.rs`): pairwise edges between the anchor document and
//!   every other resolved document, created through the same window.
//!
//! - **Summary** (`summary.rs`): counts, failure messages and an overall
//!   status.
//!
//! [`DocumentLinker`] ties the phases together.
//!
//! ## Crate Policy
//!
//! - Depends on `ims-core` for domain types and `ims-client` for the HTTP
//!   implementation of [`DocumentApi`].
//! - Only [`LinkingError`] crosses the `submit` boundary; per-call failures
//!   are data in the [`LinkingReport`].

pub mod api;
pub mod config;
pub mod creation;
pub mod error;
pub(crate) mod fanout;
pub mod links;
pub mod orchestrator;
pub mod resolution;
pub mod submission;
pub mod summary;
pub mod targets;
pub mod validation;

pub use api::DocumentApi;
pub use config::{FallbackPolicy, IdentifierStrategy, LinkingConfig};
pub use error::{CallFailure, FieldErrors, LinkingError};
pub use orchestrator::{DocumentLinker, LinkingReport};
pub use submission::{DocumentSubmission, ValidatedSubmission};
pub use summary::{LinkingSummary, SummaryStatus};
