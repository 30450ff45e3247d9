#![deny(missing_docs)]

//! # ims-core — Foundational Types for the Incubator Document Stack
//!
//! Every other crate in the workspace depends on this one. It has no
//! internal crate dependencies; only `serde`, `thiserror` and
//! `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** A [`CategoryId`] cannot be passed
//!    where a [`SubcategoryId`] is expected, even though both are numeric
//!    keys on the wire.
//!
//! 2. **Explicit session context.** The acting user and incubator are carried
//!    in a [`SessionContext`] value instead of being read from ambient
//!    storage, so every workflow is testable in isolation.
//!
//! 3. **[`ValidationError`] for parse failures.** Structured errors with
//!    `thiserror`, no `.unwrap()` outside tests.

pub mod catalog;
pub mod document;
pub mod error;
pub mod identity;
pub mod session;

pub use catalog::{Category, Periodicity, Subcategory};
pub use document::{
    Applicability, Attachment, DocumentDescriptor, DocumentRecord, LinkRecord, Target,
};
pub use error::ValidationError;
pub use identity::{CategoryId, DocumentId, IncubatorId, PeriodicityId, SubcategoryId, UserId};
pub use session::SessionContext;
