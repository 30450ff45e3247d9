// SPDX-License-Identifier: BUSL-1.1
//! In-memory incubation platform API stub.
//!
//! Implements the catalog, document and document-link endpoints that
//! `ims-client` calls. Used by the `ims-stub` binary for local development
//! and by the integration tests, which mount [`router`] on an ephemeral
//! port.
//!
//! Storage is in-memory (DashMap) with no persistence; data is lost on
//! restart.

pub mod routes;
pub mod store;

pub use routes::router;
pub use store::{AppState, StoredDocument, StubOptions};
