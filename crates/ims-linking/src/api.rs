//! # Platform API Seam
//!
//! The workflow talks to the platform through [`DocumentApi`] rather than
//! [`ImsClient`] directly, so tests can drive it with an in-memory fake and
//! deployments can wrap the HTTP client (caching, auditing) without touching
//! the orchestration code.
//!
//! Implementations must be `Send + Sync`; the returned futures must be
//! `Send` so a linker can be driven from any tokio task.

use std::future::Future;

use ims_client::{ApiError, CreatedDocument, DocumentFilter, ImsClient};
use ims_core::{DocumentDescriptor, DocumentId, DocumentRecord, SessionContext, SubcategoryId, Target};

/// The three platform operations the linking workflow needs.
pub trait DocumentApi: Send + Sync {
    /// Create one document row filed under `target`.
    fn create_document(
        &self,
        descriptor: &DocumentDescriptor,
        target: Target,
        ctx: &SessionContext,
    ) -> impl Future<Output = Result<CreatedDocument, ApiError>> + Send;

    /// List document rows matching `filter`.
    fn list_documents(
        &self,
        filter: &DocumentFilter,
    ) -> impl Future<Output = Result<Vec<DocumentRecord>, ApiError>> + Send;

    /// Record that `from` is also filed under `to`.
    fn create_link(
        &self,
        from: DocumentId,
        to: SubcategoryId,
        ctx: &SessionContext,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl DocumentApi for ImsClient {
    fn create_document(
        &self,
        descriptor: &DocumentDescriptor,
        target: Target,
        ctx: &SessionContext,
    ) -> impl Future<Output = Result<CreatedDocument, ApiError>> + Send {
        self.documents().create(descriptor, target, ctx)
    }

    fn list_documents(
        &self,
        filter: &DocumentFilter,
    ) -> impl Future<Output = Result<Vec<DocumentRecord>, ApiError>> + Send {
        self.documents().list(filter)
    }

    fn create_link(
        &self,
        from: DocumentId,
        to: SubcategoryId,
        ctx: &SessionContext,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        self.links().create(from, to, ctx)
    }
}

impl<T: DocumentApi> DocumentApi for std::sync::Arc<T> {
    fn create_document(
        &self,
        descriptor: &DocumentDescriptor,
        target: Target,
        ctx: &SessionContext,
    ) -> impl Future<Output = Result<CreatedDocument, ApiError>> + Send {
        (**self).create_document(descriptor, target, ctx)
    }

    fn list_documents(
        &self,
        filter: &DocumentFilter,
    ) -> impl Future<Output = Result<Vec<DocumentRecord>, ApiError>> + Send {
        (**self).list_documents(filter)
    }

    fn create_link(
        &self,
        from: DocumentId,
        to: SubcategoryId,
        ctx: &SessionContext,
    ) -> impl Future<Output = Result<(), ApiError>> + Send {
        (**self).create_link(from, to, ctx)
    }
}
