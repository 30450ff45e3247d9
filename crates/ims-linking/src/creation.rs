//! Document creation fan-out: one create call per target.

use ims_client::CreatedDocument;
use ims_core::{DocumentDescriptor, SessionContext, Target};

use crate::api::DocumentApi;
use crate::config::LinkingConfig;
use crate::error::CallFailure;
use crate::fanout::settle_all;

/// Result of the create call for one target.
#[derive(Debug)]
pub struct CreationOutcome {
    pub target: Target,
    pub result: Result<CreatedDocument, CallFailure>,
}

impl CreationOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Create one document per target and wait for every call to settle.
///
/// Outcomes are returned in target order.
pub async fn create_documents<A: DocumentApi>(
    api: &A,
    descriptor: &DocumentDescriptor,
    targets: &[Target],
    ctx: &SessionContext,
    config: &LinkingConfig,
) -> Vec<CreationOutcome> {
    let results = settle_all(
        targets.iter().copied(),
        config.max_concurrency,
        config.call_timeout,
        |target| api.create_document(descriptor, target, ctx),
    )
    .await;

    targets
        .iter()
        .zip(results)
        .map(|(&target, result)| {
            match &result {
                Ok(created) => tracing::debug!(location = %target, id = ?created.id, "document created"),
                Err(e) => tracing::warn!(location = %target, "document create failed: {e}"),
            }
            CreationOutcome { target, result }
        })
        .collect()
}
