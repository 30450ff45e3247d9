//! # Identifier Resolution
//!
//! The create endpoint does not reliably return the new row's identifier,
//! so after every create has settled the workflow re-reads the document
//! list and finds each created row by `(documentName, categoryId,
//! subcategoryId)`.
//!
//! An older document may already carry the same name under the same
//! location. Before any create is sent, a [`Baseline`] records the rows that
//! already match; those identifiers never count as a resolution, so a list
//! that has not caught up yet leaves the target pending instead of
//! resolving it to the old row.
//!
//! The persistence layer behind the list endpoint may lag behind creates.
//! The first refetch waits `settle_delay`; while rows remain unmatched, the
//! refetch is repeated up to `resolve_attempts` times with the delay
//! doubling each time. A row still unmatched afterwards is "unresolved": it
//! exists but cannot take part in linking.

use std::collections::HashSet;

use ims_client::DocumentFilter;
use ims_core::{DocumentId, DocumentRecord, SessionContext, Target};
use tracing::Instrument;

use crate::api::DocumentApi;
use crate::config::{IdentifierStrategy, LinkingConfig};

/// Where a resolved identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    /// Parsed from the create response.
    Response,
    /// Matched in a refreshed document list.
    ListLookup,
}

/// A created document whose identifier is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDocument {
    pub target: Target,
    pub document_id: DocumentId,
    pub source: IdSource,
}

/// A successfully created target awaiting resolution, with the identifier
/// its create response carried, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedTarget {
    pub target: Target,
    pub response_id: Option<DocumentId>,
}

/// Rows that already matched the submission before it created anything.
#[derive(Debug, Clone, Default)]
pub struct Baseline {
    existing: HashSet<DocumentId>,
    error: Option<String>,
}

impl Baseline {
    /// Collect the rows in `records` named `name` under any of `targets`.
    pub fn from_records(name: &str, targets: &[Target], records: &[DocumentRecord]) -> Self {
        let name = name.trim();
        let existing = records
            .iter()
            .filter(|r| r.document_name.trim() == name && targets.contains(&r.target()))
            .map(|r| r.id)
            .collect();
        Self {
            existing,
            error: None,
        }
    }

    /// Whether `id` existed before the submission.
    pub fn contains(&self, id: DocumentId) -> bool {
        self.existing.contains(&id)
    }

    /// Number of pre-existing matching rows.
    pub fn len(&self) -> usize {
        self.existing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.existing.is_empty()
    }

    /// Why the snapshot could not be taken, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Outcome of the resolution phase.
#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    /// Resolved documents, in creation order.
    pub resolved: Vec<ResolvedDocument>,
    /// Created targets whose row was never found.
    pub unresolved: Vec<Target>,
    /// Number of list refetches performed after the creates.
    pub lookups: u32,
    /// Rows with the same name and location that predate the submission.
    pub preexisting: usize,
    /// Errors from the baseline snapshot and failed refetches.
    pub lookup_errors: Vec<String>,
}

/// Snapshot the rows that already match `name` under `targets`.
///
/// Runs once, before the create fan-out. A failed snapshot yields an empty
/// baseline carrying the error; resolution then behaves as if no older
/// document existed.
pub async fn take_baseline<A: DocumentApi>(
    api: &A,
    name: &str,
    targets: &[Target],
    ctx: &SessionContext,
    config: &LinkingConfig,
) -> Baseline {
    let filter = DocumentFilter::incubator(ctx.incubator_id);
    match tokio::time::timeout(config.call_timeout, api.list_documents(&filter)).await {
        Ok(Ok(records)) => {
            let baseline = Baseline::from_records(name, targets, &records);
            if !baseline.is_empty() {
                tracing::info!(
                    existing = baseline.len(),
                    "documents with the same name already exist; they will not be linked"
                );
            }
            baseline
        }
        Ok(Err(e)) => {
            tracing::warn!("document list snapshot failed: {e}");
            Baseline {
                error: Some(format!("snapshot before create: {e}")),
                ..Baseline::default()
            }
        }
        Err(_) => {
            tracing::warn!("document list snapshot timed out");
            Baseline {
                error: Some(format!(
                    "snapshot before create timed out after {:?}",
                    config.call_timeout
                )),
                ..Baseline::default()
            }
        }
    }
}

/// Find the row for each target in `records`, ignoring rows in `baseline`.
///
/// Pure lookup: the same inputs always give the same answer. When several
/// new rows share a name and target, the highest identifier wins, since
/// identifiers are assigned in ascending order.
pub fn match_identifiers(
    name: &str,
    targets: &[Target],
    records: &[DocumentRecord],
    baseline: &Baseline,
) -> Vec<Option<DocumentId>> {
    let name = name.trim();
    targets
        .iter()
        .map(|target| {
            records
                .iter()
                .filter(|r| r.document_name.trim() == name && r.target() == *target)
                .map(|r| r.id)
                .filter(|&id| !baseline.contains(id))
                .max()
        })
        .collect()
}

/// Resolve identifiers for every created target.
pub async fn resolve_identifiers<A: DocumentApi>(
    api: &A,
    name: &str,
    created: &[CreatedTarget],
    baseline: &Baseline,
    ctx: &SessionContext,
    config: &LinkingConfig,
) -> ResolutionReport {
    let mut slots: Vec<Option<(DocumentId, IdSource)>> = created
        .iter()
        .map(|c| match config.id_strategy {
            IdentifierStrategy::PreferResponse => c.response_id.map(|id| (id, IdSource::Response)),
            IdentifierStrategy::ListLookup => None,
        })
        .collect();

    let filter = DocumentFilter::incubator(ctx.incubator_id);
    let mut report = ResolutionReport {
        preexisting: baseline.len(),
        lookup_errors: baseline.error().map(str::to_string).into_iter().collect(),
        ..ResolutionReport::default()
    };
    let mut delay = config.settle_delay;

    for attempt in 1..=config.resolve_attempts.max(1) {
        let pending: Vec<usize> = (0..slots.len()).filter(|&i| slots[i].is_none()).collect();
        if pending.is_empty() {
            break;
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        report.lookups += 1;

        let span = tracing::debug_span!("refetch", attempt, pending = pending.len());
        let fetched = tokio::time::timeout(config.call_timeout, api.list_documents(&filter))
            .instrument(span)
            .await;

        match fetched {
            Ok(Ok(records)) => {
                let targets: Vec<Target> = pending.iter().map(|&i| created[i].target).collect();
                let found = match_identifiers(name, &targets, &records, baseline);
                for (&i, id) in pending.iter().zip(found) {
                    slots[i] = id.map(|id| (id, IdSource::ListLookup));
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(attempt, "document list refetch failed: {e}");
                report.lookup_errors.push(e.to_string());
            }
            Err(_) => {
                tracing::warn!(attempt, "document list refetch timed out");
                report
                    .lookup_errors
                    .push(format!("document list timed out after {:?}", config.call_timeout));
            }
        }

        delay = delay.saturating_mul(2);
    }

    for (c, slot) in created.iter().zip(slots) {
        match slot {
            Some((document_id, source)) => report.resolved.push(ResolvedDocument {
                target: c.target,
                document_id,
                source,
            }),
            None => {
                tracing::warn!(location = %c.target, "created document not found after refetch");
                report.unresolved.push(c.target);
            }
        }
    }

    report
}
