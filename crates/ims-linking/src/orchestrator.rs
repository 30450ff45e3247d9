//! # Document Linker
//!
//! Drives one submission through the full workflow:
//!
//! ```text
//! validate -> snapshot -> create (settle-all) -> refetch + match -> link (settle-all) -> summary
//! ```
//!
//! Each arrow is a full barrier. Nothing after validation returns an error:
//! per-call failures are recorded in the [`LinkingReport`] and its
//! [`LinkingSummary`].

use std::sync::atomic::{AtomicBool, Ordering};

use ims_core::{CategoryId, SessionContext, Subcategory, Target};
use tracing::Instrument;

use crate::api::DocumentApi;
use crate::config::LinkingConfig;
use crate::creation::{create_documents, CreationOutcome};
use crate::error::LinkingError;
use crate::links::{create_links, plan_links, LinkOutcome};
use crate::resolution::{resolve_identifiers, take_baseline, CreatedTarget, ResolutionReport};
use crate::submission::{DocumentSubmission, ValidatedSubmission};
use crate::summary::{summarize, LinkingSummary};
use crate::validation::validate;

/// Everything that happened during one submission.
#[derive(Debug)]
pub struct LinkingReport {
    /// Filing locations, primary first.
    pub targets: Vec<Target>,
    /// Categories filed under their first catalog subcategory.
    pub defaulted: Vec<CategoryId>,
    /// One outcome per target, in target order.
    pub creations: Vec<CreationOutcome>,
    pub resolution: ResolutionReport,
    pub links: Vec<LinkOutcome>,
    pub summary: LinkingSummary,
}

/// Runs the linked-document workflow against a [`DocumentApi`].
///
/// One linker accepts one submission at a time; a second concurrent
/// [`submit`](Self::submit) returns [`LinkingError::Busy`].
#[derive(Debug)]
pub struct DocumentLinker<A> {
    api: A,
    config: LinkingConfig,
    busy: AtomicBool,
}

impl<A: DocumentApi> DocumentLinker<A> {
    pub fn new(api: A, config: LinkingConfig) -> Self {
        Self {
            api,
            config,
            busy: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn config(&self) -> &LinkingConfig {
        &self.config
    }

    /// Whether a submission is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Validate `submission` without submitting it.
    pub fn validate(
        &self,
        submission: &DocumentSubmission,
        catalog: &[Subcategory],
    ) -> Result<ValidatedSubmission, LinkingError> {
        validate(submission, catalog, self.config.fallback).map_err(LinkingError::Validation)
    }

    /// Validate and run one submission.
    ///
    /// `catalog` is the incubator's subcategory catalog; it decides
    /// subcategory ownership and fallback targets.
    pub async fn submit(
        &self,
        submission: &DocumentSubmission,
        catalog: &[Subcategory],
        ctx: &SessionContext,
    ) -> Result<LinkingReport, LinkingError> {
        let _guard = BusyGuard::acquire(&self.busy).ok_or(LinkingError::Busy)?;
        let validated = self.validate(submission, catalog)?;
        Ok(self.run(&validated, ctx).await)
    }

    async fn run(&self, submission: &ValidatedSubmission, ctx: &SessionContext) -> LinkingReport {
        let name = submission.descriptor.name.as_str();
        tracing::info!(
            document = name,
            targets = submission.targets.len(),
            "submitting linked document"
        );

        let baseline = take_baseline(&self.api, name, &submission.targets, ctx, &self.config)
            .instrument(tracing::info_span!("snapshot"))
            .await;

        let creations = create_documents(
            &self.api,
            &submission.descriptor,
            &submission.targets,
            ctx,
            &self.config,
        )
        .instrument(tracing::info_span!("create", targets = submission.targets.len()))
        .await;

        let created: Vec<CreatedTarget> = creations
            .iter()
            .filter_map(|c| {
                c.result.as_ref().ok().map(|doc| CreatedTarget {
                    target: c.target,
                    response_id: doc.id.document_id(),
                })
            })
            .collect();

        let (resolution, links) = if created.is_empty() {
            tracing::warn!(document = name, "no document was created; skipping linking");
            let resolution = ResolutionReport {
                preexisting: baseline.len(),
                ..ResolutionReport::default()
            };
            (resolution, Vec::new())
        } else {
            let resolution =
                resolve_identifiers(&self.api, name, &created, &baseline, ctx, &self.config)
                    .instrument(tracing::info_span!("resolve", created = created.len()))
                    .await;

            let edges = plan_links(&resolution.resolved);
            let links = create_links(&self.api, &edges, ctx, &self.config)
                .instrument(tracing::info_span!("link", edges = edges.len()))
                .await;
            (resolution, links)
        };

        let summary = summarize(name, &creations, &resolution, &links);
        tracing::info!(status = ?summary.status, "{}", summary.headline());

        LinkingReport {
            targets: submission.targets.clone(),
            defaulted: submission.defaulted.clone(),
            creations,
            resolution,
            links,
            summary,
        }
    }
}

/// Holds the linker's busy flag; clears it on drop, on every exit path.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
