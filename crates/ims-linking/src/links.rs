//! # Pairwise Linking
//!
//! The first resolved document is the anchor. Every other resolved document
//! `r` contributes two edges:
//!
//! - `r.document_id -> anchor.subcategory_id`
//! - `anchor.document_id -> r.subcategory_id`
//!
//! so `N` resolved documents give `2 * (N - 1)` edges, and none when
//! `N <= 1`. The anchor is the primary target's document whenever the
//! primary was created and resolved.

use std::fmt;

use ims_core::{DocumentId, SessionContext, SubcategoryId};

use crate::api::DocumentApi;
use crate::config::LinkingConfig;
use crate::error::CallFailure;
use crate::fanout::settle_all;
use crate::resolution::ResolvedDocument;

/// One "also filed under" edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkEdge {
    pub from_document: DocumentId,
    pub to_subcategory: SubcategoryId,
}

impl fmt::Display for LinkEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "document {} -> subcategory {}",
            self.from_document, self.to_subcategory
        )
    }
}

/// Result of the create call for one edge.
#[derive(Debug)]
pub struct LinkOutcome {
    pub edge: LinkEdge,
    pub result: Result<(), CallFailure>,
}

impl LinkOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Plan the edges for `resolved`, anchor first.
pub fn plan_links(resolved: &[ResolvedDocument]) -> Vec<LinkEdge> {
    let Some((anchor, rest)) = resolved.split_first() else {
        return Vec::new();
    };

    rest.iter()
        .flat_map(|r| {
            [
                LinkEdge {
                    from_document: r.document_id,
                    to_subcategory: anchor.target.subcategory_id,
                },
                LinkEdge {
                    from_document: anchor.document_id,
                    to_subcategory: r.target.subcategory_id,
                },
            ]
        })
        .collect()
}

/// Create every edge and wait for all calls to settle.
pub async fn create_links<A: DocumentApi>(
    api: &A,
    edges: &[LinkEdge],
    ctx: &SessionContext,
    config: &LinkingConfig,
) -> Vec<LinkOutcome> {
    let results = settle_all(
        edges.iter().copied(),
        config.max_concurrency,
        config.call_timeout,
        |edge| api.create_link(edge.from_document, edge.to_subcategory, ctx),
    )
    .await;

    edges
        .iter()
        .zip(results)
        .map(|(&edge, result)| {
            if let Err(e) = &result {
                tracing::warn!(%edge, "link create failed: {e}");
            }
            LinkOutcome { edge, result }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::IdSource;
    use ims_core::{CategoryId, Target};

    fn resolved(id: u64, c: u64, s: u64) -> ResolvedDocument {
        ResolvedDocument {
            target: Target::new(CategoryId::new(c), SubcategoryId::new(s)),
            document_id: DocumentId::new(id),
            source: IdSource::ListLookup,
        }
    }

    fn edge(doc: u64, sub: u64) -> LinkEdge {
        LinkEdge {
            from_document: DocumentId::new(doc),
            to_subcategory: SubcategoryId::new(sub),
        }
    }

    #[test]
    fn two_documents_link_both_ways() {
        let edges = plan_links(&[resolved(101, 1, 10), resolved(102, 2, 21)]);
        assert_eq!(edges, vec![edge(102, 10), edge(101, 21)]);
    }

    #[test]
    fn edge_count_is_twice_the_non_anchor_count() {
        for n in 0..6u64 {
            let docs: Vec<_> = (0..n).map(|i| resolved(100 + i, i + 1, 10 * (i + 1))).collect();
            let expected = if n <= 1 { 0 } else { 2 * (n as usize - 1) };
            assert_eq!(plan_links(&docs).len(), expected, "n = {n}");
        }
    }

    #[test]
    fn every_edge_touches_the_anchor() {
        let docs = [resolved(1, 1, 10), resolved(2, 2, 20), resolved(3, 3, 30)];
        for e in plan_links(&docs) {
            assert!(e.from_document == DocumentId::new(1) || e.to_subcategory == SubcategoryId::new(10));
        }
    }
}
