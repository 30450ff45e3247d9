//! Outcome summary for one workflow run.

use std::fmt;

use serde::Serialize;

use crate::creation::CreationOutcome;
use crate::links::LinkOutcome;
use crate::resolution::ResolutionReport;

/// Overall status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    /// Every target created and resolved, every link created.
    Success,
    /// At least one document was created, but something failed or stayed
    /// unresolved.
    Partial,
    /// No document was created.
    Failure,
}

/// Counts and failure messages for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkingSummary {
    pub status: SummaryStatus,
    pub documents_created: usize,
    pub documents_failed: usize,
    /// Created, but never found in the refreshed list.
    pub documents_unresolved: usize,
    pub links_created: usize,
    pub links_failed: usize,
    /// One message per failed call or unresolved row, in phase order.
    pub failures: Vec<String>,
}

impl LinkingSummary {
    /// Failed creates, unresolved rows and failed links together.
    pub fn failed(&self) -> usize {
        self.documents_failed + self.documents_unresolved + self.links_failed
    }

    /// The one-line headline, e.g. "2 documents created, 2 links created,
    /// 0 failed".
    pub fn headline(&self) -> String {
        format!(
            "{}, {}, {} failed",
            plural(self.documents_created, "document"),
            plural(self.links_created, "link"),
            self.failed()
        )
    }
}

impl fmt::Display for LinkingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline())?;
        for failure in &self.failures {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun} created")
    } else {
        format!("{n} {noun}s created")
    }
}

/// Build the summary from the three phase results.
pub fn summarize(
    name: &str,
    creations: &[CreationOutcome],
    resolution: &ResolutionReport,
    links: &[LinkOutcome],
) -> LinkingSummary {
    let mut failures = Vec::new();

    let documents_created = creations.iter().filter(|c| c.is_success()).count();
    let documents_failed = creations.len() - documents_created;
    for c in creations {
        if let Err(e) = &c.result {
            failures.push(format!("\"{name}\" under {}: {e}", c.target));
        }
    }

    for target in &resolution.unresolved {
        failures.push(format!(
            "\"{name}\" under {target}: created but not found in the document list"
        ));
    }

    let links_created = links.iter().filter(|l| l.is_success()).count();
    let links_failed = links.len() - links_created;
    for l in links {
        if let Err(e) = &l.result {
            failures.push(format!("link {}: {e}", l.edge));
        }
    }

    let status = if documents_created == 0 {
        SummaryStatus::Failure
    } else if documents_failed + resolution.unresolved.len() + links_failed > 0 {
        SummaryStatus::Partial
    } else {
        SummaryStatus::Success
    };

    LinkingSummary {
        status,
        documents_created,
        documents_failed,
        documents_unresolved: resolution.unresolved.len(),
        links_created,
        links_failed,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallFailure;
    use crate::links::LinkEdge;
    use ims_client::{ApiError, CreatedDocument, CreatedId};
    use ims_core::{CategoryId, DocumentId, SubcategoryId, Target};
    use serde_json::Value;
    use std::time::Duration;

    fn t(c: u64, s: u64) -> Target {
        Target::new(CategoryId::new(c), SubcategoryId::new(s))
    }

    fn created(target: Target) -> CreationOutcome {
        CreationOutcome {
            target,
            result: Ok(CreatedDocument {
                id: CreatedId::Unknown(Value::Null),
                message: String::new(),
            }),
        }
    }

    fn failed(target: Target) -> CreationOutcome {
        CreationOutcome {
            target,
            result: Err(CallFailure::Api(ApiError::Rejected {
                endpoint: "POST /documents".into(),
                status_code: 409,
                message: "duplicate".into(),
            })),
        }
    }

    fn link(ok: bool) -> LinkOutcome {
        LinkOutcome {
            edge: LinkEdge {
                from_document: DocumentId::new(5),
                to_subcategory: SubcategoryId::new(21),
            },
            result: if ok {
                Ok(())
            } else {
                Err(CallFailure::TimedOut(Duration::from_secs(30)))
            },
        }
    }

    #[test]
    fn all_good_is_success() {
        let s = summarize(
            "Audit Report",
            &[created(t(1, 10)), created(t(2, 21))],
            &ResolutionReport::default(),
            &[link(true), link(true)],
        );
        assert_eq!(s.status, SummaryStatus::Success);
        assert_eq!(s.to_string(), "2 documents created, 2 links created, 0 failed");
    }

    #[test]
    fn any_failure_is_partial_and_listed() {
        let s = summarize(
            "Audit Report",
            &[created(t(1, 10)), failed(t(2, 21))],
            &ResolutionReport::default(),
            &[link(false)],
        );
        assert_eq!(s.status, SummaryStatus::Partial);
        assert_eq!(s.headline(), "1 document created, 0 links created, 2 failed");
        assert_eq!(s.failures.len(), 2);
        assert!(s.failures[0].contains("under 2:21"));
        assert!(s.failures[1].starts_with("link document 5 -> subcategory 21"));
    }

    #[test]
    fn unresolved_rows_make_the_run_partial() {
        let resolution = ResolutionReport {
            unresolved: vec![t(2, 21)],
            ..Default::default()
        };
        let s = summarize("Audit Report", &[created(t(1, 10)), created(t(2, 21))], &resolution, &[]);
        assert_eq!(s.status, SummaryStatus::Partial);
        assert_eq!(s.documents_unresolved, 1);
        assert_eq!(s.failed(), 1);
    }

    #[test]
    fn nothing_created_is_failure() {
        let s = summarize("Audit Report", &[failed(t(1, 10))], &ResolutionReport::default(), &[]);
        assert_eq!(s.status, SummaryStatus::Failure);
        assert_eq!(s.headline(), "0 documents created, 0 links created, 1 failed");
    }
}
