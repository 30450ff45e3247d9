//! # Submission Validation
//!
//! Rejects a submission before any network call. Every rule that fails
//! contributes one message under its form field name; the workflow refuses
//! to run while any message is present.
//!
//! | Field | Rule |
//! |-------|------|
//! | `name` | required, 3..=100 characters after trimming |
//! | `description` | required, 10..=500 characters after trimming |
//! | `categoryId` | required |
//! | `subcategoryId` | required, must belong to `categoryId` in the catalog |
//! | `periodicityId` | required |
//! | `applicability` | `mandatory` or `selective` |
//! | `referenceLink` | empty, or an absolute `http`/`https` URL |
//! | `sampleDocument` | named, non-empty, at most [`MAX_ATTACHMENT_BYTES`] |
//! | `additionalCategories` | every checked category yields a target |

use ims_core::{Applicability, DocumentDescriptor, Subcategory, Target};

use crate::config::FallbackPolicy;
use crate::error::FieldErrors;
use crate::submission::{non_empty, DocumentSubmission, ValidatedSubmission};
use crate::targets::resolve_targets;

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 500;
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Validate `submission` against the subcategory `catalog`.
///
/// On success returns the descriptor and resolved target list; on failure
/// returns every field message at once.
pub fn validate(
    submission: &DocumentSubmission,
    catalog: &[Subcategory],
    policy: FallbackPolicy,
) -> Result<ValidatedSubmission, FieldErrors> {
    let mut errors = FieldErrors::new();

    check_length(
        &mut errors,
        "name",
        "Document name",
        &submission.name,
        NAME_MIN,
        NAME_MAX,
    );
    check_length(
        &mut errors,
        "description",
        "Description",
        &submission.description,
        DESCRIPTION_MIN,
        DESCRIPTION_MAX,
    );

    if submission.category_id.is_none() {
        errors.insert("categoryId", "Select a category");
    }
    match (submission.category_id, submission.subcategory_id) {
        (_, None) => errors.insert("subcategoryId", "Select a subcategory"),
        (Some(cat), Some(sub)) => match catalog.iter().find(|s| s.id == sub) {
            None => errors.insert("subcategoryId", format!("Unknown subcategory {sub}")),
            Some(s) if s.category_id != cat => errors.insert(
                "subcategoryId",
                format!("Subcategory {sub} does not belong to category {cat}"),
            ),
            Some(_) => {}
        },
        (None, Some(_)) => {}
    }

    if submission.periodicity_id.is_none() {
        errors.insert("periodicityId", "Select a periodicity");
    }

    let applicability = match submission.applicability.parse::<Applicability>() {
        Ok(a) => Some(a),
        Err(_) => {
            errors.insert("applicability", "Choose mandatory or selective");
            None
        }
    };

    let reference_link = non_empty(&submission.reference_link);
    if let Some(link) = &reference_link {
        if !is_http_url(link) {
            errors.insert(
                "referenceLink",
                "Enter a valid URL starting with http:// or https://",
            );
        }
    }

    if let Some(attachment) = &submission.attachment {
        if attachment.file_name.trim().is_empty() {
            errors.insert("sampleDocument", "Sample file has no name");
        } else if attachment.bytes.is_empty() {
            errors.insert("sampleDocument", "Sample file is empty");
        } else if attachment.bytes.len() > MAX_ATTACHMENT_BYTES {
            errors.insert(
                "sampleDocument",
                format!(
                    "Sample file exceeds {} MB",
                    MAX_ATTACHMENT_BYTES / (1024 * 1024)
                ),
            );
        }
    }

    let plan = match (submission.category_id, submission.subcategory_id) {
        (Some(cat), Some(sub)) => {
            let plan = resolve_targets(Target::new(cat, sub), submission, catalog, policy);
            if !plan.unresolved.is_empty() {
                let ids: Vec<String> = plan.unresolved.iter().map(|c| c.to_string()).collect();
                let message = match policy {
                    FallbackPolicy::RequireExplicit => format!(
                        "Select at least one subcategory for category {}",
                        ids.join(", ")
                    ),
                    FallbackPolicy::FirstSubcategory => format!(
                        "No subcategory available for category {}",
                        ids.join(", ")
                    ),
                };
                errors.insert("additionalCategories", message);
            }
            Some(plan)
        }
        _ => None,
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    // Every `None` above recorded an error, so these are all present here.
    match (plan, submission.periodicity_id, applicability) {
        (Some(plan), Some(periodicity_id), Some(applicability)) => Ok(ValidatedSubmission {
            descriptor: DocumentDescriptor {
                name: submission.name.trim().to_string(),
                description: submission.description.trim().to_string(),
                periodicity_id,
                applicability,
                reference_link,
                applicability_note: non_empty(&submission.applicability_note),
                remarks: non_empty(&submission.remarks),
                attachment: submission.attachment.clone(),
            },
            targets: plan.targets,
            defaulted: plan.defaulted,
        }),
        _ => Err(errors),
    }
}

fn check_length(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.trim().chars().count();
    if len == 0 {
        errors.insert(field, format!("{label} is required"));
    } else if len < min {
        errors.insert(field, format!("{label} must be at least {min} characters"));
    } else if len > max {
        errors.insert(field, format!("{label} must be at most {max} characters"));
    }
}

fn is_http_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ims_core::{Attachment, CategoryId, PeriodicityId, SubcategoryId};

    fn catalog() -> Vec<Subcategory> {
        [(10, 1), (11, 1), (21, 2), (22, 2)]
            .into_iter()
            .map(|(s, c)| Subcategory {
                id: SubcategoryId::new(s),
                category_id: CategoryId::new(c),
                name: String::new(),
            })
            .collect()
    }

    fn valid() -> DocumentSubmission {
        DocumentSubmission {
            name: "Audit Report".into(),
            description: "Quarterly audit report for board review".into(),
            category_id: Some(CategoryId::new(1)),
            subcategory_id: Some(SubcategoryId::new(10)),
            periodicity_id: Some(PeriodicityId::new(2)),
            applicability: "mandatory".into(),
            ..Default::default()
        }
    }

    #[test]
    fn valid_submission_produces_descriptor_and_targets() {
        let mut form = valid();
        form.reference_link = " https://example.com/audit ".into();
        form.remarks = "   ".into();
        let ok = validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).unwrap();
        assert_eq!(ok.descriptor.name, "Audit Report");
        assert_eq!(ok.descriptor.reference_link.as_deref(), Some("https://example.com/audit"));
        assert_eq!(ok.descriptor.remarks, None);
        assert_eq!(ok.targets.len(), 1);
        assert_eq!(ok.primary().map(|t| t.to_string()).as_deref(), Some("1:10"));
    }

    #[test]
    fn short_name_fails_on_name_only() {
        let mut form = valid();
        form.name = "Au".into();
        form.reference_link = "https://example.com".into();
        let errs = validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).unwrap_err();
        assert_eq!(errs.fields().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(errs.get("name"), Some("Document name must be at least 3 characters"));
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let errs = validate(
            &DocumentSubmission::default(),
            &catalog(),
            FallbackPolicy::FirstSubcategory,
        )
        .unwrap_err();
        for field in [
            "name",
            "description",
            "categoryId",
            "subcategoryId",
            "periodicityId",
            "applicability",
        ] {
            assert!(errs.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn length_limits_are_enforced() {
        let mut form = valid();
        form.name = "x".repeat(NAME_MAX + 1);
        form.description = "too short".into();
        let errs = validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).unwrap_err();
        assert_eq!(errs.get("name"), Some("Document name must be at most 100 characters"));
        assert_eq!(
            errs.get("description"),
            Some("Description must be at least 10 characters")
        );

        let mut form = valid();
        form.description = "d".repeat(DESCRIPTION_MAX + 1);
        let errs = validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).unwrap_err();
        assert_eq!(errs.fields().collect::<Vec<_>>(), vec!["description"]);
        assert_eq!(
            errs.get("description"),
            Some("Description must be at most 500 characters")
        );

        form.description = "d".repeat(DESCRIPTION_MAX);
        assert!(validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).is_ok());
    }

    #[test]
    fn non_http_links_are_rejected() {
        for bad in ["ftp://example.com", "example.com", "http://", "javascript:alert(1)"] {
            let mut form = valid();
            form.reference_link = bad.into();
            let errs = validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).unwrap_err();
            assert!(errs.contains("referenceLink"), "{bad} should be rejected");
        }
    }

    #[test]
    fn subcategory_must_belong_to_category() {
        let mut form = valid();
        form.subcategory_id = Some(SubcategoryId::new(21));
        let errs = validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).unwrap_err();
        assert_eq!(
            errs.get("subcategoryId"),
            Some("Subcategory 21 does not belong to category 1")
        );
    }

    #[test]
    fn require_explicit_blocks_unchecked_category() {
        let mut form = valid();
        form.select_category(CategoryId::new(2));
        let errs = validate(&form, &catalog(), FallbackPolicy::RequireExplicit).unwrap_err();
        assert_eq!(
            errs.get("additionalCategories"),
            Some("Select at least one subcategory for category 2")
        );

        let ok = validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).unwrap();
        assert_eq!(ok.targets.len(), 2);
        assert_eq!(ok.defaulted, vec![CategoryId::new(2)]);
    }

    #[test]
    fn category_without_subcategories_blocks_even_with_fallback() {
        let mut form = valid();
        form.select_category(CategoryId::new(2))
            .select_category(CategoryId::new(3));
        let errs = validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).unwrap_err();
        assert_eq!(errs.fields().collect::<Vec<_>>(), vec!["additionalCategories"]);
        assert_eq!(
            errs.get("additionalCategories"),
            Some("No subcategory available for category 3")
        );
    }

    #[test]
    fn oversized_attachment_is_rejected() {
        let mut form = valid();
        form.attachment = Some(Attachment {
            file_name: "big.bin".into(),
            content_type: None,
            bytes: vec![0u8; MAX_ATTACHMENT_BYTES + 1],
        });
        let errs = validate(&form, &catalog(), FallbackPolicy::FirstSubcategory).unwrap_err();
        assert_eq!(errs.get("sampleDocument"), Some("Sample file exceeds 10 MB"));
    }
}
