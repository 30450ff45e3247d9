//! # Target Set Resolution
//!
//! Turns the form's selection state into the ordered list of filing
//! locations, primary first:
//!
//! 1. The primary target.
//! 2. For each checked category (ascending id): every checked subcategory
//!    of that category, in catalog order, skipping targets already listed.
//! 3. A checked category with no checked subcategory falls back to its
//!    first catalog subcategory under [`FallbackPolicy::FirstSubcategory`],
//!    and is reported as unresolved under
//!    [`FallbackPolicy::RequireExplicit`].
//!
//! A checked category with no catalog subcategories cannot produce a
//! target and is always reported as unresolved.

use std::collections::HashSet;

use ims_core::{CategoryId, Subcategory, Target};

use crate::config::FallbackPolicy;
use crate::submission::DocumentSubmission;

/// Result of resolving a submission's target set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlan {
    /// Ordered, duplicate-free targets; `targets[0]` is the primary.
    pub targets: Vec<Target>,
    /// Categories filed under their first catalog subcategory.
    pub defaulted: Vec<CategoryId>,
    /// Checked categories that produced no target and are not covered by
    /// an existing one.
    pub unresolved: Vec<CategoryId>,
}

/// Resolve the target list for `primary` and the submission's selections.
pub fn resolve_targets(
    primary: Target,
    submission: &DocumentSubmission,
    catalog: &[Subcategory],
    policy: FallbackPolicy,
) -> TargetPlan {
    let mut targets = vec![primary];
    let mut seen: HashSet<Target> = HashSet::from([primary]);
    let mut defaulted = Vec::new();
    let mut unresolved = Vec::new();

    for category_id in submission.checked_categories() {
        let mut owned = catalog.iter().filter(|s| s.category_id == category_id);

        let explicit: Vec<Target> = owned
            .clone()
            .filter(|s| submission.is_subcategory_checked(s.id))
            .map(|s| Target::new(category_id, s.id))
            .collect();

        if !explicit.is_empty() {
            for target in explicit {
                if seen.insert(target) {
                    targets.push(target);
                }
            }
            continue;
        }

        match (policy, owned.next()) {
            (FallbackPolicy::FirstSubcategory, Some(first)) => {
                let target = Target::new(category_id, first.id);
                if seen.insert(target) {
                    targets.push(target);
                }
                defaulted.push(category_id);
            }
            _ => unresolved.push(category_id),
        }
    }

    TargetPlan {
        targets,
        defaulted,
        unresolved,
    }
}
