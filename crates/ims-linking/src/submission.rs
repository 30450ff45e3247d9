//! Raw form state as entered by the operator, before validation.

use std::collections::BTreeMap;

use ims_core::{
    Attachment, CategoryId, DocumentDescriptor, PeriodicityId, SubcategoryId, Target,
};

/// One "add document" form submission.
///
/// Free-text fields are kept exactly as typed; empty optional text means
/// "not provided". The two selection maps mirror the form's checkbox state:
/// an entry set to `false` is the same as no entry.
#[derive(Debug, Clone, Default)]
pub struct DocumentSubmission {
    pub name: String,
    pub description: String,
    pub category_id: Option<CategoryId>,
    pub subcategory_id: Option<SubcategoryId>,
    pub periodicity_id: Option<PeriodicityId>,
    /// `mandatory` or `selective`, any case.
    pub applicability: String,
    pub reference_link: String,
    pub applicability_note: String,
    pub remarks: String,
    pub attachment: Option<Attachment>,
    /// Additional categories the document should also be filed under.
    pub selected_categories: BTreeMap<CategoryId, bool>,
    /// Explicit subcategory choices for the additional categories.
    pub selected_subcategories: BTreeMap<SubcategoryId, bool>,
}

impl DocumentSubmission {
    /// Check an additional category.
    pub fn select_category(&mut self, id: CategoryId) -> &mut Self {
        self.selected_categories.insert(id, true);
        self
    }

    /// Check an additional subcategory.
    pub fn select_subcategory(&mut self, id: SubcategoryId) -> &mut Self {
        self.selected_subcategories.insert(id, true);
        self
    }

    /// Categories whose checkbox is set, in ascending id order.
    pub fn checked_categories(&self) -> impl Iterator<Item = CategoryId> + '_ {
        self.selected_categories
            .iter()
            .filter(|(_, on)| **on)
            .map(|(id, _)| *id)
    }

    /// Whether a subcategory's checkbox is set.
    pub fn is_subcategory_checked(&self, id: SubcategoryId) -> bool {
        self.selected_subcategories.get(&id).copied().unwrap_or(false)
    }
}

/// A submission that passed validation: the descriptor to send and the
/// ordered, duplicate-free target list (primary first).
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub descriptor: DocumentDescriptor,
    pub targets: Vec<Target>,
    /// Categories that were filed under their default subcategory because
    /// none was checked.
    pub defaulted: Vec<CategoryId>,
}

impl ValidatedSubmission {
    /// The primary filing location.
    pub fn primary(&self) -> Option<Target> {
        self.targets.first().copied()
    }
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}
