//! Catalog reference data: categories, subcategories and periodicities.

use serde::{Deserialize, Serialize};

use crate::identity::{CategoryId, PeriodicityId, SubcategoryId};

/// A top-level document category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category key.
    #[serde(alias = "categoryId")]
    pub id: CategoryId,
    /// Display name.
    #[serde(alias = "categoryName")]
    pub name: String,
}

/// A subcategory and the category that owns it.
///
/// Catalog order matters: the first subcategory listed for a category is
/// that category's default filing location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    /// Subcategory key.
    #[serde(alias = "subcategoryId")]
    pub id: SubcategoryId,
    /// Owning category.
    pub category_id: CategoryId,
    /// Display name.
    #[serde(alias = "subcategoryName")]
    pub name: String,
}

/// How often a document has to be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Periodicity {
    /// Periodicity key.
    #[serde(alias = "periodicityId")]
    pub id: PeriodicityId,
    /// Display name, e.g. "Quarterly".
    #[serde(alias = "periodicityName")]
    pub name: String,
}
