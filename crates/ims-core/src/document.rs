//! # Document Model
//!
//! The values that flow through document creation and linking:
//!
//! - [`DocumentDescriptor`] — the user-entered fields shared by every row a
//!   single submission creates.
//! - [`Target`] — a (category, subcategory) filing location.
//! - [`DocumentRecord`] — a persisted row as returned by the list endpoint.
//! - [`LinkRecord`] — a directed "also filed under" edge from a document to
//!   a subcategory.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{CategoryId, DocumentId, PeriodicityId, SubcategoryId, UserId};

/// Whether a document is required of every startup or only of some.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Applicability {
    /// Every incubated startup must submit the document.
    #[serde(alias = "Mandatory", alias = "MANDATORY")]
    Mandatory,
    /// Only startups matching the applicability note must submit it.
    #[serde(alias = "Selective", alias = "SELECTIVE")]
    Selective,
}

impl Applicability {
    /// Wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mandatory => "mandatory",
            Self::Selective => "selective",
        }
    }
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Applicability {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mandatory" => Ok(Self::Mandatory),
            "selective" => Ok(Self::Selective),
            _ => Err(ValidationError::InvalidApplicability(s.to_string())),
        }
    }
}

/// A sample or template file attached to a document definition.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Original file name, e.g. `audit-template.xlsx`.
    pub file_name: String,
    /// MIME type, if known.
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The user-entered fields shared by every document row a submission creates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDescriptor {
    /// Document name. Used, together with the target, to find the created
    /// row again after creation.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Submission periodicity.
    pub periodicity_id: PeriodicityId,
    /// Mandatory or selective.
    pub applicability: Applicability,
    /// Optional `http(s)` reference link.
    pub reference_link: Option<String>,
    /// Which startups a selective document applies to.
    pub applicability_note: Option<String>,
    /// Internal remarks.
    pub remarks: Option<String>,
    /// Optional sample/template file.
    pub attachment: Option<Attachment>,
}

/// A (category, subcategory) filing location for one document instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// Category key.
    pub category_id: CategoryId,
    /// Subcategory key; belongs to `category_id`.
    pub subcategory_id: SubcategoryId,
}

impl Target {
    /// Build a target from its two keys.
    pub fn new(category_id: CategoryId, subcategory_id: SubcategoryId) -> Self {
        Self {
            category_id,
            subcategory_id,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.category_id, self.subcategory_id)
    }
}

impl FromStr for Target {
    type Err = ValidationError;

    /// Parse `<categoryId>:<subcategoryId>`, e.g. `1:10`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cat, sub) = s
            .split_once(':')
            .ok_or_else(|| ValidationError::InvalidTarget(s.to_string()))?;
        let category_id = cat
            .parse()
            .map_err(|_| ValidationError::InvalidTarget(s.to_string()))?;
        let subcategory_id = sub
            .parse()
            .map_err(|_| ValidationError::InvalidTarget(s.to_string()))?;
        Ok(Self::new(category_id, subcategory_id))
    }
}

/// A persisted document row as returned by the platform list endpoint.
///
/// Optional fields use `#[serde(default)]`; the endpoint returns extra
/// columns that are not modeled here and `deny_unknown_fields` is not used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Backend-assigned key.
    #[serde(alias = "documentId")]
    pub id: DocumentId,
    /// Document name.
    #[serde(alias = "name")]
    pub document_name: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Category the row is filed under.
    pub category_id: CategoryId,
    /// Subcategory the row is filed under.
    pub subcategory_id: SubcategoryId,
    /// Submission periodicity.
    #[serde(default)]
    pub periodicity_id: Option<PeriodicityId>,
    /// Mandatory or selective.
    #[serde(default)]
    pub applicability: Option<Applicability>,
    /// Reference link.
    #[serde(default)]
    pub reference_link: Option<String>,
    /// Applicability note.
    #[serde(default)]
    pub applicability_note: Option<String>,
    /// Remarks.
    #[serde(default)]
    pub remarks: Option<String>,
    /// File name of the stored sample, if any.
    #[serde(default)]
    pub sample_file_name: Option<String>,
    /// Creating user.
    #[serde(default)]
    pub created_by: Option<UserId>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl DocumentRecord {
    /// The filing location of this row.
    pub fn target(&self) -> Target {
        Target::new(self.category_id, self.subcategory_id)
    }
}

/// A directed edge: `document_id` is also filed under `subcategory_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Link row key, when the backend returns one.
    #[serde(default, alias = "linkId")]
    pub id: Option<u64>,
    /// Source document.
    pub document_id: DocumentId,
    /// Subcategory the document additionally appears under.
    pub subcategory_id: SubcategoryId,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
