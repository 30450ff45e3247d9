//! Typed client for the document endpoints.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/v1/documents` | Create one document row |
//! | GET    | `/api/v1/documents?incubatorId=&categoryId=&subcategoryId=` | List rows |
//! | GET    | `/api/v1/documents/{id}` | Get by ID |
//! | PUT    | `/api/v1/documents/{id}` | Update one row |
//! | DELETE | `/api/v1/documents/{id}` | Delete one row |
//!
//! ## Create response identifiers
//!
//! The create endpoint's `data` field has no stable shape: deployments have
//! returned a bare number, a numeric string, an object carrying `id` or
//! `documentId`, or a free-text string. [`CreatedId`] records which of these
//! arrived. Callers that need the identifier reliably re-read the list and
//! match the row by name and target.

use base64::Engine;
use ims_core::{
    CategoryId, DocumentDescriptor, DocumentId, DocumentRecord, IncubatorId, SessionContext,
    SubcategoryId, Target,
};
use serde::Serialize;
use serde_json::Value;

use crate::envelope::read_envelope;
use crate::error::ApiError;
use crate::API_PREFIX;

// -- Request types ------------------------------------------------------------

/// Sample/template file as carried inside the JSON body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDocumentPayload {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub content_base64: String,
}

/// Body of `POST /documents` and `PUT /documents/{id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRequest {
    pub document_name: String,
    pub description: String,
    pub periodicity_id: ims_core::PeriodicityId,
    pub applicability: ims_core::Applicability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicability_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_document: Option<SampleDocumentPayload>,
    pub category_id: CategoryId,
    pub subcategory_id: SubcategoryId,
    pub incubator_id: IncubatorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<ims_core::UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<ims_core::UserId>,
}

impl DocumentRequest {
    /// Build the create body for one target.
    pub fn for_create(descriptor: &DocumentDescriptor, target: Target, ctx: &SessionContext) -> Self {
        let mut req = Self::from_descriptor(descriptor, target, ctx);
        req.created_by = Some(ctx.user_id);
        req
    }

    /// Build the update body for one existing row.
    pub fn for_update(descriptor: &DocumentDescriptor, target: Target, ctx: &SessionContext) -> Self {
        let mut req = Self::from_descriptor(descriptor, target, ctx);
        req.modified_by = Some(ctx.user_id);
        req
    }

    fn from_descriptor(descriptor: &DocumentDescriptor, target: Target, ctx: &SessionContext) -> Self {
        Self {
            document_name: descriptor.name.trim().to_string(),
            description: descriptor.description.trim().to_string(),
            periodicity_id: descriptor.periodicity_id,
            applicability: descriptor.applicability,
            reference_link: descriptor.reference_link.clone(),
            applicability_note: descriptor.applicability_note.clone(),
            remarks: descriptor.remarks.clone(),
            sample_document: descriptor.attachment.as_ref().map(|a| SampleDocumentPayload {
                file_name: a.file_name.clone(),
                content_type: a.content_type.clone(),
                content_base64: base64::engine::general_purpose::STANDARD.encode(&a.bytes),
            }),
            category_id: target.category_id,
            subcategory_id: target.subcategory_id,
            incubator_id: ctx.incubator_id,
            created_by: None,
            modified_by: None,
        }
    }
}

/// Query filter for `GET /documents`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incubator_id: Option<IncubatorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<SubcategoryId>,
}

impl DocumentFilter {
    /// All documents of one incubator.
    pub fn incubator(incubator_id: IncubatorId) -> Self {
        Self {
            incubator_id: Some(incubator_id),
            ..Self::default()
        }
    }
}

// -- Response types -----------------------------------------------------------

/// The identifier, if any, carried in a create response's `data` field.
#[derive(Debug, Clone, PartialEq)]
pub enum CreatedId {
    /// `data` was a JSON number.
    Number(DocumentId),
    /// `data` was a string holding a number, e.g. `"42"`.
    NumericString(DocumentId),
    /// `data` was an object with an `id`, `documentId` or `document_id` key.
    Object(DocumentId),
    /// Anything else, kept verbatim for diagnostics.
    Unknown(Value),
}

impl CreatedId {
    /// Classify a create response's `data` value.
    pub fn parse(data: Option<&Value>) -> Self {
        let Some(data) = data else {
            return Self::Unknown(Value::Null);
        };
        match data {
            Value::Number(n) => match n.as_u64().filter(|v| *v > 0) {
                Some(v) => Self::Number(DocumentId::new(v)),
                None => Self::Unknown(data.clone()),
            },
            Value::String(s) => match s.parse::<DocumentId>() {
                Ok(id) => Self::NumericString(id),
                Err(_) => Self::Unknown(data.clone()),
            },
            Value::Object(map) => ["id", "documentId", "document_id"]
                .iter()
                .filter_map(|k| map.get(*k))
                .find_map(scalar_id)
                .map(Self::Object)
                .unwrap_or_else(|| Self::Unknown(data.clone())),
            _ => Self::Unknown(data.clone()),
        }
    }

    /// The parsed identifier, if the response carried one.
    pub fn document_id(&self) -> Option<DocumentId> {
        match self {
            Self::Number(id) | Self::NumericString(id) | Self::Object(id) => Some(*id),
            Self::Unknown(_) => None,
        }
    }
}

fn scalar_id(v: &Value) -> Option<DocumentId> {
    match v {
        Value::Number(n) => n.as_u64().filter(|v| *v > 0).map(DocumentId::new),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Result of a successful create call.
#[derive(Debug, Clone)]
pub struct CreatedDocument {
    /// Whatever identifier the response carried.
    pub id: CreatedId,
    /// Server message, e.g. "Document created successfully".
    pub message: String,
}

// -- Client -------------------------------------------------------------------

/// Client for the document endpoints.
#[derive(Debug, Clone)]
pub struct DocumentClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl DocumentClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Create one document row filed under `target`.
    ///
    /// Calls `POST {base_url}/api/v1/documents`. Sent once, without retry.
    pub async fn create(
        &self,
        descriptor: &DocumentDescriptor,
        target: Target,
        ctx: &SessionContext,
    ) -> Result<CreatedDocument, ApiError> {
        let endpoint = "POST /documents";
        let url = format!("{}{}/documents", self.base_url, API_PREFIX);
        let body = DocumentRequest::for_create(descriptor, target, ctx);

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        let envelope = read_envelope::<Value>(endpoint, resp).await?;
        let id = CreatedId::parse(envelope.data.as_ref());
        tracing::debug!(location = %target, ?id, "document create accepted");
        Ok(CreatedDocument {
            id,
            message: envelope.message,
        })
    }

    /// List document rows matching `filter`.
    ///
    /// Calls `GET {base_url}/api/v1/documents`.
    pub async fn list(&self, filter: &DocumentFilter) -> Result<Vec<DocumentRecord>, ApiError> {
        let endpoint = "GET /documents";
        let url = format!("{}{}/documents", self.base_url, API_PREFIX);

        let resp = crate::retry::retry_send(endpoint, || {
            self.http.get(&url).query(filter).send()
        })
        .await?;

        Ok(read_envelope::<Vec<DocumentRecord>>(endpoint, resp)
            .await?
            .data
            .unwrap_or_default())
    }

    /// Get one document row of `incubator_id` by ID. Returns `Ok(None)` on
    /// HTTP 404, including a row that belongs to another incubator.
    ///
    /// Calls `GET {base_url}/api/v1/documents/{id}?incubatorId=`.
    pub async fn get(
        &self,
        id: DocumentId,
        incubator_id: IncubatorId,
    ) -> Result<Option<DocumentRecord>, ApiError> {
        let endpoint = format!("GET /documents/{id}");
        let url = format!("{}{}/documents/{id}", self.base_url, API_PREFIX);
        let query = DocumentFilter::incubator(incubator_id);

        let resp = crate::retry::retry_send(&endpoint, || {
            self.http.get(&url).query(&query).send()
        })
        .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(read_envelope::<DocumentRecord>(&endpoint, resp).await?.data)
    }

    /// Replace the editable fields of one document row.
    ///
    /// Calls `PUT {base_url}/api/v1/documents/{id}`.
    pub async fn update(
        &self,
        id: DocumentId,
        descriptor: &DocumentDescriptor,
        target: Target,
        ctx: &SessionContext,
    ) -> Result<(), ApiError> {
        let endpoint = format!("PUT /documents/{id}");
        let url = format!("{}{}/documents/{id}", self.base_url, API_PREFIX);
        let body = DocumentRequest::for_update(descriptor, target, ctx);

        let resp = crate::retry::retry_send(&endpoint, || {
            self.http.put(&url).json(&body).send()
        })
        .await?;

        read_envelope::<Value>(&endpoint, resp).await?;
        Ok(())
    }

    /// Delete one document row of `incubator_id`.
    ///
    /// Calls `DELETE {base_url}/api/v1/documents/{id}?incubatorId=`.
    pub async fn delete(&self, id: DocumentId, incubator_id: IncubatorId) -> Result<(), ApiError> {
        let endpoint = format!("DELETE /documents/{id}");
        let url = format!("{}{}/documents/{id}", self.base_url, API_PREFIX);
        let query = DocumentFilter::incubator(incubator_id);

        let resp = crate::retry::retry_send(&endpoint, || {
            self.http.delete(&url).query(&query).send()
        })
        .await?;

        read_envelope::<Value>(&endpoint, resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ims_core::{Applicability, Attachment, PeriodicityId, UserId};
    use serde_json::json;

    #[test]
    fn created_id_parses_every_observed_shape() {
        assert_eq!(
            CreatedId::parse(Some(&json!(42))),
            CreatedId::Number(DocumentId::new(42))
        );
        assert_eq!(
            CreatedId::parse(Some(&json!("42"))),
            CreatedId::NumericString(DocumentId::new(42))
        );
        assert_eq!(
            CreatedId::parse(Some(&json!({ "documentId": "7", "name": "x" }))),
            CreatedId::Object(DocumentId::new(7))
        );
        assert_eq!(
            CreatedId::parse(Some(&json!({ "id": 9 }))),
            CreatedId::Object(DocumentId::new(9))
        );
        let unknown = CreatedId::parse(Some(&json!("Document saved")));
        assert!(matches!(unknown, CreatedId::Unknown(_)));
        assert_eq!(unknown.document_id(), None);
        assert_eq!(CreatedId::parse(None), CreatedId::Unknown(Value::Null));
        assert!(matches!(CreatedId::parse(Some(&json!(0))), CreatedId::Unknown(_)));
    }

    #[test]
    fn create_body_carries_target_session_and_base64_sample() {
        let descriptor = DocumentDescriptor {
            name: "  Audit Report ".into(),
            description: "Quarterly audit report for board review".into(),
            periodicity_id: PeriodicityId::new(3),
            applicability: Applicability::Mandatory,
            reference_link: None,
            applicability_note: None,
            remarks: Some("board pack".into()),
            attachment: Some(Attachment {
                file_name: "t.txt".into(),
                content_type: Some("text/plain".into()),
                bytes: b"hi".to_vec(),
            }),
        };
        let ctx = SessionContext::new(UserId::new(11), IncubatorId::new(2));
        let target: Target = "1:10".parse().unwrap();
        let body = serde_json::to_value(DocumentRequest::for_create(&descriptor, target, &ctx)).unwrap();

        assert_eq!(body["documentName"], "Audit Report");
        assert_eq!(body["categoryId"], 1);
        assert_eq!(body["subcategoryId"], 10);
        assert_eq!(body["incubatorId"], 2);
        assert_eq!(body["createdBy"], 11);
        assert_eq!(body["applicability"], "mandatory");
        assert_eq!(body["sampleDocument"]["contentBase64"], "aGk=");
        assert!(body.get("referenceLink").is_none());
        assert!(body.get("modifiedBy").is_none());
    }

    #[test]
    fn filter_serializes_only_present_fields() {
        let f = DocumentFilter::incubator(IncubatorId::new(4));
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v, json!({ "incubatorId": 4 }));
    }
}
