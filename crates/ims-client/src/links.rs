//! Typed client for the document-link endpoints.
//!
//! A link lets one physical document appear under an additional
//! subcategory.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/v1/document-links` | Create a link edge |
//! | GET    | `/api/v1/document-links?documentId=` | List a document's links |

use ims_core::{DocumentId, LinkRecord, SessionContext, SubcategoryId, UserId};
use serde::Serialize;
use serde_json::Value;

use crate::envelope::read_envelope;
use crate::error::ApiError;
use crate::API_PREFIX;

/// Body of `POST /document-links`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub document_id: DocumentId,
    pub subcategory_id: SubcategoryId,
    pub created_by: UserId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LinkQuery {
    document_id: DocumentId,
}

/// Client for the document-link endpoints.
#[derive(Debug, Clone)]
pub struct LinkClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl LinkClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// Record that `document_id` is also filed under `subcategory_id`.
    ///
    /// Calls `POST {base_url}/api/v1/document-links`. Sent once, without retry.
    pub async fn create(
        &self,
        document_id: DocumentId,
        subcategory_id: SubcategoryId,
        ctx: &SessionContext,
    ) -> Result<(), ApiError> {
        let endpoint = "POST /document-links";
        let url = format!("{}{}/document-links", self.base_url, API_PREFIX);
        let body = CreateLinkRequest {
            document_id,
            subcategory_id,
            created_by: ctx.user_id,
        };

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

        read_envelope::<Value>(endpoint, resp).await?;
        Ok(())
    }

    /// List the link edges whose source is `document_id`.
    ///
    /// Calls `GET {base_url}/api/v1/document-links?documentId={id}`.
    pub async fn list(&self, document_id: DocumentId) -> Result<Vec<LinkRecord>, ApiError> {
        let endpoint = "GET /document-links";
        let url = format!("{}{}/document-links", self.base_url, API_PREFIX);
        let query = LinkQuery { document_id };

        let resp = crate::retry::retry_send(endpoint, || {
            self.http.get(&url).query(&query).send()
        })
        .await?;

        Ok(read_envelope::<Vec<LinkRecord>>(endpoint, resp)
            .await?
            .data
            .unwrap_or_default())
    }
}
