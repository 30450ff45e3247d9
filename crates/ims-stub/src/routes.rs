// SPDX-License-Identifier: BUSL-1.1
//! Route definitions for the platform API stub.
//!
//! Implements the endpoints that `ims-client` calls, wrapped in the
//! platform's `{statusCode, message, data}` envelope. Domain rejections are
//! HTTP 200 with a non-200 `statusCode`; unknown document ids are HTTP 404.
//!
//! Single-document routes are scoped to a tenant: `GET` and `DELETE` take
//! `?incubatorId=`, `PUT` uses the body's `incubatorId`. A row of another
//! incubator answers exactly like a missing one. `GET`/`DELETE` without the
//! query parameter are unscoped.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use chrono::Utc;
use ims_core::{
    Applicability, CategoryId, DocumentId, DocumentRecord, IncubatorId, LinkRecord,
    PeriodicityId, SubcategoryId, UserId,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::store::{AppState, StoredDocument};

/// Build the complete router with all stub routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health))
        // Catalog
        .route("/api/v1/categories", get(categories_list))
        .route("/api/v1/subcategories", get(subcategories_list))
        .route("/api/v1/periodicities", get(periodicities_list))
        // Documents
        .route("/api/v1/documents", post(document_create).get(document_list))
        .route(
            "/api/v1/documents/:id",
            get(document_get).put(document_update).delete(document_delete),
        )
        // Links
        .route("/api/v1/document-links", post(link_create).get(link_list))
        // Fallback: 501 Not Implemented
        .fallback(not_implemented)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Envelope ────────────────────────────────────────────────────────

fn ok<T: Serialize>(message: &str, data: T) -> Response {
    Json(json!({ "statusCode": 200, "message": message, "data": data })).into_response()
}

fn rejected(status_code: i64, message: impl Into<String>) -> Response {
    Json(json!({ "statusCode": status_code, "message": message.into(), "data": null }))
        .into_response()
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "statusCode": 404, "message": message, "data": null })),
    )
        .into_response()
}

// ── Health ──────────────────────────────────────────────────────────

async fn health() -> StatusCode {
    StatusCode::OK
}

// ── Catalog ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogQuery {
    #[allow(dead_code)]
    incubator_id: Option<IncubatorId>,
    category_id: Option<CategoryId>,
}

async fn categories_list(State(state): State<AppState>) -> Response {
    ok("Categories fetched", state.categories())
}

async fn subcategories_list(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Response {
    let subs: Vec<_> = state
        .subcategories()
        .iter()
        .filter(|s| query.category_id.map_or(true, |c| s.category_id == c))
        .collect();
    ok("Subcategories fetched", subs)
}

async fn periodicities_list(State(state): State<AppState>) -> Response {
    ok("Periodicities fetched", state.periodicities())
}

// ── Documents ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SampleBody {
    file_name: String,
    content_base64: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentBody {
    document_name: String,
    #[serde(default)]
    description: String,
    periodicity_id: PeriodicityId,
    applicability: Applicability,
    #[serde(default)]
    reference_link: Option<String>,
    #[serde(default)]
    applicability_note: Option<String>,
    #[serde(default)]
    remarks: Option<String>,
    #[serde(default)]
    sample_document: Option<SampleBody>,
    category_id: CategoryId,
    subcategory_id: SubcategoryId,
    incubator_id: IncubatorId,
    #[serde(default)]
    created_by: Option<UserId>,
    #[serde(default)]
    modified_by: Option<UserId>,
}

impl DocumentBody {
    /// Check the body against the catalog; returns the stored sample file
    /// name on success.
    fn check(&self, state: &AppState) -> Result<Option<String>, Response> {
        if self.document_name.trim().is_empty() {
            return Err(rejected(400, "Document name is required"));
        }
        if !state.owns(self.category_id, self.subcategory_id) {
            return Err(rejected(
                400,
                format!(
                    "Subcategory {} does not belong to category {}",
                    self.subcategory_id, self.category_id
                ),
            ));
        }
        match &self.sample_document {
            None => Ok(None),
            Some(sample) => base64::engine::general_purpose::STANDARD
                .decode(&sample.content_base64)
                .map(|_| Some(sample.file_name.clone()))
                .map_err(|_| rejected(400, "Sample document is not valid base64")),
        }
    }
}

async fn document_create(
    State(state): State<AppState>,
    Json(body): Json<DocumentBody>,
) -> Response {
    let sample_file_name = match body.check(&state) {
        Ok(name) => name,
        Err(resp) => return resp,
    };

    let id = state.next_document_id();
    let record = DocumentRecord {
        id: DocumentId::new(id),
        document_name: body.document_name.trim().to_string(),
        description: body.description,
        category_id: body.category_id,
        subcategory_id: body.subcategory_id,
        periodicity_id: Some(body.periodicity_id),
        applicability: Some(body.applicability),
        reference_link: body.reference_link,
        applicability_note: body.applicability_note,
        remarks: body.remarks,
        sample_file_name,
        created_by: body.created_by,
        created_at: Some(Utc::now()),
    };
    state.documents().insert(
        id,
        StoredDocument {
            incubator_id: body.incubator_id,
            record,
        },
    );
    tracing::debug!(id, "document stored");

    if state.options().omit_create_ids {
        ok("Document added successfully", "Document added successfully")
    } else {
        ok("Document added successfully", id)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentQuery {
    incubator_id: Option<IncubatorId>,
    category_id: Option<CategoryId>,
    subcategory_id: Option<SubcategoryId>,
}

async fn document_list(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Response {
    let mut rows: Vec<DocumentRecord> = state
        .documents()
        .iter()
        .filter(|e| query.incubator_id.map_or(true, |i| e.incubator_id == i))
        .filter(|e| query.category_id.map_or(true, |c| e.record.category_id == c))
        .filter(|e| query.subcategory_id.map_or(true, |s| e.record.subcategory_id == s))
        .map(|e| e.record.clone())
        .collect();
    rows.sort_by_key(|r| r.id);
    ok("Documents fetched", rows)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TenantQuery {
    incubator_id: Option<IncubatorId>,
}

impl TenantQuery {
    fn sees(&self, doc: &StoredDocument) -> bool {
        self.incubator_id.map_or(true, |i| doc.incubator_id == i)
    }
}

async fn document_get(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(tenant): Query<TenantQuery>,
) -> Response {
    match state.documents().get(&id).filter(|e| tenant.sees(e.value())) {
        Some(entry) => ok("Document fetched", &entry.value().record),
        None => not_found("Document not found"),
    }
}

async fn document_update(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(body): Json<DocumentBody>,
) -> Response {
    let owned = state
        .documents()
        .get(&id)
        .map_or(false, |e| e.incubator_id == body.incubator_id);
    if !owned {
        return not_found("Document not found");
    }
    let sample_file_name = match body.check(&state) {
        Ok(name) => name,
        Err(resp) => return resp,
    };

    match state.documents().get_mut(&id) {
        Some(mut entry) => {
            let record = &mut entry.value_mut().record;
            record.document_name = body.document_name.trim().to_string();
            record.description = body.description;
            record.category_id = body.category_id;
            record.subcategory_id = body.subcategory_id;
            record.periodicity_id = Some(body.periodicity_id);
            record.applicability = Some(body.applicability);
            record.reference_link = body.reference_link;
            record.applicability_note = body.applicability_note;
            record.remarks = body.remarks;
            if sample_file_name.is_some() {
                record.sample_file_name = sample_file_name;
            }
            tracing::debug!(id, modified_by = ?body.modified_by, "document updated");
            ok("Document updated successfully", json!(null))
        }
        None => not_found("Document not found"),
    }
}

async fn document_delete(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(tenant): Query<TenantQuery>,
) -> Response {
    match state.documents().remove_if(&id, |_, doc| tenant.sees(doc)) {
        Some(_) => {
            let doc = DocumentId::new(id);
            state.links().retain(|_, link| link.document_id != doc);
            ok("Document deleted successfully", json!(null))
        }
        None => not_found("Document not found"),
    }
}

// ── Links ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkBody {
    document_id: DocumentId,
    subcategory_id: SubcategoryId,
    #[allow(dead_code)]
    created_by: Option<UserId>,
}

async fn link_create(State(state): State<AppState>, Json(body): Json<LinkBody>) -> Response {
    if !state.documents().contains_key(&body.document_id.get()) {
        return rejected(404, format!("Document {} not found", body.document_id));
    }
    if !state.subcategories().iter().any(|s| s.id == body.subcategory_id) {
        return rejected(400, format!("Unknown subcategory {}", body.subcategory_id));
    }

    let id = state.next_link_id();
    state.links().insert(
        id,
        LinkRecord {
            id: Some(id),
            document_id: body.document_id,
            subcategory_id: body.subcategory_id,
            created_at: Some(Utc::now()),
        },
    );
    ok("Document linked successfully", json!({ "linkId": id }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkQuery {
    document_id: Option<DocumentId>,
}

async fn link_list(State(state): State<AppState>, Query(query): Query<LinkQuery>) -> Response {
    let mut links: Vec<LinkRecord> = state
        .links()
        .iter()
        .filter(|e| query.document_id.map_or(true, |d| e.document_id == d))
        .map(|e| e.value().clone())
        .collect();
    links.sort_by_key(|l| l.id);
    ok("Links fetched", links)
}

// ── Fallback ────────────────────────────────────────────────────────

async fn not_implemented() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}
