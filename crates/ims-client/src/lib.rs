//! # ims-client -- Typed Rust client for the incubation platform API
//!
//! Provides typed access to the three endpoint families the document
//! workflows use:
//! - **Catalog** — categories, subcategories, periodicities
//! - **Documents** — create, list, get, update, delete
//! - **Links** — "also filed under" edges between documents and subcategories
//!
//! ## Response Envelope
//!
//! Every endpoint answers with `{statusCode, message, data}`. A call is
//! successful only when the HTTP status is 2xx and `statusCode` equals
//! [`envelope::SUCCESS_CODE`]; everything else becomes an [`ApiError`].
//!
//! ## API Path Convention
//!
//! `{base_url}/api/v1/{resource}`, e.g.
//! `https://api.incubator.example/api/v1/documents`.

pub mod catalog;
pub mod config;
pub mod documents;
pub mod envelope;
pub mod error;
pub mod links;
pub(crate) mod retry;

pub use config::ImsApiConfig;
pub use documents::{CreatedDocument, CreatedId, DocumentFilter};
pub use error::ApiError;

use std::time::Duration;

/// Versioned path prefix shared by every resource endpoint.
pub(crate) const API_PREFIX: &str = "api/v1";

/// Top-level platform API client. Holds sub-clients for each endpoint family.
#[derive(Debug, Clone)]
pub struct ImsClient {
    http: reqwest::Client,
    base_url: url::Url,
    catalog: catalog::CatalogClient,
    documents: documents::DocumentClient,
    links: links::LinkClient,
}

impl ImsClient {
    /// Create a new client from configuration.
    pub fn new(config: ImsApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut auth = reqwest::header::HeaderValue::from_str(&format!(
                    "Bearer {}",
                    config.api_token.as_str()
                ))
                .map_err(|_| ApiError::Config(config::ConfigError::InvalidToken))?;
                auth.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, auth);
                headers
            })
            .build()
            .map_err(|e| ApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            catalog: catalog::CatalogClient::new(http.clone(), config.base_url.clone()),
            documents: documents::DocumentClient::new(http.clone(), config.base_url.clone()),
            links: links::LinkClient::new(http.clone(), config.base_url.clone()),
            http,
            base_url: config.base_url,
        })
    }

    /// Access the catalog client.
    pub fn catalog(&self) -> &catalog::CatalogClient {
        &self.catalog
    }

    /// Access the documents client.
    pub fn documents(&self) -> &documents::DocumentClient {
        &self.documents
    }

    /// Access the document-links client.
    pub fn links(&self) -> &links::LinkClient {
        &self.links
    }

    /// Probe `GET {base_url}/health`. Returns `true` on any 2xx.
    pub async fn health(&self) -> Result<bool, ApiError> {
        let url = format!("{}health", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Http {
                endpoint: "GET /health".into(),
                source: e,
            })?;
        Ok(resp.status().is_success())
    }
}
