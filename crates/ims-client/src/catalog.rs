//! Typed client for the catalog endpoints: categories, subcategories and
//! periodicities.
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET | `/api/v1/categories?incubatorId=` | List categories |
//! | GET | `/api/v1/subcategories?incubatorId=&categoryId=` | List subcategories |
//! | GET | `/api/v1/periodicities` | List periodicities |

use ims_core::{Category, CategoryId, IncubatorId, Periodicity, Subcategory};
use serde::Serialize;

use crate::envelope::read_envelope;
use crate::error::ApiError;
use crate::API_PREFIX;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogQuery {
    incubator_id: IncubatorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_id: Option<CategoryId>,
}

/// Client for the catalog endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: url::Url,
}

impl CatalogClient {
    pub(crate) fn new(http: reqwest::Client, base_url: url::Url) -> Self {
        Self { http, base_url }
    }

    /// List the categories configured for an incubator.
    ///
    /// Calls `GET {base_url}/api/v1/categories?incubatorId={id}`.
    pub async fn categories(&self, incubator_id: IncubatorId) -> Result<Vec<Category>, ApiError> {
        let endpoint = "GET /categories";
        let url = format!("{}{}/categories", self.base_url, API_PREFIX);
        let query = CatalogQuery {
            incubator_id,
            category_id: None,
        };

        let resp = crate::retry::retry_send(endpoint, || {
            self.http.get(&url).query(&query).send()
        })
        .await?;

        Ok(read_envelope::<Vec<Category>>(endpoint, resp)
            .await?
            .data
            .unwrap_or_default())
    }

    /// List subcategories, optionally restricted to one category.
    ///
    /// Order is preserved exactly as the server returns it; the first entry
    /// per category is that category's default subcategory.
    ///
    /// Calls `GET {base_url}/api/v1/subcategories?incubatorId={id}[&categoryId={id}]`.
    pub async fn subcategories(
        &self,
        incubator_id: IncubatorId,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<Subcategory>, ApiError> {
        let endpoint = "GET /subcategories";
        let url = format!("{}{}/subcategories", self.base_url, API_PREFIX);
        let query = CatalogQuery {
            incubator_id,
            category_id,
        };

        let resp = crate::retry::retry_send(endpoint, || {
            self.http.get(&url).query(&query).send()
        })
        .await?;

        Ok(read_envelope::<Vec<Subcategory>>(endpoint, resp)
            .await?
            .data
            .unwrap_or_default())
    }

    /// List periodicities.
    ///
    /// Calls `GET {base_url}/api/v1/periodicities`.
    pub async fn periodicities(&self) -> Result<Vec<Periodicity>, ApiError> {
        let endpoint = "GET /periodicities";
        let url = format!("{}{}/periodicities", self.base_url, API_PREFIX);

        let resp = crate::retry::retry_send(endpoint, || self.http.get(&url).send()).await?;

        Ok(read_envelope::<Vec<Periodicity>>(endpoint, resp)
            .await?
            .data
            .unwrap_or_default())
    }
}
