//! The `{statusCode, message, data}` response envelope.
//!
//! Every platform endpoint answers HTTP 200 and reports the real outcome in
//! the body. A call succeeds only when the HTTP status is 2xx, the body
//! parses as an envelope, and `statusCode` equals [`SUCCESS_CODE`].

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ApiError;

/// The envelope status code that signals success.
pub const SUCCESS_CODE: i64 = 200;

/// Response envelope returned by all platform endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status_code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Check the HTTP status, parse the envelope and check its status code.
pub(crate) async fn read_envelope<T: DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<Envelope<T>, ApiError> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            endpoint: endpoint.into(),
            status,
            body,
        });
    }

    let envelope: Envelope<T> = resp.json().await.map_err(|e| ApiError::Deserialization {
        endpoint: endpoint.into(),
        source: e,
    })?;

    if envelope.status_code != SUCCESS_CODE {
        return Err(ApiError::Rejected {
            endpoint: endpoint.into(),
            status_code: envelope.status_code,
            message: envelope.message,
        });
    }

    Ok(envelope)
}
