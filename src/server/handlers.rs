//! HTTP handlers.

use axum::{
    Json,
    extract::Query,
    response::{IntoResponse, Response},
};

use crate::{Error, ErrorResponse, ResolveResponse, decode::query_unescape, resolve};

/// Name of the query parameter carrying the PURL.
pub const PURL_PARAM: &str = "purl";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "OK"
}

/// GET /resolve?purl={percent-encoded purl}
///
/// Only the first `purl` parameter is considered; an empty value counts as missing.
pub async fn resolve_purl(
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<ResolveResponse>, Error> {
    let raw = params
        .into_iter()
        .find_map(|(key, value)| (key == PURL_PARAM).then_some(value))
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingParameter)
        .inspect_err(|err| tracing::debug!(%err, "rejected resolve request"))?;

    let outcome = query_unescape(&raw)
        .map_err(|error| Error::Decode {
            raw: raw.clone(),
            error,
        })
        .and_then(|decoded| resolve(&decoded));

    match outcome {
        Ok(response) => {
            tracing::debug!(
                purl = %response.purl,
                oci_reference = %response.oci_reference,
                "resolved purl"
            );
            Ok(Json(response))
        }
        Err(err) => {
            tracing::debug!(purl = ?err.purl(), %err, "rejected resolve request");
            Err(err)
        }
    }
}
