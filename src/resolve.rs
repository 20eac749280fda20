//! The request-level entry point: decoded PURL string in, JSON envelope out.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{Error, OciReference, Purl};

/// Successful resolution of a PURL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResolveResponse {
    /// The decoded PURL that was resolved.
    #[schema(example = "pkg:oci/nginx")]
    pub purl: String,

    /// The OCI reference the PURL resolves to.
    #[schema(example = "docker.io/nginx:latest")]
    pub oci_reference: String,
}

/// Failure to resolve a PURL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable description of the failure.
    pub error: String,

    /// The PURL the request carried, when one was present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purl: Option<String>,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            error: err.to_string(),
            purl: err.purl().map(String::from),
        }
    }
}

/// Resolve a decoded PURL string to an OCI reference.
///
/// Parses the string, validates it, and maps it to a reference.
/// This function is pure: the same input always yields the same output.
///
/// ```rust
/// # use purl_resolver::resolve;
/// let response = resolve("pkg:oci/app?repository_url=ghcr.io/myorg/app").unwrap();
/// assert_eq!(response.oci_reference, "ghcr.io/myorg/app:latest");
/// ```
pub fn resolve(decoded: &str) -> Result<ResolveResponse, Error> {
    let purl = Purl::parse(decoded).map_err(|error| Error::Parse {
        purl: decoded.to_string(),
        error,
    })?;

    let reference = OciReference::try_from(purl).map_err(|error| Error::Resolve {
        purl: decoded.to_string(),
        error,
    })?;

    Ok(ResolveResponse {
        purl: decoded.to_string(),
        oci_reference: reference.to_string(),
    })
}
