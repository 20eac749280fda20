use axum::http::StatusCode;
use miette::Diagnostic;
use thiserror::Error;

use crate::{decode::DecodeError, reference::ResolveError};

/// Records all errors reported while handling a resolve request.
///
/// Every variant is scoped to a single request and reported to the caller
/// as a client error; none is retried.
#[derive(Error, Diagnostic, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The request did not carry a `purl` parameter.
    #[error("missing required parameter: purl")]
    MissingParameter,

    /// The `purl` parameter could not be unescaped.
    #[error("failed to decode purl parameter: {error}")]
    Decode {
        /// The parameter as received.
        raw: String,

        /// The decoding failure.
        #[source]
        error: DecodeError,
    },

    /// The decoded parameter is not a well-formed PURL.
    #[error("invalid purl format: {error}")]
    Parse {
        /// The decoded PURL string.
        purl: String,

        /// The error reported by the PURL parser.
        #[source]
        error: purl::ParseError,
    },

    /// The PURL parsed but cannot be resolved to an OCI reference.
    #[error("{error}")]
    Resolve {
        /// The decoded PURL string.
        purl: String,

        /// The resolution failure.
        #[source]
        #[diagnostic_source]
        error: ResolveError,
    },
}

impl Error {
    /// The PURL echoed back to the caller alongside this error, if any.
    ///
    /// This is the raw parameter for decoding failures and the decoded
    /// string for everything after decoding.
    pub fn purl(&self) -> Option<&str> {
        match self {
            Self::MissingParameter => None,
            Self::Decode { raw, .. } => Some(raw),
            Self::Parse { purl, .. } | Self::Resolve { purl, .. } => Some(purl),
        }
    }

    /// The HTTP status code reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingParameter
            | Self::Decode { .. }
            | Self::Parse { .. }
            | Self::Resolve { .. } => StatusCode::BAD_REQUEST,
        }
    }
}
