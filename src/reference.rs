//! Logic for converting [`Purls`](Purl) to [`OciReferences`](OciReference).
//!
//! Resolution is a pure function of the parsed PURL:
//! 1. The PURL type must be `oci` and the name must be non-empty.
//! 2. The base is the `repository_url` qualifier with a leading `https://`
//!    or `http://` removed, or `docker.io/{name}` when the qualifier is absent.
//! 3. The suffix is `@{version}` when a version (digest) is present,
//!    otherwise `:{tag}` from the `tag` qualifier, otherwise `:latest`.

use bon::Builder;
use derive_more::Display;
use miette::Diagnostic;
use thiserror::Error;

use crate::purl::{OCI_PURL_TYPE, Purl, QUALIFIER_REPOSITORY_URL, QUALIFIER_TAG};

/// Registry used when the PURL does not carry a `repository_url` qualifier.
pub const DEFAULT_REGISTRY: &str = "docker.io";

/// Tag used when the PURL carries neither a digest nor a `tag` qualifier.
pub const DEFAULT_TAG: &str = "latest";

/// Scheme prefixes removed from `repository_url`, checked in order.
const SCHEME_PREFIXES: [&str; 2] = ["https://", "http://"];

/// A fully qualified OCI image reference: `registry/repository[:tag|@digest]`.
///
/// ```rust
/// # use purl_resolver::{OciReference, Suffix};
/// let reference = OciReference::builder()
///     .base("docker.io/nginx")
///     .suffix(Suffix::Tag("alpine".to_string()))
///     .build();
/// assert_eq!(reference.to_string(), "docker.io/nginx:alpine");
/// ```
///
/// This type does not guarantee that the referenced artifact exists;
/// no registry is contacted during resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display, Builder)]
#[display("{base}{suffix}")]
pub struct OciReference {
    /// The registry host and repository path, e.g. `ghcr.io/myorg/app`.
    #[builder(into)]
    base: String,

    /// The tag or digest selecting the artifact within the repository.
    suffix: Suffix,
}

impl OciReference {
    /// The registry host and repository path.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The tag or digest suffix.
    pub fn suffix(&self) -> &Suffix {
        &self.suffix
    }
}

/// Selects an artifact within a repository.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display)]
pub enum Suffix {
    /// A mutable tag, rendered as `:{tag}`.
    #[display(":{_0}")]
    Tag(String),

    /// A content digest, rendered as `@{digest}`.
    #[display("@{_0}")]
    Digest(String),
}

/// Errors that can occur when resolving a PURL to an OCI reference.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    /// The PURL type is something other than `oci`.
    #[error("unsupported purl type '{0}', only 'oci' is supported")]
    UnsupportedType(String),

    /// A component the resolver requires is empty or absent.
    #[error("purl is missing required component: {0}")]
    MissingComponent(&'static str),
}

impl TryFrom<Purl> for OciReference {
    type Error = ResolveError;

    fn try_from(purl: Purl) -> Result<Self, Self::Error> {
        OciReference::try_from(&purl)
    }
}

impl TryFrom<&Purl> for OciReference {
    type Error = ResolveError;

    fn try_from(purl: &Purl) -> Result<Self, Self::Error> {
        if purl.purl_type() != OCI_PURL_TYPE {
            return Err(ResolveError::UnsupportedType(purl.purl_type().to_string()));
        }
        if purl.name().is_empty() {
            return Err(ResolveError::MissingComponent("name"));
        }

        Ok(OciReference::builder()
            .base(base_reference(purl))
            .suffix(suffix(purl))
            .build())
    }
}

fn base_reference(purl: &Purl) -> String {
    match purl.qualifier(QUALIFIER_REPOSITORY_URL) {
        Some(repository_url) => strip_scheme(repository_url).to_string(),
        None => format!("{DEFAULT_REGISTRY}/{}", purl.name()),
    }
}

fn suffix(purl: &Purl) -> Suffix {
    if let Some(digest) = purl.digest() {
        Suffix::Digest(digest.to_string())
    } else if let Some(tag) = purl.qualifier(QUALIFIER_TAG) {
        Suffix::Tag(tag.to_string())
    } else {
        Suffix::Tag(DEFAULT_TAG.to_string())
    }
}

/// Removes a leading `https://`, then a leading `http://`.
///
/// Only these exact, case-sensitive prefixes are removed; anything else
/// (ports, trailing slashes, other schemes) passes through unchanged.
pub fn strip_scheme(repository_url: &str) -> &str {
    SCHEME_PREFIXES
        .iter()
        .fold(repository_url, |url, prefix| {
            url.strip_prefix(prefix).unwrap_or(url)
        })
}
