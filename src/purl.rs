//! Parsing of Package URLs (PURLs).
//!
//! See the [Package URL specification](https://github.com/package-url/purl-spec).
//!
//! Exposes the [`Purl`] struct, which is a thin wrapper around [`purl::GenericPurl`].
//! A [`Purl`] can be converted to an [`OciReference`](crate::OciReference) via the
//! [`TryFrom`] trait; see the [`reference`](crate::reference) module for the rules.

use std::str::FromStr;

use derive_more::{Deref, From};
use purl::GenericPurl;

/// The only PURL type this crate resolves.
pub const OCI_PURL_TYPE: &str = "oci";

/// Qualifier naming the registry and repository hosting the artifact.
pub const QUALIFIER_REPOSITORY_URL: &str = "repository_url";

/// Qualifier naming the image tag.
pub const QUALIFIER_TAG: &str = "tag";

/// A parsed Package URL (PURL).
///
/// A package URL is a standardized way to identify and locate software packages.
/// For `oci` PURLs the components are interpreted as follows:
/// - `name` is the last fragment of the repository name, e.g. `debian`.
/// - `version` is a content digest such as `sha256:244fd47...`, never a tag.
/// - the `repository_url` qualifier holds the full `registry/repository` path.
/// - the `tag` qualifier holds the image tag.
///
/// Parsing is delegated to [`purl::GenericPurl`] with an untyped package type,
/// so any PURL type parses here and the `oci` check happens during resolution.
/// The version and qualifier values come back percent-decoded.
///
/// ```rust
/// # use purl_resolver::Purl;
/// # use std::str::FromStr;
/// let purl = Purl::from_str("pkg:oci/nginx?tag=alpine").unwrap();
/// assert_eq!(purl.name(), "nginx");
/// assert_eq!(purl.qualifier("tag"), Some("alpine"));
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Deref, From)]
pub struct Purl(GenericPurl<String>);

impl FromStr for Purl {
    type Err = purl::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let generic_purl = GenericPurl::from_str(s)?;
        Ok(Purl(generic_purl))
    }
}

impl Purl {
    /// Parse a PURL from a string.
    pub fn parse(s: &str) -> Result<Self, purl::ParseError> {
        s.parse()
    }

    /// The PURL type, e.g. `oci` or `npm`.
    pub fn purl_type(&self) -> &str {
        self.package_type().as_str()
    }

    /// Whether this PURL has the `oci` type.
    pub fn is_oci(&self) -> bool {
        self.purl_type() == OCI_PURL_TYPE
    }

    /// The version component, treating an empty version as absent.
    ///
    /// For `oci` PURLs this is the image digest.
    pub fn digest(&self) -> Option<&str> {
        self.version().filter(|v| !v.is_empty())
    }

    /// Look up a qualifier value by key.
    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers().get(key)
    }
}
