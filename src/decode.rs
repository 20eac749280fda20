//! Strict decoding of query-escaped values.

use std::borrow::Cow;

use miette::Diagnostic;
use percent_encoding::percent_decode;
use thiserror::Error;

/// Errors encountered when unescaping a query value.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// A `%` was not followed by two hexadecimal digits.
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),

    /// The unescaped bytes are not valid UTF-8.
    #[error("unescaped value is not valid UTF-8")]
    InvalidUtf8,
}

/// Unescape a query-encoded value.
///
/// Each `%XX` sequence becomes the byte it encodes and each `+` becomes a space.
/// Unlike lenient decoders, a `%` that does not start a valid escape is an error.
///
/// ```rust
/// # use purl_resolver::decode::query_unescape;
/// assert_eq!(query_unescape("pkg%3Aoci%2Fnginx").unwrap(), "pkg:oci/nginx");
/// assert!(query_unescape("pkg:oci/nginx%zz").is_err());
/// ```
pub fn query_unescape(input: &str) -> Result<String, DecodeError> {
    let bytes = input.as_bytes();
    if let Some(at) = invalid_escape(bytes) {
        let end = (at + 3).min(input.len());
        let escape = String::from_utf8_lossy(&bytes[at..end]).into_owned();
        return Err(DecodeError::InvalidEscape(escape));
    }

    let spaced: Cow<'_, [u8]> = if bytes.contains(&b'+') {
        Cow::Owned(
            bytes
                .iter()
                .map(|&b| if b == b'+' { b' ' } else { b })
                .collect(),
        )
    } else {
        Cow::Borrowed(bytes)
    };

    percent_decode(&spaced)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}

/// Returns the offset of the first `%` not followed by two hex digits.
fn invalid_escape(bytes: &[u8]) -> Option<usize> {
    bytes
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'%')
        .map(|(i, _)| i)
        .find(|&i| match bytes.get(i + 1..i + 3) {
            Some([hi, lo]) => !(hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()),
            _ => true,
        })
}
