//! Percent-decoding helpers.

use {
    crate::error::{Error, Result},
    std::borrow::Cow,
    url::percent_encoding::percent_decode,
};

/// Percent-decodes a path or matrix component as UTF-8.
///
/// `location` names the component being decoded and is carried into the
/// error value when the decoded bytes are not valid UTF-8.
pub(crate) fn decode(raw: &str, location: &'static str) -> Result<String> {
    percent_decode(raw.as_bytes())
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|cause| Error::Decode { location, cause })
}

/// Percent-decodes a query component as UTF-8.
///
/// Unlike [`decode`], `+` is folded into a space first, matching the
/// form-urlencoded treatment of query strings.
pub(crate) fn decode_query(raw: &str, location: &'static str) -> Result<String> {
    let raw = raw.replace('+', " ");
    percent_decode(raw.as_bytes())
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|cause| Error::Decode { location, cause })
}
