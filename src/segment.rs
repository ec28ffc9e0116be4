//! Path segments and the segment parser.

use {
    crate::{error::Result, multimap::MultiMap, percent},
    std::fmt,
};

/// A single path segment together with the matrix parameters attached to it.
///
/// A segment exists in two shadow forms: the encoded form keeps every
/// component raw, the decoded form percent-decodes the bare path and the
/// matrix parameter names and values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathSegment {
    path: String,
    matrix: MultiMap,
}

impl PathSegment {
    /// Parses one raw path component.
    ///
    /// The text before the first `;` is the bare path; every later
    /// `;`-delimited token is a matrix parameter, split on its first `=`
    /// (a token without `=` carries an empty-string value). Empty tokens
    /// contribute nothing.
    fn parse(raw: &str, decode: bool) -> Result<Self> {
        let mut tokens = raw.split(';');
        let bare = tokens.next().expect("split yields at least one token");
        let path = if decode {
            percent::decode(bare, "path segment")?
        } else {
            bare.to_owned()
        };

        let mut matrix = MultiMap::new();
        for token in tokens {
            if token.is_empty() {
                continue;
            }
            let (name, value) = match token.find('=') {
                Some(pos) => (&token[..pos], &token[pos + 1..]),
                None => (token, ""),
            };
            if decode {
                matrix.append(
                    percent::decode(name, "matrix parameter name")?,
                    percent::decode(value, "matrix parameter value")?,
                );
            } else {
                matrix.append(name, value);
            }
        }

        Ok(PathSegment { path, matrix })
    }

    /// Returns the bare path of this segment, without matrix parameters.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the matrix parameters attached to this segment.
    pub fn matrix_parameters(&self) -> &MultiMap {
        &self.matrix
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (name, values) in self.matrix.iter() {
            for value in values {
                write!(f, ";{}={}", name, value)?;
            }
        }
        Ok(())
    }
}

/// The outcome of splitting an encoded path into its segments.
#[derive(Debug, Default)]
pub(crate) struct ParsedSegments {
    pub(crate) encoded: Vec<PathSegment>,
    pub(crate) decoded: Vec<PathSegment>,
    pub(crate) has_matrix: bool,
}

/// Splits an encoded path on `/` into segment pairs.
///
/// Empty components (including the leading one produced by the initial
/// slash) are skipped. `has_matrix` records whether any segment carried at
/// least one matrix parameter.
pub(crate) fn parse_segments(encoded_path: &str) -> Result<ParsedSegments> {
    let mut parsed = ParsedSegments::default();
    for raw in encoded_path.split('/').filter(|component| !component.is_empty()) {
        let encoded = PathSegment::parse(raw, false)?;
        let decoded = PathSegment::parse(raw, true)?;
        parsed.has_matrix = parsed.has_matrix || !encoded.matrix.is_empty();
        parsed.encoded.push(encoded);
        parsed.decoded.push(decoded);
    }
    Ok(parsed)
}

/// Rejoins the bare paths of `segments` into a `/`-separated path.
///
/// Only called when some segment carries matrix parameters; otherwise the
/// original encoded path is already identical to this rebuild.
pub(crate) fn rebuild_matching_path(segments: &[PathSegment]) -> String {
    let mut path = String::new();
    for segment in segments {
        path.push('/');
        path.push_str(&segment.path);
    }
    path
}
