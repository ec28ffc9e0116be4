//! The URI reference value type and its algebra.

use {
    crate::error::{Error, Result},
    std::{fmt, str::FromStr},
};

/// An owned URI reference, decomposed into its five components.
///
/// Both absolute URIs (`http://example.com/a?q`) and relative references
/// (`a/b?q`, `//host/a`, `?q`) are representable. All components are kept
/// in their raw (still percent-encoded) form; decoding is the caller's
/// concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Uri {
    /// Parses a URI reference from a string.
    ///
    /// The input is split into scheme, authority, path, query, and fragment
    /// following the decomposition in RFC 3986 appendix B. Non-ASCII input,
    /// whitespace, control characters, and malformed schemes are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        if !s.is_ascii() {
            return Err(Error::Parse {
                reason: "the URI reference is not ASCII",
            });
        }
        if s.bytes().any(|b| b.is_ascii_control() || b == b' ') {
            return Err(Error::Parse {
                reason: "whitespace or control character in the URI reference",
            });
        }

        let mut rest = s;

        let fragment = match rest.find('#') {
            Some(pos) => {
                let fragment = rest[pos + 1..].to_owned();
                rest = &rest[..pos];
                Some(fragment)
            }
            None => None,
        };

        let query = match rest.find('?') {
            Some(pos) => {
                let query = rest[pos + 1..].to_owned();
                rest = &rest[..pos];
                Some(query)
            }
            None => None,
        };

        let scheme = match rest.find(':') {
            Some(pos) if !rest[..pos].contains('/') => {
                let scheme = &rest[..pos];
                if !is_valid_scheme(scheme) {
                    return Err(Error::Parse {
                        reason: "malformed scheme",
                    });
                }
                rest = &rest[pos + 1..];
                Some(scheme.to_owned())
            }
            _ => None,
        };

        let authority = if rest.starts_with("//") {
            let rest_after = &rest[2..];
            let end = rest_after.find('/').unwrap_or_else(|| rest_after.len());
            let authority = rest_after[..end].to_owned();
            rest = &rest_after[end..];
            Some(authority)
        } else {
            None
        };

        Ok(Uri {
            scheme,
            authority,
            path: rest.to_owned(),
            query,
            fragment,
        })
    }

    /// Creates an empty builder.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Creates a builder seeded with the components of this reference.
    ///
    /// The builder owns independent copies; mutating it never affects `self`.
    pub fn to_builder(&self) -> Builder {
        Builder {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        }
    }

    /// Returns the scheme component, if present.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_ref().map(String::as_str)
    }

    /// Returns the raw authority component, if present.
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_ref().map(String::as_str)
    }

    /// Returns the host part of the authority, if present and non-empty.
    pub fn host(&self) -> Option<&str> {
        let host_port = self.host_port()?;
        let host = if host_port.starts_with('[') {
            match host_port.find(']') {
                Some(end) => &host_port[..=end],
                None => host_port,
            }
        } else {
            match host_port.rfind(':') {
                Some(pos) => &host_port[..pos],
                None => host_port,
            }
        };
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }

    /// Returns the port part of the authority, if present and well-formed.
    pub fn port(&self) -> Option<u16> {
        let host_port = self.host_port()?;
        let port = if host_port.starts_with('[') {
            host_port[host_port.find(']')? + 1..].strip_prefix(":")?
        } else {
            &host_port[host_port.rfind(':')? + 1..]
        };
        port.parse().ok()
    }

    fn host_port(&self) -> Option<&str> {
        let authority = self.authority.as_ref()?;
        Some(match authority.rfind('@') {
            Some(pos) => &authority[pos + 1..],
            None => authority,
        })
    }

    /// Returns the raw path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query component, if present.
    pub fn query(&self) -> Option<&str> {
        self.query.as_ref().map(String::as_str)
    }

    /// Returns the raw fragment component, if present.
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_ref().map(String::as_str)
    }

    /// Returns `true` if this reference has no scheme.
    pub fn is_relative_reference(&self) -> bool {
        self.scheme.is_none()
    }

    /// Resolves `reference` against this URI, per RFC 3986 section 5.2.
    pub fn resolve(&self, reference: &Uri) -> Uri {
        if reference.scheme.is_some() {
            return Uri {
                scheme: reference.scheme.clone(),
                authority: reference.authority.clone(),
                path: remove_dot_segments(&reference.path),
                query: reference.query.clone(),
                fragment: reference.fragment.clone(),
            };
        }
        if reference.authority.is_some() {
            return Uri {
                scheme: self.scheme.clone(),
                authority: reference.authority.clone(),
                path: remove_dot_segments(&reference.path),
                query: reference.query.clone(),
                fragment: reference.fragment.clone(),
            };
        }

        let (path, query) = if reference.path.is_empty() {
            (
                self.path.clone(),
                reference.query.clone().or_else(|| self.query.clone()),
            )
        } else if reference.path.starts_with('/') {
            (remove_dot_segments(&reference.path), reference.query.clone())
        } else {
            (
                remove_dot_segments(&self.merge(&reference.path)),
                reference.query.clone(),
            )
        };

        Uri {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            path,
            query,
            fragment: reference.fragment.clone(),
        }
    }

    /// Computes the shortest relative reference which, resolved against
    /// `self`, reproduces `target`.
    ///
    /// The shared leading run of path segments is elided, one `..` is
    /// emitted per remaining source segment, and the unmatched target
    /// suffix is appended; the target's query and fragment are preserved.
    /// When the two references disagree on scheme or authority (or either
    /// path is not absolute), `target` is returned unchanged.
    pub fn relativize(&self, target: &Uri) -> Uri {
        if self.scheme != target.scheme || self.authority != target.authority {
            return target.clone();
        }
        if !self.path.starts_with('/') || !target.path.starts_with('/') {
            return target.clone();
        }

        let from_segments: Vec<&str> = self.path[1..].split('/').collect();
        let to_segments: Vec<&str> = target.path[1..].split('/').collect();

        // Resolution replaces everything after the source's last slash, so
        // the final source segment never participates in the shared prefix.
        let from_dir = &from_segments[..from_segments.len() - 1];
        let (&to_name, to_dir) = to_segments.split_last().expect("split of a non-empty path");

        let shared = from_dir
            .iter()
            .zip(to_dir.iter())
            .take_while(|(from, to)| from == to)
            .count();

        let mut segments: Vec<&str> = Vec::new();
        segments.resize(from_dir.len() - shared, "..");
        segments.extend(&to_dir[shared..]);
        segments.push(to_name);

        let mut path = segments.join("/");
        if path.is_empty() {
            // The target is the source's own directory; a bare dot re-resolves to it.
            path.push('.');
        }
        if segments[0].contains(':') {
            // A colon in the first segment would read as a scheme.
            path.insert_str(0, "./");
        }

        Uri {
            scheme: None,
            authority: None,
            path,
            query: target.query.clone(),
            fragment: target.fragment.clone(),
        }
    }

    /// Strips `base` from the front of this reference.
    ///
    /// Returns the remainder as a relative reference when scheme and
    /// authority agree and `base`'s path is a leading prefix of this path
    /// ending on a segment boundary (the base path ends with `/`, or the
    /// remainder is empty). Resolving the remainder against `base` then
    /// reproduces `self`; a prefix that would not round-trip this way is
    /// rejected with `None`.
    pub fn strip_prefix(&self, base: &Uri) -> Option<Uri> {
        if self.scheme != base.scheme || self.authority != base.authority {
            return None;
        }
        let rest = self.path.strip_prefix(base.path.as_str())?;
        if !(base.path.ends_with('/') || rest.is_empty()) {
            return None;
        }
        Some(Uri {
            scheme: None,
            authority: None,
            path: rest.to_owned(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        })
    }

    /// Merges a relative path into this base, per RFC 3986 section 5.2.3.
    fn merge(&self, reference_path: &str) -> String {
        if self.authority.is_some() && self.path.is_empty() {
            return format!("/{}", reference_path);
        }
        match self.path.rfind('/') {
            Some(pos) => format!("{}{}", &self.path[..=pos], reference_path),
            None => reference_path.to_owned(),
        }
    }
}

/// Removes `.` and `..` segments from a path, per RFC 3986 section 5.2.4.
fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());
    while !input.is_empty() {
        if input.starts_with("../") {
            input = &input[3..];
        } else if input.starts_with("./") {
            input = &input[2..];
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_last_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_last_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let skip = if input.starts_with('/') { 1 } else { 0 };
            let end = match input[skip..].find('/') {
                Some(pos) => pos + skip,
                None => input.len(),
            };
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }
    output
}

/// Removes the last path segment of `output` together with its preceding slash.
fn pop_last_segment(output: &mut String) {
    match output.rfind('/') {
        Some(pos) => output.truncate(pos),
        None => output.clear(),
    }
}

fn is_valid_scheme(s: &str) -> bool {
    let mut bytes = s.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'-' || b == b'.')
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref scheme) = self.scheme {
            write!(f, "{}:", scheme)?;
        }
        if let Some(ref authority) = self.authority {
            write!(f, "//{}", authority)?;
        }
        f.write_str(&self.path)?;
        if let Some(ref query) = self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(ref fragment) = self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

/// A builder for constructing [`Uri`] values from their components.
///
/// [`Uri`]: ./struct.Uri.html
#[derive(Debug, Clone, Default)]
pub struct Builder {
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Builder {
    /// Sets the scheme.
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    /// Sets the authority.
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    /// Replaces the path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Replaces or clears the query.
    pub fn query(mut self, query: Option<&str>) -> Self {
        self.query = query.map(ToOwned::to_owned);
        self
    }

    /// Replaces or clears the fragment.
    pub fn fragment(mut self, fragment: Option<&str>) -> Self {
        self.fragment = fragment.map(ToOwned::to_owned);
        self
    }

    /// Assembles the components into a `Uri`.
    ///
    /// When an authority is present, a non-empty path is forced to begin
    /// with `/` so that recomposition stays unambiguous.
    pub fn build(self) -> Uri {
        let mut path = self.path;
        if self.authority.is_some() && !path.is_empty() && !path.starts_with('/') {
            path.insert(0, '/');
        }
        Uri {
            scheme: self.scheme,
            authority: self.authority,
            path,
            query: self.query,
            fragment: self.fragment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        Uri::parse(s).expect("should be a valid URI reference")
    }

    macro_rules! t {
        (@case $name:ident, $input:expr, $expected:expr) => {
            #[test]
            fn $name() {
                assert_eq!($input.to_string(), $expected);
            }
        };
        ($(
            $name:ident ($input:expr, $expected:expr);
        )*) => {$(
            t!(@case $name, $input, $expected);
        )*};
    }

    #[test]
    fn parse_absolute() {
        let uri = uri("http://user@example.com:8080/a/b?x=1#top");
        assert_eq!(uri.scheme(), Some("http"));
        assert_eq!(uri.authority(), Some("user@example.com:8080"));
        assert_eq!(uri.host(), Some("example.com"));
        assert_eq!(uri.port(), Some(8080));
        assert_eq!(uri.path(), "/a/b");
        assert_eq!(uri.query(), Some("x=1"));
        assert_eq!(uri.fragment(), Some("top"));
        assert!(!uri.is_relative_reference());
    }

    #[test]
    fn parse_relative() {
        let uri = uri("a/b?x=1");
        assert_eq!(uri.scheme(), None);
        assert_eq!(uri.authority(), None);
        assert_eq!(uri.path(), "a/b");
        assert_eq!(uri.query(), Some("x=1"));
        assert!(uri.is_relative_reference());
    }

    #[test]
    fn parse_empty_reference() {
        let uri = uri("");
        assert_eq!(uri.path(), "");
        assert_eq!(uri.query(), None);
    }

    #[test]
    fn parse_ipv6_authority() {
        let uri = uri("https://[::1]:443/x");
        assert_eq!(uri.host(), Some("[::1]"));
        assert_eq!(uri.port(), Some(443));
    }

    #[test]
    fn parse_colon_in_query_is_not_a_scheme() {
        let uri = uri("/a?b:c");
        assert_eq!(uri.scheme(), None);
        assert_eq!(uri.query(), Some("b:c"));
    }

    #[test]
    fn parse_failcase_non_ascii() {
        assert!(Uri::parse("/パス").is_err());
    }

    #[test]
    fn parse_failcase_whitespace() {
        assert!(Uri::parse("/a b").is_err());
    }

    #[test]
    fn parse_failcase_empty_scheme() {
        assert!(Uri::parse(":foo").is_err());
    }

    #[test]
    fn parse_failcase_numeric_scheme() {
        assert!(Uri::parse("1http://x/").is_err());
    }

    t! [
        display_round_trips_absolute(
            uri("http://example.com/a/b?x=1#f"),
            "http://example.com/a/b?x=1#f"
        );
        display_round_trips_relative(
            uri("a;m=1/b?q"),
            "a;m=1/b?q"
        );
        display_round_trips_authority_only(
            uri("//example.com"),
            "//example.com"
        );
    ];

    // the examples of RFC 3986 section 5.4, over the base of that section
    t! [
        resolve_plain(
            uri("http://a/b/c/d;p?q").resolve(&uri("g")),
            "http://a/b/c/g"
        );
        resolve_dot_slash(
            uri("http://a/b/c/d;p?q").resolve(&uri("./g")),
            "http://a/b/c/g"
        );
        resolve_trailing_slash(
            uri("http://a/b/c/d;p?q").resolve(&uri("g/")),
            "http://a/b/c/g/"
        );
        resolve_absolute_path(
            uri("http://a/b/c/d;p?q").resolve(&uri("/g")),
            "http://a/g"
        );
        resolve_network_path(
            uri("http://a/b/c/d;p?q").resolve(&uri("//g")),
            "http://g"
        );
        resolve_query_only(
            uri("http://a/b/c/d;p?q").resolve(&uri("?y")),
            "http://a/b/c/d;p?y"
        );
        resolve_fragment_only(
            uri("http://a/b/c/d;p?q").resolve(&uri("#s")),
            "http://a/b/c/d;p?q#s"
        );
        resolve_empty(
            uri("http://a/b/c/d;p?q").resolve(&uri("")),
            "http://a/b/c/d;p?q"
        );
        resolve_parent(
            uri("http://a/b/c/d;p?q").resolve(&uri("../g")),
            "http://a/b/g"
        );
        resolve_grandparent(
            uri("http://a/b/c/d;p?q").resolve(&uri("../../g")),
            "http://a/g"
        );
        resolve_mid_dots(
            uri("http://a/b/c/d;p?q").resolve(&uri("g;x=1/./y")),
            "http://a/b/c/g;x=1/y"
        );
    ];

    t! [
        relativize_sibling(
            uri("http://a/b/c").relativize(&uri("http://a/b/d")),
            "d"
        );
        relativize_descend(
            uri("http://a/b/c").relativize(&uri("http://a/b/d/e?q#f")),
            "d/e?q#f"
        );
        relativize_ascend(
            uri("http://a/b/c/d").relativize(&uri("http://a/x/y")),
            "../../x/y"
        );
        relativize_own_directory(
            uri("http://a/b/c").relativize(&uri("http://a/b/")),
            "."
        );
        relativize_other_authority(
            uri("http://a/b").relativize(&uri("http://z/b")),
            "http://z/b"
        );
    ];

    #[test]
    fn relativize_resolves_back() {
        let cases = [
            ("http://a/b/c?q", "http://a/b/d"),
            ("http://a/b/c", "http://a/b/c?y=2"),
            ("http://a/b/c/", "http://a/b/c/"),
            ("http://a/b/c/", "http://a/b"),
            ("http://a/", "http://a/x/y?q#f"),
            ("http://a/x/y", "http://a/"),
        ];
        for &(from, to) in &cases {
            let from = uri(from);
            let to = uri(to);
            let relative = from.relativize(&to);
            assert_eq!(from.resolve(&relative), to, "from={}, to={}", from, to);
        }
    }

    #[test]
    fn relativize_guards_leading_colon() {
        let from = uri("http://a/b/c");
        let to = uri("http://a/b/x:y");
        let relative = from.relativize(&to);
        assert_eq!(relative.to_string(), "./x:y");
        assert_eq!(from.resolve(&relative), to);
    }

    #[test]
    fn strip_prefix_on_boundary() {
        let base = uri("http://example.com/app/");
        let request = uri("http://example.com/app/users/1?x=1");
        let relative = request.strip_prefix(&base).expect("should strip");
        assert_eq!(relative.to_string(), "users/1?x=1");
    }

    #[test]
    fn strip_prefix_rejects_partial_segment() {
        let base = uri("http://example.com/app");
        let request = uri("http://example.com/application");
        assert!(request.strip_prefix(&base).is_none());
    }

    #[test]
    fn strip_prefix_requires_trailing_slash_on_the_base() {
        // "users" resolved against "/app" would land on "/users", so the
        // prefix must not be stripped here.
        let base = uri("http://example.com/app");
        let request = uri("http://example.com/app/users");
        assert!(request.strip_prefix(&base).is_none());

        let exact = uri("http://example.com/app");
        assert_eq!(exact.strip_prefix(&base).unwrap().to_string(), "");
    }

    #[test]
    fn strip_prefix_rejects_other_authority() {
        let base = uri("http://example.com/app/");
        let request = uri("http://other.example.com/app/users");
        assert!(request.strip_prefix(&base).is_none());
    }

    #[test]
    fn builder_is_independent_of_source() {
        let source = uri("http://example.com/a?q=1");
        let rebuilt = source.to_builder().query(None).path("/b").build();
        assert_eq!(rebuilt.to_string(), "http://example.com/b");
        assert_eq!(source.to_string(), "http://example.com/a?q=1");
    }

    #[test]
    fn builder_normalizes_rootless_path_under_authority() {
        let built = Uri::builder()
            .scheme("http")
            .authority("example.com")
            .path("res")
            .build();
        assert_eq!(built.to_string(), "http://example.com/res");
    }

    #[test]
    fn remove_dot_segments_rfc_examples() {
        assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
        assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
        assert_eq!(remove_dot_segments("/./"), "/");
        assert_eq!(remove_dot_segments("/.."), "/");
        assert_eq!(remove_dot_segments(".."), "");
    }
}
