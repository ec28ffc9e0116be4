//! The per-request URI context.

use {
    crate::{
        error::{Error, Result},
        multimap::MultiMap,
        percent,
        query::{self, QueryParams},
        segment::{self, PathSegment},
        trail::{MatchedTrail, MatchedUri, ResourceHandle, Stack},
        uri::{Builder, Uri},
    },
    log::trace,
    serde::de::DeserializeOwned,
};

/// All of the URI state belonging to a single in-flight request.
///
/// A context is created when the request enters the dispatcher and dropped
/// when the request completes. It keeps the encoded and decoded views of
/// the path, segments, and query parameters mutually consistent, and owns
/// the [`MatchedTrail`] which the dispatcher mutates while descending into
/// nested sub-resources.
///
/// The request URI may be replaced, but only while the matched trail is
/// still empty; the first trail push makes the URI immutable for the rest
/// of the request.
///
/// [`MatchedTrail`]: ../trail/struct.MatchedTrail.html
#[derive(Debug, Clone)]
pub struct UriContext {
    base: Uri,
    request: Uri,
    absolute_path: Uri,
    path: String,
    encoded_path: String,
    matching_path: Option<String>,
    segments: Vec<PathSegment>,
    encoded_segments: Vec<PathSegment>,
    query_params: QueryParams,
    path_params: MultiMap,
    encoded_path_params: MultiMap,
    trail: MatchedTrail,
}

impl UriContext {
    /// Creates a context for a request addressed by `request` under the
    /// application root `base`.
    pub fn new(base: Uri, request: Uri) -> Result<Self> {
        let mut cx = UriContext {
            base: Uri::default(),
            request: Uri::default(),
            absolute_path: Uri::default(),
            path: String::new(),
            encoded_path: String::new(),
            matching_path: None,
            segments: Vec::new(),
            encoded_segments: Vec::new(),
            query_params: QueryParams::default(),
            path_params: MultiMap::new(),
            encoded_path_params: MultiMap::new(),
            trail: MatchedTrail::new(),
        };
        cx.set_base_and_request_uri(base, request)?;
        Ok(cx)
    }

    /// Replaces the request URI, keeping the stored base.
    ///
    /// Fails with [`Error::MatchingAlreadyStarted`] once any trail stack
    /// is non-empty.
    ///
    /// [`Error::MatchingAlreadyStarted`]: ../error/enum.Error.html
    pub fn set_request_uri(&mut self, request: Uri) -> Result<()> {
        let base = self.base.clone();
        self.set_base_and_request_uri(base, request)
    }

    /// Replaces both the base and the request URI and re-derives every
    /// dependent view.
    ///
    /// This is the only mutation path for the URI state. It is idempotent
    /// while matching has not started, and fails with
    /// [`Error::MatchingAlreadyStarted`] afterwards.
    ///
    /// [`Error::MatchingAlreadyStarted`]: ../error/enum.Error.html
    pub fn set_base_and_request_uri(&mut self, base: Uri, request: Uri) -> Result<()> {
        if !self.trail.is_empty() {
            return Err(Error::MatchingAlreadyStarted);
        }
        trace!("set_base_and_request_uri: base={}, request={}", base, request);

        let request = match request.strip_prefix(&base) {
            Some(relative) => relative,
            None => request,
        };

        let raw_path = request.path();
        self.encoded_path = with_leading_slash(raw_path);
        self.path = with_leading_slash(&percent::decode(raw_path, "path")?);
        self.absolute_path = request.to_builder().query(None).build();
        self.request = request;
        self.base = base;
        self.reparse()
    }

    /// Rebuilds segments, the matching path, and the query parameter maps
    /// from the current encoded path and raw query. Derived collections
    /// are replaced wholesale, never patched.
    fn reparse(&mut self) -> Result<()> {
        let parsed = segment::parse_segments(&self.encoded_path)?;
        self.matching_path = if parsed.has_matrix {
            Some(segment::rebuild_matching_path(&parsed.encoded))
        } else {
            None
        };
        self.encoded_segments = parsed.encoded;
        self.segments = parsed.decoded;
        self.query_params = query::extract(self.request.query().unwrap_or(""))?;
        Ok(())
    }

    /// Returns the base URI.
    pub fn base_uri(&self) -> &Uri {
        &self.base
    }

    /// Returns the request URI, stored relative to the base where the base
    /// is a prefix of it.
    pub fn request_uri(&self) -> &Uri {
        &self.request
    }

    /// Returns the request URI with its query component cleared.
    pub fn absolute_path(&self) -> &Uri {
        &self.absolute_path
    }

    /// Returns the request path; decoded or raw depending on `decode`.
    ///
    /// The returned path always begins with `/`.
    pub fn path(&self, decode: bool) -> &str {
        if decode {
            &self.path
        } else {
            &self.encoded_path
        }
    }

    /// Returns the encoded path with all matrix parameters stripped.
    ///
    /// When no segment carries matrix parameters this is the verbatim
    /// encoded path; no rebuilt copy exists.
    pub fn matching_path(&self) -> &str {
        match self.matching_path {
            Some(ref rebuilt) => rebuilt,
            None => &self.encoded_path,
        }
    }

    /// Returns the path segments; decoded or raw depending on `decode`.
    pub fn path_segments(&self, decode: bool) -> &[PathSegment] {
        if decode {
            &self.segments
        } else {
            &self.encoded_segments
        }
    }

    /// Returns the query parameters; fully decoded, or with raw values,
    /// depending on `decode`. Keys are decoded in both views.
    pub fn query_parameters(&self, decode: bool) -> &MultiMap {
        if decode {
            &self.query_params.decoded
        } else {
            &self.query_params.encoded
        }
    }

    /// Deserializes the raw query string into `T`.
    pub fn query<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        match self.request.query() {
            Some(raw) => serde_urlencoded::from_str(raw)
                .map_err(|cause| Error::InvalidQuery { cause: cause.into() }),
            None => Err(Error::MissingQuery),
        }
    }

    /// Records a path parameter extracted by the dispatcher, in its raw
    /// form; the decoded shadow entry is derived here.
    pub fn add_encoded_path_parameter(&mut self, name: impl Into<String>, raw: &str) -> Result<()> {
        let name = name.into();
        let decoded = percent::decode(raw, "path parameter")?;
        self.encoded_path_params.append(name.clone(), raw);
        self.path_params.append(name, decoded);
        Ok(())
    }

    /// Returns the path parameters; decoded or raw values depending on `decode`.
    pub fn path_parameters(&self, decode: bool) -> &MultiMap {
        if decode {
            &self.path_params
        } else {
            &self.encoded_path_params
        }
    }

    /// Returns a builder seeded from the request URI.
    pub fn request_uri_builder(&self) -> Builder {
        self.request.to_builder()
    }

    /// Returns a builder seeded from the absolute path.
    pub fn absolute_path_builder(&self) -> Builder {
        self.absolute_path.to_builder()
    }

    /// Returns a builder seeded from the base URI.
    pub fn base_uri_builder(&self) -> Builder {
        self.base.to_builder()
    }

    /// Resolves `uri` against the base URI, per RFC 3986.
    pub fn resolve(&self, uri: &Uri) -> Uri {
        self.base.resolve(uri)
    }

    /// Computes the relative reference from the current request URI to `uri`.
    ///
    /// A `uri` with neither scheme nor host is first re-anchored at the
    /// base (base scheme and authority with `uri`'s path, query, and
    /// fragment substituted). Resolving the result against the request URI
    /// reproduces the target.
    pub fn relativize(&self, uri: &Uri) -> Uri {
        let target = if uri.scheme().is_none() && uri.host().is_none() {
            self.base
                .to_builder()
                .path(uri.path())
                .query(uri.query())
                .fragment(uri.fragment())
                .build()
        } else {
            uri.clone()
        };
        self.base.resolve(&self.request).relativize(&target)
    }

    /// Pushes a matched URI onto the trail; see
    /// [`MatchedTrail::push_matched_uri`].
    ///
    /// The first push permanently forbids replacing the request URI.
    ///
    /// [`MatchedTrail::push_matched_uri`]:
    /// ../trail/struct.MatchedTrail.html#method.push_matched_uri
    pub fn push_matched_uri(&mut self, encoded: &str) -> Result<()> {
        self.trail.push_matched_uri(encoded)
    }

    /// Pushes a matched path prefix onto the trail.
    pub fn push_matched_path(&mut self, encoded: impl Into<String>) {
        self.trail.push_matched_path(encoded)
    }

    /// Pops the most recently matched path prefix.
    ///
    /// # Panics
    ///
    /// Panics if no path prefix has been pushed; balance is the
    /// dispatcher's contract.
    pub fn pop_matched_path(&mut self) -> String {
        self.trail.pop_matched_path()
    }

    /// Pushes the handle of the resource currently being matched.
    pub fn push_resource(&mut self, resource: ResourceHandle) {
        self.trail.push_resource(resource)
    }

    /// Returns the matched URIs, most recently matched first.
    pub fn matched_uris(&self, decode: bool) -> Vec<&str> {
        self.trail
            .matched_uris()
            .iter()
            .map(|matched| matched.as_str(decode))
            .collect()
    }

    /// Returns the matched path prefixes, most recent first.
    pub fn encoded_matched_paths(&self) -> Vec<&str> {
        self.trail
            .matched_paths()
            .iter()
            .map(String::as_str)
            .collect()
    }

    /// Returns the matched resource stack, most recent first.
    pub fn matched_resources(&self) -> &Stack<ResourceHandle> {
        self.trail.matched_resources()
    }

    /// Returns the matched URI stack itself.
    pub fn matched_uri_entries(&self) -> &Stack<MatchedUri> {
        self.trail.matched_uris()
    }

    /// Returns the whole trail as a live view.
    pub fn trail(&self) -> &MatchedTrail {
        &self.trail
    }
}

fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{}", path)
    }
}
