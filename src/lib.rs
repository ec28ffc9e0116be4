//! Uzume is a per-request URI context for Web frameworks in Rust.
//!
//! A [`UriContext`] is created once per incoming request. It parses the
//! request URI into path segments with their matrix parameters and into
//! ordered query parameter maps, keeping the encoded and decoded views of
//! each consistent with one another. While a dispatcher descends into
//! nested sub-resources, it records its progress on the context's
//! [`MatchedTrail`]; once matching has started, the request URI becomes
//! immutable. The context also provides URI algebra ([`resolve`] and
//! [`relativize`]) against the application's base URI.
//!
//! ```
//! use uzume::{Uri, UriContext};
//!
//! # fn main() -> uzume::Result<()> {
//! let base = Uri::parse("http://example.com/app/")?;
//! let request = Uri::parse("http://example.com/app/users;role=admin/42?verbose=1")?;
//! let cx = UriContext::new(base, request)?;
//!
//! assert_eq!(cx.matching_path(), "/users/42");
//! assert_eq!(cx.query_parameters(true).first("verbose"), Some("1"));
//! # Ok(())
//! # }
//! ```
//!
//! [`UriContext`]: ./struct.UriContext.html
//! [`MatchedTrail`]: ./trail/struct.MatchedTrail.html
//! [`resolve`]: ./struct.UriContext.html#method.resolve
//! [`relativize`]: ./struct.UriContext.html#method.relativize

#![doc(html_root_url = "https://docs.rs/uzume/0.1.0")]
#![warn(
    missing_docs,
    missing_debug_implementations,
    nonstandard_style,
    rust_2018_idioms,
    unused
)]

mod context;
mod percent;
mod query;

pub mod error;
pub mod multimap;
pub mod segment;
pub mod trail;
pub mod uri;

#[doc(inline)]
pub use crate::{
    context::UriContext,
    error::{Error, Result},
    multimap::MultiMap,
    segment::PathSegment,
    trail::{MatchedTrail, MatchedUri, ResourceHandle, Stack},
    uri::{Builder, Uri},
};
