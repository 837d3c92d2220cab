//! Markup rewrite pass for the private resource-reference scheme.
//!
//! Authored markup references local resources with the `view-resource:`
//! scheme. Before markup reaches a surface, every quoted reference is
//! rewritten to the fully-qualified `viewbridge-resource://<id>/...` form so
//! the resolver can route each request back to the owning surface. The pass
//! is pure text transformation: one global, case-insensitive substitution,
//! with non-matching input returned byte-for-byte unchanged.

use crate::surface::SurfaceId;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;
use url::Url;

/// Private scheme surfaces use in authored markup.
pub const RESOURCE_SCHEME: &str = "view-resource";

/// Identity-tagged scheme the resolver serves.
pub const RESOLVED_SCHEME: &str = "viewbridge-resource";

lazy_static! {
    /// Quoted `view-resource:` references.
    ///
    /// Two alternatives after the scheme: `//authority/rest`, where the
    /// authority is a maximal run of non-space, non-slash, non-quote
    /// characters followed by a slash, or a bare path with no such
    /// authority. The authority branch is tried first, so `//x` with no
    /// trailing slash falls through to the bare branch. Capture groups:
    /// opening quote, authority, authority path, bare path, closing quote.
    static ref RESOURCE_URL: Regex = Regex::new(&format!(
        r#"(?i)(["']){}:(?://([^\s/'"]+)(/[^\s'"]*)|([^\s'"]+))(["'])"#,
        RESOURCE_SCHEME
    ))
    .expect("valid resource reference pattern");
}

/// Rewrites every quoted `view-resource:` reference in `markup` to the
/// resolved form for the surface identified by `id`.
///
/// A reference carrying an authority keeps that authority as the first path
/// segment of the rewritten URL; a bare path is routed through the `file`
/// sub-scheme. Markup without any reference is returned borrowed.
pub fn rewrite_resource_urls<'a>(id: &SurfaceId, markup: &'a str) -> Cow<'a, str> {
    RESOURCE_URL.replace_all(markup, |caps: &Captures<'_>| {
        let open = &caps[1];
        let close = &caps[5];

        if let (Some(authority), Some(rest)) = (caps.get(2), caps.get(3)) {
            format!(
                "{}{}://{}/{}{}{}",
                open,
                RESOLVED_SCHEME,
                id,
                authority.as_str(),
                rest.as_str(),
                close
            )
        } else {
            let path = caps.get(4).map_or("", |m| m.as_str());
            if path.starts_with("//") {
                format!("{}{}://{}/file{}{}", open, RESOLVED_SCHEME, id, path, close)
            } else {
                // Add an empty authority segment for bare paths.
                format!("{}{}://{}/file//{}{}", open, RESOLVED_SCHEME, id, path, close)
            }
        }
    })
}

/// Programmatic counterpart of [`rewrite_resource_urls`] for an
/// already-parsed resource URL.
///
/// Produces the same layout the text pass does: the resource's scheme
/// becomes the first path segment, followed by its authority (omitted when
/// empty) and path. Query and fragment are carried over.
pub fn as_resolved_url(id: &SurfaceId, resource: &Url) -> Result<Url, url::ParseError> {
    let authority = resource.authority();
    let mut path = format!("/{}", resource.scheme());
    if !authority.is_empty() {
        path.push_str("//");
        path.push_str(authority);
    }
    path.push_str(resource.path());

    let mut resolved = Url::parse(&format!("{}://{}{}", RESOLVED_SCHEME, id, path))?;
    resolved.set_query(resource.query());
    resolved.set_fragment(resource.fragment());
    Ok(resolved)
}
