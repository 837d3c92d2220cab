//! Resource access policy for a rendering surface.
//!
//! A policy describes which local filesystem roots and which port remaps a
//! surface may resolve resources through. Two policies grant the same access
//! when they contain the same roots and the same mappings regardless of
//! order; [`ResourcePolicy::same_access`] implements that comparison and is
//! what the sync manager consults before touching the resource host.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use url::Url;

/// A single port remap applied to loopback requests from a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortMapping {
    /// Port the surface addresses.
    pub source_port: u16,
    /// Port the request is redirected to.
    pub target_port: u16,
}

impl PortMapping {
    /// Creates a mapping from `source_port` to `target_port`.
    pub fn new(source_port: u16, target_port: u16) -> Self {
        Self {
            source_port,
            target_port,
        }
    }
}

/// The local roots and port mappings a surface may resolve through.
///
/// Replaced wholesale by [`ResourceSync::update`](crate::sync::ResourceSync::update),
/// never partially mutated. Deliberately does not implement `PartialEq`:
/// policies compare by granted access via [`same_access`](Self::same_access),
/// not by field structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcePolicy {
    /// Filesystem roots resources may be served from.
    pub local_roots: Vec<Url>,
    /// Port remaps applied to loopback requests.
    pub port_mappings: Vec<PortMapping>,
}

impl ResourcePolicy {
    /// Creates an empty policy (no roots, no mappings).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a local root.
    pub fn with_local_root(mut self, root: Url) -> Self {
        self.local_roots.push(root);
        self
    }

    /// Adds a port mapping.
    pub fn with_port_mapping(mut self, mapping: PortMapping) -> Self {
        self.port_mappings.push(mapping);
        self
    }

    /// Returns true when `other` grants exactly the same access as `self`.
    ///
    /// The comparison is set-like: element order and duplicates are ignored.
    /// Roots compare by serialized URL identity, mappings by both ports.
    pub fn same_access(&self, other: &Self) -> bool {
        let roots: HashSet<&str> = self.local_roots.iter().map(Url::as_str).collect();
        let other_roots: HashSet<&str> = other.local_roots.iter().map(Url::as_str).collect();
        if roots != other_roots {
            return false;
        }

        let mappings: HashSet<PortMapping> = self.port_mappings.iter().copied().collect();
        let other_mappings: HashSet<PortMapping> = other.port_mappings.iter().copied().collect();
        mappings == other_mappings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn same_access_ignores_element_order() {
        let a = ResourcePolicy::new()
            .with_local_root(root("file:///workspace/a"))
            .with_local_root(root("file:///workspace/b"))
            .with_port_mapping(PortMapping::new(3000, 3001))
            .with_port_mapping(PortMapping::new(8080, 8081));

        let b = ResourcePolicy::new()
            .with_local_root(root("file:///workspace/b"))
            .with_local_root(root("file:///workspace/a"))
            .with_port_mapping(PortMapping::new(8080, 8081))
            .with_port_mapping(PortMapping::new(3000, 3001));

        assert!(a.same_access(&b));
        assert!(b.same_access(&a));
    }

    #[test]
    fn same_access_ignores_duplicates() {
        let a = ResourcePolicy::new()
            .with_local_root(root("file:///workspace/a"))
            .with_local_root(root("file:///workspace/a"));
        let b = ResourcePolicy::new().with_local_root(root("file:///workspace/a"));

        assert!(a.same_access(&b));
    }

    #[test]
    fn differing_roots_are_not_same_access() {
        let a = ResourcePolicy::new().with_local_root(root("file:///workspace/a"));
        let b = ResourcePolicy::new().with_local_root(root("file:///workspace/b"));

        assert!(!a.same_access(&b));
    }

    #[test]
    fn differing_port_mappings_are_not_same_access() {
        let a = ResourcePolicy::new().with_port_mapping(PortMapping::new(3000, 3001));
        let b = ResourcePolicy::new().with_port_mapping(PortMapping::new(3000, 3002));

        assert!(!a.same_access(&b));
    }

    #[test]
    fn empty_policies_are_same_access() {
        assert!(ResourcePolicy::new().same_access(&ResourcePolicy::default()));
    }

    #[test]
    fn port_mapping_serializes_both_ports() {
        let json = serde_json::to_value(PortMapping::new(3000, 3001)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "source_port": 3000, "target_port": 3001 })
        );
    }
}
