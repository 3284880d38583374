//! Compiled catalog index and path resolution.
//!
//! # Responsibilities
//! - Compile every catalog template once
//! - Resolve a request path to the route key that protects it
//!
//! # Design Decisions
//! - Immutable after construction (shared via Arc, no locks)
//! - O(1) exact lookup for parameter-free templates
//! - O(n) ordered scan of parameterized templates on exact miss
//! - Exact hits always outrank pattern hits, whatever the catalog order
//! - First entry in catalog order wins among exact duplicates and patterns

use std::collections::HashMap;

use serde::Serialize;

use crate::routing::catalog::{Catalog, RejectReason, Rejection};
use crate::routing::matcher::{CompileError, PathMatcher, PathPattern};
use crate::routing::normalize::normalize_path;

/// Lookup structure built from a [`Catalog`].
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    exact: HashMap<String, String>,
    matchers: Vec<PathMatcher>,
}

/// Serializable view of an index, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub exact: Vec<(String, String)>,
    pub patterns: Vec<(String, String)>,
}

impl CatalogIndex {
    /// Compile a catalog. Templates that fail to compile are returned as
    /// rejections and left out of the index.
    pub fn build(catalog: &Catalog) -> (Self, Vec<Rejection>) {
        let mut exact = HashMap::new();
        let mut matchers = Vec::new();
        let mut rejections = Vec::new();

        for (route_index, route) in catalog.routes.iter().enumerate() {
            for template in &route.paths {
                let pattern = match PathPattern::compile(template) {
                    Ok(p) => p,
                    Err(e) => {
                        rejections.push(Rejection {
                            route_index,
                            key: Some(route.key.clone()),
                            template: Some(template.clone()),
                            reason: match e {
                                CompileError::Empty => RejectReason::EmptyTemplate,
                            },
                        });
                        continue;
                    }
                };

                if pattern.has_params() {
                    matchers.push(PathMatcher {
                        key: route.key.clone(),
                        template: template.clone(),
                        pattern,
                    });
                } else {
                    exact
                        .entry(normalize_path(template))
                        .or_insert_with(|| route.key.clone());
                }
            }
        }

        (Self { exact, matchers }, rejections)
    }

    /// Resolve a path to its route key.
    ///
    /// Precedence: exact table, then the first matching pattern in catalog
    /// order, then `None`.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let normalized = normalize_path(path);
        if normalized.is_empty() {
            return None;
        }

        if let Some(key) = self.exact.get(&normalized) {
            return Some(key.as_str());
        }

        self.matchers
            .iter()
            .find(|m| m.matches(&normalized))
            .map(|m| m.key.as_str())
    }

    pub fn exact_len(&self) -> usize {
        self.exact.len()
    }

    pub fn matchers(&self) -> &[PathMatcher] {
        &self.matchers
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.matchers.is_empty()
    }

    pub fn summary(&self) -> IndexSummary {
        let mut exact: Vec<_> = self
            .exact
            .iter()
            .map(|(path, key)| (path.clone(), key.clone()))
            .collect();
        exact.sort();
        let patterns = self
            .matchers
            .iter()
            .map(|m| (m.template.clone(), m.key.clone()))
            .collect();
        IndexSummary { exact, patterns }
    }
}
