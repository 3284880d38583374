//! Route catalog definitions and validation.
//!
//! The server delivers the catalog as JSON. Entries are validated one by one:
//! a malformed entry is rejected with a reason and the rest of the catalog
//! still loads.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One logical route and every path template that reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteDefinition {
    pub key: String,
    pub paths: Vec<String>,
}

/// Ordered list of route definitions. Order matters for pattern precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    pub routes: Vec<RouteDefinition>,
}

/// Reason a catalog entry or template was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    NotAnObject,
    MissingKey,
    PathsNotArray,
    NonStringTemplate,
    EmptyTemplate,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RejectReason::NotAnObject => "route entry is not an object",
            RejectReason::MissingKey => "route entry has no usable key",
            RejectReason::PathsNotArray => "route paths is not an array",
            RejectReason::NonStringTemplate => "path template is not a string",
            RejectReason::EmptyTemplate => "path template is empty",
        };
        f.write_str(text)
    }
}

/// A skipped catalog entry or template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Position of the route entry in the catalog.
    pub route_index: usize,
    pub key: Option<String>,
    pub template: Option<String>,
    pub reason: RejectReason,
}

impl Catalog {
    /// Validate raw route entries as delivered by the catalog endpoint.
    ///
    /// Entries that are not objects, lack a string key, or carry a non-array
    /// `paths` are rejected whole. Non-string items inside `paths` are
    /// rejected individually and the entry keeps its remaining templates.
    pub fn from_raw(entries: &[Value]) -> (Catalog, Vec<Rejection>) {
        let mut routes = Vec::with_capacity(entries.len());
        let mut rejections = Vec::new();

        for (route_index, entry) in entries.iter().enumerate() {
            let Some(obj) = entry.as_object() else {
                rejections.push(Rejection {
                    route_index,
                    key: None,
                    template: None,
                    reason: RejectReason::NotAnObject,
                });
                continue;
            };

            let key = obj
                .get("key")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|k| !k.is_empty());
            let Some(key) = key else {
                rejections.push(Rejection {
                    route_index,
                    key: None,
                    template: None,
                    reason: RejectReason::MissingKey,
                });
                continue;
            };

            let Some(raw_paths) = obj.get("paths").and_then(Value::as_array) else {
                rejections.push(Rejection {
                    route_index,
                    key: Some(key.to_string()),
                    template: None,
                    reason: RejectReason::PathsNotArray,
                });
                continue;
            };

            let mut paths = Vec::with_capacity(raw_paths.len());
            for raw in raw_paths {
                match raw.as_str() {
                    Some(path) => paths.push(path.to_string()),
                    None => rejections.push(Rejection {
                        route_index,
                        key: Some(key.to_string()),
                        template: Some(raw.to_string()),
                        reason: RejectReason::NonStringTemplate,
                    }),
                }
            }

            routes.push(RouteDefinition {
                key: key.to_string(),
                paths,
            });
        }

        (Catalog { routes }, rejections)
    }
}
