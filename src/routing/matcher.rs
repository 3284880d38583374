//! Path template compilation and matching.
//!
//! # Responsibilities
//! - Compile catalog templates (`/hostels/:name/units/:unit`) into matchers
//! - Match normalized request paths against compiled templates
//!
//! # Design Decisions
//! - Literal segments compare byte-for-byte (case-sensitive)
//! - `:param` segments match exactly one non-empty segment, never a `/`
//! - Matching is anchored on both ends: segment counts must agree
//! - No regex: templates are split once at compile time

use std::fmt;

use crate::routing::normalize::normalize_path;

/// One compiled template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// Matches any single non-empty path segment.
    Param(String),
}

/// Why a template could not be compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileError {
    /// Nothing left after normalization.
    Empty,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Empty => write!(f, "template is empty"),
        }
    }
}

/// A compiled, fully anchored path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// The `/` template. Matches only the root.
    Root,
    /// Any other template, split on `/`.
    Segments(Vec<Segment>),
}

impl PathPattern {
    /// Compile a catalog template.
    pub fn compile(template: &str) -> Result<Self, CompileError> {
        let normalized = normalize_path(template);
        if normalized.is_empty() {
            return Err(CompileError::Empty);
        }
        if normalized == "/" {
            return Ok(PathPattern::Root);
        }

        let mut segments = Vec::new();
        for part in normalized.split('/') {
            // A bare `:` is a parameter with an empty name.
            match part.strip_prefix(':') {
                Some(name) => segments.push(Segment::Param(name.to_string())),
                None => segments.push(Segment::Literal(part.to_string())),
            }
        }
        Ok(PathPattern::Segments(segments))
    }

    /// Returns true if the template contains at least one parameter.
    pub fn has_params(&self) -> bool {
        match self {
            PathPattern::Root => false,
            PathPattern::Segments(segments) => {
                segments.iter().any(|s| matches!(s, Segment::Param(_)))
            }
        }
    }

    /// Match an already-normalized path against the whole template.
    pub fn matches(&self, normalized_path: &str) -> bool {
        match self {
            PathPattern::Root => normalized_path == "/",
            PathPattern::Segments(segments) => {
                let mut parts = normalized_path.split('/');
                for segment in segments {
                    let Some(part) = parts.next() else {
                        return false;
                    };
                    let ok = match segment {
                        Segment::Literal(lit) => lit == part,
                        Segment::Param(_) => !part.is_empty(),
                    };
                    if !ok {
                        return false;
                    }
                }
                // Anchored: no trailing segments allowed.
                parts.next().is_none()
            }
        }
    }
}

/// A compiled template bound to the route key it resolves to.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pub key: String,
    pub template: String,
    pub pattern: PathPattern,
}

impl PathMatcher {
    pub fn matches(&self, normalized_path: &str) -> bool {
        self.pattern.matches(normalized_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_segments() {
        let pattern = PathPattern::compile("/hostels/:name/units/:unit/").unwrap();
        assert_eq!(
            pattern,
            PathPattern::Segments(vec![
                Segment::Literal(String::new()),
                Segment::Literal("hostels".into()),
                Segment::Param("name".into()),
                Segment::Literal("units".into()),
                Segment::Param("unit".into()),
            ])
        );
        assert!(pattern.has_params());
    }

    #[test]
    fn test_compile_root_and_invalid() {
        assert_eq!(PathPattern::compile("/").unwrap(), PathPattern::Root);
        assert_eq!(PathPattern::compile("").unwrap_err(), CompileError::Empty);
        assert_eq!(PathPattern::compile("?q=1").unwrap_err(), CompileError::Empty);
    }

    #[test]
    fn test_bare_colon_is_a_parameter() {
        let pattern = PathPattern::compile("/rooms/:").unwrap();
        assert!(pattern.has_params());
        assert!(pattern.matches("/rooms/A-12"));
        assert!(!pattern.matches("/rooms"));
        assert!(!pattern.matches("/rooms/A/12"));
    }

    #[test]
    fn test_param_matches_single_segment() {
        let pattern = PathPattern::compile("/rooms/:unit").unwrap();
        assert!(pattern.matches("/rooms/A-12"));
        assert!(!pattern.matches("/rooms"));
        assert!(!pattern.matches("/rooms/"));
        assert!(!pattern.matches("/rooms/A/12"));
    }

    #[test]
    fn test_anchored_not_prefix() {
        let short = PathPattern::compile("/x/:a").unwrap();
        let long = PathPattern::compile("/x/:a/y").unwrap();
        assert!(!short.matches("/x/1/y"));
        assert!(long.matches("/x/1/y"));
        assert!(!long.matches("/pre/x/1/y"));
    }

    #[test]
    fn test_literal_is_case_sensitive() {
        let pattern = PathPattern::compile("/Wardens").unwrap();
        assert!(pattern.matches("/Wardens"));
        assert!(!pattern.matches("/wardens"));
        assert!(!pattern.has_params());
    }

    #[test]
    fn test_root_only_matches_root() {
        let pattern = PathPattern::compile("/").unwrap();
        assert!(pattern.matches("/"));
        assert!(!pattern.matches(""));
        assert!(!pattern.matches("/home"));
    }

    #[test]
    fn test_special_characters_are_literal() {
        let pattern = PathPattern::compile("/reports/(all).*").unwrap();
        assert!(pattern.matches("/reports/(all).*"));
        assert!(!pattern.matches("/reports/allxx"));
    }
}
