//! Path syntax and matching.
//!
//! # Responsibilities
//! - Join node paths into absolute paths
//! - Detect external links
//! - Compile path patterns (`literal`, `:param`, `:rest*`, `*`)
//! - Match request paths and extract parameters
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Query string, fragment and trailing slashes are ignored
//! - No regex: segment-by-segment comparison

use std::collections::BTreeMap;

use thiserror::Error;

/// Path of the catch-all node.
pub const CATCH_ALL: &str = "*";

const EXTERNAL_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// Captured path parameters.
pub type Params = BTreeMap<String, String>;

/// Returns true if `path` is an outbound link rather than an internal segment.
pub fn is_external(path: &str) -> bool {
    url::Url::parse(path)
        .map(|u| EXTERNAL_SCHEMES.contains(&u.scheme()))
        .unwrap_or(false)
}

/// Strip query and fragment, collapse repeated and trailing slashes.
pub fn normalize(location: &str) -> String {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    let segments: Vec<&str> = location[..end].split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Join a child path onto its parent's absolute path.
///
/// Absolute children and external links are taken as-is, an empty child
/// resolves to the parent itself.
pub fn join(parent: &str, child: &str) -> String {
    if child == CATCH_ALL || is_external(child) {
        return child.to_string();
    }
    if child.starts_with('/') {
        return normalize(child);
    }
    if child.is_empty() {
        return normalize(parent);
    }
    normalize(&format!("{}/{}", parent, child))
}

/// Replace `:param` segments in `path` with captured values.
///
/// Segments without a captured value are kept verbatim.
pub fn fill_params(path: &str, params: &Params) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let filled: Vec<String> = path
        .split('/')
        .map(|segment| {
            let key = segment
                .strip_prefix(':')
                .map(|name| name.trim_end_matches('*'));
            match key.and_then(|name| params.get(name)) {
                Some(value) => value.clone(),
                None => segment.to_string(),
            }
        })
        .collect();
    normalize(&filled.join("/"))
}

/// Errors raised while compiling a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("parameter segment has no name")]
    EmptyParam,

    #[error("rest parameter `:{0}*` must be the last segment")]
    RestNotLast(String),

    #[error("`*` is only valid as a whole path")]
    MisplacedWildcard,
}

/// One compiled path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Param(String),
    Rest(String),
}

/// A compiled path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches any path.
    CatchAll,
    /// Matches segment by segment.
    Segments(Vec<Segment>),
}

impl PathPattern {
    /// Compile an absolute path into a pattern.
    pub fn parse(path: &str) -> Result<Self, PatternError> {
        if path == CATCH_ALL {
            return Ok(PathPattern::CatchAll);
        }

        let raw: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw.len());
        for (i, part) in raw.iter().enumerate() {
            let segment = match part.strip_prefix(':') {
                Some(name) => match name.strip_suffix('*') {
                    Some("") => return Err(PatternError::EmptyParam),
                    Some(rest) if i + 1 != raw.len() => {
                        return Err(PatternError::RestNotLast(rest.to_string()))
                    }
                    Some(rest) => Segment::Rest(rest.to_string()),
                    None if name.is_empty() => return Err(PatternError::EmptyParam),
                    None => Segment::Param(name.to_string()),
                },
                None if part.contains('*') => return Err(PatternError::MisplacedWildcard),
                None => Segment::Literal(part.to_string()),
            };
            segments.push(segment);
        }
        Ok(PathPattern::Segments(segments))
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, PathPattern::CatchAll)
    }

    /// Match a normalized path, returning captured parameters.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let segments = match self {
            PathPattern::CatchAll => return Some(Params::new()),
            PathPattern::Segments(segments) => segments,
        };

        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut params = Params::new();
        let mut index = 0;

        for segment in segments {
            match segment {
                Segment::Literal(expected) => {
                    if parts.get(index) != Some(&expected.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.get(index)?;
                    params.insert(name.clone(), (*value).to_string());
                }
                Segment::Rest(name) => {
                    params.insert(name.clone(), parts[index.min(parts.len())..].join("/"));
                    return Some(params);
                }
            }
            index += 1;
        }

        (index == parts.len()).then_some(params)
    }
}
