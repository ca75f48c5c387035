//! Method and path matching.
//!
//! # Responsibilities
//! - Match request methods (exact, case-insensitive; HEAD falls back to GET)
//! - Compile path patterns with literal, `:param` and trailing `*` segments
//! - Capture path parameters
//!
//! # Design Decisions
//! - Literal segments compare ASCII case-insensitively; captured
//!   parameters keep their case
//! - One trailing slash on the request path is ignored
//! - No regex; matching is a single pass over the segments

use std::borrow::Cow;

use axum::http::Method;
use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Matches the request method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodMatcher {
    /// Every method.
    Any,
    /// One method. `HEAD` requests also match `GET`.
    Exact(Method),
}

impl MethodMatcher {
    pub fn matches(&self, method: &Method) -> bool {
        match self {
            MethodMatcher::Any => true,
            MethodMatcher::Exact(expected) => {
                expected.as_str().eq_ignore_ascii_case(method.as_str())
                    || (*method == Method::HEAD && *expected == Method::GET)
            }
        }
    }
}

impl std::fmt::Display for MethodMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodMatcher::Any => write!(f, "*"),
            MethodMatcher::Exact(method) => write!(f, "{}", method),
        }
    }
}

/// Errors raised while compiling a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern must start with '/'")]
    MissingLeadingSlash,

    #[error("empty segment")]
    EmptySegment,

    #[error("parameter at segment {0} has no name")]
    UnnamedParam(usize),

    #[error("wildcard must be the last segment")]
    WildcardNotLast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

/// Captured path parameters, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A compiled path pattern such as `/api/products/search/:name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let trimmed = pattern
            .strip_prefix('/')
            .ok_or(PatternError::MissingLeadingSlash)?;
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        let mut segments = Vec::new();
        if !trimmed.is_empty() {
            let parts: Vec<&str> = trimmed.split('/').collect();
            let last = parts.len() - 1;
            for (index, part) in parts.into_iter().enumerate() {
                let segment = match part {
                    "" => return Err(PatternError::EmptySegment),
                    "*" if index != last => return Err(PatternError::WildcardNotLast),
                    "*" => Segment::Wildcard,
                    _ => match part.strip_prefix(':') {
                        Some("") => return Err(PatternError::UnnamedParam(index)),
                        Some(name) => Segment::Param(name.to_string()),
                        None => Segment::Literal(part.to_string()),
                    },
                };
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning captured parameters.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let path = path.strip_suffix('/').unwrap_or(path);
        let parts: Vec<&str> = if path.is_empty() {
            Vec::new()
        } else {
            path.split('/').collect()
        };

        let mut params = Vec::new();
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Wildcard => {
                    let rest = parts.get(index..).map(|r| r.join("/")).unwrap_or_default();
                    params.push(("*".to_string(), percent_decode(&rest)));
                    return Some(PathParams(params));
                }
                Segment::Literal(literal) => {
                    if !parts
                        .get(index)
                        .is_some_and(|part| part.eq_ignore_ascii_case(literal))
                    {
                        return None;
                    }
                }
                Segment::Param(name) => match parts.get(index) {
                    Some(value) if !value.is_empty() => {
                        params.push((name.clone(), percent_decode(value)));
                    }
                    _ => return None,
                },
            }
        }

        (parts.len() == self.segments.len()).then_some(PathParams(params))
    }
}

/// Decode `%XX` escapes. Non-UTF-8 results yield the input.
fn percent_decode(input: &str) -> String {
    percent_decode_str(input)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| input.to_string())
}
