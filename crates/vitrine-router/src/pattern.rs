//! Route patterns with `:name` placeholders.

use std::fmt;

use crate::request::RouteParams;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed route pattern such as `products/:id` or
/// `user/:user/wishlist/check/:product`.
///
/// Matching is segment by segment: literals compare exactly, placeholders
/// capture any non-empty segment, and the segment counts must agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let raw = pattern.trim_matches('/').to_string();
        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self { raw, segments }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the placeholders, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match a routing key, returning the captured parameters.
    ///
    /// Captured values are percent-decoded.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let parts: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = urlencoding::decode(part)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| part.to_string());
                    params.insert(name.clone(), value);
                }
            }
        }
        Some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
