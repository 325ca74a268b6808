//! Route pattern parsing and matching.
//!
//! Patterns are slash-separated segments. A segment is either a literal or a
//! variable. Variables may be written in the Werkzeug style (`<id>`,
//! `<int:id>`) or the OpenAPI style (`{id}`); a trailing `*rest` captures the
//! remainder of the path.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::{Params, RouteError};

/// Restriction applied to the text captured by a path variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Converter {
    /// Any single segment.
    #[default]
    String,
    /// Digits only.
    Int,
    /// A decimal number (`1`, `1.5`).
    Float,
    /// The rest of the path, slashes included. Must be the last segment.
    Path,
}

impl FromStr for Converter {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" | "str" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "path" => Ok(Self::Path),
            other => Err(RouteError::UnknownConverter(other.to_string())),
        }
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Path => write!(f, "path"),
        }
    }
}

impl Converter {
    fn accepts(self, segment: &str) -> bool {
        match self {
            Self::String | Self::Path => !segment.is_empty(),
            Self::Int => !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()),
            Self::Float => {
                let mut parts = segment.splitn(2, '.');
                let whole = parts.next().unwrap_or_default();
                let frac = parts.next();
                !whole.is_empty()
                    && whole.bytes().all(|b| b.is_ascii_digit())
                    && frac.map_or(true, |f| {
                        !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit())
                    })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable { name: String, converter: Converter },
}

/// A parsed route pattern.
///
/// # Example
///
/// ```rust
/// use argus_router::RoutePattern;
///
/// let pattern: RoutePattern = "/users/<int:id>".parse().unwrap();
///
/// let params = pattern.matches("/users/42").unwrap();
/// assert_eq!(params.get("id"), Some("42"));
///
/// assert!(pattern.matches("/users/ann").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parses a pattern.
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let raw: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw.len());

        for (index, segment) in raw.iter().enumerate() {
            let parsed = parse_segment(segment)?;
            if let Segment::Variable {
                converter: Converter::Path,
                ref name,
            } = parsed
            {
                if index + 1 != raw.len() {
                    return Err(RouteError::PathNotLast(name.clone()));
                }
            }
            if let Segment::Variable { ref name, .. } = parsed {
                let duplicate = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Variable { name: n, .. } if n == name));
                if duplicate {
                    return Err(RouteError::DuplicateVariable(name.clone()));
                }
            }
            segments.push(parsed);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of the variables in declaration order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Variable { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Matches a request path, returning the captured variables.
    ///
    /// Each segment is percent-decoded before it is compared or captured, so
    /// `/users/Ann%20Lee` yields `Ann Lee`. An encoded slash (`%2F`) stays
    /// inside its segment. Segments that do not decode to UTF-8 never match.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Params> {
        let actual: Vec<Cow<'_, str>> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(urlencoding::decode)
            .collect::<Result<_, _>>()
            .ok()?;
        let mut params = Params::new();

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(expected) => {
                    if actual.get(index).map(AsRef::as_ref) != Some(expected.as_str()) {
                        return None;
                    }
                }
                Segment::Variable {
                    name,
                    converter: Converter::Path,
                } => {
                    let rest = actual.get(index..).filter(|r| !r.is_empty())?;
                    params.push(name.as_str(), rest.join("/"));
                    return Some(params);
                }
                Segment::Variable { name, converter } => {
                    let value: &str = actual.get(index)?;
                    if !converter.accepts(value) {
                        return None;
                    }
                    params.push(name.as_str(), value);
                }
            }
        }

        (actual.len() == self.segments.len()).then_some(params)
    }
}

impl FromStr for RoutePattern {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_segment(segment: &str) -> Result<Segment, RouteError> {
    let variable = if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        Some(match inner.split_once(':') {
            Some((converter, name)) => (name, converter.parse()?),
            None => (inner, Converter::String),
        })
    } else if let Some(inner) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some((inner, Converter::String))
    } else {
        segment.strip_prefix('*').map(|name| (name, Converter::Path))
    };

    match variable {
        Some((name, converter)) => {
            if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(RouteError::InvalidVariable(segment.to_string()));
            }
            Ok(Segment::Variable {
                name: name.to_string(),
                converter,
            })
        }
        None => Ok(Segment::Literal(segment.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let pattern = RoutePattern::parse("/health").unwrap();
        assert!(pattern.matches("/health").is_some());
        assert!(pattern.matches("/health/").is_some());
        assert!(pattern.matches("/ready").is_none());
    }

    #[test]
    fn test_root_pattern() {
        let pattern = RoutePattern::parse("/").unwrap();
        let params = pattern.matches("/").unwrap();
        assert!(params.is_empty());
        assert!(pattern.matches("/users").is_none());
    }

    #[test]
    fn test_werkzeug_variable() {
        let pattern = RoutePattern::parse("/users/<id>").unwrap();
        let params = pattern.matches("/users/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_openapi_variable() {
        let pattern = RoutePattern::parse("/users/{user_id}/posts/{post_id}").unwrap();
        let params = pattern.matches("/users/7/posts/99").unwrap();
        assert_eq!(params.get("user_id"), Some("7"));
        assert_eq!(params.get("post_id"), Some("99"));
    }

    #[test]
    fn test_int_converter_rejects_text() {
        let pattern = RoutePattern::parse("/users/<int:id>").unwrap();
        assert!(pattern.matches("/users/42").is_some());
        assert!(pattern.matches("/users/abc").is_none());
        assert!(pattern.matches("/users/-1").is_none());
    }

    #[test]
    fn test_float_converter() {
        let pattern = RoutePattern::parse("/price/<float:amount>").unwrap();
        assert!(pattern.matches("/price/1.5").is_some());
        assert!(pattern.matches("/price/3").is_some());
        assert!(pattern.matches("/price/1.").is_none());
        assert!(pattern.matches("/price/abc").is_none());
    }

    #[test]
    fn test_path_converter_captures_rest() {
        let pattern = RoutePattern::parse("/files/<path:name>").unwrap();
        let params = pattern.matches("/files/images/logo.png").unwrap();
        assert_eq!(params.get("name"), Some("images/logo.png"));
        assert!(pattern.matches("/files").is_none());
    }

    #[test]
    fn test_star_wildcard() {
        let pattern = RoutePattern::parse("/static/*rest").unwrap();
        let params = pattern.matches("/static/css/site.css").unwrap();
        assert_eq!(params.get("rest"), Some("css/site.css"));
    }

    #[test]
    fn test_segment_count_mismatch() {
        let pattern = RoutePattern::parse("/users/<id>").unwrap();
        assert!(pattern.matches("/users").is_none());
        assert!(pattern.matches("/users/1/extra").is_none());
    }

    #[test]
    fn test_unknown_converter() {
        let err = RoutePattern::parse("/users/<uuid:id>").unwrap_err();
        assert_eq!(err, RouteError::UnknownConverter("uuid".to_string()));
    }

    #[test]
    fn test_path_must_be_last() {
        let err = RoutePattern::parse("/files/<path:name>/raw").unwrap_err();
        assert_eq!(err, RouteError::PathNotLast("name".to_string()));
    }

    #[test]
    fn test_duplicate_variable() {
        let err = RoutePattern::parse("/a/<id>/b/<id>").unwrap_err();
        assert_eq!(err, RouteError::DuplicateVariable("id".to_string()));
    }

    #[test]
    fn test_invalid_variable_name() {
        assert!(RoutePattern::parse("/users/<>").is_err());
        assert!(RoutePattern::parse("/users/<int:bad-name>").is_err());
    }

    #[test]
    fn test_variables_listed_in_order() {
        let pattern = RoutePattern::parse("/orgs/<org>/users/<int:user>").unwrap();
        let names: Vec<_> = pattern.variables().collect();
        assert_eq!(names, vec!["org", "user"]);
        assert_eq!(pattern.to_string(), "/orgs/<org>/users/<int:user>");
    }

    #[test]
    fn test_captures_are_percent_decoded() {
        let pattern = RoutePattern::parse("/users/<name>").unwrap();
        let params = pattern.matches("/users/Ann%20Lee").unwrap();
        assert_eq!(params.get("name"), Some("Ann Lee"));

        let params = pattern.matches("/users/a%2Fb").unwrap();
        assert_eq!(params.get("name"), Some("a/b"));
    }

    #[test]
    fn test_converters_check_decoded_text() {
        let pattern = RoutePattern::parse("/items/<int:id>").unwrap();
        assert_eq!(pattern.matches("/items/%34%32").unwrap().get("id"), Some("42"));
        assert!(pattern.matches("/items/4%2E2").is_none());
    }

    #[test]
    fn test_encoded_literal_and_path_rest() {
        let pattern = RoutePattern::parse("/files/caf\u{e9}/*rest").unwrap();
        let params = pattern.matches("/files/caf%C3%A9/a%20b/c").unwrap();
        assert_eq!(params.get("rest"), Some("a b/c"));
    }

    #[test]
    fn test_invalid_utf8_does_not_match() {
        let pattern = RoutePattern::parse("/users/<name>").unwrap();
        assert!(pattern.matches("/users/%FF").is_none());
    }
}
