//! Path variables captured by a route match.
//!
//! Values are kept exactly as they appeared in the request path; typing is
//! left to the schema layer, which coerces `"42"` into an integer when the
//! field asks for one.

use smallvec::SmallVec;

/// Maximum number of variables stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Path variables ("view args") captured from a request path.
///
/// Stored as ordered `(name, value)` pairs. Routes rarely capture more than a
/// handful of variables, so the pairs live inline until there are more than
/// four of them.
///
/// # Example
///
/// ```rust
/// use argus_router::Params;
///
/// let mut params = Params::new();
/// params.push("user_id", "42");
///
/// assert_eq!(params.get("user_id"), Some("42"));
/// assert_eq!(params.get("post_id"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a variable. A later push with the same name shadows nothing;
    /// lookups return the first occurrence.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value captured for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if a variable named `name` was captured.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of captured variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Params {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }
}
