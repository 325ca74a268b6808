//! Ordered multi-value maps for query strings, forms and cookies.

use indexmap::IndexMap;
use smallvec::SmallVec;

type Values = SmallVec<[String; 1]>;

/// A map from key to one or more string values, in first-seen key order.
///
/// ```
/// use argus_extract::MultiDict;
///
/// let query = MultiDict::from_urlencoded("tag=a&tag=b&page=2");
/// assert_eq!(query.get("tag"), Some("a"));
/// assert_eq!(query.get_all("tag"), ["a", "b"]);
/// assert_eq!(query.get("page"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiDict {
    entries: IndexMap<String, Values>,
}

impl MultiDict {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `application/x-www-form-urlencoded` text.
    ///
    /// Decoding is lossy: invalid percent escapes are kept literally, so this
    /// never fails.
    #[must_use]
    pub fn from_urlencoded(input: &str) -> Self {
        Self::from_urlencoded_bytes(input.as_bytes())
    }

    /// Parses urlencoded bytes.
    #[must_use]
    pub fn from_urlencoded_bytes(input: &[u8]) -> Self {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(input)
            .map(|pairs| pairs.into_iter().collect())
            .unwrap_or_default()
    }

    /// Appends a value for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for `key`, empty if absent.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .get(key)
            .map(|values| values.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if `key` has at least one value.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MultiDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (key, value) in iter {
            dict.append(key, value);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_percent_and_plus() {
        let dict = MultiDict::from_urlencoded("name=Ann+Lee&city=S%C3%A3o%20Paulo");
        assert_eq!(dict.get("name"), Some("Ann Lee"));
        assert_eq!(dict.get("city"), Some("São Paulo"));
    }

    #[test]
    fn test_empty_value_is_present() {
        let dict = MultiDict::from_urlencoded("name=&flag");
        assert_eq!(dict.get("name"), Some(""));
        assert_eq!(dict.get("flag"), Some(""));
    }

    #[test]
    fn test_missing_key() {
        let dict = MultiDict::from_urlencoded("a=1");
        assert_eq!(dict.get("b"), None);
        assert!(dict.get_all("b").is_empty());
        assert!(!dict.contains("b"));
    }

    #[test]
    fn test_key_order_and_values() {
        let dict: MultiDict = [("b", "1"), ("a", "2"), ("b", "3")].into_iter().collect();
        assert_eq!(dict.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(dict.get_all("b"), ["1", "3"]);
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(MultiDict::from_urlencoded("").is_empty());
    }

    proptest::proptest! {
        #[test]
        fn prop_arbitrary_bytes_decode(input in proptest::collection::vec(proptest::num::u8::ANY, 0..64)) {
            let dict = MultiDict::from_urlencoded_bytes(&input);
            let pairs = input.split(|b| *b == b'&').filter(|p| !p.is_empty()).count();
            proptest::prop_assert!(dict.len() <= pairs);
        }
    }
}
