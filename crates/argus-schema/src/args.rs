//! The validated result of a parse.

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::value::{ArgValue, UploadedFile};

/// Field name to validated value, in schema order.
///
/// Optional fields that were missing are absent, not `Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: IndexMap<String, ArgValue>,
}

impl ParsedArgs {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    /// Get a value by field name.
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Get a string value.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    /// Get an integer value.
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ArgValue::as_i64)
    }

    /// Get a numeric value as `f64`.
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ArgValue::as_f64)
    }

    /// Get a boolean value.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ArgValue::as_bool)
    }

    /// Get a timestamp value.
    pub fn datetime(&self, name: &str) -> Option<DateTime<FixedOffset>> {
        match self.get(name) {
            Some(ArgValue::DateTime(dt)) => Some(*dt),
            _ => None,
        }
    }

    /// Get a list value.
    pub fn list(&self, name: &str) -> Option<&[ArgValue]> {
        self.get(name).and_then(ArgValue::as_list)
    }

    /// Get an uploaded file.
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.get(name).and_then(ArgValue::as_file)
    }

    /// Returns true if the field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no field is present.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Renders the result as a JSON object.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }

    /// Deserializes the result into a typed struct.
    ///
    /// # Errors
    ///
    /// Returns an error if the values do not fit `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_json())
    }
}

impl FromIterator<(String, ArgValue)> for ParsedArgs {
    fn from_iter<I: IntoIterator<Item = (String, ArgValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl serde::Serialize for ParsedArgs {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn sample() -> ParsedArgs {
        let mut args = ParsedArgs::new();
        args.insert("name", ArgValue::Str("Ann".into()));
        args.insert("age", ArgValue::Int(31));
        args.insert("tags", ArgValue::List(vec![ArgValue::Str("a".into())]));
        args
    }

    #[test]
    fn test_typed_getters() {
        let args = sample();
        assert_eq!(args.str("name"), Some("Ann"));
        assert_eq!(args.int("age"), Some(31));
        assert_eq!(args.float("age"), Some(31.0));
        assert_eq!(args.int("name"), None);
        assert_eq!(args.list("tags").map(<[ArgValue]>::len), Some(1));
        assert!(!args.contains("missing"));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_to_json_keeps_order() {
        let json = sample().to_json();
        assert_eq!(json, json!({"name": "Ann", "age": 31, "tags": ["a"]}));
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "age", "tags"]);
    }

    #[test]
    fn test_deserialize_into_struct() {
        #[derive(Deserialize)]
        struct Query {
            name: String,
            age: u8,
            #[serde(default)]
            nickname: Option<String>,
        }

        let query: Query = sample().deserialize().unwrap();
        assert_eq!(query.name, "Ann");
        assert_eq!(query.age, 31);
        assert!(query.nickname.is_none());
    }
}
