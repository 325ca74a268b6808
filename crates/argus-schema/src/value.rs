//! Raw values as extracted from a request, and typed values after loading.

use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use serde_json::{json, Value};

/// A file received in a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The form field name.
    pub name: Option<String>,
    /// The original file name from the client.
    pub file_name: Option<String>,
    /// The declared MIME type of the part.
    pub content_type: Option<String>,
    /// The file content.
    pub data: Bytes,
}

impl UploadedFile {
    /// Creates a new uploaded file.
    #[must_use]
    pub fn new(
        name: Option<String>,
        file_name: Option<String>,
        content_type: Option<String>,
        data: Bytes,
    ) -> Self {
        Self {
            name,
            file_name,
            content_type,
            data,
        }
    }

    /// Get the form field name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the original file name.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Get the MIME type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Get the file data.
    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Size of the file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File metadata as JSON. The content itself is not included.
    #[must_use]
    pub fn metadata(&self) -> Value {
        json!({
            "name": self.name,
            "filename": self.file_name,
            "content_type": self.content_type,
            "size": self.data.len(),
        })
    }
}

/// A value found in the request, before coercion.
///
/// Text locations (query string, form, headers, cookies, path variables)
/// produce `Text`/`Texts`; the JSON body produces `Json`; multipart file parts
/// produce `File`/`Files`. A value that is absent is represented by the
/// caller as `None`, never as a variant here.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// A single text value.
    Text(String),
    /// Every value for a repeated key.
    Texts(Vec<String>),
    /// A decoded JSON value.
    Json(Value),
    /// A single uploaded file.
    File(UploadedFile),
    /// Every file uploaded under one field name.
    Files(Vec<UploadedFile>),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Value> for RawValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// A loaded, typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Explicit null (only when the field allows it).
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A finite floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// A timezone-aware timestamp.
    DateTime(DateTime<FixedOffset>),
    /// A homogeneous list.
    List(Vec<ArgValue>),
    /// An arbitrary JSON value (`Dict` and `Raw` fields).
    Json(Value),
    /// An uploaded file.
    File(UploadedFile),
}

impl ArgValue {
    /// Builds a value from JSON without a declared kind.
    ///
    /// Used for defaults: scalars map onto their typed variant, anything else
    /// stays JSON.
    #[must_use]
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Json(Value::Number(n))),
            Value::String(s) => Self::Str(s),
            other => Self::Json(other),
        }
    }

    /// Renders the value as JSON. Files render as their metadata.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => json!(i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Self::Str(s) => Value::String(s.clone()),
            Self::DateTime(dt) => Value::String(dt.to_rfc3339()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Json(v) => v.clone(),
            Self::File(file) => file.metadata(),
        }
    }

    /// Returns the string, if this is one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number as `f64` (integers included).
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the list items, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[ArgValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the file, if this is one.
    #[must_use]
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            Self::File(file) => Some(file),
            _ => None,
        }
    }

    /// Returns true for [`ArgValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl serde::Serialize for ArgValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(ArgValue::from_json(json!(null)), ArgValue::Null);
        assert_eq!(ArgValue::from_json(json!(true)), ArgValue::Bool(true));
        assert_eq!(ArgValue::from_json(json!(10)), ArgValue::Int(10));
        assert_eq!(ArgValue::from_json(json!(1.5)), ArgValue::Float(1.5));
        assert_eq!(ArgValue::from_json(json!("x")), ArgValue::Str("x".into()));
        assert_eq!(
            ArgValue::from_json(json!({"a": 1})),
            ArgValue::Json(json!({"a": 1}))
        );
    }

    #[test]
    fn test_to_json_list() {
        let value = ArgValue::List(vec![ArgValue::Int(1), ArgValue::Str("two".into())]);
        assert_eq!(value.to_json(), json!([1, "two"]));
    }

    #[test]
    fn test_file_renders_metadata_only() {
        let file = UploadedFile::new(
            Some("avatar".into()),
            Some("me.png".into()),
            Some("image/png".into()),
            Bytes::from_static(b"\x89PNG"),
        );
        let value = ArgValue::File(file);

        assert_eq!(
            value.to_json(),
            json!({"name": "avatar", "filename": "me.png", "content_type": "image/png", "size": 4})
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(ArgValue::Str("a".into()).as_str(), Some("a"));
        assert_eq!(ArgValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(ArgValue::Bool(false).as_bool(), Some(false));
        assert_eq!(ArgValue::Int(3).as_str(), None);
        assert!(ArgValue::Null.is_null());
    }

    #[test]
    fn test_serialize_via_json() {
        let text = serde_json::to_string(&ArgValue::List(vec![ArgValue::Bool(true)])).unwrap();
        assert_eq!(text, "[true]");
    }

    #[test]
    fn test_raw_value_conversions() {
        assert_eq!(RawValue::from("a"), RawValue::Text("a".into()));
        assert_eq!(RawValue::from(json!(1)), RawValue::Json(json!(1)));
    }
}
