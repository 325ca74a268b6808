//! Field kinds and raw-to-typed coercion.

use chrono::DateTime;
use serde_json::Value;

use crate::value::{ArgValue, RawValue};

const TRUTHY: [&str; 6] = ["true", "t", "yes", "y", "on", "1"];
const FALSY: [&str; 6] = ["false", "f", "no", "n", "off", "0"];

/// The expected type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A string.
    String,
    /// A 64-bit signed integer.
    Integer,
    /// A finite floating point number.
    Float,
    /// A boolean. Text accepts `true/false`, `yes/no`, `on/off`, `1/0`, ...
    Boolean,
    /// An RFC 3339 timestamp.
    DateTime,
    /// A list whose items all have the inner kind.
    List(Box<FieldKind>),
    /// A JSON object.
    Dict,
    /// Any value, passed through untouched.
    Raw,
    /// An uploaded file.
    File,
}

impl FieldKind {
    /// Shorthand for `FieldKind::List(Box::new(inner))`.
    #[must_use]
    pub fn list_of(inner: FieldKind) -> Self {
        Self::List(Box::new(inner))
    }

    /// Returns true for list kinds, which collect every value of a repeated key.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// The message reported when a value cannot be coerced to this kind.
    #[must_use]
    pub fn invalid_message(&self) -> &'static str {
        match self {
            Self::String => "Not a valid string.",
            Self::Integer => "Not a valid integer.",
            Self::Float => "Not a valid number.",
            Self::Boolean => "Not a valid boolean.",
            Self::DateTime => "Not a valid datetime.",
            Self::List(_) => "Not a valid list.",
            Self::Dict => "Not a valid mapping type.",
            Self::Raw => "Invalid value.",
            Self::File => "Not a valid file.",
        }
    }

    /// Coerces a raw value to this kind.
    ///
    /// On failure returns every message produced; list kinds report one
    /// message per distinct item failure.
    pub fn coerce(&self, raw: RawValue) -> Result<ArgValue, Vec<String>> {
        match (self, raw) {
            (Self::List(inner), raw) => inner.coerce_list(raw),
            (Self::Raw, RawValue::Json(value)) => Ok(ArgValue::Json(value)),
            (Self::Raw, RawValue::Text(text)) => Ok(ArgValue::Str(text)),
            (Self::Raw, RawValue::File(file)) => Ok(ArgValue::File(file)),
            (Self::File, RawValue::File(file)) => Ok(ArgValue::File(file)),
            (Self::File, RawValue::Files(files)) => first(files)
                .map(ArgValue::File)
                .ok_or_else(|| self.invalid()),
            (kind, RawValue::Texts(texts)) => match first(texts) {
                Some(text) => kind.coerce(RawValue::Text(text)),
                None => Err(self.invalid()),
            },
            (kind, RawValue::Text(text)) => kind.from_text(&text).ok_or_else(|| self.invalid()),
            (kind, RawValue::Json(value)) => kind.from_json(value).ok_or_else(|| self.invalid()),
            (_, RawValue::File(_) | RawValue::Files(_)) => Err(self.invalid()),
        }
    }

    fn invalid(&self) -> Vec<String> {
        vec![self.invalid_message().to_string()]
    }

    fn coerce_list(&self, raw: RawValue) -> Result<ArgValue, Vec<String>> {
        let items: Vec<RawValue> = match raw {
            RawValue::Texts(texts) => texts.into_iter().map(RawValue::Text).collect(),
            RawValue::Files(files) => files.into_iter().map(RawValue::File).collect(),
            RawValue::Json(Value::Array(values)) => values.into_iter().map(RawValue::Json).collect(),
            RawValue::Json(Value::Object(_)) => {
                return Err(vec![FieldKind::list_of(self.clone()).invalid_message().to_string()])
            }
            single => vec![single],
        };

        let mut loaded = Vec::with_capacity(items.len());
        let mut errors: Vec<String> = Vec::new();
        for item in items {
            match self.coerce(item) {
                Ok(value) => loaded.push(value),
                Err(messages) => {
                    for message in messages {
                        if !errors.contains(&message) {
                            errors.push(message);
                        }
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(ArgValue::List(loaded))
        } else {
            Err(errors)
        }
    }

    fn from_text(&self, text: &str) -> Option<ArgValue> {
        match self {
            Self::String => Some(ArgValue::Str(text.to_string())),
            Self::Integer => text.trim().parse().ok().map(ArgValue::Int),
            Self::Float => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(ArgValue::Float),
            Self::Boolean => parse_bool(text).map(ArgValue::Bool),
            Self::DateTime => DateTime::parse_from_rfc3339(text.trim())
                .ok()
                .map(ArgValue::DateTime),
            Self::Dict => serde_json::from_str::<Value>(text)
                .ok()
                .filter(Value::is_object)
                .map(ArgValue::Json),
            Self::Raw => Some(ArgValue::Str(text.to_string())),
            Self::List(_) | Self::File => None,
        }
    }

    fn from_json(&self, value: Value) -> Option<ArgValue> {
        match (self, value) {
            (Self::String, Value::String(s)) => Some(ArgValue::Str(s)),
            (Self::Integer, Value::Number(n)) => n.as_i64().map(ArgValue::Int).or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15)
                    .map(|f| ArgValue::Int(f as i64))
            }),
            (Self::Integer | Self::Float | Self::Boolean | Self::DateTime, Value::String(s)) => {
                self.from_text(&s)
            }
            (Self::Float, Value::Number(n)) => n.as_f64().map(ArgValue::Float),
            (Self::Boolean, Value::Bool(b)) => Some(ArgValue::Bool(b)),
            (Self::Boolean, Value::Number(n)) => match n.as_f64() {
                Some(f) if f == 1.0 => Some(ArgValue::Bool(true)),
                Some(f) if f == 0.0 => Some(ArgValue::Bool(false)),
                _ => None,
            },
            (Self::Dict, value @ Value::Object(_)) => Some(ArgValue::Json(value)),
            (Self::Raw, value) => Some(ArgValue::Json(value)),
            _ => None,
        }
    }
}

fn first<T>(items: Vec<T>) -> Option<T> {
    items.into_iter().next()
}

fn parse_bool(text: &str) -> Option<bool> {
    let lowered = text.trim().to_ascii_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::UploadedFile;
    use bytes::Bytes;
    use proptest::prelude::*;
    use serde_json::json;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_string_from_text_and_json() {
        assert_eq!(FieldKind::String.coerce(text("Ann")), Ok(ArgValue::Str("Ann".into())));
        assert_eq!(
            FieldKind::String.coerce(RawValue::Json(json!("Ann"))),
            Ok(ArgValue::Str("Ann".into()))
        );
    }

    #[test]
    fn test_string_rejects_json_number() {
        let err = FieldKind::String.coerce(RawValue::Json(json!(5))).unwrap_err();
        assert_eq!(err, vec!["Not a valid string."]);
    }

    #[test]
    fn test_integer_from_text() {
        assert_eq!(FieldKind::Integer.coerce(text("42")), Ok(ArgValue::Int(42)));
        assert_eq!(FieldKind::Integer.coerce(text(" -7 ")), Ok(ArgValue::Int(-7)));
        assert_eq!(
            FieldKind::Integer.coerce(text("4.2")).unwrap_err(),
            vec!["Not a valid integer."]
        );
        assert!(FieldKind::Integer.coerce(text("forty-two")).is_err());
    }

    #[test]
    fn test_integer_from_json() {
        assert_eq!(FieldKind::Integer.coerce(RawValue::Json(json!(42))), Ok(ArgValue::Int(42)));
        assert_eq!(FieldKind::Integer.coerce(RawValue::Json(json!(42.0))), Ok(ArgValue::Int(42)));
        assert_eq!(FieldKind::Integer.coerce(RawValue::Json(json!("42"))), Ok(ArgValue::Int(42)));
        assert!(FieldKind::Integer.coerce(RawValue::Json(json!(42.5))).is_err());
        assert!(FieldKind::Integer.coerce(RawValue::Json(json!(true))).is_err());
    }

    #[test]
    fn test_float() {
        assert_eq!(FieldKind::Float.coerce(text("1.5")), Ok(ArgValue::Float(1.5)));
        assert_eq!(FieldKind::Float.coerce(RawValue::Json(json!(2))), Ok(ArgValue::Float(2.0)));
        assert_eq!(FieldKind::Float.coerce(text("NaN")).unwrap_err(), vec!["Not a valid number."]);
        assert!(FieldKind::Float.coerce(text("inf")).is_err());
    }

    #[test]
    fn test_boolean_text_forms() {
        for truthy in ["true", "True", "YES", "y", "on", "1", "t"] {
            assert_eq!(FieldKind::Boolean.coerce(text(truthy)), Ok(ArgValue::Bool(true)), "{truthy}");
        }
        for falsy in ["false", "No", "off", "0", "F", "n"] {
            assert_eq!(FieldKind::Boolean.coerce(text(falsy)), Ok(ArgValue::Bool(false)), "{falsy}");
        }
        assert_eq!(FieldKind::Boolean.coerce(text("maybe")).unwrap_err(), vec!["Not a valid boolean."]);
    }

    #[test]
    fn test_boolean_json() {
        assert_eq!(FieldKind::Boolean.coerce(RawValue::Json(json!(false))), Ok(ArgValue::Bool(false)));
        assert_eq!(FieldKind::Boolean.coerce(RawValue::Json(json!(1))), Ok(ArgValue::Bool(true)));
        assert!(FieldKind::Boolean.coerce(RawValue::Json(json!(2))).is_err());
    }

    #[test]
    fn test_datetime() {
        let value = FieldKind::DateTime.coerce(text("2024-05-01T12:30:00+02:00")).unwrap();
        match value {
            ArgValue::DateTime(dt) => assert_eq!(dt.to_rfc3339(), "2024-05-01T12:30:00+02:00"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            FieldKind::DateTime.coerce(text("yesterday")).unwrap_err(),
            vec!["Not a valid datetime."]
        );
    }

    #[test]
    fn test_list_from_repeated_text() {
        let kind = FieldKind::list_of(FieldKind::Integer);
        let raw = RawValue::Texts(vec!["1".into(), "2".into(), "3".into()]);
        assert_eq!(
            kind.coerce(raw),
            Ok(ArgValue::List(vec![ArgValue::Int(1), ArgValue::Int(2), ArgValue::Int(3)]))
        );
    }

    #[test]
    fn test_list_wraps_single_value() {
        let kind = FieldKind::list_of(FieldKind::String);
        assert_eq!(kind.coerce(text("a")), Ok(ArgValue::List(vec![ArgValue::Str("a".into())])));
        assert_eq!(
            kind.coerce(RawValue::Json(json!("a"))),
            Ok(ArgValue::List(vec![ArgValue::Str("a".into())]))
        );
    }

    #[test]
    fn test_list_from_json_array_reports_item_errors_once() {
        let kind = FieldKind::list_of(FieldKind::Integer);
        let err = kind.coerce(RawValue::Json(json!([1, "x", "y"]))).unwrap_err();
        assert_eq!(err, vec!["Not a valid integer."]);
    }

    #[test]
    fn test_list_rejects_object() {
        let kind = FieldKind::list_of(FieldKind::Integer);
        let err = kind.coerce(RawValue::Json(json!({"a": 1}))).unwrap_err();
        assert_eq!(err, vec!["Not a valid list."]);
    }

    #[test]
    fn test_scalar_takes_first_of_repeated() {
        let raw = RawValue::Texts(vec!["first".into(), "second".into()]);
        assert_eq!(FieldKind::String.coerce(raw), Ok(ArgValue::Str("first".into())));
    }

    #[test]
    fn test_dict() {
        assert_eq!(
            FieldKind::Dict.coerce(RawValue::Json(json!({"a": 1}))),
            Ok(ArgValue::Json(json!({"a": 1})))
        );
        assert_eq!(
            FieldKind::Dict.coerce(RawValue::Json(json!([1]))).unwrap_err(),
            vec!["Not a valid mapping type."]
        );
    }

    #[test]
    fn test_raw_passes_through() {
        assert_eq!(
            FieldKind::Raw.coerce(RawValue::Json(json!([1, {"b": null}]))),
            Ok(ArgValue::Json(json!([1, {"b": null}])))
        );
    }

    #[test]
    fn test_file_kinds() {
        let file = UploadedFile::new(Some("doc".into()), Some("a.txt".into()), None, Bytes::from_static(b"hi"));
        assert_eq!(
            FieldKind::File.coerce(RawValue::File(file.clone())),
            Ok(ArgValue::File(file.clone()))
        );
        assert_eq!(
            FieldKind::list_of(FieldKind::File).coerce(RawValue::Files(vec![file.clone(), file.clone()])),
            Ok(ArgValue::List(vec![ArgValue::File(file.clone()), ArgValue::File(file.clone())]))
        );
        assert_eq!(FieldKind::File.coerce(text("a.txt")).unwrap_err(), vec!["Not a valid file."]);
        assert!(FieldKind::Integer.coerce(RawValue::File(file)).is_err());
    }

    proptest! {
        #[test]
        fn prop_integer_text_round_trips(n in any::<i64>()) {
            prop_assert_eq!(FieldKind::Integer.coerce(RawValue::Text(n.to_string())), Ok(ArgValue::Int(n)));
        }

        #[test]
        fn prop_string_accepts_any_text(s in ".*") {
            prop_assert_eq!(FieldKind::String.coerce(RawValue::Text(s.clone())), Ok(ArgValue::Str(s)));
        }

        #[test]
        fn prop_non_numeric_text_is_not_an_integer(s in "[a-zA-Z]+") {
            prop_assert!(FieldKind::Integer.coerce(RawValue::Text(s)).is_err());
        }
    }
}
