//! Value validators applied after coercion.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::value::ArgValue;

type CustomFn = Arc<dyn Fn(&ArgValue) -> Option<String> + Send + Sync>;

/// A check run against a successfully coerced value.
///
/// Validators never change the value; each one yields at most one message.
#[derive(Clone)]
pub enum Validator {
    /// Bounds on the length of a string (in characters), list or mapping.
    Length {
        /// Inclusive lower bound.
        min: Option<usize>,
        /// Inclusive upper bound.
        max: Option<usize>,
    },
    /// Bounds on a numeric value.
    Range {
        /// Inclusive lower bound.
        min: Option<f64>,
        /// Inclusive upper bound.
        max: Option<f64>,
    },
    /// The value must equal one of the choices.
    OneOf(Vec<Value>),
    /// A string value must match the pattern. The pattern is used as given;
    /// [`Validator::regex`] anchors it to the whole value.
    Regex(Regex),
    /// Arbitrary check returning an error message on failure.
    Custom(CustomFn),
}

impl Validator {
    /// Length between `min` and `max`, inclusive.
    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Self::Length { min, max }
    }

    /// Numeric range between `min` and `max`, inclusive.
    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range { min, max }
    }

    /// Membership in a fixed set of choices.
    pub fn one_of<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::OneOf(choices.into_iter().map(Into::into).collect())
    }

    /// Pattern match against the whole string value.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{pattern})$")).map(Self::Regex)
    }

    /// A custom check.
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&ArgValue) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(check))
    }

    /// Runs the validator, returning the error message on failure.
    ///
    /// Values the validator does not apply to (a length check on an integer,
    /// for instance) pass.
    pub fn check(&self, value: &ArgValue) -> Option<String> {
        match self {
            Self::Length { min, max } => {
                let len = length_of(value)?;
                let too_short = min.is_some_and(|min| len < min);
                let too_long = max.is_some_and(|max| len > max);
                if !too_short && !too_long {
                    return None;
                }
                Some(match (min, max) {
                    (Some(min), Some(max)) if min == max => format!("Length must be {}.", min),
                    (Some(min), Some(max)) => format!("Length must be between {} and {}.", min, max),
                    (Some(min), None) => format!("Shorter than minimum length {}.", min),
                    (None, Some(max)) => format!("Longer than maximum length {}.", max),
                    (None, None) => return None,
                })
            }
            Self::Range { min, max } => {
                let number = value.as_f64()?;
                let below = min.is_some_and(|min| number < min);
                let above = max.is_some_and(|max| number > max);
                if !below && !above {
                    return None;
                }
                Some(match (min, max) {
                    (Some(min), Some(max)) => format!(
                        "Must be greater than or equal to {} and less than or equal to {}.",
                        min, max
                    ),
                    (Some(min), None) => format!("Must be greater than or equal to {}.", min),
                    (None, Some(max)) => format!("Must be less than or equal to {}.", max),
                    (None, None) => return None,
                })
            }
            Self::OneOf(choices) => {
                let actual = value.to_json();
                if choices.iter().any(|choice| json_eq(choice, &actual)) {
                    None
                } else {
                    let listed: Vec<String> = choices.iter().map(display_choice).collect();
                    Some(format!("Must be one of: {}.", listed.join(", ")))
                }
            }
            Self::Regex(pattern) => {
                let text = value.as_str()?;
                if pattern.is_match(text) {
                    None
                } else {
                    Some("String does not match expected pattern.".to_string())
                }
            }
            Self::Custom(check) => check(value),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { min, max } => f
                .debug_struct("Length")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Range { min, max } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::OneOf(choices) => f.debug_tuple("OneOf").field(choices).finish(),
            Self::Regex(pattern) => f.debug_tuple("Regex").field(&pattern.as_str()).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn length_of(value: &ArgValue) -> Option<usize> {
    match value {
        ArgValue::Str(s) => Some(s.chars().count()),
        ArgValue::List(items) => Some(items.len()),
        ArgValue::Json(Value::String(s)) => Some(s.chars().count()),
        ArgValue::Json(Value::Array(items)) => Some(items.len()),
        ArgValue::Json(Value::Object(map)) => Some(map.len()),
        _ => None,
    }
}

// Integers and floats with the same numeric value compare equal.
fn json_eq(choice: &Value, actual: &Value) -> bool {
    match (choice, actual) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => choice == actual,
    }
}

fn display_choice(choice: &Value) -> String {
    match choice {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn s(text: &str) -> ArgValue {
        ArgValue::Str(text.to_string())
    }

    #[test]
    fn test_length_messages() {
        assert_eq!(
            Validator::length(Some(3), None).check(&s("ab")).as_deref(),
            Some("Shorter than minimum length 3.")
        );
        assert_eq!(
            Validator::length(None, Some(2)).check(&s("abc")).as_deref(),
            Some("Longer than maximum length 2.")
        );
        assert_eq!(
            Validator::length(Some(1), Some(2)).check(&s("abc")).as_deref(),
            Some("Length must be between 1 and 2.")
        );
        assert_eq!(Validator::length(Some(1), Some(3)).check(&s("abc")), None);
    }

    #[test]
    fn test_length_counts_chars_and_items() {
        assert_eq!(Validator::length(None, Some(2)).check(&s("éé")), None);
        let list = ArgValue::List(vec![ArgValue::Int(1), ArgValue::Int(2)]);
        assert!(Validator::length(Some(3), None).check(&list).is_some());
    }

    #[test]
    fn test_length_ignores_numbers() {
        assert_eq!(Validator::length(Some(5), None).check(&ArgValue::Int(1)), None);
    }

    #[test]
    fn test_range_messages() {
        assert_eq!(
            Validator::range(Some(1.0), None).check(&ArgValue::Int(0)).as_deref(),
            Some("Must be greater than or equal to 1.")
        );
        assert_eq!(
            Validator::range(None, Some(10.0)).check(&ArgValue::Int(11)).as_deref(),
            Some("Must be less than or equal to 10.")
        );
        assert_eq!(
            Validator::range(Some(1.0), Some(10.0))
                .check(&ArgValue::Float(0.5))
                .as_deref(),
            Some("Must be greater than or equal to 1 and less than or equal to 10.")
        );
        assert_eq!(Validator::range(Some(1.0), Some(10.0)).check(&ArgValue::Int(10)), None);
    }

    #[test]
    fn test_one_of() {
        let validator = Validator::one_of(["red", "green"]);
        assert_eq!(validator.check(&s("red")), None);
        assert_eq!(
            validator.check(&s("blue")).as_deref(),
            Some("Must be one of: red, green.")
        );

        let numbers = Validator::one_of([1, 2]);
        assert_eq!(numbers.check(&ArgValue::Int(2)), None);
        assert_eq!(numbers.check(&ArgValue::Float(2.0)), None);
        assert!(numbers.check(&ArgValue::Int(3)).is_some());
    }

    #[test]
    fn test_regex() {
        let validator = Validator::regex("^[a-z]+$").unwrap();
        assert_eq!(validator.check(&s("abc")), None);
        assert_eq!(
            validator.check(&s("ABC")).as_deref(),
            Some("String does not match expected pattern.")
        );
        assert!(Validator::regex("(").is_err());
    }

    #[test]
    fn test_regex_matches_whole_value() {
        let digits = Validator::regex("[0-9]+").unwrap();
        assert_eq!(digits.check(&s("123")), None);
        assert!(digits.check(&s("abc123")).is_some());
        assert!(digits.check(&s("123abc")).is_some());

        let either = Validator::regex("a|ab").unwrap();
        assert_eq!(either.check(&s("ab")), None);
    }

    #[test]
    fn test_custom() {
        let even = Validator::custom(|value| match value.as_i64() {
            Some(n) if n % 2 == 0 => None,
            _ => Some("Must be even.".to_string()),
        });
        assert_eq!(even.check(&ArgValue::Int(4)), None);
        assert_eq!(even.check(&ArgValue::Int(3)).as_deref(), Some("Must be even."));
        assert_eq!(format!("{:?}", even), "Custom(..)");
    }

    #[test]
    fn test_one_of_json_value() {
        let validator = Validator::one_of([json!({"a": 1})]);
        assert_eq!(validator.check(&ArgValue::Json(json!({"a": 1}))), None);
    }
}
