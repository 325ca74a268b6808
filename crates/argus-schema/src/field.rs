//! Field descriptors.

use serde_json::Value;

use crate::kind::FieldKind;
use crate::location::Location;
use crate::validate::Validator;
use crate::value::{ArgValue, RawValue};

/// Message reported for an absent required field.
pub const MISSING_MESSAGE: &str = "Missing data for required field.";
/// Message reported for an explicit null when nulls are not allowed.
pub const NULL_MESSAGE: &str = "Field may not be null.";

/// Declares one expected argument.
///
/// ```
/// use argus_schema::{Field, Location, Validator};
///
/// let field = Field::integer()
///     .required()
///     .location(Location::Querystring)
///     .validate(Validator::range(Some(1.0), None));
/// assert!(field.is_required());
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    kind: FieldKind,
    required: bool,
    location: Option<Location>,
    data_key: Option<String>,
    default: Option<Value>,
    allow_none: bool,
    validators: Vec<Validator>,
}

impl Field {
    /// Creates an optional field of the given kind.
    #[must_use]
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            location: None,
            data_key: None,
            default: None,
            allow_none: false,
            validators: Vec::new(),
        }
    }

    /// A string field.
    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    /// An integer field.
    pub fn integer() -> Self {
        Self::new(FieldKind::Integer)
    }

    /// A float field.
    pub fn float() -> Self {
        Self::new(FieldKind::Float)
    }

    /// A boolean field.
    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    /// An RFC 3339 timestamp field.
    pub fn datetime() -> Self {
        Self::new(FieldKind::DateTime)
    }

    /// A list field with items of `inner` kind.
    pub fn list(inner: FieldKind) -> Self {
        Self::new(FieldKind::list_of(inner))
    }

    /// A JSON object field.
    pub fn dict() -> Self {
        Self::new(FieldKind::Dict)
    }

    /// A field accepting any value.
    pub fn raw() -> Self {
        Self::new(FieldKind::Raw)
    }

    /// An uploaded file field.
    pub fn file() -> Self {
        Self::new(FieldKind::File)
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Reads the field from one location only.
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Looks the value up under `key` instead of the field name.
    pub fn data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = Some(key.into());
        self
    }

    /// Value used when the field is missing from the request.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Accepts an explicit JSON `null`.
    pub fn allow_none(mut self) -> Self {
        self.allow_none = true;
        self
    }

    /// Adds a validator run after coercion.
    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// The declared kind.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Whether the field must be present.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The pinned location, if any.
    pub fn location_hint(&self) -> Option<Location> {
        self.location
    }

    /// The key looked up in the request: `data_key` or `name`.
    pub fn source_key<'a>(&'a self, name: &'a str) -> &'a str {
        self.data_key.as_deref().unwrap_or(name)
    }

    /// Whether every value of a repeated key should be collected.
    pub fn is_multiple(&self) -> bool {
        self.kind.is_multiple()
    }

    /// Loads a raw value.
    ///
    /// Returns `Ok(None)` for an optional field that is missing and has no
    /// default. Coercion failures stop before validators run; validator
    /// failures are all reported.
    pub fn load(&self, raw: Option<RawValue>) -> Result<Option<ArgValue>, Vec<String>> {
        let raw = match raw {
            Some(raw) => raw,
            None => {
                if let Some(default) = &self.default {
                    return Ok(Some(ArgValue::from_json(default.clone())));
                }
                if self.required {
                    return Err(vec![MISSING_MESSAGE.to_string()]);
                }
                return Ok(None);
            }
        };

        if matches!(raw, RawValue::Json(Value::Null)) {
            return if self.allow_none {
                Ok(Some(ArgValue::Null))
            } else {
                Err(vec![NULL_MESSAGE.to_string()])
            };
        }

        let value = self.kind.coerce(raw)?;
        let errors: Vec<String> = self
            .validators
            .iter()
            .filter_map(|validator| validator.check(&value))
            .collect();

        if errors.is_empty() {
            Ok(Some(value))
        } else {
            Err(errors)
        }
    }
}
