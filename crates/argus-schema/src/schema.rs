//! Schemas: ordered named fields plus whole-result validators.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::args::ParsedArgs;
use crate::error::{ErrorMessages, ValidationError, SCHEMA_KEY};
use crate::field::Field;
use crate::value::RawValue;

type SchemaCheck = Arc<dyn Fn(&ParsedArgs) -> Result<(), String> + Send + Sync>;

/// An immutable set of field declarations.
///
/// ```
/// use argus_schema::{Field, Schema};
///
/// let schema = Schema::builder()
///     .field("name", Field::string().required())
///     .field("page", Field::integer().default_value(1))
///     .build();
/// assert_eq!(schema.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Schema {
    fields: IndexMap<String, Field>,
    validators: Vec<SchemaCheck>,
}

impl Schema {
    /// Starts building a schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Iterates over `(name, field)` in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Loads raw values keyed by field name.
    ///
    /// Every field is loaded and every failure collected before returning.
    /// Schema validators run only when all fields loaded cleanly; their
    /// messages are reported under `_schema`.
    pub fn load(&self, mut raw: IndexMap<String, RawValue>) -> Result<ParsedArgs, ValidationError> {
        let mut args = ParsedArgs::new();
        let mut errors = ErrorMessages::new();

        for (name, field) in &self.fields {
            match field.load(raw.shift_remove(name)) {
                Ok(Some(value)) => args.insert(name.clone(), value),
                Ok(None) => {}
                Err(messages) => errors.extend(name.clone(), messages),
            }
        }

        if errors.is_empty() {
            for check in &self.validators {
                if let Err(message) = check(&args) {
                    errors.add(SCHEMA_KEY, message);
                }
            }
        }

        if errors.is_empty() {
            Ok(args)
        } else {
            Err(ValidationError::new(errors))
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Builder for [`Schema`].
#[derive(Default)]
pub struct SchemaBuilder {
    fields: IndexMap<String, Field>,
    validators: Vec<SchemaCheck>,
}

impl SchemaBuilder {
    /// Declares a field. Declaring the same name twice replaces the field
    /// but keeps its original position.
    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    /// Adds a validator over the whole parsed result.
    pub fn validate<F>(mut self, check: F) -> Self
    where
        F: Fn(&ParsedArgs) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(check));
        self
    }

    /// Finishes the schema.
    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
            validators: self.validators,
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Field)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, Field)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            validators: Vec::new(),
        }
    }
}
