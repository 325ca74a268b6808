//! # Argus Schema
//!
//! Declarative argument schemas: field kinds, coercion from request text and
//! JSON, validators and the per-field error messages reported when loading
//! fails.
//!
//! ```
//! use argus_schema::{Field, RawValue, Schema};
//! use indexmap::IndexMap;
//!
//! let schema = Schema::builder()
//!     .field("name", Field::string().required())
//!     .build();
//!
//! let mut raw = IndexMap::new();
//! raw.insert("name".to_string(), RawValue::from("Ann"));
//! let args = schema.load(raw).unwrap();
//! assert_eq!(args.str("name"), Some("Ann"));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod args;
mod error;
mod field;
mod kind;
mod location;
mod schema;
mod validate;
mod value;

pub use args::ParsedArgs;
pub use error::{ErrorMessages, ValidationError, SCHEMA_KEY};
pub use field::{Field, MISSING_MESSAGE, NULL_MESSAGE};
pub use kind::FieldKind;
pub use location::{Location, UnknownLocation};
pub use schema::{Schema, SchemaBuilder};
pub use validate::Validator;
pub use value::{ArgValue, RawValue, UploadedFile};
