//! Request locations a field can be read from.

use std::fmt;
use std::str::FromStr;

/// Where in the request a field's raw value lives.
///
/// The set is closed: every location is resolved by a fixed branch in the
/// parser, never by name at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// URL query string (`?name=Ann`).
    Querystring,
    /// URL-encoded or multipart form fields.
    Form,
    /// JSON request body.
    Json,
    /// Request headers, matched case-insensitively.
    Headers,
    /// Cookies from the `Cookie` header.
    Cookies,
    /// Uploaded files from a multipart body.
    Files,
    /// Path variables captured by the route (`/users/<id>`).
    ViewArgs,
}

impl Location {
    /// Every location, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Querystring,
        Self::Form,
        Self::Json,
        Self::Headers,
        Self::Cookies,
        Self::Files,
        Self::ViewArgs,
    ];

    /// Locations searched when a field does not name one.
    pub const DEFAULTS: [Self; 3] = [Self::Querystring, Self::Form, Self::Json];

    /// The canonical name, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Querystring => "querystring",
            Self::Form => "form",
            Self::Json => "json",
            Self::Headers => "headers",
            Self::Cookies => "cookies",
            Self::Files => "files",
            Self::ViewArgs => "view_args",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a location name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown argument location: {0}")]
pub struct UnknownLocation(pub String);

impl FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "querystring" | "query" => Ok(Self::Querystring),
            "form" => Ok(Self::Form),
            "json" => Ok(Self::Json),
            "headers" => Ok(Self::Headers),
            "cookies" => Ok(Self::Cookies),
            "files" => Ok(Self::Files),
            "view_args" | "path" => Ok(Self::ViewArgs),
            _ => Err(UnknownLocation(s.to_string())),
        }
    }
}

impl serde::Serialize for Location {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Location {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
