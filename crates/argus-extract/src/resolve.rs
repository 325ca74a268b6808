//! Location resolvers.
//!
//! Each location maps a lookup key to a raw value or `None` when absent.
//! Resolvers never enforce presence; that is left to the schema.

use argus_schema::{Field, Location, RawValue};

use crate::cache::ParseContext;
use crate::error::ParseError;
use crate::multidict::MultiDict;

/// Looks `key` up in `location`.
///
/// List fields receive every value of a repeated key; other fields receive
/// the first.
///
/// # Errors
///
/// Only body locations can fail, when the body is malformed or too large.
pub async fn resolve(
    location: Location,
    ctx: &ParseContext<'_>,
    key: &str,
    field: &Field,
) -> Result<Option<RawValue>, ParseError> {
    let multiple = field.is_multiple();
    let value = match location {
        Location::Querystring => from_multidict(ctx.query(), key, multiple),
        Location::Form => from_multidict(ctx.form().await?.fields(), key, multiple),
        Location::Cookies => from_multidict(ctx.cookies(), key, multiple),
        Location::Headers => from_headers(ctx, key, multiple),
        Location::ViewArgs => ctx
            .request()
            .view_args()
            .get(key)
            .map(|value| text(value.to_string(), multiple)),
        Location::Files => {
            let files = ctx.form().await?.files(key);
            match files {
                [] => None,
                [first, ..] if !multiple => Some(RawValue::File(first.clone())),
                all => Some(RawValue::Files(all.to_vec())),
            }
        }
        Location::Json => ctx
            .json()
            .await?
            .and_then(serde_json::Value::as_object)
            .and_then(|object| object.get(key))
            .cloned()
            .map(RawValue::Json),
    };
    Ok(value)
}

fn text(value: String, multiple: bool) -> RawValue {
    if multiple {
        RawValue::Texts(vec![value])
    } else {
        RawValue::Text(value)
    }
}

fn from_multidict(dict: &MultiDict, key: &str, multiple: bool) -> Option<RawValue> {
    if !dict.contains(key) {
        return None;
    }
    if multiple {
        Some(RawValue::Texts(dict.get_all(key).to_vec()))
    } else {
        dict.get(key).map(|value| RawValue::Text(value.to_string()))
    }
}

fn from_headers(ctx: &ParseContext<'_>, key: &str, multiple: bool) -> Option<RawValue> {
    let mut values = ctx
        .request()
        .headers()
        .get_all(key)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(ToString::to_string);

    if multiple {
        let all: Vec<String> = values.collect();
        (!all.is_empty()).then_some(RawValue::Texts(all))
    } else {
        values.next().map(RawValue::Text)
    }
}
