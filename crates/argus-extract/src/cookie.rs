//! `Cookie` header parsing.

use http::{header, HeaderMap};

use crate::multidict::MultiDict;

/// Parses every `Cookie` header into a multi-value map.
///
/// Pairs are separated by `;`; whitespace around names and values and
/// surrounding double quotes on values are removed. Pairs without `=` are
/// ignored.
pub fn parse_cookies(headers: &HeaderMap) -> MultiDict {
    let mut cookies = MultiDict::new();

    for value in headers.get_all(header::COOKIE) {
        let Ok(value) = value.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                cookies.append(name, value.trim().trim_matches('"'));
            }
        }
    }

    cookies
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(values: &[&'static str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for value in values {
            map.append(header::COOKIE, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_parse_single_header() {
        let cookies = parse_cookies(&headers(&["session=abc123; theme=dark"]));
        assert_eq!(cookies.get("session"), Some("abc123"));
        assert_eq!(cookies.get("theme"), Some("dark"));
    }

    #[test]
    fn test_quoted_value() {
        let cookies = parse_cookies(&headers(&[r#"token="xyz""#]));
        assert_eq!(cookies.get("token"), Some("xyz"));
    }

    #[test]
    fn test_multiple_headers() {
        let cookies = parse_cookies(&headers(&["a=1", "b=2; a=3"]));
        assert_eq!(cookies.get_all("a"), ["1", "3"]);
        assert_eq!(cookies.get("b"), Some("2"));
    }

    #[test]
    fn test_malformed_pairs_skipped() {
        let cookies = parse_cookies(&headers(&["novalue; =x; ok=1"]));
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies.get("ok"), Some("1"));
    }

    #[test]
    fn test_no_cookie_header() {
        assert!(parse_cookies(&HeaderMap::new()).is_empty());
    }
}
