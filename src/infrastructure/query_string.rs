//! `application/x-www-form-urlencoded` query strings.
//!
//! Parsing is lenient: a leading `?`, empty segments, segments without `=`
//! and invalid percent escapes never fail, they decode to something or are
//! skipped. Serialization preserves pair order and repeated keys.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left unescaped by browsers' `URLSearchParams`.
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b' ');

/// Splits a query string into decoded key/value pairs, in order.
///
/// # Examples
///
/// ```
/// use marketmod::infrastructure::query_string::parse;
///
/// let pairs = parse("?search=red+bike&status=pending&status=draft");
/// assert_eq!(pairs[0], ("search".to_string(), "red bike".to_string()));
/// assert_eq!(pairs.len(), 3);
/// ```
#[must_use]
pub fn parse(query: &str) -> Vec<(String, String)> {
    query
        .strip_prefix('?')
        .unwrap_or(query)
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode(key), decode(value))
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Joins pairs into a query string without the leading `?`.
///
/// # Examples
///
/// ```
/// use marketmod::infrastructure::query_string::encode;
///
/// let query = encode([("search", "red bike"), ("page", "2")]);
/// assert_eq!(query, "search=red+bike&page=2");
/// ```
pub fn encode<'a, I, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", escape(key), escape(value.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

fn escape(raw: &str) -> String {
    utf8_percent_encode(raw, FORM_VALUE).to_string().replace(' ', "+")
}

fn decode(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " ")).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_lenient() {
        let pairs = parse("&&page&=orphan&limit=20&bad=%ZZ");
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), String::new()),
                ("limit".to_string(), "20".to_string()),
                ("bad".to_string(), "%ZZ".to_string()),
            ]
        );
        assert!(parse("").is_empty());
        assert!(parse("?").is_empty());
    }

    #[test]
    fn cyrillic_and_reserved_characters_survive() {
        let query = encode([("search", "диван & стол=1")]);
        assert!(!query.contains(' '));
        assert_eq!(parse(&query), vec![("search".to_string(), "диван & стол=1".to_string())]);
    }

    #[test]
    fn literal_plus_is_escaped() {
        let query = encode([("search", "c++")]);
        assert_eq!(query, "search=c%2B%2B");
        assert_eq!(parse(&query)[0].1, "c++");
    }
}
