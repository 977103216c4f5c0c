//! Query-string component encoding.
//!
//! Components are percent-encoded the way a URI component encoder does it, then
//! a fixed set of escapes that are harmless inside a query string is turned back
//! into literal characters so generated URLs stay readable.

/// Escapes that a URI component encoder leaves untouched but `urlencoding`
/// escapes anyway.
const UNRESERVED_MARKS: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Escapes restored for query strings. `%20` becomes `+`.
const QUERY_SAFE: [(&str, &str); 7] = [
    ("%40", "@"),
    ("%3A", ":"),
    ("%24", "$"),
    ("%2C", ","),
    ("%20", "+"),
    ("%5B", "["),
    ("%5D", "]"),
];

/// Percent-encode `value` for use as a query-string key or value.
///
/// `urlencoding` always emits uppercase hex digits, so the fixed-string
/// replacements below also cover the lowercase spellings of each escape.
pub fn encode(value: &str) -> String {
    let encoded = urlencoding::encode(value).into_owned();
    UNRESERVED_MARKS
        .iter()
        .chain(QUERY_SAFE.iter())
        .fold(encoded, |acc, (escape, literal)| acc.replace(escape, literal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_query_safe_characters() {
        assert_eq!(encode("a b@c:d$e,f[g]"), "a+b@c:d$e,f[g]");
    }

    #[test]
    fn still_escapes_other_reserved_characters() {
        assert_eq!(encode("a&b=c/d?e#f"), "a%26b%3Dc%2Fd%3Fe%23f");
        assert_eq!(encode("100%"), "100%25");
    }

    #[test]
    fn keeps_unreserved_marks_literal() {
        assert_eq!(encode("it's (a) *test*!"), "it's+(a)+*test*!");
    }

    #[test]
    fn encodes_non_ascii_as_utf8() {
        assert_eq!(encode("é"), "%C3%A9");
    }

    #[test]
    fn empty_string_stays_empty() {
        assert_eq!(encode(""), "");
    }

    #[test]
    fn encoded_percent_is_not_unescaped() {
        // A literal "%40" in the input becomes "%2540" and must stay that way.
        assert_eq!(encode("%40"), "%2540");
    }
}
