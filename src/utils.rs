//! Utility functions and helpers.

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left alone by `encodeURIComponent`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Checks whether a URL is absolute `http://` or `https://` (scheme matched case-insensitively).
pub fn is_external_url(url: &str) -> bool {
    starts_with_ignore_case(url, "http://") || starts_with_ignore_case(url, "https://")
}

/// ASCII case-insensitive prefix test.
pub fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value.len() >= prefix.len()
        && value.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Percent-encodes a single path segment such as an article or channel id.
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Joins the backend base URL and an absolute API path.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Creates a unique identifier for requests.
pub fn generate_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Converts a unix timestamp in seconds, as the backend reports publish times.
pub fn timestamp_to_datetime(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external_url() {
        assert!(is_external_url("http://x.com/a.png"));
        assert!(is_external_url("https://x.com/a.png"));
        assert!(is_external_url("HTTPS://X.COM/A.PNG"));
        assert!(!is_external_url("//x.com/a.png"));
        assert!(!is_external_url("/static/res/logo/https://x.com"));
        assert!(!is_external_url("data:image/png;base64,AAA"));
        assert!(!is_external_url("http:"));
        assert!(!is_external_url(""));
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("3955981237-2247483782_1"), "3955981237-2247483782_1");
        assert_eq!(encode_path_segment("a/b c"), "a%2Fb%20c");
        assert_eq!(encode_path_segment("MP_WXS_3955981237"), "MP_WXS_3955981237");
        assert_eq!(encode_path_segment("文章"), "%E6%96%87%E7%AB%A0");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://127.0.0.1:8001/api/v1", "/wx/notes"),
            "http://127.0.0.1:8001/api/v1/wx/notes"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8001/", "/wx/notes"),
            "http://127.0.0.1:8001/wx/notes"
        );
    }

    #[test]
    fn test_generate_request_id() {
        let id1 = generate_request_id();
        let id2 = generate_request_id();

        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
    }

    #[test]
    fn test_timestamp_to_datetime() {
        let dt = timestamp_to_datetime(1_700_000_000).unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }
}
