//! Shared URL/form parsing and HTML helpers for route handlers.

use std::str::FromStr;

/// Parse a URL-encoded form body (`key=value&key2=value2`, as HTMX POSTs it)
/// into key-value pairs.
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, val) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), percent_decode(val))
        })
        .collect()
}

/// Percent-decode a URL-encoded value. `+` is a space; multi-byte UTF-8
/// sequences are reassembled; malformed escapes pass through untouched.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let hex = core::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(val) => {
                        out.push(val);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Get a value by key from a list of key-value pairs.
pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Get a value by key and parse it. Missing or unparsable values are `None`.
pub fn get_parsed<T: FromStr>(params: &[(String, String)], key: &str) -> Option<T> {
    get_param(params, key).and_then(|v| v.trim().parse().ok())
}

/// Escape text for interpolation into HTML content or attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Red inline error fragment.
pub fn error_fragment(message: &str) -> String {
    format!(
        r#"<span class="text-red-400">{}</span>"#,
        escape_html(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_form_body_works() {
        let pairs = parse_form_body("id=abc&now=1700000000000&x=");
        assert_eq!(pairs.len(), 3);
        assert_eq!(get_param(&pairs, "id"), Some("abc"));
        assert_eq!(get_param(&pairs, "x"), Some(""));
        assert_eq!(get_parsed::<u64>(&pairs, "now"), Some(1_700_000_000_000));
    }

    #[test]
    fn parse_form_body_empty() {
        assert!(parse_form_body("").is_empty());
    }

    #[test]
    fn get_parsed_rejects_garbage() {
        let pairs = parse_form_body("now=soon");
        assert_eq!(get_parsed::<u64>(&pairs, "now"), None);
        assert_eq!(get_parsed::<u64>(&pairs, "missing"), None);
    }

    #[test]
    fn percent_decode_plus_as_space() {
        assert_eq!(percent_decode("hello+world"), "hello world");
    }

    #[test]
    fn percent_decode_json_record() {
        assert_eq!(
            percent_decode("%7B%22timer%22%3A90%7D"),
            r#"{"timer":90}"#
        );
    }

    #[test]
    fn percent_decode_multibyte() {
        assert_eq!(percent_decode("%E2%82%BF"), "₿");
    }

    #[test]
    fn percent_decode_leaves_bad_escapes() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn escape_html_escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
