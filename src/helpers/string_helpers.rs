use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref URL_SCHEME_REGEX: Regex = Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").unwrap();
}

const BODY_PREVIEW_CHARS_COUNT: usize = 512;

/// Board URLs typed by users often lack a scheme ("www.example.com/forum").
pub fn normalize_board_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    if URL_SCHEME_REGEX.is_match(url) {
        return url.to_string();
    }

    return format!("http://{}", url);
}

pub fn extract_site_name_from_domain(domain: &str) -> &str {
    let last_index = domain.rfind('.');
    if last_index.is_none() {
        return domain;
    }
    let last_index = last_index.unwrap();

    let domain = &domain[0..last_index];

    let last_index = domain.rfind('.');
    if last_index.is_none() {
        return domain;
    }
    let last_index = last_index.unwrap();

    return &domain[last_index + 1..];
}

/// Shortened response body for error logs.
pub fn body_preview(body: &str) -> String {
    let chars_count = body.chars().count();
    if chars_count == 0 {
        return String::from("<body is empty>");
    }

    let preview = body.chars().take(BODY_PREVIEW_CHARS_COUNT).collect::<String>();
    if chars_count <= BODY_PREVIEW_CHARS_COUNT {
        return preview;
    }

    return format!("{} (+{} more)", preview, chars_count - BODY_PREVIEW_CHARS_COUNT);
}

#[test]
fn test_normalize_board_url() {
    assert_eq!("http://www.amb.la", normalize_board_url("www.amb.la"));
    assert_eq!("https://forum.example.com/", normalize_board_url(" https://forum.example.com/ "));
    assert_eq!("", normalize_board_url("   "));
}

#[test]
fn test_extract_site_name_from_domain() {
    assert_eq!("amb", extract_site_name_from_domain("www.amb.la"));
    assert_eq!("example", extract_site_name_from_domain("example.com"));
    assert_eq!("localhost", extract_site_name_from_domain("localhost"));
}

#[test]
fn test_body_preview() {
    assert_eq!("<body is empty>", body_preview(""));
    assert_eq!("short body", body_preview("short body"));

    let long_body = "a".repeat(BODY_PREVIEW_CHARS_COUNT + 10);
    let preview = body_preview(&long_body);
    assert!(preview.ends_with("(+10 more)"));
    assert!(preview.starts_with(&"a".repeat(BODY_PREVIEW_CHARS_COUNT)));
}
