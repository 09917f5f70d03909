//! Auth cookie construction.
//!
//! The access/refresh pair travels in httpOnly cookies: SameSite=Lax,
//! Path=/, Secure in production. Max-Age mirrors the token lifetimes so the
//! browser drops the cookie when the token inside it dies.

use axum::http::{HeaderMap, HeaderValue, header::SET_COOKIE};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

fn build_cookie(name: &str, value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax; HttpOnly",
        name, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_cookie(name: &str, secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; Max-Age=0; SameSite=Lax; HttpOnly", name);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Set-Cookie headers installing a fresh access/refresh pair.
pub fn set_auth_cookies(
    access_token: &str,
    refresh_token: &str,
    access_max_age: i64,
    refresh_max_age: i64,
    secure: bool,
) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let access = build_cookie(ACCESS_COOKIE, access_token, access_max_age, secure);
    let refresh = build_cookie(REFRESH_COOKIE, refresh_token, refresh_max_age, secure);

    if let Ok(v) = HeaderValue::from_str(&access) {
        headers.append(SET_COOKIE, v);
    }
    if let Ok(v) = HeaderValue::from_str(&refresh) {
        headers.append(SET_COOKIE, v);
    }

    headers
}

/// Set-Cookie headers expiring both auth cookies.
pub fn clear_auth_cookies(secure: bool) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(v) = HeaderValue::from_str(&clear_cookie(ACCESS_COOKIE, secure)) {
        headers.append(SET_COOKIE, v);
    }
    if let Ok(v) = HeaderValue::from_str(&clear_cookie(REFRESH_COOKIE, secure)) {
        headers.append(SET_COOKIE, v);
    }

    headers
}

/// Extract a cookie value from an incoming Cookie header.
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookie_header = headers.get("cookie")?.to_str().ok()?;
    for pair in cookie_header.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();
        if key == name {
            return Some(value.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_attributes_match_policy() {
        let cookie = build_cookie(ACCESS_COOKIE, "tok", 900, false);
        assert!(cookie.starts_with("accessToken=tok"));
        assert!(cookie.contains("Max-Age=900"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Path=/"));
        assert!(!cookie.contains("Secure"));

        let cookie = build_cookie(REFRESH_COOKIE, "tok", 604_800, true);
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Max-Age=604800"));
    }

    #[test]
    fn clearing_sets_zero_max_age() {
        let cookie = clear_cookie(REFRESH_COOKIE, false);
        assert!(cookie.starts_with("refreshToken=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn set_and_clear_emit_two_headers_each() {
        assert_eq!(set_auth_cookies("a", "r", 900, 604_800, false).len(), 2);
        assert_eq!(clear_auth_cookies(true).len(), 2);
    }

    #[test]
    fn reads_cookie_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("foo=bar; accessToken=abc.def.ghi; refreshToken=xyz"),
        );

        assert_eq!(
            get_cookie_value(&headers, ACCESS_COOKIE).as_deref(),
            Some("abc.def.ghi")
        );
        assert_eq!(
            get_cookie_value(&headers, REFRESH_COOKIE).as_deref(),
            Some("xyz")
        );
        assert_eq!(get_cookie_value(&headers, "missing"), None);
    }
}
