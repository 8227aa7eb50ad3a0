//! Credential cookie parsing and clearing.

use axum::http::header;

/// Cookie carrying the access token the gate inspects.
pub const ACCESS_COOKIE_NAME: &str = "access_token";

/// Cookie carrying the refresh token. The gate never reads it, but clears it
/// alongside the access cookie whenever the credential turns out invalid.
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Build a Set-Cookie value that removes the named cookie: empty value,
/// immediate expiry, root path.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0{}",
        name, secure
    )
}
