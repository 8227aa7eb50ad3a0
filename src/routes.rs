//! Static route tables for the portal.
//!
//! Paths are matched by a plain string-prefix test against these lists. The
//! match is not segment-aware: `/auth-helper` matches the `/auth` prefix.

/// Login page, target of unauthenticated redirects.
pub const LOGIN_PATH: &str = "/auth/login";

/// Account verification page, the one auth page authenticated users may visit.
pub const VERIFY_PATH: &str = "/auth/verify";

/// Prefix for login/signup/recovery flows.
pub const AUTH_PREFIX: &str = "/auth";

/// Landing page for administrators.
pub const ADMIN_DASHBOARD: &str = "/admin-dashboard";

/// Landing page for business owners and plain users.
pub const OWNER_DASHBOARD: &str = "/user-dashboard";

/// Pages reachable without a credential.
pub const PUBLIC_ROUTES: &[&str] = &[
    "/auth/login",
    "/auth/signup",
    "/auth/forgot-password",
    "/auth/reset-password",
    "/auth/verify",
];

/// Pages reserved for administrators.
pub const ADMIN_ROUTES: &[&str] = &["/admin-dashboard"];

/// Pages reserved for business owners.
pub const OWNER_ROUTES: &[&str] = &["/user-dashboard"];

/// Prefix under which static assets are served.
pub const ASSET_PREFIX: &str = "/assets";

/// Prefix under which the JSON API is served.
pub const API_PREFIX: &str = "/api";

fn matches_any(path: &str, routes: &[&str]) -> bool {
    routes.iter().any(|route| path.starts_with(route))
}

pub fn is_public_route(path: &str) -> bool {
    matches_any(path, PUBLIC_ROUTES)
}

pub fn is_admin_route(path: &str) -> bool {
    matches_any(path, ADMIN_ROUTES)
}

pub fn is_owner_route(path: &str) -> bool {
    matches_any(path, OWNER_ROUTES)
}

pub fn is_auth_route(path: &str) -> bool {
    path.starts_with(AUTH_PREFIX)
}

/// Requests the gate never inspects: static assets, the API, the favicon,
/// and anything that looks like a file on disk (contains a dot and does not
/// end in a trailing slash).
pub fn is_exempt(path: &str) -> bool {
    path.starts_with(ASSET_PREFIX)
        || path.starts_with(API_PREFIX)
        || path == "/favicon.ico"
        || (path.contains('.') && !path.ends_with('/'))
}
