//! Request authorization for page routes.
//!
//! The gate runs once per navigation request, before any page handler. Its
//! decision is a pure function of the request path and the access cookie:
//! either the page renders, or the client is redirected to the login page,
//! the verification page, or the role's dashboard. Invalid credentials
//! additionally clear both auth cookies on the way out. The gate makes no
//! network or database calls and holds no state across requests.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{
    ACCESS_COOKIE_NAME, ClaimSet, REFRESH_COOKIE_NAME, Role, clear_cookie, get_cookie,
};
use crate::routes::{self, ADMIN_DASHBOARD, LOGIN_PATH, OWNER_DASHBOARD, VERIFY_PATH};

/// Gate settings shared with the middleware.
#[derive(Clone)]
pub struct GateConfig {
    /// Set the Secure flag on cleared cookies (true behind HTTPS)
    pub secure_cookies: bool,
}

/// Outcome of the gate for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Render the requested page
    Continue,
    /// Send the client elsewhere, optionally clearing both auth cookies
    Redirect {
        location: String,
        clear_cookies: bool,
    },
}

impl Decision {
    fn redirect(location: impl Into<String>) -> Decision {
        Decision::Redirect {
            location: location.into(),
            clear_cookies: false,
        }
    }

    fn redirect_and_clear(location: impl Into<String>) -> Decision {
        Decision::Redirect {
            location: location.into(),
            clear_cookies: true,
        }
    }
}

/// Login redirect recording the originally requested path.
fn login_with_redirect(path: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    format!("{}?redirect={}", LOGIN_PATH, encoded)
}

/// Decide what to do with a request for `path` carrying `token` (the access
/// cookie value, if any) at time `now` (seconds since epoch).
///
/// Rules are evaluated in order; the first match wins.
pub fn decide(path: &str, token: Option<&str>, now: u64) -> Decision {
    if routes::is_exempt(path) {
        return Decision::Continue;
    }

    // No credential: public pages render, everything else goes to login with
    // the original path attached.
    let Some(token) = token else {
        if routes::is_public_route(path) {
            return Decision::Continue;
        }
        return Decision::redirect(login_with_redirect(path));
    };

    // Undecodable or expired credentials are cleared and sent to login
    // without a redirect parameter.
    let claims = match ClaimSet::decode(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Failed to decode access token");
            return Decision::redirect_and_clear(LOGIN_PATH);
        }
    };
    if claims.is_expired(now) {
        tracing::debug!(path = %path, "Access token expired");
        return Decision::redirect_and_clear(LOGIN_PATH);
    }

    let role = claims.role();
    let verified = claims.is_verified();

    // Authenticated users have no business on auth pages, except the
    // verification page.
    if routes::is_auth_route(path) && path != VERIFY_PATH {
        return Decision::redirect(role.dashboard_path());
    }

    // Unverified accounts are funneled to the verification page.
    if !verified && path != VERIFY_PATH && !routes::is_auth_route(path) {
        return Decision::redirect(VERIFY_PATH);
    }

    if routes::is_admin_route(path) && role != Role::Admin {
        return if role == Role::BusinessOwner {
            Decision::redirect(OWNER_DASHBOARD)
        } else {
            Decision::redirect(LOGIN_PATH)
        };
    }

    if routes::is_owner_route(path) {
        return match role {
            Role::Admin => Decision::redirect(ADMIN_DASHBOARD),
            Role::BusinessOwner | Role::User => Decision::Continue,
            Role::Other(_) => Decision::redirect(LOGIN_PATH),
        };
    }

    if path == "/" {
        return Decision::redirect(role.dashboard_path());
    }

    Decision::Continue
}

pub(crate) fn unix_now() -> u64 {
    // A clock before the epoch reads as 0, so nothing counts as expired.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Axum middleware applying [`decide`] to every request.
pub async fn authorize(
    State(config): State<GateConfig>,
    request: Request,
    next: Next,
) -> Response {
    let decision = {
        let token = get_cookie(request.headers(), ACCESS_COOKIE_NAME);
        decide(request.uri().path(), token, unix_now())
    };

    match decision {
        Decision::Continue => next.run(request).await,
        Decision::Redirect {
            location,
            clear_cookies,
        } => {
            tracing::debug!(path = %request.uri().path(), target = %location, "Redirecting");
            let mut response = Redirect::temporary(&location).into_response();
            if clear_cookies {
                let headers = response.headers_mut();
                for cookie in [
                    clear_cookie(ACCESS_COOKIE_NAME, config.secure_cookies),
                    clear_cookie(REFRESH_COOKIE_NAME, config.secure_cookies),
                ] {
                    if let Ok(value) = HeaderValue::from_str(&cookie) {
                        headers.append(header::SET_COOKIE, value);
                    }
                }
            }
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::{Value, json};

    const NOW: u64 = 1_700_000_000;
    const FUTURE: u64 = NOW + 3600;
    const PAST: u64 = NOW - 3600;

    fn token_with(payload: Value) -> String {
        let payload = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("e30.{}.sig", payload)
    }

    fn admin_token() -> String {
        token_with(json!({ "sub": "u1", "role": "admin", "exp": FUTURE }))
    }

    fn owner_token() -> String {
        token_with(json!({ "sub": "u2", "role": "business_owner", "exp": FUTURE }))
    }

    fn user_token() -> String {
        token_with(json!({ "sub": "u3", "role": "user", "exp": FUTURE }))
    }

    fn assert_redirect(decision: Decision, location: &str) {
        assert_eq!(
            decision,
            Decision::Redirect {
                location: location.to_string(),
                clear_cookies: false,
            }
        );
    }

    #[test]
    fn test_exempt_paths_continue_regardless_of_cookies() {
        for path in ["/assets/app.js", "/api/health", "/favicon.ico", "/image.png"] {
            assert_eq!(decide(path, None, NOW), Decision::Continue);
            assert_eq!(decide(path, Some("garbage"), NOW), Decision::Continue);
            assert_eq!(
                decide(path, Some(&admin_token()), NOW),
                Decision::Continue
            );
        }
    }

    #[test]
    fn test_public_route_without_credential_continues() {
        assert_eq!(decide("/auth/login", None, NOW), Decision::Continue);
        assert_eq!(decide("/auth/signup", None, NOW), Decision::Continue);
    }

    #[test]
    fn test_protected_route_without_credential_redirects_to_login() {
        assert_redirect(
            decide("/admin-dashboard", None, NOW),
            "/auth/login?redirect=%2Fadmin-dashboard",
        );
        assert_redirect(
            decide("/user-dashboard/services", None, NOW),
            "/auth/login?redirect=%2Fuser-dashboard%2Fservices",
        );
        assert_redirect(decide("/", None, NOW), "/auth/login?redirect=%2F");
    }

    #[test]
    fn test_malformed_credential_clears_cookies() {
        assert_eq!(
            decide("/user-dashboard", Some("not-a-token"), NOW),
            Decision::Redirect {
                location: "/auth/login".to_string(),
                clear_cookies: true,
            }
        );
    }

    #[test]
    fn test_expired_credential_clears_cookies() {
        let token = token_with(json!({ "role": "admin", "exp": PAST }));
        assert_eq!(
            decide("/admin-dashboard", Some(&token), NOW),
            Decision::Redirect {
                location: "/auth/login".to_string(),
                clear_cookies: true,
            }
        );
    }

    #[test]
    fn test_auth_pages_redirect_authenticated_users_to_dashboard() {
        assert_redirect(
            decide("/auth/login", Some(&admin_token()), NOW),
            "/admin-dashboard",
        );
        assert_redirect(
            decide("/auth/signup", Some(&owner_token()), NOW),
            "/user-dashboard",
        );
        assert_redirect(
            decide("/auth/login", Some(&user_token()), NOW),
            "/user-dashboard",
        );
    }

    #[test]
    fn test_verify_page_is_reachable_while_authenticated() {
        assert_eq!(
            decide("/auth/verify", Some(&user_token()), NOW),
            Decision::Continue
        );
    }

    #[test]
    fn test_unverified_user_is_sent_to_verify_page() {
        let token = token_with(json!({
            "role": "business_owner",
            "is_verified": false,
            "exp": FUTURE,
        }));
        assert_redirect(decide("/user-dashboard", Some(&token), NOW), "/auth/verify");
        assert_eq!(decide("/auth/verify", Some(&token), NOW), Decision::Continue);
    }

    #[test]
    fn test_missing_verification_claim_counts_as_verified() {
        let token = token_with(json!({ "role": "business_owner", "exp": FUTURE }));
        assert_eq!(
            decide("/user-dashboard", Some(&token), NOW),
            Decision::Continue
        );
    }

    #[test]
    fn test_admin_routes_reject_other_roles() {
        assert_redirect(
            decide("/admin-dashboard", Some(&owner_token()), NOW),
            "/user-dashboard",
        );
        assert_redirect(
            decide("/admin-dashboard", Some(&user_token()), NOW),
            "/auth/login",
        );
        assert_eq!(
            decide("/admin-dashboard", Some(&admin_token()), NOW),
            Decision::Continue
        );
    }

    #[test]
    fn test_owner_routes_by_role() {
        assert_redirect(
            decide("/user-dashboard", Some(&admin_token()), NOW),
            "/admin-dashboard",
        );
        assert_eq!(
            decide("/user-dashboard", Some(&owner_token()), NOW),
            Decision::Continue
        );
        assert_eq!(
            decide("/user-dashboard", Some(&user_token()), NOW),
            Decision::Continue
        );

        let guest = token_with(json!({ "role": "guest", "exp": FUTURE }));
        assert_redirect(decide("/user-dashboard", Some(&guest), NOW), "/auth/login");
    }

    #[test]
    fn test_root_redirects_to_role_dashboard() {
        assert_redirect(decide("/", Some(&admin_token()), NOW), "/admin-dashboard");
        assert_redirect(decide("/", Some(&user_token()), NOW), "/user-dashboard");
    }

    #[test]
    fn test_role_claim_aliases_are_honored() {
        let token = token_with(json!({ "user_role": "admin", "exp": FUTURE }));
        assert_redirect(decide("/", Some(&token), NOW), "/admin-dashboard");

        let token = token_with(json!({ "userRole": "admin", "exp": FUTURE }));
        assert_redirect(decide("/", Some(&token), NOW), "/admin-dashboard");
    }

    #[test]
    fn test_missing_role_claim_falls_back_to_user() {
        let token = token_with(json!({ "sub": "u9", "exp": FUTURE }));
        assert_redirect(decide("/", Some(&token), NOW), "/user-dashboard");
        assert_eq!(
            decide("/user-dashboard", Some(&token), NOW),
            Decision::Continue
        );
    }

    #[test]
    fn test_unmatched_page_continues() {
        assert_eq!(
            decide("/profile/settings", Some(&user_token()), NOW),
            Decision::Continue
        );
    }

    #[test]
    fn test_decisions_are_deterministic() {
        let token = admin_token();
        let first = decide("/admin-dashboard", Some(&token), NOW);
        let second = decide("/admin-dashboard", Some(&token), NOW);
        assert_eq!(first, second);
    }
}
