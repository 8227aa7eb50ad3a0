//! Page shells and the JSON API.
//!
//! The real dashboards render client-side against the platform's REST
//! backend; these handlers serve minimal server-rendered shells so every
//! route the gate protects resolves to a page. The API router is mounted
//! under the gate's exempt `/api` prefix.

use axum::{
    Json, Router,
    extract::Path,
    http::{HeaderMap, StatusCode},
    response::Html,
    routing::get,
};
use serde::Serialize;

use crate::auth::{ACCESS_COOKIE_NAME, ClaimSet, get_cookie};
use crate::routes::{ADMIN_DASHBOARD, LOGIN_PATH, OWNER_DASHBOARD, VERIFY_PATH};

/// Version embedded at compile time from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn shell(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>\n"
    ))
}

pub async fn login_page() -> Html<String> {
    shell("Sign in", "<h1>Sign in</h1>")
}

pub async fn signup_page() -> Html<String> {
    shell("Create account", "<h1>Create account</h1>")
}

pub async fn forgot_password_page() -> Html<String> {
    shell("Forgot password", "<h1>Forgot password</h1>")
}

pub async fn reset_password_page() -> Html<String> {
    shell("Reset password", "<h1>Reset password</h1>")
}

pub async fn verify_page() -> Html<String> {
    shell("Verify your account", "<h1>Verify your account</h1>")
}

pub async fn admin_dashboard(path: Option<Path<String>>) -> Html<String> {
    let section = path.map(|Path(p)| p).unwrap_or_default();
    let heading = if section.is_empty() {
        "Admin dashboard".to_string()
    } else {
        format!("Admin dashboard: {}", section)
    };
    shell("Admin dashboard", &format!("<h1>{}</h1>", heading))
}

pub async fn owner_dashboard(path: Option<Path<String>>) -> Html<String> {
    let section = path.map(|Path(p)| p).unwrap_or_default();
    let heading = if section.is_empty() {
        "Dashboard".to_string()
    } else {
        format!("Dashboard: {}", section)
    };
    shell("Dashboard", &format!("<h1>{}</h1>", heading))
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, shell("Not found", "<h1>Page not found</h1>"))
}

/// Router for every page the gate protects.
pub fn page_router() -> Router {
    Router::new()
        .route(LOGIN_PATH, get(login_page))
        .route("/auth/signup", get(signup_page))
        .route("/auth/forgot-password", get(forgot_password_page))
        .route("/auth/reset-password", get(reset_password_page))
        .route(VERIFY_PATH, get(verify_page))
        .route(ADMIN_DASHBOARD, get(admin_dashboard))
        .route(
            &format!("{}/{{*path}}", ADMIN_DASHBOARD),
            get(admin_dashboard),
        )
        .route(OWNER_DASHBOARD, get(owner_dashboard))
        .route(
            &format!("{}/{{*path}}", OWNER_DASHBOARD),
            get(owner_dashboard),
        )
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: VERSION,
    })
}

#[derive(Serialize)]
struct SessionResponse {
    authenticated: bool,
    role: Option<String>,
    verified: bool,
}

/// Report the session state the page shells should reflect. Uses the same
/// unverified decode as the gate; never fails.
async fn session(headers: HeaderMap) -> Json<SessionResponse> {
    let claims = get_cookie(&headers, ACCESS_COOKIE_NAME)
        .and_then(|token| ClaimSet::decode(token).ok())
        .filter(|claims| !claims.is_expired(crate::gate::unix_now()));

    let response = match claims {
        Some(claims) => SessionResponse {
            authenticated: true,
            role: Some(claims.role().to_string()),
            verified: claims.is_verified(),
        },
        None => SessionResponse {
            authenticated: false,
            role: None,
            verified: false,
        },
    };
    Json(response)
}

/// Router mounted under `/api`, exempt from the gate.
pub fn api_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(session))
}
