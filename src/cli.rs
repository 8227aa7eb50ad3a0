//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::auth::Role;
use crate::jwt::JwtConfig;
use clap::Parser;
use tracing::error;

const MIN_JWT_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "msme-portal",
    about = "MSME support platform portal with role-gated dashboards"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    pub port: u16,

    /// Set the Secure flag on cleared credential cookies (use behind HTTPS)
    #[arg(long)]
    pub secure_cookies: bool,

    /// Path to file containing the JWT signing secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Mint a signed token for the given role (admin, business_owner, user) and exit
    #[arg(long, value_name = "ROLE")]
    pub mint_token: Option<String>,

    /// Subject claim for the minted token
    #[arg(long, default_value = "local-dev", requires = "mint_token")]
    pub sub: String,

    /// Mint the token with the verification flag unset
    #[arg(long, requires = "mint_token")]
    pub unverified: bool,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required for minting. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Handle the --mint-token flag: print a signed token for the given role.
pub fn handle_mint_token(jwt: &JwtConfig, role: &str, sub: &str, unverified: bool) {
    let role = match Role::parse(role) {
        Role::Other(value) => {
            error!(role = %value, "Unknown role. Use admin, business_owner, or user");
            std::process::exit(1);
        }
        role => role,
    };

    match jwt.generate_token(sub, role, !unverified) {
        Ok(result) => {
            println!();
            println!("{}", result.token);
            println!();
            println!("Expires at {} (Unix seconds)", result.expires_at);
            println!(
                "Set it as a cookie: {}=<token>",
                crate::auth::ACCESS_COOKIE_NAME
            );
            println!();
        }
        Err(e) => {
            error!(error = %e, "Failed to mint token");
            std::process::exit(1);
        }
    }
}

/// Build ServerConfig from validated arguments.
pub fn build_config(args: &Args) -> ServerConfig {
    ServerConfig {
        secure_cookies: args.secure_cookies,
    }
}
