use clap::Parser;
use msme_portal::cli::{Args, build_config, handle_mint_token, init_logging, load_jwt_secret};
use msme_portal::jwt::JwtConfig;
use msme_portal::run_server;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    if let Some(role) = args.mint_token.as_deref() {
        let Some(secret) = load_jwt_secret(args.jwt_secret_file.as_deref()) else {
            std::process::exit(1);
        };
        let jwt = JwtConfig::new(secret.as_bytes());
        handle_mint_token(&jwt, role, &args.sub, args.unverified);
        return;
    }

    let config = build_config(&args);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        });

    let local_addr = listener.local_addr().unwrap();
    info!(address = %local_addr, "Listening");

    if let Err(e) = run_server(config, listener).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
