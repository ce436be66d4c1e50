mod error;
mod referrals;
mod router;
mod telemetry;

use std::{net::SocketAddr, time::Duration};

use axum::http::HeaderValue;
use tracing::info;

use referral_mail::MailClient;
use referral_storage::Database;
use referral_util::{load_env_file, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file();
    let config = AppConfig::from_env()?;

    telemetry::init_tracing(&config)?;
    let metrics = telemetry::init_metrics()?;

    let database = Database::connect(&config.database_url).await?;
    database.run_migrations().await?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let mailer = MailClient::new(
        config.mail.base_url.clone(),
        config.mail.sender.clone(),
        config.mail.auth_token.clone(),
        http,
    );

    let allowed_origin: HeaderValue = config.allowed_origin.parse()?;
    let state = router::AppState::new(metrics, database.clone(), mailer, allowed_origin);

    let addr: SocketAddr = config.bind_addr;
    info!(stage = "app", %addr, env = %config.environment.as_str(), "starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router::app_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(stage = "app", "HTTP server stopped, closing database pool");
    database.close().await;
    Ok(())
}

/// Resolves when SIGINT or SIGTERM is received, letting in-flight requests
/// drain before the pool is closed.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
