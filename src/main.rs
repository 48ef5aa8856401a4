mod app;
mod auth;
mod config;
mod errors;
mod state;
mod users;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "accounts=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    if config.uses_default_secret() {
        tracing::warn!("SECRET_KEY not set; signing tokens with the development default");
    }
    if let Some(url) = &config.error_report_url {
        // recorded only; events are not forwarded
        tracing::info!(endpoint = %url, "error reporting endpoint configured");
    }
    let (app_state, db) = AppState::init(&config).await?;

    state::migrate(&db).await?;

    let app = app::build_app(app_state);
    app::serve(app, &config.host, config.port).await
}
