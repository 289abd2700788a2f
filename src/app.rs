use std::sync::Arc;

use crate::session::Session;
use crate::state::AppState;

pub fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "calorie_counter=debug,reqwest=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout belongs to the console
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

pub async fn serve(state: AppState) -> anyhow::Result<()> {
    tracing::info!(api = %state.config.api_base_url, "starting session");
    let session = Arc::new(Session::new(state));

    match session.check_service().await {
        Ok(health) if health.is_healthy() => tracing::info!(status = %health.status, "analysis service is up"),
        Ok(health) => tracing::warn!(status = %health.status, "analysis service reports a problem"),
        Err(e) => tracing::warn!(error = %e, "analysis service unreachable; actions will fail until it is up"),
    }

    crate::console::run(session).await
}
