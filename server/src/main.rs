mod config;
mod routes;
mod state;

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env().expect("invalid server configuration");
    init_tracing(config.log_json);

    let port = config.port;
    let upstream = config.api_base_url.clone();
    let state = state::AppState::new(config).expect("http client init failed");

    let app = routes::app(state).expect("leptos configuration failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, %upstream, "saluki listening");
    axum::serve(listener, app).await.expect("server failed");
}
