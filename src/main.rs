use task_api_rust::{app, config, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Task API in {:?} mode", config.environment);

    let state = AppState::from_config(config)
        .await
        .unwrap_or_else(|e| panic!("failed to initialize store: {}", e));

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Task API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
