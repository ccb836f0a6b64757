use restaurant_search::{
    config::ServerConfig,
    core::SeaOrmStore,
    logging,
    routes::{AppState, router},
};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let config = ServerConfig::from_env()?;
    logging::init(&config.log_level);

    let store = SeaOrmStore::connect(&config.database_url).await?;
    store.ensure_schema().await?;
    let backend = store.backend();

    let mut app = router(AppState::new(store));
    if config.cors_allow_any {
        app = app.layer(CorsLayer::permissive());
    }

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, backend = ?backend, "Restaurant search API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
