use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod routes;

/// Server state
///
/// Holds only the database path: every request opens its own connection and
/// releases it when the handler returns, so no state is shared between
/// in-flight requests.
pub struct AppState {
    pub database_path: PathBuf,
}

/// Build the application router over the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/files", get(routes::list_files))
        .route("/files/stats", get(routes::file_stats))
        .route("/files/search", get(routes::search_files))
        .route("/files/unify", get(routes::unify_files))
        .route("/files/unify/report", get(routes::unify_report))
        .route("/files/{id}", get(routes::get_file))
        .route("/files/{id}/filter", get(routes::filter_file))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(port: u16, database_path: PathBuf) -> anyhow::Result<()> {
    let state = Arc::new(AppState { database_path });
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
