pub mod handlers;
pub mod types;

use crate::{
    Result,
    agent::ResumePipeline,
    config::Config,
    history::{HeaderIdentityResolver, HistoryStorage},
};
use axum::{
    Router,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze-job", post(handlers::analyze_job))
        .route("/resume", post(handlers::generate_resume))
        .route("/result", get(handlers::latest_result))
        .route("/result/:id", get(handlers::get_result))
        .route("/download/:id", get(handlers::download_resume))
        .route("/history", get(handlers::list_history))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // Initialize history storage
    let db_path =
        std::env::var("HISTORY_DB_PATH").unwrap_or_else(|_| config.server.database_path.clone());
    let history = HistoryStorage::new(&db_path).await?;

    let pipeline = ResumePipeline::from_config(config.llm.clone(), &config.pipeline);
    let identity = HeaderIdentityResolver::new(&config.identity)?;

    let app_state = AppState {
        history: Arc::new(history),
        pipeline: Arc::new(pipeline),
        session_header: identity.session_header().clone(),
        identity: Arc::new(identity),
    };

    let app = router(app_state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
