// rest/mod.rs — HTTP surface for the task service.
//
// Axum server bound to {bind_address}:{port} (local only by default).
//
// Endpoints:
//   GET  /tasks                list, newest first
//   POST /tasks                create (form field `title`), redirect to list
//   POST /tasks/{id}/toggle    flip completed, redirect to list (GET also accepted)
//   POST /tasks/{id}/delete    remove, redirect to list (GET also accepted)
//   GET  /health

pub mod routes;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::AppContext;

pub async fn start_rest_server(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        // Health (liveness probe)
        .route("/health", get(routes::health::health))
        // Tasks
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/{id}/toggle",
            get(routes::tasks::toggle_complete).post(routes::tasks::toggle_complete),
        )
        .route(
            "/tasks/{id}/delete",
            get(routes::tasks::delete_task).post(routes::tasks::delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(err = %e, "failed to listen for shutdown signal");
    }
}
