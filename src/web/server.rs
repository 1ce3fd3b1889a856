use crate::config::Config;
use crate::web::api::{get_counters, health_check, transform_logs, AppState};
use crate::web::counters::MetricsSink;
use crate::web::request_id::RequestIdResolver;
use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the application router.
///
/// Every path other than `/health` and `/metrics` runs the pipeline,
/// whatever the method.
pub fn create_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", any(transform_logs))
        .route("/transform", any(transform_logs))
        .route("/health", get(health_check))
        .route("/metrics", get(get_counters))
        .fallback(transform_logs)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve `router` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}

/// Bind the configured address and run the log processor.
pub async fn start_server<F>(
    config: &Config,
    metrics: Arc<dyn MetricsSink>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::new(RequestIdResolver::new(&config.request_id), metrics);
    let router = create_router(state, config.server.max_body_bytes);

    let listener = TcpListener::bind(&config.server.listen).await?;
    info!(addr = %listener.local_addr()?, "Log processor listening");
    info!("Endpoints: / and /transform (any other path also transforms), GET /health, GET /metrics");

    serve(listener, router, shutdown).await
}
