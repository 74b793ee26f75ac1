use axum::{
    http::Method,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::todos;

/// Versioned todo API, nested under `/api/v1`
fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/todo", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/todo/{id}",
            get(todos::get_todo)
                .put(todos::update_todo)
                .post(todos::update_todo)
                .delete(todos::delete_todo),
        )
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

/// Create the full router with application state
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let router = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api/v1", create_v1_router())
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware));

    let router = match metrics {
        Some(metrics) => router.merge(create_metrics_router(metrics)),
        None => router,
    };

    router.layer(cors_layer()).layer(TraceLayer::new_for_http())
}
