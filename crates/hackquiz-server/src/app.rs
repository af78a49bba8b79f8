use crate::{AppConfig, routes};
use axum::routing::get;
use axum::{Extension, Router};
use axum_prometheus::PrometheusMetricLayerBuilder;
use http::{HeaderValue, Method, header};
use sentry_tower::NewSentryLayer;
use std::path::Path;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// All application routes, without the process wide layers.
pub(crate) fn create_router(app_config: AppConfig, static_dir: &Path) -> Router {
    Router::new()
        .merge(routes::pages::create_router())
        .merge(routes::quiz::create_router())
        .merge(routes::openapi::create_router())
        .nest(
            "/api/v0",
            Router::new()
                .nest("/status", routes::status::create_router())
                .nest("/sessions", routes::sessions::create_router()),
        )
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(
            // ServiceBuilder layers are called top to bottom
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(app_config)),
        )
}

pub fn create_app(app_config: AppConfig, static_dir: &Path, origins: &[String]) -> anyhow::Result<Router> {
    // The prometheus recorder is global, so this may only be called once per process
    let (prometheus_layer, metric_handle) = PrometheusMetricLayerBuilder::new()
        .with_prefix("hackquiz")
        .with_default_metrics()
        .build_pair();

    if !origins.is_empty() {
        tracing::info!(?origins, "allowing origins");
    }
    let cors = CorsLayer::new()
        .allow_origin(
            origins
                .iter()
                .map(|origin| origin.parse())
                .collect::<Result<Vec<HeaderValue>, _>>()?,
        )
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::ORIGIN])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .max_age(Duration::from_secs(3600));

    let app = create_router(app_config, static_dir)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(
            // Router layers are called bottom to top
            // ServiceBuilder layers are called top to bottom
            ServiceBuilder::new()
                .layer(NewSentryLayer::new_from_top())
                .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
                .layer(prometheus_layer)
                .layer(cors),
        );
    Ok(app)
}
