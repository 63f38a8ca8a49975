use crate::infrastructure::state::AppState;
use crate::presentation::handlers;
use crate::presentation::middleware::cors::cors_layer;
use crate::presentation::middleware::rate_limit::rate_limit_layer;
use crate::presentation::openapi::ApiDoc;
use crate::presentation::routes;
use crate::shared::error::AppError;
use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!("Handler panicked: {}", detail);
    AppError::InternalServerError(anyhow::anyhow!("Handler panicked: {}", detail)).into_response()
}

pub fn app(state: AppState) -> anyhow::Result<Router> {
    let limiter = rate_limit_layer(state.config.rate_limit_per_minute)?;
    let cors = cors_layer(&state.config.cors_allowed_origins)?;

    Ok(Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health_check))
        .nest(
            "/api/v1/auth",
            routes::auth::routes(state.clone(), limiter.clone()),
        )
        .nest(
            "/api/v1/users",
            routes::accounts::routes(state.clone(), limiter),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
