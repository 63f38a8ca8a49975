use crate::infrastructure::state::AppState;
use crate::presentation::handlers::auth;
use crate::presentation::middleware::auth::require_session;
use crate::presentation::middleware::rate_limit::AuthRateLimitLayer;
use axum::{Router, middleware, routing::post};

/// Auth routes: public credential exchanges plus session-bound actions
pub fn routes(state: AppState, limiter: AuthRateLimitLayer) -> Router<AppState> {
    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/refresh-token", post(auth::refresh_token))
        .route_layer(limiter);

    let protected = Router::new()
        .route("/logout", post(auth::logout))
        .route("/change-password", post(auth::change_password))
        .route_layer(middleware::from_fn_with_state(state, require_session));

    public.merge(protected)
}
