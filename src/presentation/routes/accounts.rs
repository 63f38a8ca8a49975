use crate::infrastructure::state::AppState;
use crate::presentation::handlers::accounts;
use crate::presentation::middleware::auth::require_session;
use crate::presentation::middleware::rate_limit::AuthRateLimitLayer;
use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

/// Account routes: registration is public, everything else needs a session
pub fn routes(state: AppState, limiter: AuthRateLimitLayer) -> Router<AppState> {
    let public = Router::new()
        .route("/register", post(accounts::register))
        .route_layer(limiter);

    let protected = Router::new()
        .route("/current-user", get(accounts::current_account))
        .route("/update-account", patch(accounts::update_account))
        .route("/avatar", patch(accounts::update_avatar))
        .route("/cover-image", patch(accounts::update_cover_image))
        .route_layer(middleware::from_fn_with_state(state, require_session));

    public.merge(protected)
}
