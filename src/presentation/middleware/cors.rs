use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// Empty list or `*` allows any origin. Credentials (session cookies) are only
/// allowed when origins are listed explicitly.
pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    if allowed_origins.is_empty() || allowed_origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .map(|s| s.parse())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    Ok(CorsLayer::very_permissive()
        .allow_origin(origins)
        .allow_credentials(true))
}
