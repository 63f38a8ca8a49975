use vidtube::infrastructure;
use vidtube::infrastructure::auth::JwtAuthService;
use vidtube::infrastructure::config::AppConfig;
use vidtube::infrastructure::media::UrlMediaStorage;
use vidtube::infrastructure::password::Argon2PasswordService;
use vidtube::infrastructure::repositories::accounts::PostgresAccountRepository;
use vidtube::infrastructure::state::AppState;
use vidtube::presentation;

use dotenvy::dotenv;
use std::env;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Ignore the error: tests may initialise tracing more than once
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "vidtube=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    let config = AppConfig::from_env()?;
    run(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run<F>(config: AppConfig, shutdown_signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (listener, app) = bootstrap(config).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn bootstrap(config: AppConfig) -> anyhow::Result<(tokio::net::TcpListener, axum::Router)> {
    let pool = infrastructure::db::create_pool(&config.database_url, &config.pool).await?;
    infrastructure::db::run_migrations(&pool).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let state = AppState::new(
        config.clone(),
        Arc::new(PostgresAccountRepository::new(pool)),
        Arc::new(JwtAuthService::new(&config.tokens)),
        Arc::new(Argon2PasswordService::new()),
        Arc::new(UrlMediaStorage::new()),
    );
    let app = presentation::router::app(state)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "listening on {} ({:?})",
        listener.local_addr()?,
        config.environment
    );

    Ok((listener, app))
}
