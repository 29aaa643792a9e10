pub mod chat;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use portfolio_core::config::Config;
use portfolio_core::{Project, Skill};
use routes::records;
use std::path::PathBuf;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf, config: Config) -> Router {
    let cors = cors_layer(&config.server.cors_origins);
    let mount_skills = config.skills;
    let app_state = state::AppState::new(root, config);

    let mut router = Router::new()
        .route("/health", get(routes::health::health))
        // Projects
        .route(
            "/projects",
            get(records::list::<Project>).post(records::create::<Project>),
        )
        .route(
            "/projects/{id}",
            get(records::get::<Project>)
                .put(records::update::<Project>)
                .delete(records::delete::<Project>),
        )
        // Chat
        .route("/ws", get(routes::ws::raw))
        .route("/ws/{client_id}", get(routes::ws::announced));

    if mount_skills {
        router = router
            .route(
                "/skills",
                get(records::list::<Skill>).post(records::create::<Skill>),
            )
            .route(
                "/skills/{id}",
                get(records::get::<Skill>)
                    .put(records::update::<Skill>)
                    .delete(records::delete::<Skill>),
            );
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Allow-listed origins with credentials. Credentials rule out wildcard
/// methods and headers, so both are mirrored from the preflight instead.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Start the server on the host and port from `config`.
pub async fn serve(root: PathBuf, config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, config, listener).await
}

/// Start the server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port). Returns after Ctrl-C once in-flight requests
/// have finished.
pub async fn serve_on(
    root: PathBuf,
    config: Config,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_router(root, config);

    tracing::info!("portfolio server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("portfolio server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
