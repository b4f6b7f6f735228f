pub mod auth;
pub mod dispatch;
pub mod error;
pub mod lease;
pub mod routes;
pub mod state;
pub mod tick;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};

use axis_core::config::Config;
use state::AppState;

/// Build the axum Router with all function routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Function endpoints, gated behind the service credential.
        .route("/functions/autonomy-tick", post(routes::tick::autonomy_tick))
        .route(
            "/functions/workflow-approve",
            post(routes::workflow::review_request),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_service_role,
        ))
        // Liveness, outside auth.
        .route("/healthz", get(routes::health::healthz))
        .layer(cors)
        .with_state(state)
}

/// Start the orchestration server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let bind = config.server.bind.clone();
    let (state, completions) = AppState::new(config);
    tokio::spawn(dispatch::drain_completions(completions));

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!("axis server listening on http://{bind}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so
/// the caller can read the actual port before starting (useful when the
/// configured port is 0 and the OS picks a free one).
pub async fn serve_on(config: Config, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual = listener.local_addr()?;
    let (state, completions) = AppState::new(config);
    tokio::spawn(dispatch::drain_completions(completions));

    let app = build_router(state);
    tracing::info!("axis server listening on http://{actual}");
    axum::serve(listener, app).await?;
    Ok(())
}
