pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Json, Router,
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::catalog::endpoints::{categories, locations, places};
use crate::catalog::handlers::generate_place;
use crate::config::GatewayConfig;
use crate::user_auth::middleware::bearer_auth_middleware;
use state::AppState;

/// Build the full `/v1` API router.
///
/// With `require_admin_token` the bearer middleware guards every `/v1/admin/*` route.
pub fn build_router(state: Arc<AppState>, require_admin_token: bool) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(crate::user_auth::handlers::login))
        .route("/logout", post(crate::user_auth::handlers::logout))
        .route("/register", post(crate::user_auth::handlers::register))
        .route(
            "/forget-password",
            post(crate::user_auth::handlers::forget_password),
        )
        .route(
            "/requestAccess",
            post(crate::user_auth::handlers::request_access),
        );

    let mut admin_routes = Router::new()
        // Places
        .route("/updatePlace", put(places::update).post(places::update))
        .route("/deletePlace/{id}", delete(places::delete))
        .route("/deletePlaces", post(places::delete_many))
        // Categories
        .route("/categories", get(categories::list))
        .route("/categories/{id}", get(categories::get))
        .route(
            "/updateCategory",
            put(categories::update).post(categories::update),
        )
        .route("/deleteCategory/{id}", delete(categories::delete))
        .route("/deleteCategories", post(categories::delete_many))
        // Locations
        .route("/locations", get(locations::list))
        .route("/locations/{id}", get(locations::get))
        .route(
            "/updateLocation",
            put(locations::update).post(locations::update),
        )
        .route("/deleteLocation/{id}", delete(locations::delete))
        .route("/deleteLocations", post(locations::delete_many));

    if require_admin_token {
        admin_routes =
            admin_routes.layer(from_fn_with_state(state.clone(), bearer_auth_middleware));
    }

    let v1 = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/places", get(places::list))
        .route("/places/{id}", get(places::get))
        .route("/generatePlace", get(generate_place))
        .nest("/auth", auth_routes)
        .nest("/admin", admin_routes);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .nest("/v1", v1)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::ApiDoc::openapi()) }),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C or SIGTERM
pub async fn run_server(
    config: &GatewayConfig,
    state: Arc<AppState>,
    require_admin_token: bool,
) -> anyhow::Result<()> {
    if require_admin_token {
        tracing::info!("Bearer token required on /v1/admin/*");
    }
    let app = build_router(state, require_admin_token);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }
}
