pub mod error;
pub mod routes;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Room routes
    let room_routes = Router::new()
        .route("/", get(routes::room::list))
        .route("/", post(routes::room::create))
        .route("/{name}", get(routes::room::get))
        .route("/{name}/join", post(routes::room::join))
        .route("/{name}/leave", post(routes::room::leave))
        .route("/{name}/participant", get(routes::room::participants))
        .route("/{name}/summary", post(routes::room::summary));

    // Transcript routes (under room)
    let transcript_routes = Router::new()
        .route("/", get(routes::transcript::list))
        .route("/", post(routes::transcript::create));

    // Messaging routes (channel auth for the hosted pub/sub service)
    let messaging_routes = Router::new().route("/auth", post(routes::messaging::auth));

    // Compose API
    let api = Router::new()
        .nest("/room", room_routes)
        .nest("/room/{name}/transcript", transcript_routes)
        .nest("/messaging", messaging_routes);

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
