use lingoroom_api::{build_router, state::AppState};
use lingoroom_config::Settings;
use lingoroom_db::{connect, indexes::ensure_indexes};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "lingoroom_api=debug,lingoroom_services=debug,lingoroom_db=debug,lingoroom_captions=debug,tower_http=debug"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config; missing credentials fail startup, not the first call
    let settings = Settings::load()?;
    settings.validate()?;
    info!("Starting Lingoroom API on {}:{}", settings.app.host, settings.app.port);
    info!(
        media_base_url = %settings.media.base_url,
        messaging_cluster = %settings.messaging.cluster,
        translation_endpoint = %settings.translation.endpoint,
        fallbacks = settings.translation.fallback_endpoints.len(),
        "External service config"
    );

    // Connect to MongoDB
    let db = connect(&settings).await?;

    // Ensure indexes
    ensure_indexes(&db).await?;

    // Build app state
    let app_state = AppState::new(db, settings.clone());

    // Build router
    let app = build_router(app_state);

    // Start server
    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
