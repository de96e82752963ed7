use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mood_movies_api::{
    api::{build_cors_layer, create_router, AppState},
    config::Config,
    services::OpenAiProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mood_movies_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let provider = OpenAiProvider::new(config.openai_api_url.clone());
    let api_key = config.api_key();

    tracing::info!(
        model = %config.openai_model,
        api_url = %provider.api_url(),
        api_key_configured = api_key.is_some(),
        "Recommendation provider configured"
    );

    let state = AppState::new(Arc::new(provider), config.openai_model.clone(), api_key);
    let cors = build_cors_layer(&config.cors_origins)?;
    tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
    let app = create_router(state, cors);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
