use anyhow::Result;

use planboard_backend::{app, config, logging};
use planboard_backend::services::{DialogueEngine, ParserClient, PricingClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        "Starting planboard backend"
    );

    // Specification parser client (optional: keyword fallback otherwise)
    let parser = match &settings.parser_service_url {
        Some(url) => Some(ParserClient::new(
            url,
            &settings.parser_service_token,
            settings.parser_service_timeout_seconds,
        )?),
        None => {
            tracing::info!("No parser service configured; using keyword parsing only");
            None
        }
    };

    // Optionally check parser health (non-blocking)
    if let Some(parser) = parser.clone() {
        tokio::spawn(async move {
            match parser.health_check().await {
                Ok(()) => tracing::info!("Parser service is healthy"),
                Err(e) => tracing::warn!(error = %e, "Parser service health check failed - will fall back to keyword parsing"),
            }
        });
    }

    // Price catalog client (optional: bills go out unpriced without it)
    let pricing = match &settings.pricing_service_url {
        Some(url) => Some(PricingClient::new(
            url,
            &settings.pricing_service_token,
            settings.pricing_service_timeout_seconds,
        )?),
        None => {
            tracing::info!("No pricing service configured; bills will be unpriced");
            None
        }
    };

    // Create application state
    let engine = DialogueEngine::new(parser);
    let state = app::AppState::new(settings.clone(), engine, pricing);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
