use anyhow::{Context, Result};
use dotenv::dotenv;
use std::sync::Arc;

use food_image_analyzer::config::Config;
use food_image_analyzer::error::ConfigError;
use food_image_analyzer::handlers::AnalysisHandler;
use food_image_analyzer::server::create_router;
use food_image_analyzer::services::{AIService, GeminiService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables (RUST_LOG may come from .env)
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("🚀 Starting Food Image Analyzer...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(ConfigError::Missing(key)) => {
            log::error!("❌ {} is not set.", key);
            log::error!("   Put it in a .env file next to the binary, e.g. {}=YOUR_API_KEY", key);
            std::process::exit(1);
        }
        Err(e) => {
            log::error!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::debug!("Loaded configuration: {:?}", config);

    let gemini = GeminiService::new(&config);
    log::info!("✅ Gemini service initialized: {}", gemini.endpoint());

    let ai = Arc::new(gemini) as Arc<dyn AIService>;
    let analysis_handler = Arc::new(AnalysisHandler::new(ai));

    let app = create_router(analysis_handler, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("🌐 Backend server listening at http://{}", addr);
    log::info!("🖼️ Web client: http://{}/app/ (serving {})", addr, config.static_dir);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("🛑 Shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("❌ Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("🛑 Shutting down...");
}
