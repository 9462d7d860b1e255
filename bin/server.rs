// News Law Explainer - Web Server

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use news_law_explainer::{
    build_router, logging, Analyzer, AppState, ArticleService, Config, GeminiClient, Repository,
    SqliteStore,
};

#[derive(Parser)]
#[command(name = "news-law-server", version, about = "News article legal analysis API")]
struct ServerArgs {
    #[command(flatten)]
    config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerArgs::parse().config;

    logging::init_logging(&config.log_level, config.log_format);
    tracing::info!("news-law-server v{}", news_law_explainer::VERSION);

    let model = GeminiClient::new(config.gemini_settings()).context("Failed to configure Gemini client")?;
    tracing::info!(model = %config.model, location = %config.location, "model backend ready");

    let store = SqliteStore::open(&config.database)
        .with_context(|| format!("Failed to open database {:?}", config.database))?;
    tracing::info!(path = ?config.database, "database opened");

    let service = ArticleService::new(
        Analyzer::new(Arc::new(model), config.parse_policy),
        Repository::new(Arc::new(store)),
    );
    let app = build_router(AppState::new(service));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(%addr, "server listening");
    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
