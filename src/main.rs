use std::sync::Arc;
use anyhow::{Context, Result};
use log::info;
use prompt_optimizer::catalog::TemplateCatalog;
use prompt_optimizer::config::Config;
use prompt_optimizer::generation::OpenAICompletion;
use prompt_optimizer::optimizer::PromptOptimizer;
use prompt_optimizer::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load().context("loading configuration")?;
    let generator = OpenAICompletion::new(config.api_key()?, config.api_base.as_str(), config.model.as_str());
    info!("using model {} at {}", config.model, config.api_base);

    let catalog = TemplateCatalog::builtin().context("building template catalog")?;
    let optimizer = PromptOptimizer::new(Arc::new(catalog), Arc::new(generator), config.generation_settings());

    let addr = config.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    server::serve(listener, server::router(AppState::new(optimizer)), shutdown_signal()).await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {}", err);
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
