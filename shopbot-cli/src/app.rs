//! Wires catalog, memory, prompt and LLM client into an [`AssistantOrchestrator`] and runs it on a
//! transport.

use std::sync::Arc;

use anyhow::{Context, Result};
use assistant::AssistantOrchestrator;
use catalog::{search, CatalogCache, HttpCatalogSource};
use llm_client::{mask_token, EnvLlmConfig, LlmConfig, OpenAICompatClient};
use memory_inmemory::InMemoryConversationStore;
use prompt::PromptComposer;
use shopbot_telegram::{run_polling, TelegramConfig};
use tokio::io::BufReader;
use tracing::{info, instrument, warn};

use crate::config::BotConfig;
use crate::console::{run_chat, ConsoleTransport};

/// Catalog cache with one refresh already attempted. A failed first fetch is not fatal: the next
/// message retries.
#[instrument(skip(config))]
pub async fn build_catalog(config: &BotConfig) -> Result<Arc<CatalogCache>> {
    let source = HttpCatalogSource::with_timeout(config.catalog_url.clone(), config.catalog_timeout())
        .context("Failed to build catalog HTTP client")?;
    info!(url = %source.url(), "step: initial catalog fetch");
    let cache = Arc::new(CatalogCache::with_refresh_interval(
        Arc::new(source),
        config.refresh_interval(),
    ));

    if cache.refresh().await {
        info!(products = cache.snapshot().await.len(), "Catalog loaded");
    } else {
        warn!("Initial catalog fetch failed; continuing with an empty catalog");
    }
    Ok(cache)
}

#[instrument(skip(config, catalog))]
pub fn build_orchestrator(
    config: &BotConfig,
    catalog: Arc<CatalogCache>,
) -> Result<AssistantOrchestrator> {
    let llm_config = EnvLlmConfig::from_env()?;
    if reqwest::Url::parse(llm_config.base_url()).is_err() {
        anyhow::bail!("LLM_BASE_URL is not a valid URL: {}", llm_config.base_url());
    }
    info!(
        api_key = %mask_token(llm_config.api_key()),
        base_url = %llm_config.base_url(),
        model = %llm_config.model(),
        "LLM configured"
    );
    let llm = OpenAICompatClient::from_config(&llm_config)?;

    Ok(AssistantOrchestrator::new(
        catalog,
        Arc::new(InMemoryConversationStore::new(config.max_history)),
        Arc::new(llm),
        PromptComposer::new(config.prompt_config()),
    ))
}

pub async fn run_telegram(config: &BotConfig, token: Option<String>) -> Result<()> {
    let telegram = TelegramConfig::load(token)?;
    telegram.validate()?;
    let bot = telegram.build_bot()?;

    let catalog = build_catalog(config).await?;
    let orchestrator = Arc::new(build_orchestrator(config, catalog)?);

    info!("step: starting Telegram polling");
    run_polling(bot, orchestrator).await
}

pub async fn run_console(config: &BotConfig, user_id: &str) -> Result<()> {
    let catalog = build_catalog(config).await?;
    let orchestrator = build_orchestrator(config, catalog)?;
    let transport = ConsoleTransport::new(tokio::io::stdout(), config.store_name.clone());

    println!("Escribí tu mensaje ({} para terminar).", crate::console::EXIT_COMMANDS.join(" o "));
    let answered = run_chat(
        BufReader::new(tokio::io::stdin()),
        &transport,
        &orchestrator,
        user_id,
    )
    .await?;
    info!(answered, "Chat session ended");
    Ok(())
}

/// Prints the category summary and the products block for `query`.
pub async fn print_search(config: &BotConfig, query: &str) -> Result<()> {
    let catalog = build_catalog(config).await?;
    let snapshot = catalog.snapshot().await;
    if snapshot.is_empty() {
        anyhow::bail!("Catalog is empty or could not be fetched from {}", config.catalog_url);
    }

    let composer = PromptComposer::new(config.prompt_config());
    let matches = search(query, &snapshot.products);
    println!("{} productos\n{}", snapshot.len(), prompt::category_summary(&snapshot.products));
    println!("{}", composer.grounding_block(query, &matches).trim_start());
    Ok(())
}
