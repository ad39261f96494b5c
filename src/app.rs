use crate::commands::CommandHandler;
use crate::config::AppConfig;
use crate::database::{InMemoryVectorStore, QdrantVectorStore, VectorStore};
use crate::food::api::UsdaClient;
use crate::food::ingest::{ingest, load_food_list};
use crate::llm::chat::ChatManager;
use crate::llm::embeddings::{Embedder, HashingEmbedder, OpenAiEmbedder};
use crate::llm::semantic_search::FoodIndex;
use crate::providers::anthropic::anthropic::NUTRITIONIST_SYSTEM_PROMPT;
use crate::providers::{AnthropicProvider, CompletionProvider};
use anyhow::{Context, Result};
use std::sync::Arc;

pub const COLLECTION_NAME: &str = "nutrition_knowledge";

fn create_embedder(config: &AppConfig) -> Arc<dyn Embedder> {
    match &config.embedding.openai_api_key {
        Some(key) => Arc::new(OpenAiEmbedder::new(key, &config.embedding.openai_model)),
        None => Arc::new(HashingEmbedder::default()),
    }
}

async fn create_store(config: &AppConfig, dimensions: usize) -> Result<Arc<dyn VectorStore>> {
    match &config.qdrant_url {
        Some(url) => {
            let store = QdrantVectorStore::connect(url, COLLECTION_NAME, dimensions)
                .await
                .context("Failed to initialize vector database")?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryVectorStore::new(dimensions))),
    }
}

/// Ingests the configured foods, builds the index and wires the chat
/// handler. Any failure here is fatal; the chat loop never sees a
/// half-built index.
pub async fn bootstrap(config: AppConfig) -> Result<CommandHandler> {
    let names = load_food_list(config.foods_file.as_deref())?;
    log::info!("Loading {} foods from USDA FoodData Central", names.len());

    let usda = Arc::new(UsdaClient::new(config.usda.clone()));
    let records = ingest(&usda, &names).await.context("Ingestion failed")?;

    let embedder = create_embedder(&config);
    let store = create_store(&config, embedder.dimensions()).await?;
    let index = FoodIndex::build(embedder, store, records)
        .await
        .context("Failed to build food index")?;

    let provider: Arc<dyn CompletionProvider> = Arc::new(AnthropicProvider::new(
        config.provider.clone(),
        NUTRITIONIST_SYSTEM_PROMPT,
    ));
    log::info!("Using model {}", provider.get_model_info());
    log::debug!("System prompt: {}", provider.get_system_message());

    let chat = ChatManager::new(provider, Arc::new(index), config.top_k);
    Ok(CommandHandler::new(chat, usda))
}
